//! `Transport` 열거형 -- 다섯 가지 sink를 하나의 타입으로 묶습니다.
//!
//! 각 변형은 자신의 OS 핸들만 소유하며, 해제는 `Drop`이 변형별로 처리합니다.
//! 부분적으로만 초기화된 transport는 존재하지 않습니다. 팩토리가 실패하면
//! 그때까지 얻은 핸들은 지역 변수와 함께 해제됩니다.
//!
//! # 널 안전 함수
//!
//! [`send`], [`flush`], [`destroy`]는 transport가 없는 경우(`None`)도 받아들여
//! 호출 측이 항상 에러 결과만 받도록 합니다.

use std::fmt;
use std::path::Path;

use metrics::counter;
use tapline_core::config::TransportConfig;
use tapline_core::metrics as m;
use tracing::debug;

use crate::error::TransportError;
use crate::file::FileTransport;
use crate::shm::ShmTransport;
use crate::syslog::SyslogTransport;
use crate::udp::UdpTransport;
use crate::unix::UnixTransport;

/// transport 종류 태그
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Udp,
    File,
    Unix,
    Syslog,
    Shm,
}

impl TransportKind {
    /// 설정 파일과 메트릭 레이블에서 쓰는 이름을 반환합니다.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::File => "file",
            Self::Unix => "unix",
            Self::Syslog => "syslog",
            Self::Shm => "shm",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 메시지 sink
#[derive(Debug)]
pub enum Transport {
    Udp(UdpTransport),
    File(FileTransport),
    Unix(UnixTransport),
    Syslog(SyslogTransport),
    Shm(ShmTransport),
}

impl Transport {
    /// UDP transport를 생성합니다. 빈 문자열은 인자 누락으로 취급합니다.
    pub fn udp(host: &str, port: &str) -> Result<Self, TransportError> {
        UdpTransport::connect(host, port).map(Self::Udp)
    }

    /// 파일 transport를 생성합니다.
    pub fn file(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        FileTransport::open(path).map(Self::File)
    }

    /// Unix 도메인 소켓 transport를 생성합니다.
    pub fn unix(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        UnixTransport::open(path).map(Self::Unix)
    }

    /// syslog transport를 생성합니다.
    pub fn syslog() -> Result<Self, TransportError> {
        SyslogTransport::open().map(Self::Syslog)
    }

    /// 공유 메모리 transport를 생성합니다.
    pub fn shm() -> Result<Self, TransportError> {
        ShmTransport::open().map(Self::Shm)
    }

    /// `[transport]` 설정 섹션으로 transport를 생성합니다.
    ///
    /// `kind = "none"`이면 `Ok(None)`을 반환합니다.
    pub fn from_config(config: &TransportConfig) -> Result<Option<Self>, TransportError> {
        let transport = match config.kind.to_lowercase().as_str() {
            "udp" => Self::udp(&config.host, &config.port)?,
            "file" => Self::file(&config.path)?,
            "unix" => Self::unix(&config.path)?,
            "syslog" => Self::syslog()?,
            "shm" => Self::shm()?,
            "none" => return Ok(None),
            other => {
                return Err(TransportError::InvalidArgument(format!(
                    "unknown transport kind '{other}'"
                )));
            }
        };
        Ok(Some(transport))
    }

    /// 종류 태그를 반환합니다.
    pub fn kind(&self) -> TransportKind {
        match self {
            Self::Udp(_) => TransportKind::Udp,
            Self::File(_) => TransportKind::File,
            Self::Unix(_) => TransportKind::Unix,
            Self::Syslog(_) => TransportKind::Syslog,
            Self::Shm(_) => TransportKind::Shm,
        }
    }

    /// 메시지를 전송하고 전송한 바이트 수를 반환합니다.
    ///
    /// UDP와 파일은 전체 메시지를 보내거나 에러를 반환합니다.
    pub fn send(&self, msg: &str) -> Result<usize, TransportError> {
        let result = match self {
            Self::Udp(t) => t.send(msg),
            Self::File(t) => t.send(msg),
            Self::Unix(t) => t.send(msg),
            Self::Syslog(t) => t.send(msg),
            Self::Shm(t) => t.send(msg),
        };

        let kind = self.kind().as_str();
        match &result {
            Ok(bytes) => {
                counter!(m::TRANSPORT_MESSAGES_SENT_TOTAL, m::LABEL_TRANSPORT => kind)
                    .increment(1);
                counter!(m::TRANSPORT_BYTES_SENT_TOTAL, m::LABEL_TRANSPORT => kind)
                    .increment(*bytes as u64);
            }
            Err(e) => {
                debug!(transport = kind, error = %e, "send failed");
                counter!(m::TRANSPORT_SEND_FAILURES_TOTAL, m::LABEL_TRANSPORT => kind)
                    .increment(1);
            }
        }
        result
    }

    /// 버퍼링된 데이터를 내립니다. 파일 외의 transport에서는 아무 동작도 하지 않습니다.
    pub fn flush(&self) -> Result<(), TransportError> {
        match self {
            Self::File(t) => t.flush(),
            Self::Udp(_) | Self::Unix(_) | Self::Syslog(_) | Self::Shm(_) => Ok(()),
        }
    }
}

/// transport가 없거나 메시지가 없으면 [`TransportError::InvalidArgument`]를 반환합니다.
pub fn send(transport: Option<&Transport>, msg: Option<&str>) -> Result<usize, TransportError> {
    let transport = transport
        .ok_or_else(|| TransportError::InvalidArgument("no transport".to_owned()))?;
    let msg = msg.ok_or_else(|| TransportError::InvalidArgument("no message".to_owned()))?;
    transport.send(msg)
}

/// transport가 없으면 아무 동작도 하지 않습니다.
pub fn flush(transport: Option<&Transport>) -> Result<(), TransportError> {
    match transport {
        Some(t) => t.flush(),
        None => Ok(()),
    }
}

/// transport를 해제하고 `None`으로 남깁니다. 여러 번 호출해도 안전합니다.
pub fn destroy(transport: &mut Option<Transport>) {
    if let Some(t) = transport.take() {
        debug!(transport = %t.kind(), "transport destroyed");
    }
}
