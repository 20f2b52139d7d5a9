//! 전송 계층 에러 타입
//!
//! [`TransportError`]는 sink 생성, 전송, 플러시 중 발생하는 모든 에러를 표현합니다.
//! `From<TransportError> for TaplineError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use tapline_core::error::{SinkError, TaplineError};

/// 전송 계층 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// 필수 인자 누락 (transport, 메시지, 호스트, 포트, 경로)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// 주소 또는 포트 해석 실패
    #[error("cannot resolve {host}:{port}: {reason}")]
    Resolution {
        /// 대상 호스트
        host: String,
        /// 대상 포트 또는 서비스 이름
        port: String,
        /// 실패 사유
        reason: String,
    },

    /// OS 호출 실패 (open, socket, write, syslog 등)
    #[error("{op} failed: {source}")]
    Io {
        /// 실패한 동작 (예: "udp send", "file open")
        op: &'static str,
        /// 원인 I/O 에러
        #[source]
        source: std::io::Error,
    },

    /// 일부만 전송됨 (데이터그램 잘림 등)
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite {
        /// 실제 기록된 바이트 수
        written: usize,
        /// 기록해야 할 바이트 수
        expected: usize,
    },
}

impl TransportError {
    pub(crate) fn io(op: &'static str, source: std::io::Error) -> Self {
        Self::Io { op, source }
    }
}

impl From<TransportError> for TaplineError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidArgument(_) | TransportError::Resolution { .. } => {
                TaplineError::Sink(SinkError::InitFailed(err.to_string()))
            }
            _ => TaplineError::Sink(SinkError::SendFailed(err.to_string())),
        }
    }
}
