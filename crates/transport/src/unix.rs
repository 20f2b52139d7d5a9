//! Unix 도메인 데이터그램 소켓 전송
//!
//! 생성 시점에는 수신 측 소켓이 없어도 됩니다. 대상 경로는 매 전송마다 지정하므로
//! 수신 측이 나중에 생기거나 재시작되어도 그대로 동작합니다.

use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TransportError;

/// Unix 도메인 소켓 전송
#[derive(Debug)]
pub struct UnixTransport {
    path: PathBuf,
    socket: UnixDatagram,
}

impl UnixTransport {
    /// 바인드하지 않은 데이터그램 소켓을 만들고 대상 경로를 기억합니다.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(TransportError::InvalidArgument(
                "unix transport requires a path".to_owned(),
            ));
        }

        let socket = UnixDatagram::unbound().map_err(|e| TransportError::io("unix socket", e))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| TransportError::io("unix socket", e))?;

        debug!(path = %path.display(), "unix transport created");
        Ok(Self {
            path: path.to_path_buf(),
            socket,
        })
    }

    /// 메시지를 대상 경로로 전송합니다. 수신 측이 없으면 I/O 에러를 반환합니다.
    pub fn send(&self, msg: &str) -> Result<usize, TransportError> {
        let bytes = msg.as_bytes();
        let written = self
            .socket
            .send_to(bytes, &self.path)
            .map_err(|e| TransportError::io("unix send", e))?;
        if written != bytes.len() {
            return Err(TransportError::ShortWrite {
                written,
                expected: bytes.len(),
            });
        }
        Ok(written)
    }

    /// 대상 소켓 경로를 반환합니다.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
