//! 공유 메모리 전송
//!
//! 현재는 메시지를 받아 버리는 sink입니다. 전송은 항상 성공합니다.

use tracing::debug;

use crate::error::TransportError;

/// 공유 메모리 전송
#[derive(Debug, Default)]
pub struct ShmTransport {
    _private: (),
}

impl ShmTransport {
    /// 공유 메모리 전송을 엽니다.
    pub fn open() -> Result<Self, TransportError> {
        // TODO: back ShmTransport with a POSIX shared-memory ring (shm_open + mmap)
        debug!("shm transport created");
        Ok(Self::default())
    }

    /// 메시지를 받아들입니다.
    pub fn send(&self, msg: &str) -> Result<usize, TransportError> {
        Ok(msg.len())
    }
}
