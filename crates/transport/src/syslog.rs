//! syslog 전송
//!
//! 시스템 로거의 연결은 프로세스 전역이며 호스트 프로세스와 공유됩니다.
//! 따라서 `openlog`/`closelog`는 호출하지 않고, 호스트가 설정한 ident와 옵션을 그대로 따릅니다.

use std::ffi::CString;

use tracing::debug;

use crate::error::TransportError;

/// syslog 전송
#[derive(Debug)]
pub struct SyslogTransport {
    priority: libc::c_int,
}

impl SyslogTransport {
    /// `LOG_USER | LOG_INFO` 우선순위로 syslog 전송을 엽니다.
    pub fn open() -> Result<Self, TransportError> {
        debug!("syslog transport created");
        Ok(Self {
            priority: libc::LOG_USER | libc::LOG_INFO,
        })
    }

    /// 메시지를 syslog에 기록합니다.
    ///
    /// 메시지는 서식 문자열이 아니라 `%s`의 인자로 넘깁니다.
    /// NUL 바이트가 포함된 메시지는 [`TransportError::InvalidArgument`]입니다.
    pub fn send(&self, msg: &str) -> Result<usize, TransportError> {
        let text = CString::new(msg).map_err(|_| {
            TransportError::InvalidArgument("syslog message contains a NUL byte".to_owned())
        })?;
        // SAFETY: 서식 문자열과 인자 모두 NUL로 끝나는 유효한 C 문자열이며,
        // `%s` 하나에 인자 하나를 정확히 대응시킵니다.
        unsafe {
            libc::syslog(self.priority, c"%s".as_ptr(), text.as_ptr());
        }
        Ok(msg.len())
    }
}
