//! UDP 전송
//!
//! 호스트와 포트(또는 서비스 이름)를 해석하여 데이터그램 소켓을 만듭니다.
//! UDP는 비연결형이므로 생성 시점에 수신 측이 없어도 성공하며,
//! 각 `send`는 메시지 하나를 데이터그램 하나로 전송합니다.

use std::ffi::CString;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::TransportError;

/// `getservbyname`은 재진입 불가능하므로 호출을 직렬화합니다.
static SERVICE_LOOKUP: Mutex<()> = Mutex::new(());

/// UDP 전송
#[derive(Debug)]
pub struct UdpTransport {
    /// 송신 소켓 (바인드만 되어 있고 connect 하지 않음)
    socket: UdpSocket,
    /// 해석된 대상 주소
    target: SocketAddr,
}

impl UdpTransport {
    /// 대상 주소를 해석하고 송신 소켓을 생성합니다.
    ///
    /// `host`는 숫자/심볼릭, IPv4/IPv6 모두 허용합니다.
    /// `port`는 숫자 포트 또는 `/etc/services`의 UDP 서비스 이름입니다.
    /// 해석된 주소를 순서대로 시도하여 처음으로 소켓 생성에 성공한 주소를 사용합니다.
    pub fn connect(host: &str, port: &str) -> Result<Self, TransportError> {
        if host.is_empty() {
            return Err(TransportError::InvalidArgument(
                "udp transport requires a host".to_owned(),
            ));
        }
        if port.is_empty() {
            return Err(TransportError::InvalidArgument(
                "udp transport requires a port".to_owned(),
            ));
        }

        let port_num = resolve_port(host, port)?;
        let addrs: Vec<SocketAddr> = (host, port_num)
            .to_socket_addrs()
            .map_err(|e| TransportError::Resolution {
                host: host.to_owned(),
                port: port.to_owned(),
                reason: e.to_string(),
            })?
            .collect();

        if addrs.is_empty() {
            return Err(TransportError::Resolution {
                host: host.to_owned(),
                port: port.to_owned(),
                reason: "no addresses returned".to_owned(),
            });
        }

        let mut last_err = None;
        for target in addrs {
            match open_socket(target) {
                Ok(socket) => {
                    debug!(%target, "udp transport created");
                    return Ok(Self { socket, target });
                }
                Err(e) => {
                    debug!(%target, error = %e, "udp socket creation failed, trying next address");
                    last_err = Some(e);
                }
            }
        }

        Err(TransportError::io(
            "udp socket",
            last_err.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no usable address")
            }),
        ))
    }

    /// 메시지 전체를 데이터그램 하나로 전송합니다.
    ///
    /// 일부만 전송된 경우 [`TransportError::ShortWrite`]를 반환합니다.
    pub fn send(&self, msg: &str) -> Result<usize, TransportError> {
        let bytes = msg.as_bytes();
        let written = self
            .socket
            .send_to(bytes, self.target)
            .map_err(|e| TransportError::io("udp send", e))?;
        if written != bytes.len() {
            return Err(TransportError::ShortWrite {
                written,
                expected: bytes.len(),
            });
        }
        Ok(written)
    }

    /// 해석된 대상 주소를 반환합니다.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// 송신 소켓의 로컬 주소를 반환합니다.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket
            .local_addr()
            .map_err(|e| TransportError::io("udp local_addr", e))
    }
}

fn open_socket(target: SocketAddr) -> std::io::Result<UdpSocket> {
    let bind_addr: SocketAddr = if target.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(bind_addr)?;
    // 송신 버퍼가 가득 차면 대기하지 않고 에러
    socket.set_nonblocking(true)?;
    Ok(socket)
}

fn resolve_port(host: &str, port: &str) -> Result<u16, TransportError> {
    if let Ok(num) = port.parse::<u16>() {
        return Ok(num);
    }
    lookup_service(port).ok_or_else(|| TransportError::Resolution {
        host: host.to_owned(),
        port: port.to_owned(),
        reason: "unknown port or service name".to_owned(),
    })
}

fn lookup_service(name: &str) -> Option<u16> {
    let name = CString::new(name).ok()?;
    let _guard = SERVICE_LOOKUP.lock().unwrap_or_else(PoisonError::into_inner);
    // SAFETY: 두 인자 모두 NUL로 끝나는 유효한 C 문자열입니다. 반환 포인터는 정적 버퍼를
    // 가리키므로 SERVICE_LOOKUP 잠금을 쥔 상태에서만 역참조하고 값을 복사합니다.
    unsafe {
        let entry = libc::getservbyname(name.as_ptr(), c"udp".as_ptr());
        if entry.is_null() {
            return None;
        }
        Some(u16::from_be((*entry).s_port as u16))
    }
}
