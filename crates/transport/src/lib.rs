#![doc = include_str!("../README.md")]

#[cfg(not(unix))]
compile_error!("tapline-transport supports Unix-like targets only");

pub mod error;
pub mod file;
pub mod shm;
pub mod syslog;
pub mod transport;
pub mod udp;
pub mod unix;

// --- 주요 타입 re-export ---

pub use error::TransportError;
pub use transport::{Transport, TransportKind, destroy, flush, send};
