#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod metrics;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, RouterError, SinkError, TaplineError};

// 설정
pub use config::TaplineConfig;

// 이벤트
pub use event::{CFG_SRC_MAX, Event, EventSource};

// 포매터
pub use format::{Formatter, JsonFormatter, LineFormatter};
