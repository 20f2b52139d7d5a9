#![doc = include_str!("../README.md")]

pub mod error;
pub mod filter;
pub mod router;
pub mod source;

// --- 주요 타입 re-export ---

pub use error::{EvtError, FilterError};
pub use filter::{
    DEFAULT_LOG_FILE_FILTER, LogFileFilter, default_log_file_filter,
    reset_default_log_file_filter,
};
pub use router::{EventRouter, formatter_from_config};
pub use source::SourceTable;
