//! CLI-specific error types and exit code mapping

use tapline_core::error::TaplineError;
use tapline_evt::EvtError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdin read, stdout write).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error.
    #[error("{0}")]
    Core(#[from] TaplineError),
}

impl From<EvtError> for CliError {
    fn from(e: EvtError) -> Self {
        Self::Core(e.into())
    }
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                   |
    /// |------|---------------------------|
    /// | 0    | Success                   |
    /// | 1    | General / command error   |
    /// | 2    | Configuration error       |
    /// | 3    | Transport failure         |
    /// | 10   | IO error                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(TaplineError::Config(_)) => 2,
            Self::Core(TaplineError::Sink(_)) => 3,
            Self::Io(_) | Self::Core(TaplineError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(TaplineError::Router(_)) => 1,
        }
    }
}
