//! CLI argument parsing using clap derive API
//!
//! Purely declarative; no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tapline -- telemetry emission over UDP, file, Unix socket, syslog or shared memory.
///
/// Use `tapline <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "tapline", version, about, long_about = None)]
pub struct Cli {
    /// Path to a tapline.toml configuration file.
    ///
    /// Without it, built-in defaults plus `TAPLINE_*` environment overrides are used.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send raw text through the configured transport.
    Send(SendArgs),

    /// Render one event with the configured formatter and send it.
    Emit(EmitArgs),

    /// Read stdin line by line and emit each line as an event.
    Pipe(PipeArgs),

    /// Load and validate the configuration.
    CheckConfig,
}

// ---- send ----

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Text to send.
    pub text: String,

    /// Do not append a trailing newline.
    #[arg(short = 'n', long)]
    pub no_newline: bool,
}

// ---- emit ----

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Event name (file path, stream name or metric name).
    #[arg(long)]
    pub name: String,

    /// Event value.
    #[arg(long)]
    pub value: String,

    /// Event source (logfile, console, syslog, metric).
    #[arg(long, default_value = "metric")]
    pub source: String,

    /// Extra `key=value` fields, repeatable.
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

// ---- pipe ----

#[derive(Args, Debug)]
pub struct PipeArgs {
    /// Event source for every line (logfile, console, syslog, metric).
    #[arg(long, default_value = "logfile")]
    pub source: String,

    /// Event name; for `logfile` this is the path checked against the log file filter.
    #[arg(long, default_value = "stdin.log")]
    pub name: String,
}
