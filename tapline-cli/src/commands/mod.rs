pub mod check_config;
pub mod emit;
pub mod pipe;
pub mod send;

use tapline_core::config::TaplineConfig;
use tapline_core::event::EventSource;
use tapline_evt::EventRouter;
use tracing::debug;

use crate::error::CliError;

/// Build a router from the effective configuration.
pub(crate) fn build_router(config: &TaplineConfig) -> Result<EventRouter, CliError> {
    let router = EventRouter::from_config(config)?;
    debug!(transport = ?router.transport_kind(), "router ready");
    Ok(router)
}

/// Parse an event source name given on the command line.
pub(crate) fn parse_source(name: &str) -> Result<EventSource, CliError> {
    EventSource::from_str_loose(name).ok_or_else(|| {
        CliError::Command(format!(
            "unknown event source '{name}' (expected: logfile, console, syslog, metric)"
        ))
    })
}

/// Name of the installed transport, or `none`.
pub(crate) fn transport_name(router: &EventRouter) -> String {
    router
        .transport_kind()
        .map_or_else(|| "none".to_owned(), |kind| kind.to_string())
}
