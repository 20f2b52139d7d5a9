//! `tapline emit` command handler

use std::io::Write;

use serde::Serialize;
use tapline_core::config::TaplineConfig;
use tapline_core::event::Event;
use tracing::info;

use crate::cli::EmitArgs;
use crate::commands::{build_router, parse_source, transport_name};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `emit` command.
///
/// The event is sent regardless of the source's enablement value.
pub fn execute(
    args: EmitArgs,
    config: &TaplineConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = parse_source(&args.source)?;
    let mut event = Event::new(source, args.name, args.value);
    for field in &args.fields {
        let (key, value) = parse_field(field)?;
        event = event.with_field(key, value);
    }

    let router = build_router(config)?;
    let bytes = router.send_event(&event)?;
    router.flush()?;

    let report = EmitReport {
        id: event.id.clone(),
        transport: transport_name(&router),
        source: source.to_string(),
        name: event.name.clone(),
        bytes,
    };
    info!(id = %report.id, source = %report.source, bytes, "event emitted");
    writer.render(&report)
}

fn parse_field(raw: &str) -> Result<(&str, &str), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(CliError::Command(format!(
            "invalid field '{raw}', expected KEY=VALUE"
        ))),
    }
}

#[derive(Serialize)]
pub struct EmitReport {
    pub id: String,
    pub transport: String,
    pub source: String,
    pub name: String,
    pub bytes: usize,
}

impl Render for EmitReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "emitted {} event '{}' ({} bytes via {})",
            self.source, self.name, self.bytes, self.transport
        )
    }
}
