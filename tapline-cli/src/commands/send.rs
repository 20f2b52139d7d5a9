//! `tapline send` command handler

use std::io::Write;

use serde::Serialize;
use tapline_core::config::TaplineConfig;
use tracing::info;

use crate::cli::SendArgs;
use crate::commands::{build_router, transport_name};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `send` command.
pub fn execute(
    args: SendArgs,
    config: &TaplineConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let router = build_router(config)?;

    let mut text = args.text;
    if !args.no_newline {
        text.push('\n');
    }

    let bytes = router.send(&text)?;
    router.flush()?;

    let report = SendReport {
        transport: transport_name(&router),
        bytes,
    };
    info!(transport = %report.transport, bytes, "text sent");
    writer.render(&report)
}

#[derive(Serialize)]
pub struct SendReport {
    pub transport: String,
    pub bytes: usize,
}

impl Render for SendReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "sent {} bytes via {}", self.bytes, self.transport)
    }
}
