//! `tapline pipe` command handler
//!
//! Each stdin line becomes one event. Lines are dropped when the source is disabled
//! or, for `logfile`, when the event name does not match the log file filter.

use std::io::{BufRead, Write};

use serde::Serialize;
use tapline_core::config::TaplineConfig;
use tapline_core::event::{Event, EventSource};
use tapline_evt::EventRouter;
use tracing::{info, warn};

use crate::cli::PipeArgs;
use crate::commands::{build_router, parse_source};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `pipe` command over stdin.
pub fn execute(
    args: PipeArgs,
    config: &TaplineConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = parse_source(&args.source)?;
    let router = build_router(config)?;

    let stdin = std::io::stdin();
    let report = pump(&router, source, &args.name, stdin.lock())?;
    router.flush()?;

    info!(
        read = report.lines_read,
        sent = report.sent,
        failed = report.failed,
        "pipe finished"
    );
    writer.render(&report)?;

    if report.failed > 0 {
        return Err(CliError::Command(format!(
            "{} of {} lines failed to send",
            report.failed, report.lines_read
        )));
    }
    Ok(())
}

fn pump(
    router: &EventRouter,
    source: EventSource,
    name: &str,
    input: impl BufRead,
) -> Result<PipeReport, CliError> {
    let mut report = PipeReport {
        source: source.to_string(),
        ..PipeReport::default()
    };

    let gate = if !router.is_enabled(source) {
        Some(Skip::Disabled)
    } else if source == EventSource::LogFile && !router.is_log_file(name) {
        Some(Skip::Filtered)
    } else {
        None
    };

    for line in input.lines() {
        let line = line?;
        report.lines_read += 1;

        match gate {
            Some(Skip::Disabled) => report.skipped_disabled += 1,
            Some(Skip::Filtered) => report.skipped_filtered += 1,
            None => {
                let event = Event::new(source, name, line);
                match router.send_event(&event) {
                    Ok(_) => report.sent += 1,
                    Err(e) => {
                        warn!(error = %e, "line not sent");
                        report.failed += 1;
                    }
                }
            }
        }
    }

    Ok(report)
}

#[derive(Clone, Copy)]
enum Skip {
    Disabled,
    Filtered,
}

#[derive(Serialize, Default, Debug)]
pub struct PipeReport {
    pub source: String,
    pub lines_read: u64,
    pub sent: u64,
    pub skipped_disabled: u64,
    pub skipped_filtered: u64,
    pub failed: u64,
}

impl Render for PipeReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "{}: read {}, sent {}, disabled {}, filtered {}, failed {}",
            self.source,
            self.lines_read,
            self.sent,
            self.skipped_disabled,
            self.skipped_filtered,
            self.failed
        )
    }
}
