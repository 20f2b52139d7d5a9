//! `tapline check-config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tapline_core::config::TaplineConfig;
use tapline_core::error::TaplineError;
use tapline_evt::LogFileFilter;
use tracing::info;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `check-config` command.
///
/// Loads the configuration (file, env overrides, validation) and reports the
/// effective transport, formatter and filter. An invalid filter pattern is reported
/// as a warning since the router falls back to the default pattern.
pub fn execute(
    config_path: Option<&Path>,
    loaded: &Result<TaplineConfig, TaplineError>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = config_path.map_or_else(|| "(defaults)".to_owned(), |p| p.display().to_string());
    info!(source = %source, "checking configuration");

    let report = match loaded {
        Ok(config) => build_report(source, config),
        Err(e) => ConfigCheckReport {
            source,
            valid: false,
            errors: vec![e.to_string()],
            ..ConfigCheckReport::default()
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

fn build_report(source: String, config: &TaplineConfig) -> ConfigCheckReport {
    let mut warnings = Vec::new();
    let filter = &config.filter.log_file;
    let compile_error = if filter.is_empty() {
        None
    } else {
        LogFileFilter::compile(filter).err()
    };
    if let Some(e) = compile_error {
        warnings.push(format!("{e}; default pattern will be used"));
    }

    let enabled_sources = tapline_core::event::EventSource::ALL
        .into_iter()
        .filter(|src| config.sources.value(*src) != 0)
        .map(|src| src.to_string())
        .collect();

    ConfigCheckReport {
        source,
        valid: true,
        transport: config.transport.kind.clone(),
        format: config.format.kind.clone(),
        filter: if filter.is_empty() {
            tapline_evt::DEFAULT_LOG_FILE_FILTER.to_owned()
        } else {
            filter.clone()
        },
        enabled_sources,
        warnings,
        errors: Vec::new(),
    }
}

#[derive(Serialize, Default, Debug)]
pub struct ConfigCheckReport {
    pub source: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub transport: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter: String,
    pub enabled_sources: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Render for ConfigCheckReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if !self.valid {
            writeln!(w, "configuration INVALID (source: {})", self.source)?;
            for e in &self.errors {
                writeln!(w, "  error: {e}")?;
            }
            return Ok(());
        }

        writeln!(w, "configuration OK (source: {})", self.source)?;
        writeln!(w, "  transport: {}", self.transport)?;
        writeln!(w, "  format:    {}", self.format)?;
        writeln!(w, "  filter:    {}", self.filter)?;
        if self.enabled_sources.is_empty() {
            writeln!(w, "  sources:   (none enabled)")?;
        } else {
            writeln!(w, "  sources:   {}", self.enabled_sources.join(", "))?;
        }
        for warning in &self.warnings {
            writeln!(w, "  warning: {warning}")?;
        }
        Ok(())
    }
}
