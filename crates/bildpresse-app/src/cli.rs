// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface: argument parsing and report rendering.

use std::path::PathBuf;
use std::process::ExitCode;

use bildpresse_core::ConversionReport;
use bildpresse_core::ConverterConfig;
use bildpresse_core::human_errors::humanize_report;
use clap::Parser;

/// One-line usage printed when no inputs are given.
pub const USAGE: &str = "Usage: bildpresse <image1|dir1> [image2|dir2] ...";

/// Bind images into a single PDF, one page per image.
///
/// Pages are always ordered by full path name, whatever order the inputs are
/// given in.
#[derive(Debug, Parser)]
#[command(name = "bildpresse", version, about)]
pub struct Cli {
    /// Image files, or directories whose images should be included.
    #[arg(value_name = "IMAGE|DIR")]
    pub inputs: Vec<PathBuf>,

    /// Output PDF path. Defaults to converted_<timestamp>.pdf next to the first image.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for the diagnostic log when no image directory is known.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Do not write a convert_log_<timestamp>.txt file.
    #[arg(long)]
    pub no_log: bool,

    /// Skip reloading the assembled PDF before writing it.
    #[arg(long)]
    pub no_verify: bool,

    /// Print the full conversion report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Converter settings implied by the flags.
    pub fn config(&self) -> ConverterConfig {
        let mut config = match &self.log_dir {
            Some(dir) => ConverterConfig::with_fallback_log_dir(dir),
            None => ConverterConfig::default(),
        };
        config.sidecar_log = !self.no_log;
        config.verify_output = !self.no_verify;
        config
    }
}

/// Text printed for a finished conversion.
pub fn render_report(report: &ConversionReport, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(report);
    }

    let mut text = if report.is_success() {
        format!("{}\nConverted {} image(s)", report.message, report.pages)
    } else {
        format!("error: {}", report.message)
    };

    for skipped in &report.skipped {
        text.push_str(&format!(
            "\nskipped {}: {}",
            skipped.path.display(),
            skipped.reason
        ));
    }
    if let Some(human) = humanize_report(report) {
        text.push_str(&format!("\n{} {}", human.message, human.suggestion));
    }
    if let Some(log) = &report.log_path {
        text.push_str(&format!("\nlog: {}", log.display()));
    }

    Ok(text)
}

/// Process exit status for a report: 0 on success, 1 otherwise.
pub fn exit_code(report: &ConversionReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
