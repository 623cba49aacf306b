// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildpresse — bind images into a single PDF.
//
// Entry point. Initialises logging, parses arguments, and runs one conversion.

mod cli;

use std::process::ExitCode;

use bildpresse_core::ConversionReport;
use bildpresse_document::Converter;
use clap::Parser;

use cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    if args.inputs.is_empty() {
        eprintln!("{}", cli::USAGE);
        return ExitCode::from(1);
    }

    tracing::info!(inputs = args.inputs.len(), "Bildpresse starting");

    let report = run(&args);
    match cli::render_report(&report, args.json) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            tracing::error!(error = %e, "could not render report");
            println!("{}", report.message);
        }
    }

    cli::exit_code(&report)
}

/// Run the conversion described by `args`.
fn run(args: &Cli) -> ConversionReport {
    Converter::new(args.config()).convert(&args.inputs, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(tmp: &TempDir, inputs: Vec<PathBuf>) -> Cli {
        Cli {
            inputs,
            output: Some(tmp.path().join("out.pdf")),
            log_dir: Some(tmp.path().to_path_buf()),
            no_log: false,
            no_verify: false,
            json: false,
        }
    }

    #[test]
    fn converts_directory_argument() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("photos");
        std::fs::create_dir(&dir).unwrap();
        for name in ["b.png", "a.jpg"] {
            RgbImage::from_pixel(12, 8, Rgb([30, 60, 90]))
                .save(dir.join(name))
                .unwrap();
        }

        let report = run(&args(&tmp, vec![dir]));

        assert!(report.is_success(), "{}", report.message);
        assert_eq!(report.pages, 2);
        assert!(tmp.path().join("out.pdf").exists());
        assert_eq!(cli::exit_code(&report), ExitCode::SUCCESS);
    }

    #[test]
    fn unsupported_arguments_fail_with_exit_one() {
        let tmp = TempDir::new().unwrap();
        let notes = tmp.path().join("notes.txt");
        std::fs::write(&notes, "text").unwrap();

        let report = run(&args(&tmp, vec![notes]));

        assert!(!report.is_success());
        assert_eq!(cli::exit_code(&report), ExitCode::from(1));
        assert!(!tmp.path().join("out.pdf").exists());
    }
}
