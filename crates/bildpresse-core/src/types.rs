// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildpresse.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Lower-case file extensions accepted as image inputs.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "gif", "tiff", "webp"];

/// Resolution written for every page, regardless of source image metadata.
pub const PDF_RESOLUTION_DPI: f32 = 100.0;

/// `strftime` pattern used for output and sidecar file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Whether `path` carries one of the [`SUPPORTED_EXTENSIONS`] (case-insensitive).
///
/// Only the file name is inspected; the file itself is never opened.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Second-resolution tag such as `20261019_142530`.
pub fn timestamp_tag<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// File name for an output PDF when the caller did not pick one.
pub fn default_output_name(tag: &str) -> String {
    format!("converted_{tag}.pdf")
}

/// File name for the sidecar diagnostic log.
pub fn sidecar_log_name(tag: &str) -> String {
    format!("convert_log_{tag}.txt")
}

/// Taxonomy of conversion failures, matchable by callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Filtering produced zero candidates.
    NoValidImages,
    /// One image could not be decoded (only ever seen in [`SkippedImage`]).
    DecodeFailure,
    /// Every candidate failed to decode.
    NoDecodableImages,
    /// The final PDF could not be produced or written.
    EncodeFailure,
    /// Any other filesystem problem along the way.
    Unexpected,
}

/// An input that was dropped from the document because it failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a single conversion call.
///
/// A report is always produced; failures never escape as panics or `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub success: bool,
    /// Human-readable summary, also used as the CLI's output line.
    pub message: String,
    pub failure: Option<FailureKind>,
    /// Where the PDF was written (success only).
    pub output: Option<PathBuf>,
    /// Sidecar log location, if one was opened.
    pub log_path: Option<PathBuf>,
    /// Number of pages in the written PDF.
    pub pages: usize,
    pub skipped: Vec<SkippedImage>,
}

impl ConversionReport {
    /// Successful conversion of `pages` images into `output`.
    pub fn succeeded(output: PathBuf, pages: usize) -> Self {
        Self {
            success: true,
            message: format!("PDF created successfully: {}", output.display()),
            failure: None,
            output: Some(output),
            log_path: None,
            pages,
            skipped: Vec::new(),
        }
    }

    /// Failed conversion; the message is the error's display string.
    pub fn failed(err: &ConvertError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            failure: Some(err.kind()),
            output: None,
            log_path: None,
            pages: 0,
            skipped: Vec::new(),
        }
    }

    pub fn with_log_path(mut self, log_path: Option<PathBuf>) -> Self {
        self.log_path = log_path;
        self
    }

    pub fn with_skipped(mut self, skipped: Vec<SkippedImage>) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}
