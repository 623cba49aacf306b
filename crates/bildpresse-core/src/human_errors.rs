// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for front-ends.
//
// Every conversion failure is mapped to plain English with a clear suggestion.
// The severity drives how a front-end presents it.

use crate::error::ConvertError;
use crate::types::{ConversionReport, FailureKind};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change something (pick other files, free disk space).
    ActionRequired,
    /// Retrying with the same inputs will fail the same way.
    Permanent,
    /// Could succeed on a second attempt.
    Transient,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `ConvertError` into a `HumanError`.
pub fn humanize_error(err: &ConvertError) -> HumanError {
    humanize_failure(err.kind(), &err.to_string())
}

/// Human view of a failed report; `None` for a successful one.
pub fn humanize_report(report: &ConversionReport) -> Option<HumanError> {
    report
        .failure
        .map(|kind| humanize_failure(kind, &report.message))
}

/// Map a failure kind plus its technical message to plain English.
pub fn humanize_failure(kind: FailureKind, detail: &str) -> HumanError {
    match kind {
        FailureKind::NoValidImages => HumanError {
            message: "None of the selected files are images we can use.".into(),
            suggestion: "Pick JPEG, PNG, BMP, GIF, TIFF, or WebP files, or a folder that contains them.".into(),
            severity: Severity::ActionRequired,
        },

        FailureKind::DecodeFailure => HumanError {
            message: "One of the images could not be read.".into(),
            suggestion: "The file may be damaged or only named like an image. It was left out of the PDF.".into(),
            severity: Severity::Permanent,
        },

        FailureKind::NoDecodableImages => HumanError {
            message: "None of the selected images could be opened.".into(),
            suggestion: "The files may be damaged. Open one in an image viewer to check, then try again. Details are in the convert_log file.".into(),
            severity: Severity::Permanent,
        },

        FailureKind::EncodeFailure => humanize_filesystem(
            detail,
            HumanError {
                message: "The PDF couldn't be created.".into(),
                suggestion: format!("Try again with fewer images. (Detail: {detail})"),
                severity: Severity::Transient,
            },
        ),

        FailureKind::Unexpected => humanize_filesystem(
            detail,
            HumanError {
                message: "Something went wrong while reading the selected files.".into(),
                suggestion: "Try again. If this keeps happening, check the convert_log file for details.".into(),
                severity: Severity::Transient,
            },
        ),
    }
}

/// Recognise common OS error texts, falling back to `otherwise`.
fn humanize_filesystem(detail: &str, otherwise: HumanError) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("permission denied") {
        HumanError {
            message: "We don't have permission to use that location.".into(),
            suggestion: "Check the folder permissions, or choose a folder you're allowed to use.".into(),
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("no space") || lower.contains("disk full") {
        HumanError {
            message: "There isn't enough space to save the PDF.".into(),
            suggestion: "Free up some disk space, or save to a different drive.".into(),
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("no such file") || lower.contains("not found") {
        HumanError {
            message: "A file or folder couldn't be found.".into(),
            suggestion: "It may have been moved or deleted. Check the path, or create the output folder first.".into(),
            severity: Severity::ActionRequired,
        }
    } else {
        otherwise
    }
}
