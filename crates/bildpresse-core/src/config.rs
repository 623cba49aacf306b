// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for one converter instance; shared by every `convert` call it makes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Where the sidecar log goes when no image directory is known yet
    /// (e.g. the inputs could not even be listed).
    pub fallback_log_dir: PathBuf,
    /// Write a `convert_log_<timestamp>.txt` next to the images.
    pub sidecar_log: bool,
    /// Reload the assembled PDF in memory and check its page count before
    /// writing it to disk.
    pub verify_output: bool,
}

impl ConverterConfig {
    /// Default settings with an explicit fallback log directory.
    pub fn with_fallback_log_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            fallback_log_dir: dir.into(),
            ..Self::default()
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            fallback_log_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            sidecar_log: true,
            verify_output: true,
        }
    }
}
