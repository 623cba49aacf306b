// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sidecar log — a plain-text diagnostic file written next to the images, one
// per conversion attempt.
//
// Writes go straight to the file without buffering so whatever was logged
// before a crash is still on disk. Every operation is best-effort: the first
// failure is reported through `tracing` and the log goes quiet afterwards.

use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use bildpresse_core::ConvertError;
use chrono::Local;
use tracing::{debug, warn};

/// Append-only diagnostic log for one conversion.
pub struct SidecarLog {
    path: PathBuf,
    file: Option<File>,
}

impl SidecarLog {
    /// Create (or truncate) the log at `path`.
    ///
    /// Never fails: if the file cannot be created the returned log is inert.
    pub fn create(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match File::create(&path) {
            Ok(file) => {
                debug!(path = %path.display(), "sidecar log opened");
                Some(file)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot create sidecar log, continuing without it");
                None
            }
        };
        Self { path, file }
    }

    /// Open `path` for appending, creating it if needed. Inert on failure.
    pub fn append(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(file),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot open sidecar log for append");
                None
            }
        };
        Self { path, file }
    }

    /// A log that discards everything.
    pub fn disabled() -> Self {
        Self {
            path: PathBuf::new(),
            file: None,
        }
    }

    /// Where the log lives, if it is actually being written.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|_| self.path.as_path())
    }

    pub fn is_active(&self) -> bool {
        self.file.is_some()
    }

    /// Write one line.
    pub fn line(&mut self, text: impl Display) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(err) = writeln!(file, "{text}").and_then(|()| file.flush()) {
            warn!(path = %self.path.display(), error = %err, "sidecar log write failed, disabling it");
            self.file = None;
        }
    }

    /// Start-of-run header: timestamp and the final list of candidate images.
    pub fn header(&mut self, images: &[PathBuf]) {
        self.line(format_args!(
            "Starting conversion: {}",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.6f")
        ));
        self.line(format_args!("Found {} image(s):", images.len()));
        for image in images {
            self.line(format_args!("  {}", image.display()));
        }
    }

    /// A heading followed by the error and every cause in its chain.
    pub fn error_chain(&mut self, heading: &str, err: &ConvertError) {
        self.line(heading);
        for (depth, cause) in err.chain().iter().enumerate() {
            if depth == 0 {
                self.line(cause);
            } else {
                self.line(format_args!("  caused by: {cause}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn header_lists_every_image() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("convert_log_test.txt");
        let mut log = SidecarLog::create(&path);
        log.header(&[PathBuf::from("/a/1.png"), PathBuf::from("/a/2.png")]);
        drop(log);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("Starting conversion: "));
        assert_eq!(lines[1], "Found 2 image(s):");
        assert_eq!(lines[2], "  /a/1.png");
        assert_eq!(lines[3], "  /a/2.png");
    }

    #[test]
    fn lines_are_on_disk_before_drop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.txt");
        let mut log = SidecarLog::create(&path);
        log.line("first");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");
        drop(log);
    }

    #[test]
    fn create_truncates_and_append_appends() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.txt");
        std::fs::write(&path, "stale\n").unwrap();

        SidecarLog::create(&path).line("one");
        SidecarLog::append(&path).line("two");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn unwritable_location_is_inert() {
        let tmp = TempDir::new().unwrap();
        let mut log = SidecarLog::create(tmp.path().join("missing").join("log.txt"));
        assert!(!log.is_active());
        assert!(log.path().is_none());
        log.line("ignored");
    }

    #[test]
    fn error_chain_lists_causes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.txt");
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = ConvertError::encode_with("failed to write out.pdf", io);

        SidecarLog::create(&path).error_chain("Error creating PDF:", &err);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Error creating PDF:\nerror creating pdf: failed to write out.pdf\n  caused by: disk on fire\n"
        );
    }
}
