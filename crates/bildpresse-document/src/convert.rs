// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image-to-PDF conversion pipeline.
//
// collect → filter → sort → decode → normalise to RGB → assemble → write.
// Every failure is folded into a `ConversionReport`; nothing escapes `convert`.
//
// NOTE: page order is always the lexicographic order of the full paths. Any
// order a front-end lets the user arrange is discarded by `collect_images`.

use std::path::{Path, PathBuf};

use bildpresse_core::error::{ConvertError, Result};
use bildpresse_core::{
    ConversionReport, ConverterConfig, FailureKind, SkippedImage, default_output_name,
    sidecar_log_name, timestamp_tag,
};
use chrono::Local;
use tracing::{error, info, instrument, warn};

use crate::collect::{ListDirectory, collect_images_with, read_directory};
use crate::image::DecodedImage;
use crate::pdf::reader::PdfReader;
use crate::pdf::writer::{PdfWriter, write_pdf};
use crate::sidecar::SidecarLog;

/// Convert `inputs` with the default configuration.
pub fn convert<P: AsRef<Path>>(inputs: &[P], output: Option<&Path>) -> ConversionReport {
    Converter::default().convert(inputs, output)
}

/// Turns an ordered list of image files and directories into one PDF.
///
/// Synchronous and single-threaded. A front-end that must stay responsive
/// should call it from a worker thread.
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConverterConfig,
    list_directory: ListDirectory,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

/// Per-call state that outlives an early return from the pipeline.
struct Session {
    tag: String,
    log: SidecarLog,
    skipped: Vec<SkippedImage>,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            list_directory: read_directory,
        }
    }

    /// List directory inputs with `list` instead of the filesystem.
    #[cfg(test)]
    fn with_directory_lister(mut self, list: ListDirectory) -> Self {
        self.list_directory = list;
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Run one conversion.
    ///
    /// Without `output`, the PDF is written as `converted_<timestamp>.pdf` in
    /// the directory of the first image (after sorting). An explicit `output`
    /// is used as-is and its directory must already exist.
    #[instrument(skip_all, fields(inputs = inputs.len()))]
    pub fn convert<P: AsRef<Path>>(&self, inputs: &[P], output: Option<&Path>) -> ConversionReport {
        let mut session = Session {
            tag: timestamp_tag(&Local::now()),
            log: SidecarLog::disabled(),
            skipped: Vec::new(),
        };

        let report = match self.run(inputs, output, &mut session) {
            Ok((path, pages)) => {
                info!(output = %path.display(), pages, "conversion finished");
                ConversionReport::succeeded(path, pages)
            }
            Err(err) => {
                self.record_failure(&err, &mut session);
                ConversionReport::failed(&err)
            }
        };

        report
            .with_log_path(session.log.path().map(Path::to_path_buf))
            .with_skipped(session.skipped)
    }

    fn run<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        output: Option<&Path>,
        session: &mut Session,
    ) -> Result<(PathBuf, usize)> {
        let images = collect_images_with(inputs, self.list_directory)?;

        let image_dir = images
            .first()
            .and_then(|first| parent_dir(first))
            .unwrap_or_else(|| self.config.fallback_log_dir.clone());

        let output_path = match output {
            Some(path) => path.to_path_buf(),
            None => image_dir.join(default_output_name(&session.tag)),
        };

        if self.config.sidecar_log {
            session.log = SidecarLog::create(image_dir.join(sidecar_log_name(&session.tag)));
        }
        session.log.header(&images);

        let decoded = decode_all(&images, session);
        if decoded.is_empty() {
            session
                .log
                .line("No images could be opened/converted. Aborting.");
            return Err(ConvertError::NoDecodableImages);
        }

        let pages = decoded.len();
        let title = output_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Converted images".to_string());

        // All decoded buffers are released once printpdf has taken them.
        let bytes = PdfWriter::new(title).render(decoded)?;
        if self.config.verify_output {
            verify(&bytes, pages)?;
        }
        write_pdf(&bytes, &output_path)?;

        session
            .log
            .line(format_args!("PDF created successfully: {}", output_path.display()));
        session.log.line(format_args!("Converted {pages} image(s)"));

        Ok((output_path, pages))
    }

    /// Best-effort diagnostics for a failed run.
    fn record_failure(&self, err: &ConvertError, session: &mut Session) {
        match err.kind() {
            FailureKind::EncodeFailure => {
                error!(error = %err, "PDF assembly failed");
                session.log.error_chain("Error creating PDF:", err);
            }
            FailureKind::Unexpected => {
                error!(error = %err, "unexpected conversion failure");
                if !session.log.is_active() && self.config.sidecar_log {
                    session.log = SidecarLog::append(
                        self.config
                            .fallback_log_dir
                            .join(sidecar_log_name(&session.tag)),
                    );
                }
                session
                    .log
                    .error_chain("Unexpected error during conversion:", err);
            }
            _ => warn!(error = %err, "conversion failed"),
        }
    }
}

/// Decode each image in order, skipping (and logging) the ones that fail.
fn decode_all(images: &[PathBuf], session: &mut Session) -> Vec<DecodedImage> {
    let mut decoded = Vec::with_capacity(images.len());

    for path in images {
        match DecodedImage::open(path) {
            Ok(image) => decoded.push(image),
            Err(err) => {
                let reason = match err {
                    ConvertError::DecodeFailure { reason, .. } => reason,
                    other => other.to_string(),
                };
                warn!(path = %path.display(), %reason, "skipping image");
                session.log.line(format_args!(
                    "Failed to open/convert image {}: {}",
                    path.display(),
                    reason
                ));
                session.skipped.push(SkippedImage {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        decoded = decoded.len(),
        skipped = session.skipped.len(),
        "decoding finished"
    );
    decoded
}

/// Reload assembled bytes and check they hold exactly `expected` pages.
fn verify(bytes: &[u8], expected: usize) -> Result<()> {
    let reader = PdfReader::from_bytes(bytes)
        .map_err(|err| ConvertError::encode_with("assembled document does not parse", err))?;
    let found = reader.page_count();
    if found != expected {
        return Err(ConvertError::encode(format!(
            "assembled document has {found} pages, expected {expected}"
        )));
    }
    Ok(())
}

/// Directory containing `path`; a bare file name lives in `.`.
fn parent_dir(path: &Path) -> Option<PathBuf> {
    path.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            parent.to_path_buf()
        }
    })
}
