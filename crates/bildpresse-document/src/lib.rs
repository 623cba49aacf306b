// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildpresse-document — Image collection, decoding, and PDF assembly.
//
// Provides input expansion and ordering, scoped RGB decoding, a printpdf-based
// writer, an lopdf-based reader for inspecting results, the sidecar diagnostic
// log, and the `Converter` that ties them into one pipeline.

pub mod collect;
pub mod convert;
pub mod image;
pub mod pdf;
pub mod sidecar;

// Re-export the primary structs so callers can use `bildpresse_document::Converter` etc.
pub use convert::{Converter, convert};
pub use self::image::loader::DecodedImage;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use sidecar::SidecarLog;
