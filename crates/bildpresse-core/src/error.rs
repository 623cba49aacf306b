// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildpresse.

use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::FailureKind;

/// Boxed error used to keep the underlying cause of an encode failure.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way a conversion can fail.
///
/// The `Display` strings double as the user-facing messages carried in a
/// [`crate::ConversionReport`], so they are kept short and lower-case.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Filtering left nothing with a supported extension.
    #[error("no valid images")]
    NoValidImages,

    /// A single image could not be decoded. Recoverable: the image is skipped.
    #[error("failed to open/convert image {}: {reason}", path.display())]
    DecodeFailure { path: PathBuf, reason: String },

    /// Every candidate failed to decode.
    #[error("no valid images could be opened")]
    NoDecodableImages,

    /// The PDF could not be assembled, verified, or written.
    #[error("error creating pdf: {reason}")]
    EncodeFailure {
        reason: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Anything else, typically filesystem trouble while collecting inputs.
    #[error("unexpected error: {context}: {source}")]
    Unexpected {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Encode failure without an underlying error value.
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::EncodeFailure {
            reason: reason.into(),
            source: None,
        }
    }

    /// Encode failure caused by `source`.
    pub fn encode_with(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::EncodeFailure {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Unexpected filesystem failure with a short description of what was attempted.
    pub fn unexpected(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Unexpected {
            context: context.into(),
            source,
        }
    }

    /// Which branch of the failure taxonomy this error belongs to.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NoValidImages => FailureKind::NoValidImages,
            Self::DecodeFailure { .. } => FailureKind::DecodeFailure,
            Self::NoDecodableImages => FailureKind::NoDecodableImages,
            Self::EncodeFailure { .. } => FailureKind::EncodeFailure,
            Self::Unexpected { .. } => FailureKind::Unexpected,
        }
    }

    /// The error followed by every `source()` in its chain, one entry each.
    pub fn chain(&self) -> Vec<String> {
        let mut lines = vec![self.to_string()];
        let mut current = self.source();
        while let Some(cause) = current {
            lines.push(cause.to_string());
            current = cause.source();
        }
        lines
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ConvertError>;
