// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image loader — decode one source file into an 8-bit RGB buffer using the
// `image` crate. The source file is open only for the duration of `open`.

use std::path::{Path, PathBuf};

use bildpresse_core::error::{ConvertError, Result};
use image::{DynamicImage, ImageReader, RgbImage};
use tracing::{debug, instrument};

/// A decoded page image, always 3-channel 8-bit RGB.
///
/// ```ignore
/// let page = DecodedImage::open("scans/001.png")?;
/// assert_eq!(page.pixels().sample_layout().channels, 3);
/// ```
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// File the pixels came from.
    source: PathBuf,
    pixels: RgbImage,
}

impl DecodedImage {
    /// Decode `path` and normalise it to RGB.
    ///
    /// The format is sniffed from the file contents. The reader (and with it
    /// the file handle) is consumed by the decode, so nothing stays open once
    /// this returns.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decode_failure = |reason: String| ConvertError::DecodeFailure {
            path: path.to_path_buf(),
            reason,
        };

        let decoded = ImageReader::open(path)
            .map_err(|err| decode_failure(err.to_string()))?
            .with_guessed_format()
            .map_err(|err| decode_failure(err.to_string()))?
            .decode()
            .map_err(|err| decode_failure(err.to_string()))?;

        debug!(
            width = decoded.width(),
            height = decoded.height(),
            color = ?decoded.color(),
            "Image decoded"
        );

        Ok(Self::from_dynamic(path, decoded))
    }

    /// Wrap an already-decoded `DynamicImage`, converting it to RGB.
    pub fn from_dynamic(source: impl Into<PathBuf>, image: DynamicImage) -> Self {
        Self {
            source: source.into(),
            pixels: normalize_to_rgb(image),
        }
    }

    /// Path the image was decoded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Borrow the RGB pixel buffer.
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Consume the image and return the raw interleaved RGB bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels.into_raw()
    }
}

/// Bring any decoded colour model down to 8-bit RGB.
///
/// Grayscale is expanded, alpha is dropped without compositing, and 16-bit or
/// float channels are narrowed. Images that are already RGB8 are moved, not
/// copied.
pub fn normalize_to_rgb(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildpresse_core::FailureKind;
    use image::{GrayImage, Luma, Rgb, Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn rgba_drops_alpha_without_compositing() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let rgb = normalize_to_rgb(DynamicImage::ImageRgba8(rgba));
        assert_eq!(*rgb.get_pixel(1, 1), Rgb([10, 20, 30]));
    }

    #[test]
    fn grayscale_is_expanded_to_three_channels() {
        let gray = GrayImage::from_pixel(3, 1, Luma([77]));
        let rgb = normalize_to_rgb(DynamicImage::ImageLuma8(gray));
        assert_eq!(rgb.dimensions(), (3, 1));
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([77, 77, 77]));
    }

    #[test]
    fn opens_png_with_alpha_as_rgb() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("alpha.png");
        RgbaImage::from_pixel(5, 4, Rgba([200, 100, 50, 128]))
            .save(&path)
            .unwrap();

        let decoded = DecodedImage::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 4));
        assert_eq!(decoded.source(), path.as_path());
        assert_eq!(*decoded.pixels().get_pixel(0, 0), Rgb([200, 100, 50]));
    }

    #[test]
    fn content_is_sniffed_not_extension() {
        let tmp = TempDir::new().unwrap();
        let png = tmp.path().join("real.png");
        RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])).save(&png).unwrap();
        let misnamed = tmp.path().join("really_png.jpg");
        std::fs::rename(&png, &misnamed).unwrap();

        let decoded = DecodedImage::open(&misnamed).unwrap();
        assert_eq!(decoded.width(), 2);
    }

    #[test]
    fn corrupt_file_is_a_decode_failure() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.gif");
        std::fs::write(&path, b"GIF89a not really").unwrap();

        let err = DecodedImage::open(&path).unwrap_err();
        assert_eq!(err.kind(), FailureKind::DecodeFailure);
        assert!(err.to_string().contains("broken.gif"));
    }

    #[test]
    fn missing_file_is_a_decode_failure() {
        let err = DecodedImage::open("/nonexistent/bildpresse/x.png").unwrap_err();
        assert_eq!(err.kind(), FailureKind::DecodeFailure);
    }
}
