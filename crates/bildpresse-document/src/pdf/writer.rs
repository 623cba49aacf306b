// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — assemble decoded images into a PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use bildpresse_core::PDF_RESOLUTION_DPI;
use bildpresse_core::error::{ConvertError, Result};
use printpdf::{
    ImageOptimizationOptions, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt,
    RawImage, RawImageData, RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::image::DecodedImage;

/// Builds a PDF with one page per image.
///
/// Every page is exactly the size of its image at [`PDF_RESOLUTION_DPI`], with
/// the image filling the page edge to edge.
pub struct PdfWriter {
    /// Document name handed to printpdf.
    title: String,
    /// Resolution used to turn pixels into page size.
    dpi: f32,
}

impl PdfWriter {
    /// Create a writer at the fixed page resolution.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            dpi: PDF_RESOLUTION_DPI,
        }
    }

    /// Page dimensions for an image of `width` x `height` pixels.
    pub fn page_size(&self, width: u32, height: u32) -> (Mm, Mm) {
        let to_mm = |pixels: u32| Mm(pixels as f32 / self.dpi * 25.4);
        (to_mm(width), to_mm(height))
    }

    /// Serialise `images` into PDF bytes, in the order given.
    ///
    /// Takes the images by value so each pixel buffer is handed to printpdf
    /// without an extra copy.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn render(&self, images: Vec<DecodedImage>) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(ConvertError::encode("no pages to write"));
        }

        info!(pages = images.len(), dpi = self.dpi, "Assembling PDF");

        let mut doc = PdfDocument::new(&self.title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

        for image in images {
            let (width, height) = (image.width(), image.height());
            if width == 0 || height == 0 {
                return Err(ConvertError::encode(format!(
                    "{} has no pixels",
                    image.source().display()
                )));
            }

            let raw = RawImage {
                pixels: RawImageData::U8(image.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let (page_w, page_h) = self.page_size(width, height);
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(self.dpi),
                    rotate: None,
                },
            }];

            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&save_options(), &mut warnings);

        debug!(
            pages = doc.pages.len(),
            warnings = warnings.len(),
            bytes = output.len(),
            "PDF serialised"
        );

        Ok(output)
    }

}

/// Save options that embed every image at its decoded size and in RGB.
///
/// printpdf's defaults downsample anything over 2MB and re-encode images whose
/// channels are all equal as DeviceGray.
fn save_options() -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: Some(ImageOptimizationOptions {
            auto_optimize: Some(false),
            convert_to_greyscale: Some(false),
            max_image_size: None,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Write finished PDF bytes to `path`, mapping I/O failures to encode failures.
pub fn write_pdf(bytes: &[u8], path: &Path) -> Result<()> {
    std::fs::write(path, bytes).map_err(|err| {
        ConvertError::encode_with(format!("failed to write {}: {}", path.display(), err), err)
    })?;
    info!(output = %path.display(), bytes = bytes.len(), "PDF written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use image::{DynamicImage, Rgb, RgbImage};
    use tempfile::TempDir;

    fn solid(name: &str, width: u32, height: u32, color: [u8; 3]) -> DecodedImage {
        let buffer = RgbImage::from_pixel(width, height, Rgb(color));
        DecodedImage::from_dynamic(name, DynamicImage::ImageRgb8(buffer))
    }

    #[test]
    fn page_size_follows_fixed_resolution() {
        let writer = PdfWriter::new("test");
        let (w, h) = writer.page_size(200, 100);
        assert!((w.0 - 50.8).abs() < 0.01);
        assert!((h.0 - 25.4).abs() < 0.01);
    }

    #[test]
    fn one_page_per_image() {
        let writer = PdfWriter::new("test");
        let bytes = writer
            .render(vec![
                solid("a", 20, 10, [255, 0, 0]),
                solid("b", 10, 20, [0, 255, 0]),
                solid("c", 15, 15, [0, 0, 255]),
            ])
            .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 3);
    }

    #[test]
    fn neutral_colours_are_embedded_as_rgb() {
        let bytes = PdfWriter::new("test")
            .render(vec![solid("grey", 64, 48, [120, 120, 120])])
            .unwrap();

        let images = PdfReader::from_bytes(&bytes).unwrap().page_images(1).unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].is_rgb(), "{:?}", images[0]);
        assert_eq!(images[0].color_space.as_deref(), Some("DeviceRGB"));
    }

    #[test]
    fn empty_input_is_an_encode_failure() {
        let err = PdfWriter::new("test").render(Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("error creating pdf"));
    }

    #[test]
    fn missing_output_directory_fails_the_write() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("absent").join("out.pdf");
        let bytes = PdfWriter::new("test")
            .render(vec![solid("a", 4, 4, [9, 9, 9])])
            .unwrap();
        let err = write_pdf(&bytes, &target).unwrap_err();
        assert!(err.to_string().contains("failed to write"));
        assert!(!target.exists());
    }
}
