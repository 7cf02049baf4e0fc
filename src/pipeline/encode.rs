//! Image encoding: `DynamicImage` → PNG bytes for the OCR backends.
//!
//! PNG is chosen over JPEG because it is lossless — text crispness matters
//! far more than file size for OCR accuracy, and JPEG artefacts on rendered
//! text measurably degrade both Tesseract and Vision recognition at low DPI.

use crate::error::Pdf2DocxError;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as PNG bytes ready for an OCR backend.
pub fn encode_page(page_num: usize, img: &DynamicImage) -> Result<Vec<u8>, Pdf2DocxError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| Pdf2DocxError::RasterisationFailed {
            page: page_num,
            detail: format!("PNG encoding failed: {e}"),
        })?;

    debug!("Encoded page {} → {} bytes PNG", page_num, buf.len());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let bytes = encode_page(1, &img).expect("encode should succeed");
        // PNG signature
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
