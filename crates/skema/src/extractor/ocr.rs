//! OCR engine capability and its Tesseract implementation.

use std::io::Cursor;

use crate::error::ProcessError;
use crate::extractor::raster;

/// Capability contract for the OCR collaborator.
///
/// The pipeline depends only on this trait so tests can substitute fakes;
/// swapping engines or languages never touches the extraction logic.
pub trait OcrEngine: Send + Sync {
    /// Rasterizes every page of a PDF to an image at the given DPI, in page
    /// order.
    fn rasterize(&self, pdf_bytes: &[u8], dpi: u32) -> Result<Vec<Vec<u8>>, ProcessError>;

    /// Recognizes text in a single page image. `languages` is a Tesseract
    /// language spec such as `"deu+eng"`.
    fn recognize(&self, image: &[u8], languages: &str) -> Result<String, ProcessError>;
}

/// Tesseract-backed OCR. Rasterization shells out to poppler's `pdftoppm`,
/// recognition goes through leptess.
#[derive(Debug, Default, Clone)]
pub struct TesseractOcr;

impl TesseractOcr {
    pub fn new() -> Self {
        Self
    }
}

impl OcrEngine for TesseractOcr {
    fn rasterize(&self, pdf_bytes: &[u8], dpi: u32) -> Result<Vec<Vec<u8>>, ProcessError> {
        raster::render_pdf_pages(pdf_bytes, dpi)
    }

    fn recognize(&self, image_data: &[u8], languages: &str) -> Result<String, ProcessError> {
        let _span = tracing::info_span!("extractor.ocr").entered();

        let img = image::load_from_memory(image_data)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to load image: {}", e)))?;

        // Re-encode as PNG in memory; leptess accepts PNG regardless of the
        // input format.
        let mut png_data = Vec::new();
        let mut cursor = Cursor::new(&mut png_data);
        img.write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to convert image: {}", e)))?;

        let mut lt = leptess::LepTess::new(None, languages).map_err(|e| {
            ProcessError::OcrFailed(format!("Failed to initialize Tesseract: {}", e))
        })?;

        lt.set_image_from_mem(&png_data)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to set image for OCR: {}", e)))?;

        let text = lt
            .get_utf8_text()
            .map_err(|e| ProcessError::OcrFailed(format!("OCR failed: {}", e)))?;

        Ok(text)
    }
}

/// Joins configured OCR languages into a Tesseract language spec, defaulting
/// to English when none are configured.
pub fn join_languages(languages: &[String]) -> String {
    if languages.is_empty() {
        "eng".to_string()
    } else {
        languages.join("+")
    }
}
