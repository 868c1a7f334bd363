//! Text extraction: native PDF text layer with OCR fallback.

pub mod ocr;
pub mod pdf;
pub mod raster;

use std::path::Path;

pub use ocr::{OcrEngine, TesseractOcr};

use crate::error::ProcessError;

/// Default rasterization resolution for OCR.
pub const DEFAULT_OCR_DPI: u32 = 300;

/// Extracts a PDF's textual content, preferring the embedded text layer and
/// falling back to OCR only when no native text exists.
pub struct TextExtractor {
    ocr: Box<dyn OcrEngine>,
    languages: String,
    dpi: u32,
}

impl TextExtractor {
    pub fn new(ocr: Box<dyn OcrEngine>, languages: &[String], dpi: u32) -> Self {
        Self {
            ocr,
            languages: ocr::join_languages(languages),
            dpi,
        }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Extracts the document's text.
    ///
    /// Native extraction reads every page's text layer in page order. If the
    /// concatenated result is non-empty after trimming, it is returned
    /// directly and OCR is never invoked. Otherwise every page is rasterized
    /// and recognized, again in page order. An empty result is a valid
    /// outcome, not an error; an unreadable document is fatal.
    pub fn extract_text(&self, path: &Path) -> Result<String, ProcessError> {
        let _span = tracing::info_span!("extractor.pdf").entered();

        let pdf_bytes = std::fs::read(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let doc = pdf::load_document(&pdf_bytes)?;
        let text = pdf::extract_native_text(&doc);

        if !text.trim().is_empty() {
            return Ok(text);
        }

        let _ocr_span =
            tracing::info_span!("extractor.ocr_fallback", reason = "no_text_layer").entered();
        self.ocr_pages(&pdf_bytes)
    }

    fn ocr_pages(&self, pdf_bytes: &[u8]) -> Result<String, ProcessError> {
        let images = self.ocr.rasterize(pdf_bytes, self.dpi)?;

        let mut all_text = String::new();
        for image in &images {
            let page_text = self.ocr.recognize(image, &self.languages)?;
            all_text.push_str(&page_text);
            all_text.push('\n');
        }

        Ok(all_text)
    }
}
