//! Native PDF text layer extraction.

use crate::error::ProcessError;

/// Loads a PDF from memory, mapping parse failures to the document-unreadable
/// error class.
pub fn load_document(pdf_bytes: &[u8]) -> Result<lopdf::Document, ProcessError> {
    lopdf::Document::load_mem(pdf_bytes).map_err(|e| ProcessError::PdfParse(e.to_string()))
}

/// Extracts the embedded text layer of every page, concatenated with newline
/// separators in page order. A page whose text cannot be decoded contributes
/// nothing rather than failing the whole document.
pub fn extract_native_text(doc: &lopdf::Document) -> String {
    let mut text = String::new();

    for (page_num, _) in doc.get_pages() {
        if let Ok(page_text) = doc.extract_text(&[page_num]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }

    text
}


#[cfg(test)]
mod tests {
    use super::test_pdf::{pdf_with_text, pdf_without_text};
    use super::*;

    #[test]
    fn test_load_document_rejects_garbage() {
        let result = load_document(b"not a valid pdf content");
        assert!(matches!(result, Err(ProcessError::PdfParse(_))));
    }

    #[test]
    fn test_native_text_from_embedded_layer() {
        let doc = load_document(&pdf_with_text("Invoice 123")).unwrap();
        let text = extract_native_text(&doc);
        assert!(text.contains("Invoice 123"));
    }

    #[test]
    fn test_native_text_empty_for_scanned_page() {
        let doc = load_document(&pdf_without_text()).unwrap();
        let text = extract_native_text(&doc);
        assert!(text.trim().is_empty());
    }
}
