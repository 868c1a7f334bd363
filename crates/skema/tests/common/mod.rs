//! Shared helpers for integration tests: PDF fixtures and fake collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lopdf::{dictionary, Document, Object, Stream};
use skema::{
    CompletionRequest, Database, ExtractError, FileStorage, ImportPipeline, ImportService,
    LlmClient, OcrEngine, ProcessError, StructuredExtractor, TextExtractor,
};

/// Builds a single-page PDF whose text layer contains `text`.
pub fn pdf_with_text(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.new_object_id();
    let resources_id = doc.new_object_id();
    let content_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    doc.objects.insert(
        font_id,
        Object::Dictionary(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        }),
    );

    doc.objects.insert(
        resources_id,
        Object::Dictionary(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        }),
    );

    let content = format!("BT /F1 12 Tf 50 700 Td ({}) Tj ET", text);
    let content_stream = Stream::new(dictionary! {}, content.into_bytes());
    doc.objects
        .insert(content_id, Object::Stream(content_stream));

    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        }),
    );

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut pdf_bytes = Vec::new();
    doc.save_to(&mut pdf_bytes).unwrap();
    pdf_bytes
}

/// Builds a single-page PDF with no text layer (a scanned page stand-in).
pub fn pdf_without_text() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut pdf_bytes = Vec::new();
    doc.save_to(&mut pdf_bytes).unwrap();
    pdf_bytes
}

/// OCR fake returning one canned text per page, counting rasterize calls.
pub struct FakeOcr {
    pages: Vec<String>,
    rasterize_calls: Arc<AtomicUsize>,
}

impl FakeOcr {
    pub fn new(pages: Vec<&str>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                pages: pages.into_iter().map(String::from).collect(),
                rasterize_calls: calls.clone(),
            },
            calls,
        )
    }
}

impl OcrEngine for FakeOcr {
    fn rasterize(&self, _pdf_bytes: &[u8], _dpi: u32) -> Result<Vec<Vec<u8>>, ProcessError> {
        self.rasterize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pages
            .iter()
            .enumerate()
            .map(|(i, _)| vec![i as u8])
            .collect())
    }

    fn recognize(&self, image: &[u8], _languages: &str) -> Result<String, ProcessError> {
        Ok(self.pages[image[0] as usize].clone())
    }
}

/// LLM fake returning a canned response.
pub struct FakeLlm {
    response: String,
}

impl FakeLlm {
    pub fn returning(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl LlmClient for FakeLlm {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, ExtractError> {
        Ok(self.response.clone())
    }
}

/// Builds an `ImportService` over the given database handle, a temp data
/// directory, a fake OCR engine, and the given structured extractor. The
/// database handle is `Clone`, so tests keep one for direct repo access.
pub fn service(
    db: &Database,
    dir: &tempfile::TempDir,
    ocr: FakeOcr,
    structured: StructuredExtractor,
) -> ImportService {
    let storage = FileStorage::new(dir.path());
    let pipeline = ImportPipeline::new(
        TextExtractor::new(Box::new(ocr), &[], 300),
        structured,
    );
    ImportService::new(db.clone(), storage, pipeline)
}

/// Structured extractor backed by a fake LLM.
pub fn structured_with(llm: FakeLlm) -> StructuredExtractor {
    StructuredExtractor::new(Box::new(llm), "gpt-4o-mini", 120_000)
}
