//! Import lifecycle service.
//!
//! Owns the caller side of the pipeline contract: create the record in
//! `processing`, store the uploaded file, run the pipeline once, and write
//! back exactly one terminal state. A record never stays in `processing`
//! after `create_import` returns.

use thiserror::Error;

use crate::db::{import_repo, model_repo, Database, DatabaseError};
use crate::error::StorageError;
use crate::extractor::raster;
use crate::model::{now_rfc3339, ImportRecord};
use crate::pipeline::{ImportPipeline, PipelineContext};
use crate::storage::FileStorage;

/// Rendering resolution for cached preview images. Roughly the original
/// page size at screen scale; previews are for display, not OCR.
const PREVIEW_DPI: u32 = 100;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File must be a PDF: '{0}'")]
    NotAPdf(String),

    #[error("Model '{0}' not found")]
    ModelNotFound(String),

    #[error("Import '{0}' not found")]
    ImportNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Processing error: {0}")]
    Process(#[from] crate::error::ProcessError),
}

pub struct ImportService {
    db: Database,
    storage: FileStorage,
    pipeline: ImportPipeline,
}

impl ImportService {
    pub fn new(db: Database, storage: FileStorage, pipeline: ImportPipeline) -> Self {
        Self {
            db,
            storage,
            pipeline,
        }
    }

    /// Accepts an uploaded PDF for a model and processes it synchronously.
    ///
    /// The returned record is terminal: `done` with `ocr_text` and
    /// `extracted_json` populated, or `failed` with `error` set and any text
    /// produced before the failure point preserved. Pipeline failures are
    /// captured into the record, not returned as errors; this returns `Err`
    /// only when the upload itself cannot be accepted.
    pub fn create_import(
        &self,
        model_id: &str,
        filename: &str,
        pdf_bytes: &[u8],
    ) -> Result<ImportRecord, ImportError> {
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(ImportError::NotAPdf(filename.to_string()));
        }

        let model = model_repo::find_by_id(&self.db, model_id)?
            .ok_or_else(|| ImportError::ModelNotFound(model_id.to_string()))?;

        let record = ImportRecord::new(&model.id, filename);
        import_repo::insert(&self.db, &record)?;

        let pdf_path = self.storage.store_pdf(&record.id, pdf_bytes)?;
        self.generate_preview(&record.id, pdf_bytes);

        let mut ctx = PipelineContext::new();
        match self.pipeline.process(&record, &model, &pdf_path, &mut ctx) {
            Ok(()) => {
                import_repo::complete(
                    &self.db,
                    &record.id,
                    ctx.text.as_deref().unwrap_or_default(),
                    ctx.extracted_json.as_deref().unwrap_or_default(),
                    &now_rfc3339(),
                )?;
            }
            Err(e) => {
                log::error!("failed import id={}: {}", record.id, e);
                import_repo::fail(
                    &self.db,
                    &record.id,
                    &e.to_string(),
                    ctx.text.as_deref(),
                    &now_rfc3339(),
                )?;
            }
        }

        import_repo::find_by_id(&self.db, &record.id)?
            .ok_or_else(|| ImportError::ImportNotFound(record.id.clone()))
    }

    /// Renders the cached first-page preview. Best-effort: a preview failure
    /// is logged and never fails the import.
    fn generate_preview(&self, import_id: &str, pdf_bytes: &[u8]) {
        match raster::render_pdf_page(pdf_bytes, 1, PREVIEW_DPI) {
            Ok(png) => {
                if let Err(e) = self.storage.write_preview(import_id, &png) {
                    log::warn!("failed preview write id={}: {}", import_id, e);
                }
            }
            Err(e) => {
                log::warn!("failed preview generation id={}: {}", import_id, e);
            }
        }
    }

    /// Returns a preview PNG for an import page (1-based), serving the
    /// cached first-page image when available and rendering on demand
    /// otherwise. The first page is cached after rendering.
    pub fn preview(&self, id: &str, page: u32) -> Result<Vec<u8>, ImportError> {
        self.get_import(id)?;

        if page == 1 {
            if let Ok(png) = std::fs::read(self.storage.preview_path(id)) {
                return Ok(png);
            }
        }

        let pdf_bytes = self.storage.read_pdf(id)?;
        let png = raster::render_pdf_page(&pdf_bytes, page, PREVIEW_DPI)?;

        if page == 1 {
            if let Err(e) = self.storage.write_preview(id, &png) {
                log::warn!("failed preview write id={}: {}", id, e);
            }
        }

        Ok(png)
    }

    pub fn get_import(&self, id: &str) -> Result<ImportRecord, ImportError> {
        import_repo::find_by_id(&self.db, id)?
            .ok_or_else(|| ImportError::ImportNotFound(id.to_string()))
    }

    pub fn list_imports(&self) -> Result<Vec<ImportRecord>, ImportError> {
        Ok(import_repo::list(&self.db)?)
    }

    /// Deletes an import record together with its stored file artifacts.
    pub fn delete_import(&self, id: &str) -> Result<(), ImportError> {
        if import_repo::find_by_id(&self.db, id)?.is_none() {
            return Err(ImportError::ImportNotFound(id.to_string()));
        }

        self.storage.remove_artifacts(id)?;
        import_repo::delete(&self.db, id)?;
        Ok(())
    }
}
