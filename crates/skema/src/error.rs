use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkemaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Import error: {0}")]
    Import(#[from] crate::importer::ImportError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Secret resolution failed: {0}")]
    Secret(#[from] crate::secrets::SecretError),
}

/// Errors from reading, parsing, rasterizing, or OCR-ing a document.
///
/// `ReadDocument` and `PdfParse` together form the "document unreadable"
/// class: the file could not be opened or is not a parseable PDF.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse PDF: {0}")]
    PdfParse(String),

    #[error("Failed to rasterize PDF: {0}")]
    Rasterize(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),
}

/// Errors from the structured-extraction stage.
///
/// `EmptyContent`, `InvalidJson` and `NotAnObject` are the "LLM output
/// invalid" class; the rest are transport failures.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM output was not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("LLM output must be a JSON object")]
    NotAnObject,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove file '{path}': {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SkemaError>;
