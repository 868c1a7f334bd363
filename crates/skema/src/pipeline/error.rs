use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Document processing failed: {0}")]
    Processing(#[from] crate::error::ProcessError),

    #[error("Invalid model schema: {0}")]
    InvalidSchema(String),

    #[error("Structured extraction failed: {0}")]
    Extraction(#[from] crate::error::ExtractError),

    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("Failed to serialize extracted data: {0}")]
    Serialize(#[from] serde_json::Error),
}
