pub mod config;
pub mod db;
pub mod error;
pub mod extractor;
pub mod importer;
pub mod llm;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod secrets;
pub mod storage;

pub use config::{load_config, Config, LlmConfig, OcrConfig};
pub use db::{Database, DatabaseError};
pub use error::{
    ConfigError, ExtractError, ProcessError, Result, SkemaError, StorageError,
};
pub use extractor::{OcrEngine, TesseractOcr, TextExtractor};
pub use importer::{ImportError, ImportService};
pub use llm::{ChatMessage, CompletionRequest, LlmClient, OpenAiClient, StructuredExtractor};
pub use model::{ImportRecord, ImportStatus, ModelDefinition};
pub use pipeline::{ImportPipeline, PipelineContext, PipelineError};
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
pub use storage::FileStorage;
