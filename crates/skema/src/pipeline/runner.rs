use std::path::Path;

use serde_json::Value;
use tracing::info_span;

use crate::extractor::TextExtractor;
use crate::llm::StructuredExtractor;
use crate::model::{ImportRecord, ModelDefinition};

use super::context::PipelineContext;
use super::error::PipelineError;

/// The import pipeline: text extraction → structured extraction → schema
/// validation.
///
/// One synchronous run per import, no retries, no persistence — status and
/// record mutation are the caller's responsibility.
pub struct ImportPipeline {
    text_extractor: TextExtractor,
    structured_extractor: StructuredExtractor,
}

impl ImportPipeline {
    pub fn new(text_extractor: TextExtractor, structured_extractor: StructuredExtractor) -> Self {
        Self {
            text_extractor,
            structured_extractor,
        }
    }

    /// Production constructor — builds the Tesseract-backed text extractor
    /// and, when an API key resolves, the OpenAI-compatible structured
    /// extractor. Without a key the pipeline runs in fallback mode.
    pub fn from_config(config: &crate::config::Config) -> crate::error::Result<Self> {
        let text_extractor = TextExtractor::new(
            Box::new(crate::extractor::TesseractOcr::new()),
            &config.ocr.languages,
            config.ocr.dpi,
        );

        let structured_extractor = match config
            .llm
            .resolve_api_key()
            .map_err(crate::error::ConfigError::Secret)?
        {
            Some(api_key) => {
                let client = crate::llm::OpenAiClient::new(&config.llm.base_url, api_key)?;
                StructuredExtractor::new(
                    Box::new(client),
                    &config.llm.model,
                    config.llm.max_text_chars,
                )
            }
            None => StructuredExtractor::offline(),
        };

        Ok(Self::new(text_extractor, structured_extractor))
    }

    /// Processes one import: extracts text from the PDF at `file_path`, asks
    /// the structured extractor for a schema-shaped object, and validates it
    /// against the model's schema.
    ///
    /// On success `ctx.text` and `ctx.extracted_json` hold the results. On
    /// failure the error propagates unchanged and `ctx` keeps whatever
    /// earlier stages produced.
    pub fn process(
        &self,
        record: &ImportRecord,
        model: &ModelDefinition,
        file_path: &Path,
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        let _pipeline_span = info_span!("pipeline", import_id = %record.id).entered();
        log::info!("processing import id={}", record.id);

        // Step 1: Extract text (native, then OCR fallback)
        let text = {
            let _step = info_span!("extract_text").entered();
            self.text_extractor.extract_text(file_path)?
        };
        ctx.text = Some(text);

        // Step 2: Structured extraction against the parsed schema
        let schema = parse_schema(&model.json_schema)?;
        let extracted = {
            let _step = info_span!("extract_structured").entered();
            let text = ctx.text.as_deref().expect("step 1 completed");
            self.structured_extractor.extract(text, &schema)?
        };

        // Step 3: Validate the extracted object against the same schema
        let extracted = Value::Object(extracted);
        {
            let _step = info_span!("validate").entered();
            validate_against_schema(&schema, &extracted)?;
        }

        ctx.extracted_json = Some(serde_json::to_string(&extracted)?);
        Ok(())
    }
}

/// Parses a model's stored schema text into a JSON value.
fn parse_schema(json_schema: &str) -> Result<Value, PipelineError> {
    serde_json::from_str(json_schema).map_err(|e| PipelineError::InvalidSchema(e.to_string()))
}

/// Validates an instance against a JSON Schema, collecting every violation
/// into a single error message.
fn validate_against_schema(schema: &Value, instance: &Value) -> Result<(), PipelineError> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| PipelineError::InvalidSchema(e.to_string()))?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{} at {}", e, e.instance_path()))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::SchemaValidation(errors.join("; ")))
    }
}
