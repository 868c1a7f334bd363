//! Core data model: model definitions and import records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returns the current UTC time as an RFC 3339 string, the timestamp format
/// used throughout the database.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// A named JSON Schema describing the desired shape of extracted data.
///
/// The schema is stored as serialized text and parsed at use time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub id: String,
    pub name: String,
    pub json_schema: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>, json_schema: impl Into<String>) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            json_schema: json_schema.into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Parses the stored schema text into a JSON value.
    pub fn schema_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.json_schema)
    }
}

/// Lifecycle state of an import. `Processing` transitions exactly once to
/// `Done` or `Failed`; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Processing,
    Done,
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Processing => "processing",
            ImportStatus::Done => "done",
            ImportStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStatus::Done | ImportStatus::Failed)
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(ImportStatus::Processing),
            "done" => Ok(ImportStatus::Done),
            "failed" => Ok(ImportStatus::Failed),
            other => Err(format!("unknown import status: '{}'", other)),
        }
    }
}

/// One attempted extraction of one uploaded PDF against one model definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: String,
    pub model_id: String,
    pub filename: String,
    pub status: ImportStatus,
    pub ocr_text: Option<String>,
    pub extracted_json: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ImportRecord {
    /// Creates a fresh record in `processing` state.
    pub fn new(model_id: impl Into<String>, filename: impl Into<String>) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            model_id: model_id.into(),
            filename: filename.into(),
            status: ImportStatus::Processing,
            ocr_text: None,
            extracted_json: None,
            error: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
