//! Configuration structs.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::secrets;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,

    /// Root for uploads, previews, and the database.
    #[serde(default = "default_data_directory")]
    pub data_directory: String,

    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            data_directory: default_data_directory(),
            ocr: OcrConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrConfig {
    /// Tesseract language codes, joined with `+` at use time.
    #[serde(default = "default_ocr_languages")]
    pub languages: Vec<String>,

    /// Rasterization resolution for OCR.
    #[serde(default = "default_ocr_dpi")]
    pub dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: default_ocr_languages(),
            dpi: default_ocr_dpi(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// OpenAI-compatible API root.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// API key sources in priority order: direct value, file, env var.
    /// All absent means fallback mode, not an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_file: Option<String>,

    #[serde(default = "default_api_key_env_var")]
    pub api_key_env_var: Option<String>,

    /// Character budget for LLM input text.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            api_key: None,
            api_key_file: None,
            api_key_env_var: default_api_key_env_var(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

impl LlmConfig {
    /// Resolves the API key from the configured sources. `Ok(None)` is the
    /// supported no-credential condition that selects fallback mode.
    pub fn resolve_api_key(&self) -> Result<Option<SecretString>, secrets::SecretError> {
        secrets::resolve_secret_optional(
            self.api_key.as_deref(),
            self.api_key_file.as_deref(),
            self.api_key_env_var.as_deref(),
        )
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_data_directory() -> String {
    "./data".to_string()
}

fn default_ocr_languages() -> Vec<String> {
    vec!["deu".to_string(), "eng".to_string()]
}

fn default_ocr_dpi() -> u32 {
    300
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env_var() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_max_text_chars() -> usize {
    120_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.ocr.dpi, 300);
        assert_eq!(config.ocr.languages, vec!["deu", "eng"]);
        assert_eq!(config.llm.max_text_chars, 120_000);
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(
            config.llm.api_key_env_var.as_deref(),
            Some("OPENAI_API_KEY")
        );
    }

    #[test]
    fn test_direct_api_key_resolves() {
        let llm = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..LlmConfig::default()
        };
        let key = llm.resolve_api_key().unwrap().unwrap();
        assert_eq!(key.expose_secret(), "sk-test");
    }

    #[test]
    #[serial]
    fn test_absent_api_key_is_supported() {
        std::env::remove_var("SKEMA_TEST_NO_KEY");
        let llm = LlmConfig {
            api_key_env_var: Some("SKEMA_TEST_NO_KEY".to_string()),
            ..LlmConfig::default()
        };
        assert!(llm.resolve_api_key().unwrap().is_none());
    }
}
