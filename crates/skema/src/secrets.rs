//! Secret resolution from multiple sources.
//!
//! Resolves a secret (the LLM API key) from multiple sources in priority
//! order, supporting flexible deployment scenarios:
//!
//! 1. **Direct value** - For quick local testing (e.g., `apiKey: "sk-..."`)
//! 2. **File reference** - For Docker secrets pattern (e.g., `apiKeyFile: /run/secrets/openai`)
//! 3. **Env var reference** - For production (e.g., `apiKeyEnvVar: OPENAI_API_KEY`)

use secrecy::SecretString;
use std::fs;

/// Error type for secret resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No secret source provided (need one of: direct value, file path, or env var name)")]
    NoSourceProvided,

    #[error("Failed to read secret from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },
}

/// Result type for secret resolution.
pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves a secret from multiple sources in priority order:
/// 1. Direct value (if provided and non-empty)
/// 2. File contents (if path provided)
/// 3. Environment variable (if name provided and set)
///
/// Returns the resolved secret wrapped in `SecretString`, or an error if no
/// source provides a value.
pub fn resolve_secret(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    resolve_secret_optional(direct, file_path, env_var)?.ok_or(SecretError::NoSourceProvided)
}

/// Like [`resolve_secret`], but an absent secret is `Ok(None)` rather than
/// an error. A file read failure or a non-unicode env var is still an error:
/// the caller pointed at a source that exists but cannot be used.
pub fn resolve_secret_optional(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<Option<SecretString>> {
    // Priority 1: Direct value
    if let Some(value) = direct {
        if !value.is_empty() {
            return Ok(Some(SecretString::from(value.to_string())));
        }
    }

    // Priority 2: File
    if let Some(path) = file_path {
        if !path.is_empty() {
            let expanded = expand_home(path);
            let content =
                fs::read_to_string(&expanded).map_err(|e| SecretError::FileReadError {
                    path: expanded,
                    source: e,
                })?;
            return Ok(Some(SecretString::from(content.trim().to_string())));
        }
    }

    // Priority 3: Environment variable
    if let Some(var_name) = env_var {
        if !var_name.is_empty() {
            match std::env::var(var_name) {
                Ok(value) if !value.is_empty() => {
                    return Ok(Some(SecretString::from(value)));
                }
                Ok(_) => {}
                Err(std::env::VarError::NotPresent) => {}
                Err(std::env::VarError::NotUnicode(_)) => {
                    return Err(SecretError::EnvVarNotUnicode {
                        name: var_name.to_string(),
                    });
                }
            }
        }
    }

    Ok(None)
}

/// Expands a leading `~` to the user's home directory.
fn expand_home(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_direct_value_takes_priority() {
        let secret = resolve_secret(Some("direct-key"), Some("/nonexistent"), None).unwrap();
        assert_eq!(secret.expose_secret(), "direct-key");
    }

    #[test]
    fn test_empty_direct_value_falls_through() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file-key").unwrap();

        let secret =
            resolve_secret(Some(""), Some(file.path().to_str().unwrap()), None).unwrap();
        assert_eq!(secret.expose_secret(), "file-key");
    }

    #[test]
    fn test_file_contents_are_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  padded-key  ").unwrap();

        let secret = resolve_secret(None, Some(file.path().to_str().unwrap()), None).unwrap();
        assert_eq!(secret.expose_secret(), "padded-key");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = resolve_secret(None, Some("/nonexistent/secret"), None);
        assert!(matches!(result, Err(SecretError::FileReadError { .. })));
    }

    #[test]
    #[serial]
    fn test_env_var_fallback() {
        std::env::set_var("SKEMA_TEST_SECRET", "env-key");
        let secret = resolve_secret(None, None, Some("SKEMA_TEST_SECRET")).unwrap();
        assert_eq!(secret.expose_secret(), "env-key");
        std::env::remove_var("SKEMA_TEST_SECRET");
    }

    #[test]
    #[serial]
    fn test_no_source_is_an_error() {
        std::env::remove_var("SKEMA_TEST_SECRET_ABSENT");
        let result = resolve_secret(None, None, Some("SKEMA_TEST_SECRET_ABSENT"));
        assert!(matches!(result, Err(SecretError::NoSourceProvided)));
    }

    #[test]
    #[serial]
    fn test_optional_resolution_returns_none_when_absent() {
        std::env::remove_var("SKEMA_TEST_SECRET_ABSENT");
        let result =
            resolve_secret_optional(None, None, Some("SKEMA_TEST_SECRET_ABSENT")).unwrap();
        assert!(result.is_none());
    }
}
