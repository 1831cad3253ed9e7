//! Configuration types.

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::{ConfigError, InputError};
use crate::llm::{LlmBackend, LlmConfig};
use crate::reply::RemoteConfig;

/// Size bounds on text submitted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    /// Minimum characters after trimming.
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_chars: 10,
            max_chars: 50_000,
        }
    }
}

impl InputLimits {
    /// Check `text` against both bounds.
    pub fn validate(&self, text: &str) -> Result<(), InputError> {
        let trimmed = text.trim().chars().count();
        if trimmed < self.min_chars {
            return Err(InputError::TooShort {
                length: trimmed,
                min: self.min_chars,
            });
        }
        let length = text.chars().count();
        if length > self.max_chars {
            return Err(InputError::TooLong {
                length,
                max: self.max_chars,
            });
        }
        Ok(())
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port.
    pub port: u16,
    pub limits: InputLimits,
    /// Upper bound on a multipart upload body.
    pub max_upload_bytes: usize,
    pub remote: RemoteConfig,
    /// Remote generation credentials. `None` means template-only replies.
    pub llm: Option<LlmConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            limits: InputLimits::default(),
            max_upload_bytes: 10 * 1024 * 1024, // 10 MiB
            remote: RemoteConfig::default(),
            llm: None,
        }
    }
}

impl AppConfig {
    /// Build from process environment variables.
    ///
    /// - `INBOX_TRIAGE_PORT` (default 5000)
    /// - `INBOX_TRIAGE_MIN_CHARS` / `INBOX_TRIAGE_MAX_CHARS` (10 / 50000)
    /// - `INBOX_TRIAGE_MAX_UPLOAD_BYTES` (10 MiB)
    /// - `INBOX_TRIAGE_REMOTE_TIMEOUT_SECS` (15)
    /// - `INBOX_TRIAGE_MODEL` (backend default)
    /// - `OPENAI_API_KEY` or `ANTHROPIC_API_KEY`; OpenAI wins if both are set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(&var, "INBOX_TRIAGE_PORT", defaults.port)?;
        let limits = InputLimits {
            min_chars: parse_or(&var, "INBOX_TRIAGE_MIN_CHARS", defaults.limits.min_chars)?,
            max_chars: parse_or(&var, "INBOX_TRIAGE_MAX_CHARS", defaults.limits.max_chars)?,
        };
        if limits.min_chars > limits.max_chars {
            return Err(ConfigError::InvalidValue {
                key: "INBOX_TRIAGE_MIN_CHARS".to_string(),
                message: format!(
                    "minimum {} exceeds maximum {}",
                    limits.min_chars, limits.max_chars
                ),
            });
        }

        let max_upload_bytes =
            parse_or(&var, "INBOX_TRIAGE_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;
        let timeout_secs = parse_or(
            &var,
            "INBOX_TRIAGE_REMOTE_TIMEOUT_SECS",
            defaults.remote.timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "INBOX_TRIAGE_REMOTE_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        let remote = RemoteConfig {
            timeout: Duration::from_secs(timeout_secs),
            ..defaults.remote
        };

        let model = var("INBOX_TRIAGE_MODEL");
        let credentials = var("OPENAI_API_KEY")
            .map(|key| (LlmBackend::OpenAi, key))
            .or_else(|| var("ANTHROPIC_API_KEY").map(|key| (LlmBackend::Anthropic, key)));

        let llm = match (credentials, model) {
            (Some((backend, api_key)), model) => Some(LlmConfig {
                backend,
                api_key: SecretString::from(api_key),
                model: model.unwrap_or_else(|| backend.default_model().to_string()),
            }),
            (None, Some(_)) => {
                return Err(ConfigError::MissingEnvVar(
                    "OPENAI_API_KEY or ANTHROPIC_API_KEY".to_string(),
                ));
            }
            (None, None) => None,
        };

        Ok(Self {
            port,
            limits,
            max_upload_bytes,
            remote,
            llm,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}
