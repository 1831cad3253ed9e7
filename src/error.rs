//! Error types for inbox-triage.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Input bound violations. Raised only at the request boundary; the
/// classifier itself accepts any string.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Text too short: {length} characters, at least {min} required")]
    TooShort { length: usize, min: usize },

    #[error("Text too long: {length} characters, at most {max} allowed")]
    TooLong { length: usize, max: usize },
}

impl InputError {
    /// Stable machine-readable code for API bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "InputTooShort",
            Self::TooLong { .. } => "InputTooLong",
        }
    }
}

/// Raw-text extraction errors (uploads only).
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to extract text from {file_name}: {reason}")]
    ExtractionFailed { file_name: String, reason: String },

    #[error("No readable text in {file_name}")]
    Empty { file_name: String },
}

impl ExtractionError {
    /// Stable machine-readable code for API bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "UnsupportedFormat",
            Self::ExtractionFailed { .. } | Self::Empty { .. } => "ExtractionFailed",
        }
    }
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },
}

/// Remote reply generation failures. Always recovered by the template
/// fallback; never returned to API callers.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Remote generation timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Generated reply too short: {length} < {min} characters")]
    TooShort { length: usize, min: usize },

    #[error("Generator {name} produced no reply")]
    Empty { name: String },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
