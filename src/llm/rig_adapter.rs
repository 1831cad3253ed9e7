//! Bridge from rig-core's `CompletionModel` to our `LlmProvider` trait.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use rig::completion::{AssistantContent, CompletionModel};

use crate::error::LlmError;
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider};

/// "try again in 20s", "retry after 1.5 s", "Retry-After: 30"
static RETRY_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:try again in|retry[- ]after:?)\s*(\d+(?:\.\d+)?)\s*(ms)?").unwrap()
});

/// Wraps any rig completion model.
pub struct RigAdapter<M> {
    model: M,
    model_name: String,
    provider: &'static str,
}

impl<M: CompletionModel> RigAdapter<M> {
    pub fn new(model: M, model_name: &str, provider: &'static str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            provider,
        }
    }
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let prompt = request
            .last_user_message()
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                reason: "request has no user message".to_string(),
            })?
            .to_string();

        let mut builder = self.model.completion_request(prompt);
        if let Some(system) = request.system_prompt() {
            builder = builder.preamble(system);
        }
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(f64::from(temperature));
        }
        if let Some(max_tokens) = request.max_tokens {
            builder = builder.max_tokens(u64::from(max_tokens));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_failure(self.provider, &e.to_string()))?;

        let content = response
            .choice
            .iter()
            .filter_map(|c| match c {
                AssistantContent::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if content.trim().is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                reason: "response contained no text".to_string(),
            });
        }

        Ok(CompletionResponse {
            content,
            input_tokens: u32::try_from(response.usage.input_tokens).unwrap_or(u32::MAX),
            output_tokens: u32::try_from(response.usage.output_tokens).unwrap_or(u32::MAX),
        })
    }
}

/// Map a rig completion error message onto an `LlmError`.
///
/// rig reports HTTP failures as text, so the status is recovered from the
/// message.
fn classify_failure(provider: &str, message: &str) -> LlmError {
    let lowered = message.to_lowercase();
    if lowered.contains("401")
        || lowered.contains("unauthorized")
        || lowered.contains("invalid api key")
        || lowered.contains("invalid x-api-key")
        || lowered.contains("authentication_error")
    {
        return LlmError::AuthFailed {
            provider: provider.to_string(),
        };
    }
    if lowered.contains("429") || lowered.contains("rate limit") || lowered.contains("rate_limit") {
        return LlmError::RateLimited {
            provider: provider.to_string(),
            retry_after: parse_retry_after(message),
        };
    }
    LlmError::RequestFailed {
        provider: provider.to_string(),
        reason: message.to_string(),
    }
}

fn parse_retry_after(message: &str) -> Option<Duration> {
    let caps = RETRY_AFTER.captures(message)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let seconds = if caps.get(2).is_some() { value / 1000.0 } else { value };
    Duration::try_from_secs_f64(seconds).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_auth_failed() {
        let err = classify_failure("openai", "HttpError: status 401 Unauthorized");
        assert!(matches!(err, LlmError::AuthFailed { ref provider } if provider == "openai"));

        let err = classify_failure("anthropic", r#"{"type":"authentication_error"}"#);
        assert!(matches!(err, LlmError::AuthFailed { .. }));
    }

    #[test]
    fn too_many_requests_maps_to_rate_limited() {
        let err = classify_failure(
            "openai",
            "ProviderError: Rate limit reached for gpt-4o-mini. Please try again in 20s.",
        );
        assert!(matches!(
            err,
            LlmError::RateLimited { retry_after: Some(d), .. } if d == Duration::from_secs(20)
        ));

        let err = classify_failure("anthropic", "status 429: rate_limit_error");
        assert!(matches!(err, LlmError::RateLimited { retry_after: None, .. }));
    }

    #[test]
    fn retry_after_units() {
        assert_eq!(parse_retry_after("try again in 1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_retry_after("try again in 250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_retry_after("Retry-After: 30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_retry_after("slow down"), None);
    }

    #[test]
    fn other_failures_keep_the_message() {
        let err = classify_failure("openai", "connection reset by peer");
        assert!(matches!(
            err,
            LlmError::RequestFailed { ref reason, .. } if reason == "connection reset by peer"
        ));
    }
}
