//! Reply generation backends and the fallback chain.
//!
//! `RemoteGenerator` asks an LLM; `TemplateGenerator` formats static
//! templates; `FallbackGenerator` tries one and silently degrades to the
//! other. A failed remote call is never retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::types::Label;

/// Returned only if every backend in a chain fails.
pub const SAFE_REPLY: &str = "Prezado(a) Cliente,

Recebemos sua mensagem e agradecemos o contato. Nossa equipe retornará em breve.

Atenciosamente,
Equipe AutoU";

/// A strategy that turns an email and its label into reply text.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Backend name, for logs and metrics.
    fn name(&self) -> &str;

    /// Produce a reply for `text` classified as `label`.
    async fn generate(&self, text: &str, label: Label) -> Result<String, GenerationError>;
}

// ── Remote backend ──────────────────────────────────────────────────

/// Tuning for the remote backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Upper bound on the whole remote call.
    pub timeout: Duration,
    /// Characters of the email forwarded to the model.
    pub prompt_chars: usize,
    /// Replies shorter than this are rejected.
    pub min_reply_chars: usize,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            prompt_chars: 500,
            min_reply_chars: 50,
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

/// LLM-backed reply generation.
pub struct RemoteGenerator {
    llm: Arc<dyn LlmProvider>,
    config: RemoteConfig,
}

impl RemoteGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, config: RemoteConfig) -> Self {
        Self { llm, config }
    }

    async fn request(&self, text: &str, label: Label) -> Result<String, GenerationError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(build_system_prompt()),
            ChatMessage::user(build_user_prompt(text, label, self.config.prompt_chars)),
        ])
        .with_max_tokens(self.config.max_tokens)
        .with_temperature(self.config.temperature);

        let response = self.llm.complete(request).await?;
        let reply = response.content.trim().to_string();

        let length = reply.chars().count();
        if length < self.config.min_reply_chars {
            return Err(GenerationError::TooShort {
                length,
                min: self.config.min_reply_chars,
            });
        }

        debug!(
            model = self.llm.model_name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Remote reply generated"
        );
        Ok(reply)
    }
}

#[async_trait]
impl ReplyGenerator for RemoteGenerator {
    fn name(&self) -> &str {
        "remote"
    }

    async fn generate(&self, text: &str, label: Label) -> Result<String, GenerationError> {
        match tokio::time::timeout(self.config.timeout, self.request(text, label)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout {
                after: self.config.timeout,
            }),
        }
    }
}

fn build_system_prompt() -> &'static str {
    "Você é um assistente especializado em comunicação corporativa. \
     Sempre responda em português brasileiro de forma profissional e adequada ao contexto."
}

fn build_user_prompt(text: &str, label: Label, prompt_chars: usize) -> String {
    let excerpt: String = text.chars().take(prompt_chars).collect();
    match label {
        Label::Actionable => format!(
            "Você é um assistente de atendimento ao cliente profissional. \
             Gere uma resposta automática adequada para o email produtivo abaixo.\n\n\
             A resposta deve:\n\
             - Ser profissional e cortês\n\
             - Confirmar o recebimento da solicitação\n\
             - Indicar próximos passos ou prazo de resposta\n\
             - Ser concisa mas completa\n\
             - Estar em português brasileiro\n\
             - Incluir uma saudação e despedida apropriadas\n\n\
             Email recebido:\n\"{excerpt}\"\n\n\
             Gere uma resposta profissional:"
        ),
        Label::Social => format!(
            "Você é um assistente de comunicação corporativa. \
             Gere uma resposta automática adequada para o email improdutivo abaixo.\n\n\
             A resposta deve:\n\
             - Ser calorosa e amigável\n\
             - Agradecer pela mensagem\n\
             - Ser breve mas cordial\n\
             - Estar em português brasileiro\n\
             - Demonstrar apreço pela comunicação\n\n\
             Email recebido:\n\"{excerpt}\"\n\n\
             Gere uma resposta calorosa e amigável:"
        ),
    }
}

// ── Fallback chain ──────────────────────────────────────────────────

/// Tries `primary`, degrades to `fallback` on any failure.
pub struct FallbackGenerator {
    primary: Arc<dyn ReplyGenerator>,
    fallback: Arc<dyn ReplyGenerator>,
}

impl FallbackGenerator {
    pub fn new(primary: Arc<dyn ReplyGenerator>, fallback: Arc<dyn ReplyGenerator>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl ReplyGenerator for FallbackGenerator {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn generate(&self, text: &str, label: Label) -> Result<String, GenerationError> {
        match self.primary.generate(text, label).await {
            Ok(reply) if !reply.trim().is_empty() => return Ok(reply),
            Ok(_) => warn!(
                primary = self.primary.name(),
                fallback = self.fallback.name(),
                "Primary generator returned an empty reply, degrading"
            ),
            Err(e) => warn!(
                primary = self.primary.name(),
                fallback = self.fallback.name(),
                error = %e,
                "Primary generator failed, degrading"
            ),
        }

        match self.fallback.generate(text, label).await {
            Ok(reply) if !reply.trim().is_empty() => {
                info!(backend = self.fallback.name(), "Reply served by fallback");
                Ok(reply)
            }
            Ok(_) => Err(GenerationError::Empty {
                name: self.fallback.name().to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}
