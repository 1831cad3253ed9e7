//! Reply composition: generator chain plus contextual addenda.

use std::sync::Arc;

use tracing::{debug, error};

use super::augment::augment;
use super::generator::{
    FallbackGenerator, RemoteConfig, RemoteGenerator, ReplyGenerator, SAFE_REPLY,
};
use super::templates::{Entropy, TemplateGenerator};
use crate::llm::LlmProvider;
use crate::pipeline::features::normalize;
use crate::pipeline::types::Label;

/// Produces the final reply text for a classified email.
///
/// The generator chain is fixed at construction: remote with template
/// fallback when an LLM is configured, template only otherwise.
pub struct ReplyComposer {
    generator: Arc<dyn ReplyGenerator>,
    remote_enabled: bool,
}

impl ReplyComposer {
    pub fn new(
        llm: Option<Arc<dyn LlmProvider>>,
        remote: RemoteConfig,
        entropy: Box<dyn Entropy>,
    ) -> Self {
        let template: Arc<dyn ReplyGenerator> = Arc::new(TemplateGenerator::new(entropy));
        match llm {
            Some(llm) => {
                debug!(model = llm.model_name(), "Reply composer using remote generation");
                let primary = Arc::new(RemoteGenerator::new(llm, remote));
                Self {
                    generator: Arc::new(FallbackGenerator::new(primary, template)),
                    remote_enabled: true,
                }
            }
            None => Self {
                generator: template,
                remote_enabled: false,
            },
        }
    }

    /// Template-only composer.
    pub fn templates_only(entropy: Box<dyn Entropy>) -> Self {
        Self::new(None, RemoteConfig::default(), entropy)
    }

    /// Build from an explicit generator, e.g. a custom chain.
    ///
    /// `remote_enabled` states whether the chain contains a remote backend.
    pub fn with_generator(generator: Arc<dyn ReplyGenerator>, remote_enabled: bool) -> Self {
        Self {
            generator,
            remote_enabled,
        }
    }

    /// Whether a remote backend is in the chain.
    pub fn remote_enabled(&self) -> bool {
        self.remote_enabled
    }

    /// Name reported in processing metrics.
    pub fn backend_name(&self) -> &'static str {
        if self.remote_enabled {
            "remote+template"
        } else {
            "template"
        }
    }

    /// Generate a reply. Never empty.
    pub async fn generate_reply(&self, text: &str, label: Label) -> String {
        let reply = match self.generator.generate(text, label).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => SAFE_REPLY.to_string(),
            Err(e) => {
                error!(
                    generator = self.generator.name(),
                    error = %e,
                    "All reply generators failed"
                );
                SAFE_REPLY.to_string()
            }
        };
        augment(reply, &normalize(text))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::error::{GenerationError, LlmError};
    use crate::llm::{CompletionRequest, CompletionResponse};
    use crate::reply::templates::FixedEntropy;

    fn entropy() -> Box<dyn Entropy> {
        Box::new(FixedEntropy {
            at: NaiveDate::from_ymd_opt(2026, 3, 14)
                .unwrap()
                .and_hms_opt(9, 5, 7)
                .unwrap(),
            draw: 0,
        })
    }

    struct DownLlm;

    #[async_trait]
    impl LlmProvider for DownLlm {
        fn model_name(&self) -> &str {
            "down"
        }

        async fn complete(&self, _req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::AuthFailed {
                provider: "down".into(),
            })
        }
    }

    struct EchoLlm;

    #[async_trait]
    impl LlmProvider for EchoLlm {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, _req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                content: "Olá! Recebemos sua mensagem e responderemos com atenção em breve. Abraços."
                    .into(),
                input_tokens: 1,
                output_tokens: 1,
            })
        }
    }

    struct Failing;

    #[async_trait]
    impl ReplyGenerator for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _text: &str, _label: Label) -> Result<String, GenerationError> {
            Err(GenerationError::Empty {
                name: "failing".into(),
            })
        }
    }

    #[tokio::test]
    async fn template_only_reply() {
        let composer = ReplyComposer::templates_only(entropy());
        assert!(!composer.remote_enabled());
        assert_eq!(composer.backend_name(), "template");

        let reply = composer
            .generate_reply("Obrigado pelo café da manhã!", Label::Social)
            .await;
        assert!(reply.contains("Fico feliz em poder ajudar!"));
    }

    #[tokio::test]
    async fn remote_failure_degrades_to_template() {
        let composer =
            ReplyComposer::new(Some(Arc::new(DownLlm)), RemoteConfig::default(), entropy());
        assert!(composer.remote_enabled());

        let reply = composer
            .generate_reply("O relatório não gera, preciso de ajuda", Label::Actionable)
            .await;
        assert!(reply.contains("AU2026031409050710"));
    }

    #[tokio::test]
    async fn remote_reply_is_augmented() {
        let composer =
            ReplyComposer::new(Some(Arc::new(EchoLlm)), RemoteConfig::default(), entropy());
        let reply = composer
            .generate_reply("Não consigo fazer login no sistema", Label::Actionable)
            .await;
        assert!(reply.starts_with("Olá! Recebemos sua mensagem"));
        assert!(reply.ends_with("nosso suporte está disponível 24/7."));
    }

    #[tokio::test]
    async fn total_failure_returns_safe_reply() {
        let composer = ReplyComposer::with_generator(Arc::new(Failing), false);
        let reply = composer.generate_reply("bom dia", Label::Social).await;
        assert_eq!(reply, SAFE_REPLY);
    }

    #[tokio::test]
    async fn custom_remote_chain_reports_remote_backend() {
        let remote = Arc::new(RemoteGenerator::new(Arc::new(EchoLlm), RemoteConfig::default()));
        let chain = Arc::new(FallbackGenerator::new(remote, Arc::new(Failing)));
        let composer = ReplyComposer::with_generator(chain, true);

        assert!(composer.remote_enabled());
        assert_eq!(composer.backend_name(), "remote+template");
        let reply = composer.generate_reply("bom dia", Label::Social).await;
        assert!(reply.starts_with("Olá! Recebemos sua mensagem"));
    }

    #[tokio::test]
    async fn reply_never_empty() {
        let composer = ReplyComposer::templates_only(entropy());
        for label in [Label::Actionable, Label::Social] {
            assert!(!composer.generate_reply("", label).await.trim().is_empty());
        }
    }
}
