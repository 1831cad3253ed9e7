//! Static reply templates and the local template backend.
//!
//! Placeholders: `{sender}`, `{protocol}`, `{timestamp}`, `{acknowledgment}`.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use rand::Rng;
use regex::{Captures, Regex};

use crate::error::GenerationError;
use crate::pipeline::features::normalize;
use crate::pipeline::types::Label;
use crate::reply::category::{ReplyCategory, select_acknowledgment, select_category};
use crate::reply::generator::ReplyGenerator;
use crate::reply::sender::resolve_sender;

/// Prefix of every protocol identifier.
pub const PROTOCOL_PREFIX: &str = "AU";

// ── Entropy ─────────────────────────────────────────────────────────

/// Source of time and randomness for reply rendering.
///
/// Only protocol ids and template choice consume it; scoring never does.
pub trait Entropy: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// A uniformly chosen integer in `[low, high)`. `high > low`.
    fn next_in(&self, low: u32, high: u32) -> u32;
}

/// Wall clock + thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEntropy;

impl Entropy for SystemEntropy {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn next_in(&self, low: u32, high: u32) -> u32 {
        rand::thread_rng().gen_range(low..high)
    }
}

/// Deterministic entropy for tests: a frozen clock and a fixed draw.
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy {
    pub at: NaiveDateTime,
    pub draw: u32,
}

impl Entropy for FixedEntropy {
    fn now(&self) -> NaiveDateTime {
        self.at
    }

    fn next_in(&self, low: u32, high: u32) -> u32 {
        low + self.draw % (high - low)
    }
}

/// Cosmetic protocol id: prefix + timestamp + two random digits.
///
/// Uniqueness is best-effort; collisions are harmless.
pub fn protocol_id(entropy: &dyn Entropy) -> String {
    format!(
        "{}{}{}",
        PROTOCOL_PREFIX,
        entropy.now().format("%Y%m%d%H%M%S"),
        entropy.next_in(10, 100)
    )
}

/// Human-readable receipt time.
pub fn display_timestamp(entropy: &dyn Entropy) -> String {
    entropy.now().format("%d/%m/%Y às %H:%M").to_string()
}

// ── Templates ───────────────────────────────────────────────────────

const URGENT: &[&str] = &[r#"Prezado(a) {sender},

🚨 SOLICITAÇÃO URGENTE RECEBIDA

Protocolo: #{protocol}
Recebido: {timestamp}
Status: PRIORIDADE MÁXIMA

Nossa equipe de suporte foi imediatamente acionada e está priorizando seu atendimento.

⏰ Primeira resposta: até 2 horas
🔧 Resolução estimada: 4-6 horas
📱 Suporte urgente: (11) 9999-9999

Acompanhe em tempo real: https://status.autou.io/#{protocol}

Atenciosamente,
Equipe de Suporte AutoU
Central de Atendimento 24/7"#];

const COMMERCIAL: &[&str] = &[r#"Prezado(a) {sender},

Agradecemos seu contato comercial!

📊 Detalhes da solicitação:
   • Protocolo: #{protocol}
   • Recebido: {timestamp}
   • Tipo: Oportunidade Comercial
   • Status: Em análise

💼 Nossa equipe comercial irá:
   ✓ Analisar suas necessidades
   ✓ Preparar proposta personalizada
   ✓ Agendar apresentação
   ✓ Acompanhar todo o processo

📅 Retorno comercial: até 48h úteis
📧 Contato: comercial@autou.io
📞 WhatsApp: (11) 99999-8888

Cordialmente,
Equipe Comercial AutoU"#];

const SUPPORT: &[&str] = &[
    r#"Prezado(a) {sender},

Obrigado por entrar em contato com o suporte AutoU.

📋 Sua solicitação foi registrada:
   • Protocolo: #{protocol}
   • Data/Hora: {timestamp}
   • Categoria: Suporte Técnico
   • Status: Em análise

👨‍💻 Nossa equipe irá:
   1. Analisar sua questão detalhadamente
   2. Replicar o cenário descrito
   3. Desenvolver a melhor solução
   4. Implementar e validar

⏰ Prazo de resposta: até 24 horas úteis
🌐 Acompanhar: https://suporte.autou.io/#{protocol}

Atenciosamente,
Equipe Técnica AutoU
suporte@autou.io | (11) 3333-4444"#,
    r#"Olá, {sender}.

Agradecemos seu email. Sua solicitação foi registrada em nosso sistema com o protocolo #{protocol} em {timestamp}.

Nossa equipe especializada irá avaliar a situação e retornar com as informações solicitadas no menor prazo possível.

Em caso de dúvidas, favor referenciar o número do protocolo em futuras comunicações.

Cordialmente,
Central de Atendimento AutoU"#,
];

const CONGRATULATORY: &[&str] = &[
    r#"Caro(a) {sender},

🎉 Que alegria receber sua mensagem de felicitação!

{acknowledgment}

Muito obrigado por pensar em nós neste momento especial. Gestos como o seu tornam nossa jornada ainda mais significativa.

✨ Retribuímos os votos de felicidade e sucesso!

A equipe AutoU torce sempre por você! 🌟

Com muito carinho,
Família AutoU 💙"#,
    r#"Caro(a) {sender},

Que gentileza sua! Muito obrigado por compartilhar esse momento conosco.

{acknowledgment}

Com carinho,
Equipe AutoU"#,
];

const GRATITUDE: &[&str] = &[
    r#"Prezado(a) {sender},

😊 Seu agradecimento iluminou nosso dia!

{acknowledgment}

Na AutoU, acreditamos que relacionamentos genuínos são a base de tudo. Mensagens como a sua nos motivam a sempre buscar a excelência.

Tenha uma excelente semana!

Com gratidão,
Equipe AutoU 💙"#,
    r#"Prezado(a) {sender},

Muito obrigado por sua mensagem! É sempre um prazer receber contato de você.

{acknowledgment}

Desejamos a você um excelente dia!

Cordialmente,
Equipe AutoU"#,
];

const GENERIC_SOCIAL: &[&str] = &[
    r#"Olá {sender}!

Que bom receber seu contato! 😊

{acknowledgment}

Espero que seu dia esteja sendo incrível e cheio de boas energias!

Um abraço caloroso,
Time AutoU 🤗"#,
    r#"Olá, {sender}!

Agradecemos imensamente por pensar em nós. Sua mensagem trouxe um sorriso ao nosso dia!

{acknowledgment}

Um abraço caloroso,
Equipe AutoU"#,
];

/// Template pool for a category. Never empty.
pub fn templates_for(category: ReplyCategory) -> &'static [&'static str] {
    match category {
        ReplyCategory::Urgent => URGENT,
        ReplyCategory::Commercial => COMMERCIAL,
        ReplyCategory::Support => SUPPORT,
        ReplyCategory::Congratulatory => CONGRATULATORY,
        ReplyCategory::Gratitude => GRATITUDE,
        ReplyCategory::GenericSocial => GENERIC_SOCIAL,
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone)]
pub struct TemplateFields {
    pub sender: String,
    pub protocol: String,
    pub timestamp: String,
    pub acknowledgment: String,
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(sender|protocol|timestamp|acknowledgment)\}").unwrap());

/// Substitute every placeholder in `template` in a single pass.
///
/// Substituted values are never rescanned, so a sender name that looks like
/// a placeholder is emitted verbatim.
pub fn render(template: &str, fields: &TemplateFields) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "sender" => fields.sender.clone(),
            "protocol" => fields.protocol.clone(),
            "timestamp" => fields.timestamp.clone(),
            _ => fields.acknowledgment.clone(),
        })
        .into_owned()
}

// ── Template backend ────────────────────────────────────────────────

/// Local backend: pure string formatting over the static templates.
pub struct TemplateGenerator {
    entropy: Box<dyn Entropy>,
}

impl TemplateGenerator {
    pub fn new(entropy: Box<dyn Entropy>) -> Self {
        Self { entropy }
    }

    /// Render the reply for `text` classified as `label`. Infallible.
    pub fn render_reply(&self, text: &str, label: Label) -> String {
        let normalized = normalize(text);
        let category = select_category(label, &normalized);
        let pool = templates_for(category);
        let index = self.entropy.next_in(0, pool.len() as u32) as usize;
        let template = pool.get(index).copied().unwrap_or(pool[0]);

        let acknowledgment = if category.is_social() {
            select_acknowledgment(&normalized).clause().to_string()
        } else {
            String::new()
        };

        let fields = TemplateFields {
            sender: resolve_sender(text),
            protocol: protocol_id(self.entropy.as_ref()),
            timestamp: display_timestamp(self.entropy.as_ref()),
            acknowledgment,
        };

        tracing::debug!(category = category.label(), template = index, "Rendering template reply");
        render(template, &fields)
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new(Box::new(SystemEntropy))
    }
}

#[async_trait]
impl ReplyGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        "template"
    }

    async fn generate(&self, text: &str, label: Label) -> Result<String, GenerationError> {
        Ok(self.render_reply(text, label))
    }
}
