//! Context-dependent closing notes appended to a finished reply.

use super::category::{KeywordRule, first_match};

const ADDENDA: &[KeywordRule<Option<&str>>] = &[
    KeywordRule {
        terms: &["sistema", "login"],
        outcome: Some("Para questões técnicas urgentes, nosso suporte está disponível 24/7."),
    },
    KeywordRule {
        terms: &["reunião", "meeting"],
        outcome: Some(
            "Confirmaremos a disponibilidade e enviaremos o convite do calendário em breve.",
        ),
    },
    KeywordRule {
        terms: &["orçamento", "proposta"],
        outcome: Some("Nossa equipe comercial entrará em contato para alinhar os detalhes."),
    },
    KeywordRule {
        terms: &["urgente", "emergência"],
        outcome: Some("⚠️ Devido à urgência mencionada, priorizaremos sua solicitação."),
    },
];

/// The note for the first matching topic, if any.
pub fn addendum_for(normalized: &str) -> Option<&'static str> {
    first_match(ADDENDA, normalized, None)
}

/// Append at most one addendum, separated by a blank line.
pub fn augment(reply: String, normalized: &str) -> String {
    match addendum_for(normalized) {
        Some(note) => format!("{reply}\n\n{note}"),
        None => reply,
    }
}
