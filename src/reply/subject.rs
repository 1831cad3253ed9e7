//! Subject line suggestions for replies.

use super::category::{KeywordRule, first_match};
use crate::pipeline::types::Label;

const ACTIONABLE_SUBJECTS: &[KeywordRule<&str>] = &[
    KeywordRule {
        terms: &["suporte"],
        outcome: "Re: Confirmação de recebimento - Solicitação de Suporte",
    },
    KeywordRule {
        terms: &["reunião"],
        outcome: "Re: Confirmação - Agendamento de Reunião",
    },
    KeywordRule {
        terms: &["orçamento"],
        outcome: "Re: Recebido - Solicitação de Orçamento",
    },
];

const ACTIONABLE_DEFAULT: &str = "Re: Confirmação de recebimento";
const SOCIAL_SUBJECT: &str = "Re: Muito obrigado!";

/// Suggest a reply subject for a classified email.
pub fn suggest_subject(label: Label, normalized: &str) -> &'static str {
    match label {
        Label::Actionable => first_match(ACTIONABLE_SUBJECTS, normalized, ACTIONABLE_DEFAULT),
        Label::Social => SOCIAL_SUBJECT,
    }
}
