//! Reply category selection.
//!
//! Each branch (actionable / social) is an ordered list of keyword rules;
//! the first rule whose terms appear in the lower-cased text wins, and the
//! branch default applies when none do.

use serde::{Deserialize, Serialize};

use crate::pipeline::lexicon::contains_any;
use crate::pipeline::types::Label;

/// Reply strategy for an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyCategory {
    Urgent,
    Commercial,
    Support,
    Congratulatory,
    Gratitude,
    GenericSocial,
}

impl ReplyCategory {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Commercial => "commercial",
            Self::Support => "support",
            Self::Congratulatory => "congratulatory",
            Self::Gratitude => "gratitude",
            Self::GenericSocial => "generic_social",
        }
    }

    /// Whether replies in this category carry an acknowledgment clause.
    pub fn is_social(&self) -> bool {
        matches!(
            self,
            Self::Congratulatory | Self::Gratitude | Self::GenericSocial
        )
    }
}

/// A keyword rule: any of `terms` present selects `outcome`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T: 'static> {
    pub terms: &'static [&'static str],
    pub outcome: T,
}

/// Evaluate ordered rules against normalized text; first match wins.
pub fn first_match<T: Copy>(rules: &[KeywordRule<T>], normalized: &str, default: T) -> T {
    rules
        .iter()
        .find(|rule| contains_any(normalized, rule.terms))
        .map(|rule| rule.outcome)
        .unwrap_or(default)
}

const ACTIONABLE_RULES: &[KeywordRule<ReplyCategory>] = &[
    KeywordRule {
        terms: &["urgente", "emergência", "crítico"],
        outcome: ReplyCategory::Urgent,
    },
    KeywordRule {
        terms: &["reunião", "meeting", "proposta", "comercial"],
        outcome: ReplyCategory::Commercial,
    },
];

const SOCIAL_RULES: &[KeywordRule<ReplyCategory>] = &[
    KeywordRule {
        terms: &["parabéns", "felicitações", "aniversário"],
        outcome: ReplyCategory::Congratulatory,
    },
    KeywordRule {
        terms: &["obrigado", "obrigada", "agradecimento"],
        outcome: ReplyCategory::Gratitude,
    },
];

/// Pick the reply category for a classified email.
pub fn select_category(label: Label, normalized: &str) -> ReplyCategory {
    match label {
        Label::Actionable => first_match(ACTIONABLE_RULES, normalized, ReplyCategory::Support),
        Label::Social => first_match(SOCIAL_RULES, normalized, ReplyCategory::GenericSocial),
    }
}

// ── Acknowledgment clause ───────────────────────────────────────────

/// Topic of the acknowledgment clause in a social reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    Congratulations,
    Birthday,
    Holidays,
    Thanks,
    SharedContent,
    Generic,
}

impl Acknowledgment {
    /// The clause inserted into the `{acknowledgment}` placeholder.
    pub fn clause(&self) -> &'static str {
        match self {
            Self::Congratulations => "Suas felicitações significam muito para nós!",
            Self::Birthday => "Muito obrigado pelos parabéns! Foi muito gentil de sua parte.",
            Self::Holidays => {
                "Retribuímos os votos de boas festas! Que o próximo período seja repleto de realizações."
            }
            Self::Thanks => "Fico feliz em poder ajudar! Conte sempre conosco.",
            Self::SharedContent => "Obrigado por compartilhar essa informação conosco.",
            Self::Generic => "Agradeço por manter contato e pensar em nós.",
        }
    }
}

const ACKNOWLEDGMENT_RULES: &[KeywordRule<Acknowledgment>] = &[
    KeywordRule {
        terms: &["parabéns", "felicitações"],
        outcome: Acknowledgment::Congratulations,
    },
    KeywordRule {
        terms: &["aniversário", "birthday"],
        outcome: Acknowledgment::Birthday,
    },
    KeywordRule {
        terms: &["natal", "ano novo", "festas"],
        outcome: Acknowledgment::Holidays,
    },
    KeywordRule {
        terms: &["obrigado", "obrigada", "agradeço"],
        outcome: Acknowledgment::Thanks,
    },
    KeywordRule {
        terms: &["compartilhar", "forward", "interessante"],
        outcome: Acknowledgment::SharedContent,
    },
];

/// Pick the acknowledgment clause topic for a social email.
pub fn select_acknowledgment(normalized: &str) -> Acknowledgment {
    first_match(ACKNOWLEDGMENT_RULES, normalized, Acknowledgment::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgent_beats_commercial() {
        let text = "reunião urgente sobre a proposta";
        assert_eq!(select_category(Label::Actionable, text), ReplyCategory::Urgent);
    }

    #[test]
    fn commercial_terms() {
        for text in [
            "podemos marcar uma reunião",
            "meeting tomorrow",
            "segue a proposta",
            "time comercial",
        ] {
            assert_eq!(
                select_category(Label::Actionable, text),
                ReplyCategory::Commercial,
                "{text}"
            );
        }
    }

    #[test]
    fn actionable_default_is_support() {
        assert_eq!(
            select_category(Label::Actionable, "o login não funciona"),
            ReplyCategory::Support
        );
    }

    #[test]
    fn congratulatory_beats_gratitude() {
        let text = "parabéns e obrigado pelo convite";
        assert_eq!(select_category(Label::Social, text), ReplyCategory::Congratulatory);
    }

    #[test]
    fn gratitude_and_default_social() {
        assert_eq!(
            select_category(Label::Social, "muito obrigada!"),
            ReplyCategory::Gratitude
        );
        assert_eq!(
            select_category(Label::Social, "bom fim de semana"),
            ReplyCategory::GenericSocial
        );
    }

    #[test]
    fn label_decides_branch() {
        // Urgency terms do not matter on the social branch.
        assert_eq!(
            select_category(Label::Social, "urgente: feliz aniversário"),
            ReplyCategory::Congratulatory
        );
    }

    #[test]
    fn category_is_social() {
        assert!(ReplyCategory::Gratitude.is_social());
        assert!(!ReplyCategory::Urgent.is_social());
        assert_eq!(ReplyCategory::GenericSocial.label(), "generic_social");
    }

    #[test]
    fn acknowledgment_priority_order() {
        assert_eq!(
            select_acknowledgment("parabéns pelo aniversário"),
            Acknowledgment::Congratulations
        );
        assert_eq!(select_acknowledgment("feliz aniversário"), Acknowledgment::Birthday);
        assert_eq!(
            select_acknowledgment("feliz natal e obrigado"),
            Acknowledgment::Holidays
        );
        assert_eq!(select_acknowledgment("agradeço a atenção"), Acknowledgment::Thanks);
        assert_eq!(
            select_acknowledgment("achei interessante"),
            Acknowledgment::SharedContent
        );
        assert_eq!(select_acknowledgment("bom dia"), Acknowledgment::Generic);
    }

    #[test]
    fn acknowledgment_clauses_non_empty() {
        for ack in [
            Acknowledgment::Congratulations,
            Acknowledgment::Birthday,
            Acknowledgment::Holidays,
            Acknowledgment::Thanks,
            Acknowledgment::SharedContent,
            Acknowledgment::Generic,
        ] {
            assert!(!ack.clause().is_empty());
        }
    }
}
