//! Weighted pt-BR keyword tables for the two polarities.
//!
//! Matching is case-insensitive substring containment over normalized text,
//! so a term can fire inside a longer word ("erro" in "aterro"). That is the
//! matching semantics, not a bug.

use crate::pipeline::types::Polarity;

/// One weighted term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconEntry {
    pub term: &'static str,
    pub weight: u32,
}

const fn entry(term: &'static str, weight: u32) -> LexiconEntry {
    LexiconEntry { term, weight }
}

const ACTIONABLE: &[LexiconEntry] = &[
    // Technical problems
    entry("problema", 4),
    entry("erro", 4),
    entry("bug", 4),
    entry("falha", 4),
    entry("defeito", 3),
    entry("não funciona", 5),
    entry("parou de funcionar", 5),
    entry("travou", 3),
    // Support
    entry("suporte", 3),
    entry("ajuda", 3),
    entry("assistência", 3),
    entry("socorro", 4),
    entry("dúvida", 2),
    entry("questão", 2),
    entry("esclarecimento", 2),
    // Urgency
    entry("urgente", 5),
    entry("emergência", 5),
    entry("crítico", 5),
    entry("imediato", 4),
    entry("asap", 4),
    entry("prioridade", 3),
    entry("importante", 2),
    // Business
    entry("reunião", 2),
    entry("meeting", 2),
    entry("proposta", 3),
    entry("orçamento", 3),
    entry("contrato", 3),
    entry("projeto", 2),
    entry("deadline", 3),
    entry("prazo", 3),
    // Actions
    entry("implementar", 2),
    entry("desenvolver", 2),
    entry("criar", 2),
    entry("modificar", 2),
    entry("corrigir", 3),
    entry("resolver", 3),
    entry("atualizar", 2),
    entry("status", 2),
];

const SOCIAL: &[LexiconEntry] = &[
    // Congratulations
    entry("parabéns", 4),
    entry("felicitações", 4),
    entry("congratulações", 3),
    // Special dates
    entry("aniversário", 3),
    entry("natal", 4),
    entry("ano novo", 4),
    entry("festas", 2),
    // Thanks
    entry("obrigado", 2),
    entry("obrigada", 2),
    entry("agradecimento", 3),
    entry("gratidão", 3),
    // Small talk
    entry("café", 1),
    entry("almoço", 1),
    entry("jantar", 1),
    entry("happy hour", 2),
    entry("fim de semana", 1),
    entry("feriado", 1),
    entry("férias", 2),
    // Entertainment
    entry("piada", 3),
    entry("engraçado", 2),
    entry("funny", 2),
    entry("humor", 2),
];

/// Actionable terms whose presence turns exclamation marks into urgency
/// evidence.
pub const URGENCY_TERMS: &[&str] = &["urgente", "emergência"];

/// Immutable keyword tables, one per polarity.
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    actionable: &'static [LexiconEntry],
    social: &'static [LexiconEntry],
}

impl Lexicon {
    /// The canonical weighted lexicon.
    pub const fn standard() -> Self {
        Self {
            actionable: ACTIONABLE,
            social: SOCIAL,
        }
    }

    /// Entries for one polarity, in table order.
    pub fn entries(&self, polarity: Polarity) -> &'static [LexiconEntry] {
        match polarity {
            Polarity::Actionable => self.actionable,
            Polarity::Social => self.social,
        }
    }

    /// Every entry matching `normalized`, actionable first, in table order.
    pub fn matches<'a>(
        &'a self,
        normalized: &'a str,
    ) -> impl Iterator<Item = (Polarity, LexiconEntry)> + 'a {
        [Polarity::Actionable, Polarity::Social]
            .into_iter()
            .flat_map(move |polarity| {
                self.entries(polarity)
                    .iter()
                    .filter(move |e| normalized.contains(e.term))
                    .map(move |e| (polarity, *e))
            })
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::standard()
    }
}

/// Does `normalized` contain any of `terms`?
pub fn contains_any(normalized: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| normalized.contains(t))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn terms_unique_within_polarity() {
        let lexicon = Lexicon::standard();
        for polarity in [Polarity::Actionable, Polarity::Social] {
            let entries = lexicon.entries(polarity);
            let unique: HashSet<_> = entries.iter().map(|e| e.term).collect();
            assert_eq!(unique.len(), entries.len(), "duplicate term in {polarity:?}");
        }
    }

    #[test]
    fn weights_are_positive_and_terms_lowercase() {
        let lexicon = Lexicon::standard();
        for polarity in [Polarity::Actionable, Polarity::Social] {
            for e in lexicon.entries(polarity) {
                assert!(e.weight > 0, "{} has zero weight", e.term);
                assert_eq!(e.term, e.term.to_lowercase());
            }
        }
    }

    #[test]
    fn urgency_terms_are_actionable_entries() {
        let lexicon = Lexicon::standard();
        for term in URGENCY_TERMS {
            assert!(
                lexicon
                    .entries(Polarity::Actionable)
                    .iter()
                    .any(|e| e.term == *term)
            );
        }
    }

    #[test]
    fn matches_substrings_inside_words() {
        let lexicon = Lexicon::standard();
        let hits: Vec<_> = lexicon.matches("o aterro sanitário").collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1.term, "erro");
    }

    #[test]
    fn matches_actionable_before_social() {
        let lexicon = Lexicon::standard();
        let hits: Vec<_> = lexicon
            .matches("obrigado pela ajuda com o problema")
            .map(|(p, e)| (p, e.term))
            .collect();
        assert_eq!(
            hits,
            vec![
                (Polarity::Actionable, "problema"),
                (Polarity::Actionable, "ajuda"),
                (Polarity::Social, "obrigado"),
            ]
        );
    }

    #[test]
    fn contains_any_checks_substrings() {
        assert!(contains_any("isso é urgente!", URGENCY_TERMS));
        assert!(!contains_any("tudo tranquilo", URGENCY_TERMS));
    }
}
