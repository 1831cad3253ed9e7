//! Lexicon + structural scoring.
//!
//! Produces the competing actionable/social scores and the ordered evidence
//! behind them. No randomness: identical input always scores identically.

use crate::pipeline::features::{Features, normalize};
use crate::pipeline::lexicon::Lexicon;
use crate::pipeline::types::{Evidence, Polarity, ScorePair, TextStats};

/// Excess exclamation marks beyond this count read as enthusiasm.
const EXCLAMATION_ALLOWANCE: usize = 3;

/// Cap on the enthusiasm bonus.
const MAX_ENTHUSIASM_BONUS: usize = 3;

/// Points per question mark.
const QUESTION_WEIGHT: usize = 2;

/// Emails above this many words get the long-email bonus.
const LONG_EMAIL_WORDS: usize = 100;

/// Emails below this many words (and above zero) may get the short-email bonus.
const SHORT_EMAIL_WORDS: usize = 15;

/// Output of scoring one email.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub scores: ScorePair,
    pub evidence: Vec<Evidence>,
    pub stats: TextStats,
}

/// Weighted scorer over a lexicon.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    lexicon: Lexicon,
}

impl Scorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Score raw email text.
    pub fn score(&self, raw: &str) -> ScoreCard {
        let normalized = normalize(raw);
        let features = Features::extract(raw, &normalized);

        let mut card = ScoreCard {
            scores: ScorePair::default(),
            evidence: Vec::new(),
            stats: features.stats,
        };

        for (polarity, entry) in self.lexicon.matches(&normalized) {
            card.push(Evidence::term(entry.term, polarity, entry.weight));
        }

        apply_structural_rules(&mut card, &features);
        card
    }
}

impl ScoreCard {
    fn push(&mut self, evidence: Evidence) {
        self.scores.add(evidence.polarity, evidence.weight);
        self.evidence.push(evidence);
    }
}

fn apply_structural_rules(card: &mut ScoreCard, features: &Features) {
    let stats = features.stats;

    // Questions
    if stats.question_count > 0 {
        let weight = stats.question_count * QUESTION_WEIGHT;
        card.push(Evidence::structural(
            &format!("{} pergunta(s)", stats.question_count),
            Polarity::Actionable,
            saturate(weight),
        ));
    }

    // Exclamations: enthusiasm unless the email is urgent
    if stats.exclamation_count > EXCLAMATION_ALLOWANCE {
        let bonus = (stats.exclamation_count - EXCLAMATION_ALLOWANCE).min(MAX_ENTHUSIASM_BONUS);
        card.push(Evidence::structural(
            "exclamações excessivas",
            Polarity::Social,
            saturate(bonus),
        ));
    } else if stats.exclamation_count > 0 && features.has_urgency {
        card.push(Evidence::structural(
            "exclamações urgentes",
            Polarity::Actionable,
            saturate(stats.exclamation_count),
        ));
    }

    // Length
    if stats.word_count > LONG_EMAIL_WORDS {
        card.push(Evidence::structural("email longo", Polarity::Actionable, 2));
    }
    if stats.word_count > 0 && stats.word_count < SHORT_EMAIL_WORDS && card.scores.social == 0 {
        card.push(Evidence::structural("email muito curto", Polarity::Social, 1));
    }
}

fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> ScoreCard {
        Scorer::default().score(text)
    }

    fn descriptions(card: &ScoreCard) -> Vec<&str> {
        card.evidence.iter().map(|e| e.description.as_str()).collect()
    }

    #[test]
    fn urgent_problem_scores_actionable() {
        let card = score("Estou com problema no sistema, preciso de ajuda urgente!");
        // problema 4 + ajuda 3 + urgente 5 + 1 urgent exclamation
        assert_eq!(card.scores.actionable, 13);
        // short email with no social evidence yet
        assert_eq!(card.scores.social, 1);
        assert_eq!(
            descriptions(&card),
            vec![
                "\"problema\" (+4P)",
                "\"ajuda\" (+3P)",
                "\"urgente\" (+5P)",
                "exclamações urgentes (+1P)",
                "email muito curto (+1I)",
            ]
        );
    }

    #[test]
    fn birthday_scores_social() {
        let card = score("Parabéns pelo aniversário! Feliz aniversário!");
        assert_eq!(card.scores.actionable, 0);
        assert_eq!(card.scores.social, 7);
        // social evidence already present, so no short-email bonus
        assert!(!descriptions(&card).contains(&"email muito curto (+1I)"));
    }

    #[test]
    fn question_marks_add_two_each() {
        let card = score("Vocês abrem amanhã? E no sábado? Qual horário?");
        assert_eq!(card.scores.actionable, 6);
        assert!(descriptions(&card).contains(&"3 pergunta(s) (+6P)"));
    }

    #[test]
    fn excessive_exclamations_capped_at_three() {
        let card = score("Que dia lindo!!!!!!!!");
        assert!(descriptions(&card).contains(&"exclamações excessivas (+3I)"));
        assert_eq!(card.scores.social, 3);
    }

    #[test]
    fn excessive_exclamations_win_over_urgency() {
        let card = score("urgente!!!!!");
        assert!(descriptions(&card).contains(&"exclamações excessivas (+2I)"));
        assert!(!descriptions(&card).iter().any(|d| d.starts_with("exclamações urgentes")));
    }

    #[test]
    fn exclamations_without_urgency_are_ignored() {
        let card = score("Bom dia! Tudo certo por aí!");
        assert!(!descriptions(&card).iter().any(|d| d.starts_with("exclamações")));
    }

    #[test]
    fn long_email_bonus() {
        let text = "palavra ".repeat(101);
        let card = score(&text);
        assert_eq!(card.scores.actionable, 2);
        assert_eq!(card.scores.social, 0);
        assert_eq!(descriptions(&card), vec!["email longo (+2P)"]);
    }

    #[test]
    fn medium_email_without_keywords_scores_zero() {
        let text = "palavra ".repeat(40);
        let card = score(&text);
        assert_eq!(card.scores.total(), 0);
        assert!(card.evidence.is_empty());
    }

    #[test]
    fn empty_text_scores_zero() {
        for text in ["", "   ", "\n\t\n"] {
            let card = score(text);
            assert_eq!(card.scores.total(), 0);
            assert!(card.evidence.is_empty());
            assert_eq!(card.stats.word_count, 0);
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let lower = score("reunião sobre o contrato");
        let upper = score("REUNIÃO SOBRE O CONTRATO");
        assert_eq!(lower.scores, upper.scores);
        assert_eq!(lower.scores.actionable, 5);
    }

    #[test]
    fn scoring_is_deterministic() {
        let text = "Obrigado pelo café! Podemos marcar uma reunião?";
        assert_eq!(score(text), score(text));
    }
}
