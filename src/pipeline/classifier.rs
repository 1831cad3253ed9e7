//! Score → label + calibrated confidence + rationale.
//!
//! `classify` is total over every string input, including empty text and
//! text with no lexicon hits.

use crate::pipeline::scorer::{ScoreCard, Scorer};
use crate::pipeline::types::{ClassificationResult, Label};

/// Evidence items quoted verbatim in the rationale.
const RATIONALE_EVIDENCE: usize = 5;

/// Confidence floor for a scored decision.
const BASE_CONFIDENCE: f64 = 0.65;

/// How much of the confidence range dominance can add.
const DOMINANCE_SPAN: f64 = 0.30;

/// Confidence ceiling. The classifier never claims certainty.
const MAX_CONFIDENCE: f64 = 0.95;

/// Classify raw email text with the standard lexicon.
pub fn classify(text: &str) -> ClassificationResult {
    classify_card(Scorer::default().score(text))
}

/// Turn a score card into a classification.
pub fn classify_card(card: ScoreCard) -> ClassificationResult {
    let ScoreCard {
        scores,
        evidence,
        stats,
    } = card;
    let total = scores.total();

    if total == 0 {
        let (label, confidence, rationale) =
            no_signal_fallback(stats.word_count, stats.question_count);
        return ClassificationResult {
            label,
            confidence,
            rationale: rationale.to_string(),
            evidence,
            scores,
            stats,
        };
    }

    // Ties go to Social.
    let (label, winner, loser) = if scores.actionable > scores.social {
        (Label::Actionable, scores.actionable, scores.social)
    } else {
        (Label::Social, scores.social, scores.actionable)
    };

    let ratio = f64::from(winner) / f64::from(total);
    let confidence = round3((BASE_CONFIDENCE + ratio * DOMINANCE_SPAN).min(MAX_CONFIDENCE));

    let mut rationale = match label {
        Label::Actionable => format!("Email produtivo (score: {winner} vs {loser}). "),
        Label::Social => format!("Email improdutivo (score: {winner} vs {loser}). "),
    };
    if !evidence.is_empty() {
        let shown: Vec<&str> = evidence
            .iter()
            .take(RATIONALE_EVIDENCE)
            .map(|e| e.description.as_str())
            .collect();
        rationale.push_str(&format!("Principais indicadores: {}", shown.join(", ")));
        if evidence.len() > RATIONALE_EVIDENCE {
            rationale.push_str(&format!(" e mais {}.", evidence.len() - RATIONALE_EVIDENCE));
        }
    }

    ClassificationResult {
        label,
        confidence,
        rationale,
        evidence,
        scores,
        stats,
    }
}

/// Decision when no lexicon or structural rule fired.
///
/// Long unlabelled mail defaults to actionable: missing a real request costs
/// more than an unneeded business reply.
fn no_signal_fallback(word_count: usize, question_count: usize) -> (Label, f64, &'static str) {
    if word_count > 50 && question_count > 0 {
        (
            Label::Actionable,
            0.65,
            "Email com perguntas e tamanho médio, provável solicitação.",
        )
    } else if word_count > 80 {
        (
            Label::Actionable,
            0.70,
            "Email longo sem palavras-chave específicas, classificado como produtivo por precaução.",
        )
    } else {
        (
            Label::Social,
            0.60,
            "Email curto sem indicadores claros de produtividade.",
        )
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
