//! Shared types for the classification pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Polarity & label ────────────────────────────────────────────────

/// Which side of the decision a lexicon term or structural rule supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Actionable,
    Social,
}

impl Polarity {
    /// One-letter tag used in evidence descriptions (P = produtivo,
    /// I = improdutivo).
    pub fn tag(self) -> char {
        match self {
            Self::Actionable => 'P',
            Self::Social => 'I',
        }
    }
}

/// Classification label for an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Needs a human/business response.
    #[serde(rename = "Produtivo")]
    Actionable,
    /// Courtesy or social message.
    #[serde(rename = "Improdutivo")]
    Social,
}

impl Label {
    /// Display name used in API responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actionable => "Produtivo",
            Self::Social => "Improdutivo",
        }
    }

    /// Map a free-form label string onto a `Label`.
    ///
    /// Anything that is not recognisably actionable is treated as social.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "produtivo" | "actionable" => Self::Actionable,
            _ => Self::Social,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Polarity> for Label {
    fn from(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Actionable => Self::Actionable,
            Polarity::Social => Self::Social,
        }
    }
}

// ── Evidence & scores ───────────────────────────────────────────────

/// A single reason that contributed to a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Rendered description, e.g. `"problema" (+4P)`.
    pub description: String,
    pub polarity: Polarity,
    pub weight: u32,
}

impl Evidence {
    /// Evidence for a matched lexicon term.
    pub fn term(term: &str, polarity: Polarity, weight: u32) -> Self {
        Self {
            description: format!("\"{}\" (+{}{})", term, weight, polarity.tag()),
            polarity,
            weight,
        }
    }

    /// Evidence for a structural rule, e.g. `email longo (+2P)`.
    pub fn structural(label: &str, polarity: Polarity, weight: u32) -> Self {
        Self {
            description: format!("{} (+{}{})", label, weight, polarity.tag()),
            polarity,
            weight,
        }
    }

    /// Signed contribution: positive towards actionable, negative towards
    /// social.
    pub fn signed_contribution(&self) -> i64 {
        match self.polarity {
            Polarity::Actionable => i64::from(self.weight),
            Polarity::Social => -i64::from(self.weight),
        }
    }
}

/// The two competing scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePair {
    pub actionable: u32,
    pub social: u32,
}

impl ScorePair {
    pub fn total(&self) -> u32 {
        self.actionable + self.social
    }

    pub fn add(&mut self, polarity: Polarity, weight: u32) {
        match polarity {
            Polarity::Actionable => self.actionable += weight,
            Polarity::Social => self.social += weight,
        }
    }
}

/// Raw text statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub word_count: usize,
    pub char_count: usize,
    pub question_count: usize,
    pub exclamation_count: usize,
}

// ── Classification result ───────────────────────────────────────────

/// Outcome of classifying one email. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// Calibrated confidence in `[0.5, 0.95]`, rounded to 3 decimals.
    pub confidence: f64,
    /// Human-readable explanation.
    pub rationale: String,
    /// All evidence, in discovery order.
    pub evidence: Vec<Evidence>,
    pub scores: ScorePair,
    pub stats: TextStats,
}
