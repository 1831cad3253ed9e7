//! Structural signals derived from raw email text.

use crate::pipeline::lexicon::{URGENCY_TERMS, contains_any};
use crate::pipeline::types::TextStats;

/// Normalize text for keyword matching: trim and lower-case.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Structural features of one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Features {
    pub stats: TextStats,
    /// Normalized text contains an urgency term.
    pub has_urgency: bool,
}

impl Features {
    /// Extract features from the raw text and its normalized form.
    pub fn extract(raw: &str, normalized: &str) -> Self {
        let stats = TextStats {
            word_count: raw.split_whitespace().count(),
            char_count: raw.chars().count(),
            question_count: raw.matches('?').count(),
            exclamation_count: raw.matches('!').count(),
        };

        Self {
            stats,
            has_urgency: contains_any(normalized, URGENCY_TERMS),
        }
    }
}
