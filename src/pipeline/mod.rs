//! Email classification pipeline.
//!
//! Every email flows through:
//! 1. `features::normalize()` + `Features::extract()`: text statistics
//! 2. `Scorer::score()`: lexicon hits and structural rules (no LLM)
//! 3. `classifier::classify_card()`: label, confidence, rationale
//! 4. `EmailAnalyzer::analyze()`: reply, subject, report
//!
//! Classification is deterministic. Only reply rendering consumes time or
//! randomness.

pub mod analyzer;
pub mod classifier;
pub mod features;
pub mod lexicon;
pub mod scorer;
pub mod types;

pub use analyzer::{AnalysisReport, EmailAnalyzer, self_test};
pub use classifier::classify;
pub use types::{ClassificationResult, Label};
