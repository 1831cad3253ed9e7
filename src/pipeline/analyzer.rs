//! End-to-end analysis: classify, compose a reply, suggest a subject.
//!
//! `EmailAnalyzer` is the single entry point used by the HTTP layer. Input
//! bounds are enforced by the caller; `analyze` itself accepts any text.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::pipeline::classifier::classify;
use crate::pipeline::features::normalize;
use crate::pipeline::types::{Label, TextStats};
use crate::reply::ReplyComposer;
use crate::reply::subject::suggest_subject;

/// Evidence descriptions reported in `found_keywords`.
const REPORTED_KEYWORDS: usize = 10;

/// Score summary in report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportScores {
    pub productive: u32,
    pub unproductive: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisDetails {
    pub scores: ReportScores,
    pub text_stats: TextStats,
    pub found_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessingMetrics {
    pub total_time_seconds: f64,
    pub content_length: usize,
    pub words_count: usize,
    /// Reply backend chain, e.g. `"template"`.
    pub backend: &'static str,
}

/// Full analysis of one email.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub classification: Label,
    pub confidence: f64,
    pub explanation: String,
    pub suggested_response: String,
    pub suggested_subject: String,
    pub analysis_details: AnalysisDetails,
    pub processing_metrics: ProcessingMetrics,
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Classifier plus reply composer.
pub struct EmailAnalyzer {
    composer: ReplyComposer,
}

impl EmailAnalyzer {
    pub fn new(composer: ReplyComposer) -> Self {
        Self { composer }
    }

    pub fn composer(&self) -> &ReplyComposer {
        &self.composer
    }

    /// Analyze one email. Total: never fails.
    pub async fn analyze(&self, text: &str) -> AnalysisReport {
        let started = Instant::now();
        let request_id = Uuid::new_v4();

        let result = classify(text);
        let suggested_response = self.composer.generate_reply(text, result.label).await;
        let suggested_subject = suggest_subject(result.label, &normalize(text)).to_string();

        let elapsed = started.elapsed().as_secs_f64();
        info!(
            %request_id,
            label = %result.label,
            confidence = result.confidence,
            words = result.stats.word_count,
            backend = self.composer.backend_name(),
            elapsed_ms = (elapsed * 1000.0) as u64,
            "Email analyzed"
        );

        AnalysisReport {
            classification: result.label,
            confidence: result.confidence,
            explanation: result.rationale,
            suggested_response,
            suggested_subject,
            analysis_details: AnalysisDetails {
                scores: ReportScores {
                    productive: result.scores.actionable,
                    unproductive: result.scores.social,
                    total: result.scores.total(),
                },
                text_stats: result.stats,
                found_keywords: result
                    .evidence
                    .iter()
                    .take(REPORTED_KEYWORDS)
                    .map(|e| e.description.clone())
                    .collect(),
            },
            processing_metrics: ProcessingMetrics {
                total_time_seconds: (elapsed * 1000.0).round() / 1000.0,
                content_length: result.stats.char_count,
                words_count: result.stats.word_count,
                backend: self.composer.backend_name(),
            },
            request_id,
            timestamp: Utc::now(),
        }
    }
}

// ── Self-test ───────────────────────────────────────────────────────

/// Built-in sample emails with their expected labels.
pub const SAMPLE_CASES: &[(&str, Label)] = &[
    (
        "Estou com problema no sistema, preciso de ajuda urgente!",
        Label::Actionable,
    ),
    ("Parabéns pelo aniversário! Feliz aniversário!", Label::Social),
    (
        "Reunião marcada para discutir o projeto importante.",
        Label::Actionable,
    ),
    (
        "Obrigado pelo café da manhã! Foi muito gostoso.",
        Label::Social,
    ),
];

#[derive(Debug, Clone, Serialize)]
pub struct SelfTestCase {
    pub test_id: usize,
    pub text: &'static str,
    pub expected: Label,
    pub got: Label,
    pub confidence: f64,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelfTestReport {
    pub test_results: Vec<SelfTestCase>,
    pub total_tests: usize,
    pub correct: usize,
    /// Percentage, one decimal.
    pub accuracy: f64,
}

/// Classify the sample cases and report accuracy.
pub fn self_test() -> SelfTestReport {
    let test_results: Vec<SelfTestCase> = SAMPLE_CASES
        .iter()
        .enumerate()
        .map(|(i, &(text, expected))| {
            let result = classify(text);
            SelfTestCase {
                test_id: i + 1,
                text,
                expected,
                got: result.label,
                confidence: result.confidence,
                correct: result.label == expected,
            }
        })
        .collect();

    let total_tests = test_results.len();
    let correct = test_results.iter().filter(|r| r.correct).count();
    let accuracy = if total_tests == 0 {
        0.0
    } else {
        (correct as f64 / total_tests as f64 * 1000.0).round() / 10.0
    };

    SelfTestReport {
        test_results,
        total_tests,
        correct,
        accuracy,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::reply::FixedEntropy;

    fn analyzer() -> EmailAnalyzer {
        let entropy = FixedEntropy {
            at: NaiveDate::from_ymd_opt(2026, 3, 14)
                .unwrap()
                .and_hms_opt(9, 5, 7)
                .unwrap(),
            draw: 0,
        };
        EmailAnalyzer::new(ReplyComposer::templates_only(Box::new(entropy)))
    }

    #[tokio::test]
    async fn report_for_urgent_email() {
        let report = analyzer()
            .analyze("Estou com problema no sistema, preciso de ajuda urgente!")
            .await;

        assert_eq!(report.classification, Label::Actionable);
        assert!((report.confidence - 0.929).abs() < 1e-9);
        assert!(report.explanation.starts_with("Email produtivo"));
        assert!(report.suggested_response.contains("AU2026031409050710"));
        assert!(report.suggested_response.ends_with("disponível 24/7."));
        assert_eq!(report.suggested_subject, "Re: Confirmação de recebimento");
        assert_eq!(report.processing_metrics.backend, "template");
        assert_eq!(report.processing_metrics.words_count, 9);

        let scores = report.analysis_details.scores;
        assert_eq!(scores.total, scores.productive + scores.unproductive);
        assert!(
            report
                .analysis_details
                .found_keywords
                .contains(&"\"urgente\" (+5P)".to_string())
        );
    }

    #[tokio::test]
    async fn report_serializes_with_display_labels() {
        let report = analyzer().analyze("Feliz natal a todos!").await;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["classification"], "Improdutivo");
        assert_eq!(json["suggested_subject"], "Re: Muito obrigado!");
        assert!(json["request_id"].as_str().is_some());
        assert!(json["analysis_details"]["text_stats"]["word_count"].is_number());
    }

    #[tokio::test]
    async fn found_keywords_capped() {
        let text = "problema erro bug falha defeito travou suporte ajuda \
                    socorro dúvida questão urgente prazo";
        let report = analyzer().analyze(text).await;
        assert_eq!(report.analysis_details.found_keywords.len(), REPORTED_KEYWORDS);
    }

    #[test]
    fn self_test_is_fully_correct() {
        let report = self_test();
        assert_eq!(report.total_tests, 4);
        assert_eq!(report.correct, 4);
        assert_eq!(report.accuracy, 100.0);
        assert!(report.test_results.iter().all(|r| r.correct));
    }
}
