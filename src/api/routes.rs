//! Request handlers and the JSON error body.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AppState;
use crate::config::InputLimits;
use crate::error::{Error, ExtractionError, InputError};
use crate::extract::extract_text;
use crate::pipeline::{AnalysisReport, self_test as run_self_test};

// ── Errors ──────────────────────────────────────────────────────────────

/// Error response: `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, e.code(), e.to_string())
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        let status = match e {
            ExtractionError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ExtractionError::ExtractionFailed { .. } | ExtractionError::Empty { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        Self::new(status, e.code(), e.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Input(e) => e.into(),
            Error::Extraction(e) => e.into(),
            Error::Config(_) | Error::Llm(_) | Error::Generation(_) => {
                warn!(error = %e, "Unexpected error in request");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal", e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "InvalidRequest", e.body_text())
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        Self::new(e.status(), "InvalidUpload", e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

// ── Health ──────────────────────────────────────────────────────────────

pub(super) async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "inbox-triage",
        "version": env!("CARGO_PKG_VERSION"),
        "remote_generation": state.analyzer.composer().remote_enabled(),
    }))
}

// ── Analyze ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    #[serde(default)]
    text: String,
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let Json(request) = body?;
    state.limits.validate(&request.text)?;
    Ok(Json(state.analyzer.analyze(&request.text).await))
}

// ── Upload ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(super) struct UploadResponse {
    file_name: String,
    #[serde(flatten)]
    report: AnalysisReport,
}

pub(super) async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        file = Some((file_name, data));
        break;
    }

    let Some((file_name, data)) = file else {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "MissingFile",
            "multipart field \"file\" is required",
        ));
    };
    info!(file_name = %file_name, bytes = data.len(), "Upload received");

    let name = file_name.clone();
    let limits = state.limits;
    let text = tokio::task::spawn_blocking(move || read_upload(&limits, &name, &data))
        .await
        .map_err(|e| {
            warn!(error = %e, "Extraction task failed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal", "extraction task failed")
        })??;

    let report = state.analyzer.analyze(&text).await;
    Ok(Json(UploadResponse { file_name, report }))
}

/// Extract an upload's text and check it against the input bounds.
fn read_upload(
    limits: &InputLimits,
    file_name: &str,
    data: &[u8],
) -> crate::error::Result<String> {
    let text = extract_text(file_name, data)?;
    limits.validate(&text)?;
    Ok(text)
}

// ── Self-test ───────────────────────────────────────────────────────────

pub(super) async fn self_test() -> impl IntoResponse {
    Json(run_self_test())
}
