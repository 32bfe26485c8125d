//! Axum route handlers for the Analysis API.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::engine::{AnalyzeOptions, Report};
use crate::analysis::pdf::{extract_pdf_text, is_pdf_filename};
use crate::errors::AppError;
use crate::models::report::{InputSource, StoredReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,
    pub rewrite_variants: Option<u32>,
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub report_id: Uuid,
    pub source: InputSource,
    #[serde(flatten)]
    pub report: Report,
}

/// Text to analyze plus the per-request options, however it was submitted.
struct Submission {
    text: String,
    source: InputSource,
    options: AnalyzeOptions,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Accepts either a JSON body (`{"text": ...}`) or a multipart upload with a
/// `.pdf` file part. Runs the full analysis and persists the finished report.
pub async fn handle_analyze(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let submission = if is_multipart(&request) {
        read_multipart(&state, request).await?
    } else {
        read_json(&state, request).await?
    };

    info!(
        "Analyzing {} submission ({} chars)",
        submission.source.as_str(),
        submission.text.chars().count()
    );

    let report = state
        .analyzer
        .analyze(&submission.text, &submission.options)
        .await?;

    let stored = state.store.save(submission.source, &report).await?;
    info!("Report {} stored", stored.id);

    Ok(Json(AnalyzeResponse {
        report_id: stored.id,
        source: stored.source,
        report,
    }))
}

/// GET /api/v1/reports/:id
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredReport>, AppError> {
    let stored = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))?;
    Ok(Json(stored))
}

// ────────────────────────────────────────────────────────────────────────────
// Body readers
// ────────────────────────────────────────────────────────────────────────────

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_json(state: &AppState, request: Request) -> Result<Submission, AppError> {
    let Json(body) = Json::<AnalyzeRequest>::from_request(request, state)
        .await
        .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    Ok(Submission {
        text: body.text.unwrap_or_default(),
        source: InputSource::Text,
        options: AnalyzeOptions {
            rewrite_variants: body.rewrite_variants,
            timezone: body.timezone,
        },
    })
}

/// Reads `file`, `text`, `timezone` and `rewrite_variants` parts. A PDF upload takes
/// precedence over a `text` part; a non-PDF file part is ignored.
async fn read_multipart(state: &AppState, request: Request) -> Result<Submission, AppError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let mut pdf_text = None;
    let mut form = AnalyzeRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if !is_pdf_filename(&filename) {
                    continue;
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                pdf_text = Some(extract_pdf_text(data).await?);
            }
            "text" => form.text = Some(read_text_field(field).await?),
            "timezone" => form.timezone = Some(read_text_field(field).await?),
            "rewrite_variants" => {
                let raw = read_text_field(field).await?;
                let variants = raw.trim().parse::<u32>().map_err(|_| {
                    AppError::Validation("rewrite_variants must be a positive integer".to_string())
                })?;
                form.rewrite_variants = Some(variants);
            }
            _ => {}
        }
    }

    let (text, source) = match pdf_text {
        Some(text) => (text, InputSource::Pdf),
        None => (form.text.unwrap_or_default(), InputSource::Text),
    };

    Ok(Submission {
        text,
        source,
        options: AnalyzeOptions {
            rewrite_variants: form.rewrite_variants,
            timezone: form.timezone,
        },
    })
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))
}
