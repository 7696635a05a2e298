//! Axum route handlers for the cover letter API.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_role;
use crate::letter::{content_disposition, download_file_name};
use crate::letter::generator::{generate_letter, GeneratedLetter};
use crate::letter::validation::{check_draft, job_description_warnings, FieldIssue, ValidationReport};
use crate::letter::LetterDraft;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRoleRequest {
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractRoleResponse {
    pub role_title: Option<String>,
    pub warnings: Vec<FieldIssue>,
}

#[derive(Debug, Deserialize)]
pub struct RenderPdfRequest {
    pub letter: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/roles/extract
///
/// Suggests a role title for the form to pre-fill. Recomputed on every call.
pub async fn handle_extract_role(
    Json(request): Json<ExtractRoleRequest>,
) -> Json<ExtractRoleResponse> {
    Json(ExtractRoleResponse {
        role_title: extract_role(&request.job_description),
        warnings: job_description_warnings(&request.job_description),
    })
}

/// POST /api/v1/cover-letters/check
///
/// Preflight: reports blocking and advisory issues without calling the completion service.
pub async fn handle_check(Json(draft): Json<LetterDraft>) -> Json<ValidationReport> {
    Json(check_draft(&draft))
}

/// POST /api/v1/cover-letters
///
/// Validates the draft and generates the letter text.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(draft): Json<LetterDraft>,
) -> Result<Json<GeneratedLetter>, AppError> {
    let generated = generate_letter(state.llm.as_ref(), &draft).await?;
    Ok(Json(generated))
}

/// POST /api/v1/cover-letters/pdf
///
/// Renders letter text (plus optional name line) to a downloadable PDF.
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(request): Json<RenderPdfRequest>,
) -> Result<Response, AppError> {
    if request.letter.trim().is_empty() {
        return Err(AppError::BadRequest("letter cannot be empty".to_string()));
    }

    let file_name = download_file_name(&request.company_name);
    let disposition = content_disposition(&request.company_name);
    let renderer = state.renderer.clone();

    // CPU-bound: keep it off the async executor.
    let pdf = tokio::task::spawn_blocking(move || {
        renderer.render(&request.letter, request.full_name.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    info!(bytes = pdf.len(), file = %file_name, "Rendered cover letter PDF");

    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid Content-Disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(pdf),
    )
        .into_response())
}
