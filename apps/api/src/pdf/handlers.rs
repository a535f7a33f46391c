//! Axum route handler for resume PDF export.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Json,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::pdf::render::{attachment_filename, render_resume_pdf};
use crate::resumes::document::ResumeDocument;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RenderPdfRequest {
    #[serde(alias = "resumeData")]
    pub resume_data: ResumeDocument,
}

/// POST /api/v1/resumes/render-pdf
///
/// Renders the posted document and returns the PDF as a download.
pub async fn handle_render_pdf(
    State(_state): State<AppState>,
    _auth: AuthUser,
    Json(request): Json<RenderPdfRequest>,
) -> Result<(HeaderMap, Vec<u8>), AppError> {
    let pdf_bytes = render_resume_pdf(&request.resume_data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF rendering failed: {e}")))?;

    let filename = attachment_filename(&request.resume_data);
    tracing::info!(bytes = pdf_bytes.len(), %filename, "rendered resume PDF");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );

    Ok((headers, pdf_bytes))
}
