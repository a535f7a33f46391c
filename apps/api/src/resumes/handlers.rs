//! Axum route handlers for resume CRUD.
//!
//! All queries are scoped to the authenticated owner; soft-deleted rows are
//! invisible everywhere except the delete endpoint's own 404 check.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::completeness::compute_metadata;
use crate::resumes::document::ResumeDocument;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 50;
const PREVIEW_SUMMARY_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct SaveResumeRequest {
    pub title: String,
    pub content: ResumeDocument,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub ats_score: f64,
}

#[derive(Debug, Serialize)]
pub struct SaveResumeResponse {
    pub id: Uuid,
    pub version: i32,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumePreview {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub template: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub version: i32,
    pub ats_score: f64,
    pub keywords: Vec<String>,
    pub metadata: Value,
    pub preview: ResumePreview,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct ListResumesResponse {
    pub resumes: Vec<ResumeSummary>,
    pub pagination: Pagination,
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<SaveResumeRequest>,
) -> Result<(StatusCode, Json<SaveResumeResponse>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }

    let metadata = compute_metadata(&request.content, false);
    let content = serde_json::to_value(&request.content)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode document: {e}")))?;

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO resumes
            (id, user_id, title, content, keywords, ats_score, version, is_active,
             metadata, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, 1, TRUE, $7, now(), now())
        "#,
    )
    .bind(id)
    .bind(auth.user_id)
    .bind(request.title.trim())
    .bind(&content)
    .bind(&request.keywords)
    .bind(request.ats_score)
    .bind(serde_json::to_value(&metadata).unwrap_or(Value::Null))
    .execute(&state.db)
    .await?;

    tracing::info!(resume_id = %id, user_id = %auth.user_id, "created resume");

    Ok((
        StatusCode::CREATED,
        Json(SaveResumeResponse {
            id,
            version: 1,
            message: "Resume created successfully".to_string(),
        }),
    ))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<SaveResumeRequest>,
) -> Result<Json<SaveResumeResponse>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }

    let metadata = compute_metadata(&request.content, false);
    let content = serde_json::to_value(&request.content)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode document: {e}")))?;

    let version: Option<(i32,)> = sqlx::query_as(
        r#"
        UPDATE resumes
        SET title = $1, content = $2, keywords = $3, ats_score = $4,
            metadata = $5, version = version + 1, updated_at = now()
        WHERE id = $6 AND user_id = $7 AND is_active = TRUE
        RETURNING version
        "#,
    )
    .bind(request.title.trim())
    .bind(&content)
    .bind(&request.keywords)
    .bind(request.ats_score)
    .bind(serde_json::to_value(&metadata).unwrap_or(Value::Null))
    .bind(resume_id)
    .bind(auth.user_id)
    .fetch_optional(&state.db)
    .await?;

    let (version,) =
        version.ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    Ok(Json(SaveResumeResponse {
        id: resume_id,
        version,
        message: "Resume updated successfully".to_string(),
    }))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResumesResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;
    let search = params.search.as_deref().unwrap_or("").trim().to_string();
    let pattern = format!("%{search}%");

    let (total, rows): (i64, Vec<ResumeRow>) = if search.is_empty() {
        let total = sqlx::query_scalar(
            "SELECT COUNT(*) FROM resumes WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(auth.user_id)
        .fetch_one(&state.db)
        .await?;

        let rows = sqlx::query_as(
            r#"
            SELECT * FROM resumes
            WHERE user_id = $1 AND is_active = TRUE
            ORDER BY updated_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(auth.user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.db)
        .await?;

        (total, rows)
    } else {
        let total = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM resumes
            WHERE user_id = $1 AND is_active = TRUE
              AND (title ILIKE $2 OR $3 = ANY(keywords))
            "#,
        )
        .bind(auth.user_id)
        .bind(&pattern)
        .bind(&search)
        .fetch_one(&state.db)
        .await?;

        let rows = sqlx::query_as(
            r#"
            SELECT * FROM resumes
            WHERE user_id = $1 AND is_active = TRUE
              AND (title ILIKE $2 OR $3 = ANY(keywords))
            ORDER BY updated_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(auth.user_id)
        .bind(&pattern)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.db)
        .await?;

        (total, rows)
    };

    let resumes = rows.into_iter().map(summarize).collect();

    Ok(Json(ListResumesResponse {
        resumes,
        pagination: Pagination {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        },
    }))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume: Option<ResumeRow> = sqlx::query_as(
        "SELECT * FROM resumes WHERE id = $1 AND user_id = $2 AND is_active = TRUE",
    )
    .bind(resume_id)
    .bind(auth.user_id)
    .fetch_optional(&state.db)
    .await?;

    resume
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

/// DELETE /api/v1/resumes/:id
///
/// Soft delete: the row stays for audit/history but disappears from every
/// other endpoint.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE resumes
        SET is_active = FALSE, deleted_at = now()
        WHERE id = $1 AND user_id = $2 AND is_active = TRUE
        "#,
    )
    .bind(resume_id)
    .bind(auth.user_id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }

    Ok(Json(serde_json::json!({
        "message": "Resume deleted successfully"
    })))
}

fn summarize(row: ResumeRow) -> ResumeSummary {
    let doc: ResumeDocument = serde_json::from_value(row.content).unwrap_or_default();

    ResumeSummary {
        id: row.id,
        title: row.title,
        created_at: row.created_at,
        updated_at: row.updated_at,
        version: row.version,
        ats_score: row.ats_score,
        keywords: row.keywords,
        metadata: row.metadata,
        preview: ResumePreview {
            name: doc.name,
            email: doc.email,
            phone: doc.phone,
            summary: preview_summary(&doc.summary),
            template: doc.layout.template,
            color: doc.layout.color,
        },
    }
}

/// Truncated summary line for list views.
fn preview_summary(summary: &str) -> String {
    if summary.is_empty() {
        return String::new();
    }
    let truncated: String = summary.chars().take(PREVIEW_SUMMARY_CHARS).collect();
    if truncated.chars().count() < summary.chars().count() {
        format!("{truncated}...")
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_summary_short_is_unchanged() {
        assert_eq!(preview_summary("short"), "short");
        assert_eq!(preview_summary(""), "");
    }

    #[test]
    fn test_preview_summary_long_is_truncated_with_ellipsis() {
        let long = "x".repeat(150);
        let preview = preview_summary(&long);
        assert_eq!(preview.chars().count(), PREVIEW_SUMMARY_CHARS + 3);
        assert!(preview.ends_with("..."));
    }
}
