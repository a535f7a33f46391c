//! Axum route handlers for ATS evaluation, improvement suggestion, and
//! improvement application.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::apply::{apply_improvements, select_improvements, ApplyOutcome};
use crate::analysis::report::{AtsReport, ImprovementPlan};
use crate::analysis::sectionize::sectionize;
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::errors::AppError;
use crate::models::resume::{ImprovementRow, ResumeRow};
use crate::pdf::extract::extract_resume_text;
use crate::resumes::completeness::compute_metadata;
use crate::resumes::document::ResumeDocument;
use crate::state::AppState;

/// Stored evaluation/improvement records keep only the head of each input.
const STORED_EXCERPT_CHARS: usize = 1000;
/// Keywords copied onto a resume created from raw uploaded text.
const DERIVED_KEYWORD_CAP: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub success: bool,
    pub results: AtsReport,
    /// Echoed back so the client can feed the improvement endpoints without
    /// re-uploading the file.
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(alias = "resumeText")]
    pub resume_text: String,
    #[serde(alias = "jobDescription")]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AtsReport,
}

#[derive(Debug, Deserialize)]
pub struct ImproveResumeRequest {
    #[serde(alias = "resumeId")]
    pub resume_id: Uuid,
    #[serde(alias = "jobDescription")]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct ImproveUploadedRequest {
    #[serde(alias = "resumeText")]
    pub resume_text: String,
    #[serde(alias = "jobDescription")]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResponse {
    pub success: bool,
    /// Id of the stored improvement record, used by
    /// `implement-uploaded-improvements`.
    pub improvement_id: Uuid,
    pub improvements: ImprovementPlan,
}

#[derive(Debug, Deserialize)]
pub struct ImplementRequest {
    #[serde(alias = "resumeId")]
    pub resume_id: Uuid,
    #[serde(default, alias = "selectedImprovements")]
    pub selected_improvements: Vec<usize>,
    #[serde(alias = "improvementsData")]
    pub improvements: ImprovementPlan,
}

#[derive(Debug, Deserialize)]
pub struct ImplementUploadedRequest {
    #[serde(alias = "improvementId")]
    pub improvement_id: Uuid,
    #[serde(default, alias = "selectedImprovements")]
    pub selected_improvements: Vec<usize>,
    #[serde(default, alias = "resumeTitle")]
    pub resume_title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementResponse {
    pub success: bool,
    pub message: String,
    pub new_resume_id: Uuid,
    pub new_resume_title: String,
    pub improvements_summary: ImprovementsSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementsSummary {
    pub total_applied: usize,
    pub skills_added: usize,
    pub sections_updated: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ats/evaluate
///
/// Multipart upload: a `resume` PDF plus a `job_description` text field.
/// Anonymous callers get the report; authenticated callers also get the
/// evaluation persisted to their history.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    maybe_auth: MaybeAuthUser,
    mut multipart: Multipart,
) -> Result<Json<EvaluateResponse>, AppError> {
    let mut job_description: Option<String> = None;
    let mut resume_bytes: Option<bytes::Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" | "jobDescription" => {
                job_description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("invalid job_description field: {e}"))
                })?);
            }
            "resume" => {
                resume_bytes = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("invalid resume upload: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation("Resume file and job description are required.".to_string())
        })?;
    let resume_bytes = resume_bytes.ok_or_else(|| {
        AppError::Validation("No resume file uploaded".to_string())
    })?;

    let resume_text = extract_resume_text(&resume_bytes)?;
    tracing::info!(chars = resume_text.len(), "extracted resume text from PDF");

    let results = state
        .analyzer
        .evaluate(&resume_text, &job_description)
        .await?;

    // History is best-effort; a failed insert must not cost the caller
    // their report.
    if let MaybeAuthUser(Some(user_id)) = maybe_auth {
        let report = serde_json::to_value(&results).unwrap_or(Value::Null);
        if let Err(e) = sqlx::query(
            r#"
            INSERT INTO ats_evaluations
                (id, user_id, resume_excerpt, jd_excerpt, report, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(excerpt(&resume_text))
        .bind(excerpt(&job_description))
        .bind(&report)
        .execute(&state.db)
        .await
        {
            tracing::warn!("failed to persist evaluation: {e}");
        }
    }

    Ok(Json(EvaluateResponse {
        success: true,
        results,
        resume_text,
    }))
}

/// POST /api/v1/ai/analyze-resume
///
/// JSON variant of evaluate for resume text the client already holds.
pub async fn handle_analyze(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_text(&request.resume_text, "resume_text")?;
    require_text(&request.job_description, "job_description")?;

    let analysis = state
        .analyzer
        .evaluate(&request.resume_text, &request.job_description)
        .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}

/// POST /api/v1/ai/improve-resume
///
/// Suggests text replacements for a saved resume against a JD.
pub async fn handle_improve_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ImproveResumeRequest>,
) -> Result<Json<ImproveResponse>, AppError> {
    require_text(&request.job_description, "job_description")?;

    let resume = fetch_owned_resume(&state, auth.user_id, request.resume_id).await?;
    let doc: ResumeDocument = serde_json::from_value(resume.content).unwrap_or_default();
    let resume_text = doc.to_analysis_text();
    if resume_text.is_empty() {
        return Err(AppError::Validation("resume has no content to analyze".to_string()));
    }

    let plan = state
        .analyzer
        .suggest_improvements(&resume_text, &request.job_description)
        .await?;

    let improvement_id = store_improvement(
        &state,
        auth.user_id,
        Some(request.resume_id),
        &resume_text,
        &request.job_description,
        &plan,
    )
    .await?;

    Ok(Json(ImproveResponse {
        success: true,
        improvement_id,
        improvements: plan,
    }))
}

/// POST /api/v1/ai/improve-uploaded-resume
///
/// Same as improve-resume, but over raw text from an earlier upload.
pub async fn handle_improve_uploaded(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ImproveUploadedRequest>,
) -> Result<Json<ImproveResponse>, AppError> {
    require_text(&request.resume_text, "resume_text")?;
    require_text(&request.job_description, "job_description")?;

    tracing::info!(
        chars = request.resume_text.len(),
        "analyzing uploaded resume text"
    );

    let plan = state
        .analyzer
        .suggest_improvements(&request.resume_text, &request.job_description)
        .await?;

    let improvement_id = store_improvement(
        &state,
        auth.user_id,
        None,
        &request.resume_text,
        &request.job_description,
        &plan,
    )
    .await?;

    Ok(Json(ImproveResponse {
        success: true,
        improvement_id,
        improvements: plan,
    }))
}

/// POST /api/v1/ai/implement-improvements
///
/// Applies the selected suggestions to a saved resume and stores the result
/// as a new resume. The source resume is left untouched.
pub async fn handle_implement(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ImplementRequest>,
) -> Result<Json<ImplementResponse>, AppError> {
    if request.selected_improvements.is_empty() {
        return Err(AppError::Validation("No improvements selected".to_string()));
    }

    let resume = fetch_owned_resume(&state, auth.user_id, request.resume_id).await?;
    let doc: ResumeDocument =
        serde_json::from_value(resume.content.clone()).unwrap_or_default();

    let selected = select_improvements(&request.improvements, &request.selected_improvements);
    let outcome = apply_improvements(&doc, &selected);

    let next_version = resume.version + 1;
    let title = improved_title(&resume.title, next_version);

    let new_id = insert_improved_resume(
        &state,
        auth.user_id,
        &title,
        &outcome,
        resume.keywords.clone(),
        resume.ats_score,
        next_version,
        Some(resume.id),
    )
    .await?;

    Ok(Json(build_implement_response(new_id, title, &outcome)))
}

/// POST /api/v1/ai/implement-uploaded-improvements
///
/// Applies selected suggestions from a stored improvement record whose source
/// was an uploaded file. The raw text is sectionized into a structured
/// document first so the replacements have fields to land in.
pub async fn handle_implement_uploaded(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ImplementUploadedRequest>,
) -> Result<Json<ImplementResponse>, AppError> {
    if request.selected_improvements.is_empty() {
        return Err(AppError::Validation("No improvements selected".to_string()));
    }

    let record: Option<ImprovementRow> = sqlx::query_as(
        "SELECT * FROM resume_improvements WHERE id = $1 AND user_id = $2",
    )
    .bind(request.improvement_id)
    .bind(auth.user_id)
    .fetch_optional(&state.db)
    .await?;

    let record = record.ok_or_else(|| {
        AppError::NotFound(format!(
            "Improvement analysis {} not found",
            request.improvement_id
        ))
    })?;

    let plan: ImprovementPlan = serde_json::from_value(record.plan).unwrap_or_default();
    let doc = sectionize(&record.resume_text);

    let selected = select_improvements(&plan, &request.selected_improvements);
    let outcome = apply_improvements(&doc, &selected);

    let base_title = request
        .resume_title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Improved Resume".to_string());
    let title = improved_title(&base_title, 1);

    let keywords: Vec<String> = outcome
        .document
        .skills
        .iter()
        .take(DERIVED_KEYWORD_CAP)
        .cloned()
        .collect();

    let new_id = insert_improved_resume(
        &state, auth.user_id, &title, &outcome, keywords, 0.0, 1, None,
    )
    .await?;

    Ok(Json(build_implement_response(new_id, title, &outcome)))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn fetch_owned_resume(
    state: &AppState,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<ResumeRow, AppError> {
    let resume: Option<ResumeRow> = sqlx::query_as(
        "SELECT * FROM resumes WHERE id = $1 AND user_id = $2 AND is_active = TRUE",
    )
    .bind(resume_id)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;

    resume.ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

async fn store_improvement(
    state: &AppState,
    user_id: Uuid,
    resume_id: Option<Uuid>,
    resume_text: &str,
    job_description: &str,
    plan: &ImprovementPlan,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO resume_improvements
            (id, user_id, resume_id, resume_text, jd_excerpt, plan, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(resume_id)
    .bind(resume_text)
    .bind(excerpt(job_description))
    .bind(serde_json::to_value(plan).unwrap_or(Value::Null))
    .execute(&state.db)
    .await?;
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
async fn insert_improved_resume(
    state: &AppState,
    user_id: Uuid,
    title: &str,
    outcome: &ApplyOutcome,
    keywords: Vec<String>,
    ats_score: f64,
    version: i32,
    original_resume_id: Option<Uuid>,
) -> Result<Uuid, AppError> {
    let metadata = compute_metadata(&outcome.document, true);
    let content = serde_json::to_value(&outcome.document)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode document: {e}")))?;
    let applied = serde_json::to_value(&outcome.applied).unwrap_or(Value::Null);

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO resumes
            (id, user_id, title, content, keywords, ats_score, version, is_active,
             metadata, improvements_applied, original_resume_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $9, $10, now(), now())
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(&content)
    .bind(&keywords)
    .bind(ats_score)
    .bind(version)
    .bind(serde_json::to_value(&metadata).unwrap_or(Value::Null))
    .bind(&applied)
    .bind(original_resume_id)
    .execute(&state.db)
    .await?;

    tracing::info!(
        resume_id = %id,
        applied = outcome.applied.len(),
        skills_added = outcome.skills_added.len(),
        "saved improved resume"
    );
    Ok(id)
}

fn build_implement_response(
    new_id: Uuid,
    title: String,
    outcome: &ApplyOutcome,
) -> ImplementResponse {
    let mut sections: Vec<String> = outcome
        .applied
        .iter()
        .map(|a| a.section.to_lowercase())
        .collect();
    sections.sort();
    sections.dedup();

    ImplementResponse {
        success: true,
        message: format!(
            "Successfully applied {} improvements",
            outcome.applied.len()
        ),
        new_resume_id: new_id,
        new_resume_title: title,
        improvements_summary: ImprovementsSummary {
            total_applied: outcome.applied.len(),
            skills_added: outcome.skills_added.len(),
            sections_updated: sections,
        },
    }
}

/// Titles an improved copy. A first improvement gets a plain suffix; further
/// rounds get the version so titles stay distinguishable.
fn improved_title(current: &str, next_version: i32) -> String {
    match current.split("- Improved").next() {
        Some(base) if current.contains("- Improved") => {
            format!("{} - Improved v{next_version}", base.trim())
        }
        _ => format!("{current} - Improved"),
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(STORED_EXCERPT_CHARS).collect()
}

fn require_text(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improved_title_first_round() {
        assert_eq!(improved_title("My Resume", 2), "My Resume - Improved");
    }

    #[test]
    fn test_improved_title_second_round_gets_version() {
        assert_eq!(
            improved_title("My Resume - Improved", 3),
            "My Resume - Improved v3"
        );
    }

    #[test]
    fn test_improved_title_strips_old_version_suffix() {
        assert_eq!(
            improved_title("My Resume - Improved v3", 4),
            "My Resume - Improved v4"
        );
    }

    #[test]
    fn test_excerpt_caps_length() {
        let long = "y".repeat(2000);
        assert_eq!(excerpt(&long).chars().count(), STORED_EXCERPT_CHARS);
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(require_text("  ", "field").is_err());
        assert!(require_text("ok", "field").is_ok());
    }
}
