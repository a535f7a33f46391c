use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Structured resume document (see `resumes::document::ResumeDocument`).
    pub content: Value,
    pub keywords: Vec<String>,
    pub ats_score: f64,
    pub version: i32,
    pub is_active: bool,
    /// Section-completion metadata derived at save time.
    pub metadata: Value,
    /// Improvements applied when this row was produced by the improver.
    pub improvements_applied: Option<Value>,
    pub original_resume_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A persisted improvement analysis. Keeps the source resume text so the
/// suggestions can be applied later by the implement endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImprovementRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub resume_text: String,
    pub jd_excerpt: String,
    pub plan: Value,
    pub created_at: DateTime<Utc>,
}
