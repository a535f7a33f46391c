//! The analyzer seam: a trait object so handlers and tests don't care which
//! backend produces reports.
//!
//! Default: `GeminiAnalyzer` (prompt + lenient parse over the LLM client).
//! Tests swap in a canned stub via `Arc<dyn ResumeAnalyzer>` in `AppState`.

use async_trait::async_trait;
use tracing::warn;

use crate::analysis::prompts::{
    fill, truncate, ATS_JD_CAP, ATS_PROMPT_TEMPLATE, ATS_RESUME_CAP, IMPROVEMENT_JD_CAP,
    IMPROVEMENT_PROMPT_TEMPLATE, IMPROVEMENT_RESUME_CAP,
};
use crate::analysis::report::{parse_ats_report, parse_improvement_plan, AtsReport, ImprovementPlan};
use crate::errors::AppError;
use crate::llm_client::prompts::{ANALYSIS_TEMPERATURE, IMPROVEMENT_TEMPERATURE};
use crate::llm_client::LlmClient;

/// How many times the improvement call is attempted before giving up.
/// Parse failures are retried; transport errors bubble up immediately
/// (the LLM client already retries those).
const IMPROVEMENT_ATTEMPTS: u32 = 2;

/// The resume analyzer trait. Implement this to swap backends without
/// touching the endpoint or handler code.
///
/// Carried in `AppState` as `Arc<dyn ResumeAnalyzer>`.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    /// Scores a resume against a job description.
    async fn evaluate(&self, resume_text: &str, jd_text: &str) -> Result<AtsReport, AppError>;

    /// Produces specific text-replacement suggestions for a resume.
    async fn suggest_improvements(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<ImprovementPlan, AppError>;
}

/// The default analyzer: Gemini prompts plus tolerant response parsing.
pub struct GeminiAnalyzer {
    llm: LlmClient,
}

impl GeminiAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeAnalyzer for GeminiAnalyzer {
    async fn evaluate(&self, resume_text: &str, jd_text: &str) -> Result<AtsReport, AppError> {
        let prompt = fill(
            ATS_PROMPT_TEMPLATE,
            truncate(resume_text, ATS_RESUME_CAP),
            truncate(jd_text, ATS_JD_CAP),
        );

        let reply = self
            .llm
            .call_text(&prompt, ANALYSIS_TEMPERATURE)
            .await
            .map_err(|e| AppError::Llm(format!("ATS evaluation failed: {e}")))?;

        // Parsing never fails the request; an unusable reply degrades to the
        // zero-score report.
        Ok(parse_ats_report(&reply))
    }

    async fn suggest_improvements(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<ImprovementPlan, AppError> {
        let prompt = fill(
            IMPROVEMENT_PROMPT_TEMPLATE,
            truncate(resume_text, IMPROVEMENT_RESUME_CAP),
            truncate(jd_text, IMPROVEMENT_JD_CAP),
        );

        let mut last_parse_error = None;

        for attempt in 1..=IMPROVEMENT_ATTEMPTS {
            if attempt > 1 {
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            }

            let reply = self
                .llm
                .call_text(&prompt, IMPROVEMENT_TEMPERATURE)
                .await
                .map_err(|e| AppError::Llm(format!("Improvement analysis failed: {e}")))?;

            match parse_improvement_plan(&reply) {
                Ok(plan) => return Ok(plan),
                Err(e) => {
                    warn!(
                        "Improvement parse failed on attempt {attempt}/{IMPROVEMENT_ATTEMPTS}: {e}; \
                         reply sample: {}",
                        truncate(&reply, 500)
                    );
                    last_parse_error = Some(e);
                }
            }
        }

        Err(AppError::Llm(format!(
            "Improvement response unparseable after {IMPROVEMENT_ATTEMPTS} attempts: {}",
            last_parse_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        )))
    }
}
