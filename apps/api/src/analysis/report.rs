//! Typed output schemas for the two LLM analyses, plus the tolerant parsing
//! that turns free-text model replies into them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::llm_client::extract_json_object;

/// ATS-style compatibility report between a resume and a job description.
/// Wire format is camelCase to match the client contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AtsReport {
    pub ats_score: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub gap_analysis: Vec<String>,
    pub keyword_density: u32,
    pub skills_match: u32,
    pub experience_match: u32,
}

impl AtsReport {
    /// The report returned when the model reply cannot be parsed at all.
    pub fn unparsed() -> Self {
        AtsReport {
            ats_score: 0,
            matched_skills: vec![],
            missing_skills: vec![],
            gap_analysis: vec!["Could not parse AI response.".to_string()],
            keyword_density: 0,
            skills_match: 0,
            experience_match: 0,
        }
    }
}

/// A suggested `(original_text, improved_text)` replacement plus rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub improved_text: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub keywords_added: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A skill the model suggests adding. Models sometimes emit bare strings
/// instead of the documented object shape; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillAddition {
    Detailed {
        skill: String,
        #[serde(default)]
        reason: String,
        #[serde(default)]
        section_to_add: String,
    },
    Bare(String),
}

impl SkillAddition {
    pub fn skill(&self) -> &str {
        match self {
            SkillAddition::Detailed { skill, .. } => skill,
            SkillAddition::Bare(skill) => skill,
        }
    }
}

/// The full improvement plan returned by the focused improvement prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImprovementPlan {
    #[serde(default)]
    pub specific_improvements: Vec<Improvement>,
    #[serde(default)]
    pub skill_additions: Vec<SkillAddition>,
}

/// Parses a model reply into an `AtsReport`, field by field, defaulting every
/// missing or mistyped field to zero/empty. Never fails: an unparseable reply
/// yields `AtsReport::unparsed()` so the endpoint still returns a well-formed
/// body.
pub fn parse_ats_report(text: &str) -> AtsReport {
    let value: Value = match extract_json_object(text).and_then(|s| Ok(serde_json::from_str(s)?)) {
        Ok(v) => v,
        Err(e) => {
            warn!("ATS response did not contain parseable JSON: {e}");
            return AtsReport::unparsed();
        }
    };

    AtsReport {
        ats_score: score_field(&value, "ats_score"),
        matched_skills: string_list(&value, "matched_skills"),
        missing_skills: string_list(&value, "missing_skills"),
        gap_analysis: {
            let list = string_list(&value, "gap_analysis");
            if list.is_empty() {
                vec!["Unable to analyze".to_string()]
            } else {
                list
            }
        },
        keyword_density: score_field(&value, "keyword_density"),
        skills_match: score_field(&value, "skills_match"),
        experience_match: score_field(&value, "experience_match"),
    }
}

/// Parses a model reply into an `ImprovementPlan`. Unlike the ATS report this
/// is strict after JSON extraction; the caller retries the LLM call instead
/// of settling for an empty plan.
pub fn parse_improvement_plan(text: &str) -> Result<ImprovementPlan, crate::llm_client::LlmError> {
    let json_str = extract_json_object(text)?;
    Ok(serde_json::from_str(json_str)?)
}

/// Reads a numeric score, accepting integers or floats, clamped to 0–100.
fn score_field(value: &Value, key: &str) -> u32 {
    value
        .get(key)
        .and_then(Value::as_f64)
        .map(|f| f.round().clamp(0.0, 100.0) as u32)
        .unwrap_or(0)
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ats_report_full() {
        let text = r#"{
            "ats_score": 85,
            "matched_skills": ["JavaScript", "React"],
            "missing_skills": ["Python"],
            "gap_analysis": ["Add cloud experience"],
            "keyword_density": 75,
            "skills_match": 80,
            "experience_match": 90
        }"#;
        let report = parse_ats_report(text);
        assert_eq!(report.ats_score, 85);
        assert_eq!(report.matched_skills, vec!["JavaScript", "React"]);
        assert_eq!(report.experience_match, 90);
    }

    #[test]
    fn test_parse_ats_report_with_surrounding_prose() {
        let text = "Sure! Here you go:\n```json\n{\"ats_score\": 42}\n```";
        let report = parse_ats_report(text);
        assert_eq!(report.ats_score, 42);
        assert!(report.matched_skills.is_empty());
        assert_eq!(report.gap_analysis, vec!["Unable to analyze"]);
    }

    #[test]
    fn test_parse_ats_report_unparseable_falls_back() {
        let report = parse_ats_report("no json here at all");
        assert_eq!(report, AtsReport::unparsed());
        assert_eq!(report.gap_analysis, vec!["Could not parse AI response."]);
    }

    #[test]
    fn test_parse_ats_report_mistyped_fields_default() {
        let text = r#"{"ats_score": "eighty", "matched_skills": "Rust"}"#;
        let report = parse_ats_report(text);
        assert_eq!(report.ats_score, 0);
        assert!(report.matched_skills.is_empty());
    }

    #[test]
    fn test_parse_ats_report_float_score_rounds() {
        let report = parse_ats_report(r#"{"ats_score": 77.6}"#);
        assert_eq!(report.ats_score, 78);
    }

    #[test]
    fn test_parse_ats_report_out_of_range_clamped() {
        let report = parse_ats_report(r#"{"ats_score": 150, "keyword_density": -3}"#);
        assert_eq!(report.ats_score, 100);
        assert_eq!(report.keyword_density, 0);
    }

    #[test]
    fn test_parse_improvement_plan() {
        let text = r#"```json
        {
          "specific_improvements": [
            {
              "section": "experience",
              "original_text": "Fixed bugs",
              "improved_text": "Resolved 40+ production defects",
              "reason": "Quantified",
              "keywords_added": ["production"]
            }
          ],
          "skill_additions": [
            {"skill": "Docker", "reason": "Listed in the JD", "section_to_add": "Skills"},
            "Kubernetes"
          ]
        }
        ```"#;
        let plan = parse_improvement_plan(text).unwrap();
        assert_eq!(plan.specific_improvements.len(), 1);
        assert_eq!(plan.specific_improvements[0].section, "experience");
        assert_eq!(plan.skill_additions.len(), 2);
        assert_eq!(plan.skill_additions[0].skill(), "Docker");
        assert_eq!(plan.skill_additions[1].skill(), "Kubernetes");
    }

    #[test]
    fn test_parse_improvement_plan_missing_keys_default_empty() {
        let plan = parse_improvement_plan("{}").unwrap();
        assert!(plan.specific_improvements.is_empty());
        assert!(plan.skill_additions.is_empty());
    }

    #[test]
    fn test_parse_improvement_plan_no_json_errors() {
        assert!(parse_improvement_plan("nothing structured").is_err());
    }
}
