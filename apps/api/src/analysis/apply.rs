//! Applies accepted improvement suggestions back into a structured resume
//! document: section-aware, case-insensitive substring replacement plus
//! de-duplicated skill additions.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::report::{Improvement, ImprovementPlan};
use crate::resumes::document::ResumeDocument;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A suggestion that was actually located and substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedImprovement {
    pub section: String,
    pub original_text: String,
    pub improved_text: String,
    pub reason: String,
    pub keywords_added: Vec<String>,
}

/// Result of applying a plan to a document.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub document: ResumeDocument,
    pub applied: Vec<AppliedImprovement>,
    pub skills_added: Vec<String>,
}

/// Applies the plan's replacements and skill additions to a copy of `doc`.
///
/// Each improvement targets one section by name; the `original_text` is
/// looked up case-insensitively in that section's free-text fields and every
/// occurrence is replaced. Suggestions whose text cannot be found are
/// skipped, never errors: the model sometimes paraphrases instead of
/// quoting.
pub fn apply_improvements(doc: &ResumeDocument, plan: &ImprovementPlan) -> ApplyOutcome {
    let mut updated = doc.clone();
    let mut applied = Vec::new();

    for improvement in &plan.specific_improvements {
        if improvement.original_text.is_empty() || improvement.improved_text.is_empty() {
            continue;
        }

        if apply_one(&mut updated, improvement) {
            debug!(
                section = %improvement.section,
                "applied improvement: {}...",
                snippet(&improvement.original_text)
            );
            applied.push(AppliedImprovement {
                section: improvement.section.clone(),
                original_text: improvement.original_text.clone(),
                improved_text: improvement.improved_text.clone(),
                reason: improvement.reason.clone(),
                keywords_added: improvement.keywords_added.clone(),
            });
        }
    }

    let skills_added = add_skills(&mut updated, plan);

    ApplyOutcome {
        document: updated,
        applied,
        skills_added,
    }
}

/// Narrows a plan to the caller-selected improvement indices. Out-of-range
/// indices are ignored. Skill additions ride along whenever anything is
/// selected; the client offers them as one block, not per-index.
pub fn select_improvements(plan: &ImprovementPlan, indices: &[usize]) -> ImprovementPlan {
    let specific_improvements: Vec<Improvement> = indices
        .iter()
        .filter_map(|&i| plan.specific_improvements.get(i).cloned())
        .collect();
    let skill_additions = if indices.is_empty() {
        vec![]
    } else {
        plan.skill_additions.clone()
    };
    ImprovementPlan {
        specific_improvements,
        skill_additions,
    }
}

fn apply_one(doc: &mut ResumeDocument, improvement: &Improvement) -> bool {
    let Some(pattern) = replacement_pattern(&improvement.original_text) else {
        return false;
    };
    let improved = improvement.improved_text.as_str();
    let mut changed = false;

    match improvement.section.to_lowercase().as_str() {
        "summary" => {
            changed |= replace_in(&pattern, improved, &mut doc.summary);
        }
        "experience" => {
            for exp in &mut doc.experience {
                changed |= replace_in(&pattern, improved, &mut exp.description);
                for resp in &mut exp.responsibilities {
                    changed |= replace_in(&pattern, improved, resp);
                }
            }
        }
        "education" => {
            for edu in &mut doc.education {
                changed |= replace_in(&pattern, improved, &mut edu.description);
            }
        }
        "projects" => {
            for proj in &mut doc.projects {
                changed |= replace_in(&pattern, improved, &mut proj.description);
            }
        }
        _ => {}
    }

    changed
}

/// Appends each suggested skill not already present (case-insensitive),
/// dropping blanks. Returns the skills that were actually added.
fn add_skills(doc: &mut ResumeDocument, plan: &ImprovementPlan) -> Vec<String> {
    // Normalize what is already there before comparing
    doc.skills = doc
        .skills
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let mut added = Vec::new();
    for addition in &plan.skill_additions {
        let skill = addition.skill().trim();
        if skill.is_empty() {
            continue;
        }
        let exists = doc
            .skills
            .iter()
            .any(|s| s.eq_ignore_ascii_case(skill));
        if !exists {
            doc.skills.push(skill.to_string());
            added.push(skill.to_string());
        }
    }
    added
}

/// Compiles a case-insensitive literal matcher for the suggestion's original
/// text. Returns `None` for blank input.
fn replacement_pattern(original_text: &str) -> Option<Regex> {
    let trimmed = original_text.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Escaped literal, so model-provided text can never inject regex syntax.
    // Whitespace runs are matched loosely; extracted PDF text and model
    // quotes frequently disagree on line breaks.
    let escaped = WHITESPACE_RE
        .split(trimmed)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    RegexBuilder::new(&escaped)
        .case_insensitive(true)
        .build()
        .ok()
}

fn replace_in(pattern: &Regex, improved: &str, field: &mut String) -> bool {
    if field.is_empty() || !pattern.is_match(field) {
        return false;
    }
    // NoExpand: the improved text is literal, `$` must never become a
    // capture-group reference.
    *field = pattern.replace_all(field, NoExpand(improved)).into_owned();
    true
}

fn snippet(text: &str) -> &str {
    crate::analysis::prompts::truncate(text, 50)
}
