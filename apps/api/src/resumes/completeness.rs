//! Section-completion metadata derived from a resume document at save time.

use serde::{Deserialize, Serialize};

use crate::resumes::document::ResumeDocument;

/// Number of sections a "complete" resume carries:
/// personal info, education, experience, skills, projects.
pub const TOTAL_SECTIONS: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeMetadata {
    pub template: String,
    pub color: String,
    pub font: String,
    pub sections_completed: u32,
    pub total_sections: u32,
    pub completion_percentage: f64,
    #[serde(default)]
    pub is_improved: bool,
}

/// Builds save-time metadata for a document.
pub fn compute_metadata(doc: &ResumeDocument, is_improved: bool) -> ResumeMetadata {
    let sections_completed = count_completed_sections(doc);
    ResumeMetadata {
        template: doc.layout.template.clone(),
        color: doc.layout.color.clone(),
        font: doc.layout.font.clone(),
        sections_completed,
        total_sections: TOTAL_SECTIONS,
        completion_percentage: completion_percentage(sections_completed),
        is_improved,
    }
}

/// Counts how many of the five tracked sections hold meaningful content.
/// A section counts only when its identifying fields are filled in, not
/// merely when the array is non-empty.
pub fn count_completed_sections(doc: &ResumeDocument) -> u32 {
    let mut count = 0;

    if !doc.name.is_empty() && !doc.email.is_empty() {
        count += 1;
    }
    if doc
        .education
        .iter()
        .any(|e| !e.school.is_empty() && !e.degree.is_empty())
    {
        count += 1;
    }
    if doc
        .experience
        .iter()
        .any(|e| !e.company.is_empty() && !e.position.is_empty())
    {
        count += 1;
    }
    if doc.skills.iter().any(|s| !s.trim().is_empty()) {
        count += 1;
    }
    if doc.projects.iter().any(|p| !p.title.is_empty()) {
        count += 1;
    }

    count
}

pub fn completion_percentage(sections_completed: u32) -> f64 {
    (sections_completed as f64 / TOTAL_SECTIONS as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resumes::document::{EducationItem, ExperienceItem, ProjectItem};

    #[test]
    fn test_empty_document_scores_zero() {
        let doc = ResumeDocument::default();
        assert_eq!(count_completed_sections(&doc), 0);
        assert_eq!(compute_metadata(&doc, false).completion_percentage, 0.0);
    }

    #[test]
    fn test_personal_info_needs_name_and_email() {
        let doc = ResumeDocument {
            name: "Jane".to_string(),
            ..Default::default()
        };
        assert_eq!(count_completed_sections(&doc), 0);

        let doc = ResumeDocument {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(count_completed_sections(&doc), 1);
    }

    #[test]
    fn test_blank_skills_do_not_count() {
        let doc = ResumeDocument {
            skills: vec!["  ".to_string(), String::new()],
            ..Default::default()
        };
        assert_eq!(count_completed_sections(&doc), 0);
    }

    #[test]
    fn test_full_document_scores_all_sections() {
        let doc = ResumeDocument {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            education: vec![EducationItem {
                school: "ABC University".to_string(),
                degree: "BSc".to_string(),
                ..Default::default()
            }],
            experience: vec![ExperienceItem {
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                ..Default::default()
            }],
            skills: vec!["Rust".to_string()],
            projects: vec![ProjectItem {
                title: "CLI tool".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(count_completed_sections(&doc), TOTAL_SECTIONS);

        let meta = compute_metadata(&doc, true);
        assert_eq!(meta.completion_percentage, 100.0);
        assert!(meta.is_improved);
        assert_eq!(meta.template, "modern");
    }

    #[test]
    fn test_partial_completion_percentage() {
        assert_eq!(completion_percentage(2), 40.0);
    }
}
