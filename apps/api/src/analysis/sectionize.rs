//! Heuristic conversion of raw resume text into a structured document, used
//! when improvements were analyzed against an uploaded file and the user then
//! asks to apply them. Header lines switch the current section; everything
//! else lands in that section.

use crate::resumes::document::{
    EducationItem, ExperienceItem, ProjectItem, ResumeDocument,
};

/// A line shorter than this containing a section keyword is treated as a
/// header rather than content mentioning the word.
const HEADER_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

/// Builds a structured document from plain resume text.
///
/// This is intentionally crude: it only needs to put text into the right
/// buckets so section-aware replacement can find it, not to recover a
/// faithful document.
pub fn sectionize(raw_text: &str) -> ResumeDocument {
    let mut doc = ResumeDocument::default();
    let mut current: Option<Section> = None;
    let mut summary_lines: Vec<String> = Vec::new();

    for line in raw_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(section) = detect_header(line) {
            current = Some(section);
            continue;
        }

        match current {
            Some(Section::Summary) => summary_lines.push(line.to_string()),
            Some(Section::Experience) => doc.experience.push(ExperienceItem {
                description: line.to_string(),
                ..Default::default()
            }),
            Some(Section::Education) => doc.education.push(EducationItem {
                description: line.to_string(),
                ..Default::default()
            }),
            Some(Section::Skills) => doc.skills.extend(
                line.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            ),
            Some(Section::Projects) => doc.projects.push(ProjectItem {
                description: line.to_string(),
                ..Default::default()
            }),
            None => {}
        }
    }

    doc.summary = summary_lines.join(" ");
    doc
}

fn detect_header(line: &str) -> Option<Section> {
    if line.len() >= HEADER_MAX_LEN {
        return None;
    }
    let lower = line.to_lowercase();
    if lower.contains("experience") {
        Some(Section::Experience)
    } else if lower.contains("education") {
        Some(Section::Education)
    } else if lower.contains("skills") {
        Some(Section::Skills)
    } else if lower.contains("project") {
        Some(Section::Projects)
    } else if lower.contains("summary") {
        Some(Section::Summary)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
John Smith

Summary
Software developer with experience building web services.

Experience
Software Developer at Tech Corp (2022 - Present)
Fixed bugs in the system

Education
Bachelor's Degree in Computer Science from ABC University

Skills
Python, JavaScript, HTML, CSS

Projects
Web App: Built a simple web application using React";

    #[test]
    fn test_sections_are_bucketed() {
        let doc = sectionize(SAMPLE);
        assert_eq!(
            doc.summary,
            "Software developer with experience building web services."
        );
        assert_eq!(doc.experience.len(), 2);
        assert_eq!(doc.experience[1].description, "Fixed bugs in the system");
        assert_eq!(doc.education.len(), 1);
        assert_eq!(doc.skills, vec!["Python", "JavaScript", "HTML", "CSS"]);
        assert_eq!(doc.projects.len(), 1);
    }

    #[test]
    fn test_text_before_any_header_is_dropped() {
        let doc = sectionize(SAMPLE);
        assert!(!doc.summary.contains("John Smith"));
    }

    #[test]
    fn test_long_line_mentioning_keyword_is_not_a_header() {
        let text = "Summary\nOver ten years of experience leading engineering teams across several product lines.\nStill summary.";
        let doc = sectionize(text);
        // The long "experience"-mentioning sentence stays in the summary
        assert!(doc.summary.contains("ten years of experience"));
        assert!(doc.summary.contains("Still summary."));
        assert!(doc.experience.is_empty());
    }

    #[test]
    fn test_multiline_summary_is_joined() {
        let text = "Summary\nFirst line.\nSecond line.";
        assert_eq!(sectionize(text).summary, "First line. Second line.");
    }

    #[test]
    fn test_empty_input_yields_empty_document() {
        let doc = sectionize("");
        assert!(doc.summary.is_empty());
        assert!(doc.experience.is_empty());
        assert!(doc.skills.is_empty());
    }
}
