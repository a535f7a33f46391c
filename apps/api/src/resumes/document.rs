//! The structured resume document, as opposed to its plain-text rendering.
//! Stored as JSONB in the `resumes.content` column; field names match the
//! client wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectItem>,
    pub activities: Vec<ActivityItem>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceItem {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationItem {
    pub school: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectItem {
    pub title: String,
    pub description: String,
    pub technologies: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityItem {
    pub title: String,
    pub organization: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

/// Presentation preferences carried through improvement and export flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    pub template: String,
    pub color: String,
    pub font: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            template: "modern".to_string(),
            color: "#0d6efd".to_string(),
            font: "Inter".to_string(),
        }
    }
}

impl ResumeDocument {
    /// Flattens the document into plain text for LLM analysis.
    /// Empty sections are omitted so the prompt stays focused.
    pub fn to_analysis_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.name.is_empty() {
            parts.push(format!("Name: {}", self.name));
        }
        if !self.email.is_empty() {
            parts.push(format!("Email: {}", self.email));
        }
        if !self.phone.is_empty() {
            parts.push(format!("Phone: {}", self.phone));
        }
        if !self.location.is_empty() {
            parts.push(format!("Location: {}", self.location));
        }
        if !self.summary.is_empty() {
            parts.push(format!("Summary: {}", self.summary));
        }

        if !self.experience.is_empty() {
            parts.push("EXPERIENCE:".to_string());
            for exp in &self.experience {
                let mut line = format!("• {} at {}", exp.position, exp.company);
                if !exp.start_date.is_empty() || !exp.end_date.is_empty() {
                    let end = if exp.current || exp.end_date.is_empty() {
                        "Present"
                    } else {
                        exp.end_date.as_str()
                    };
                    line.push_str(&format!(" ({} - {})", exp.start_date, end));
                }
                if !exp.description.is_empty() {
                    line.push_str(&format!(": {}", exp.description));
                }
                parts.push(line);
                for resp in &exp.responsibilities {
                    parts.push(format!("  - {resp}"));
                }
            }
        }

        if !self.education.is_empty() {
            parts.push("EDUCATION:".to_string());
            for edu in &self.education {
                let mut line = format!("• {} in {} from {}", edu.degree, edu.field, edu.school);
                if !edu.start_date.is_empty() || !edu.end_date.is_empty() {
                    line.push_str(&format!(" ({} - {})", edu.start_date, edu.end_date));
                }
                parts.push(line);
            }
        }

        let skills: Vec<&str> = self
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if !skills.is_empty() {
            parts.push(format!("SKILLS: {}", skills.join(", ")));
        }

        if !self.projects.is_empty() {
            parts.push("PROJECTS:".to_string());
            for proj in &self.projects {
                let mut line = format!("• {}: {}", proj.title, proj.description);
                if !proj.technologies.is_empty() {
                    line.push_str(&format!(" (Technologies: {})", proj.technologies));
                }
                parts.push(line);
            }
        }

        if !self.activities.is_empty() {
            parts.push("ACTIVITIES:".to_string());
            for act in &self.activities {
                let mut line = format!("• {} at {}", act.title, act.organization);
                if !act.description.is_empty() {
                    line.push_str(&format!(": {}", act.description));
                }
                parts.push(line);
            }
        }

        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> ResumeDocument {
        ResumeDocument {
            name: "John Smith".to_string(),
            email: "john@example.com".to_string(),
            summary: "Software developer with web experience.".to_string(),
            experience: vec![ExperienceItem {
                company: "Tech Corp".to_string(),
                position: "Software Developer".to_string(),
                start_date: "2022".to_string(),
                current: true,
                description: "Worked on backend APIs.".to_string(),
                responsibilities: vec!["Fixed bugs in the system".to_string()],
                ..Default::default()
            }],
            education: vec![EducationItem {
                school: "ABC University".to_string(),
                degree: "Bachelor's".to_string(),
                field: "Computer Science".to_string(),
                ..Default::default()
            }],
            skills: vec!["Python".to_string(), " ".to_string(), "Rust".to_string()],
            projects: vec![ProjectItem {
                title: "Web App".to_string(),
                description: "Built a simple web application".to_string(),
                technologies: "React".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_analysis_text_contains_all_sections() {
        let text = sample_document().to_analysis_text();
        assert!(text.contains("Name: John Smith"));
        assert!(text.contains("EXPERIENCE:"));
        assert!(text.contains("Software Developer at Tech Corp"));
        assert!(text.contains("- Fixed bugs in the system"));
        assert!(text.contains("EDUCATION:"));
        assert!(text.contains("SKILLS: Python, Rust"));
        assert!(text.contains("Technologies: React"));
    }

    #[test]
    fn test_analysis_text_marks_current_role_as_present() {
        let text = sample_document().to_analysis_text();
        assert!(text.contains("(2022 - Present)"));
    }

    #[test]
    fn test_analysis_text_empty_document_is_empty() {
        assert!(ResumeDocument::default().to_analysis_text().is_empty());
    }

    #[test]
    fn test_document_roundtrips_camel_case() {
        let json = r##"{
            "name": "Jane",
            "experience": [{"company": "Acme", "startDate": "2020", "endDate": "2021"}],
            "layout": {"template": "classic", "color": "#333333", "font": "Georgia"}
        }"##;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.experience[0].start_date, "2020");
        assert_eq!(doc.layout.template, "classic");

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["experience"][0]["startDate"], "2020");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{"name": "Jane", "rawText": "ignored"}"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name, "Jane");
    }
}
