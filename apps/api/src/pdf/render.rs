//! Renders a structured resume document to PDF with the built-in Helvetica
//! faces, so no font assets ship with the service. Layout is a simple
//! top-down cursor with page breaks; widths are estimated from average glyph
//! width, which is plenty for resume prose.

use anyhow::{Context, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::resumes::document::ResumeDocument;

const PAGE_WIDTH_MM: f32 = 210.0; // A4
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 12.7; // 0.5"

const NAME_SIZE: f32 = 24.0;
const HEADING_SIZE: f32 = 14.0;
const SUBHEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

/// Renders the document and returns the PDF bytes.
pub fn render_resume_pdf(resume: &ResumeDocument) -> Result<Vec<u8>> {
    let title = if resume.name.is_empty() {
        "Resume".to_string()
    } else {
        resume.name.clone()
    };

    let (doc, page, layer) = PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("failed to register Helvetica")?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .context("failed to register Helvetica-Bold")?;

    let mut cursor = Cursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    // Name, centered
    cursor.centered_line(&title, NAME_SIZE, &bold);
    cursor.space(2.0);

    // Contact line
    let contact: Vec<&str> = [&resume.email, &resume.phone, &resume.location]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if !contact.is_empty() {
        cursor.centered_line(&contact.join(" | "), BODY_SIZE, &regular);
    }
    cursor.space(4.0);

    if !resume.summary.is_empty() {
        cursor.heading("PROFESSIONAL SUMMARY", &bold);
        cursor.paragraph(&resume.summary, &regular);
        cursor.space(2.0);
    }

    let has_experience = resume.experience.iter().any(|e| !e.company.is_empty());
    if has_experience {
        cursor.heading("WORK EXPERIENCE", &bold);
        for exp in &resume.experience {
            if exp.company.is_empty() || exp.position.is_empty() {
                continue;
            }
            cursor.line(&exp.position, SUBHEADING_SIZE, &bold);

            let mut company = exp.company.clone();
            if !exp.start_date.is_empty() || !exp.end_date.is_empty() {
                let end = if exp.current { "Present" } else { exp.end_date.as_str() };
                company.push_str(&format!(" | {} - {}", exp.start_date, end));
            }
            cursor.paragraph(&company, &regular);

            for bullet in split_bullets(&exp.description) {
                cursor.paragraph(&format!("• {bullet}"), &regular);
            }
            for resp in &exp.responsibilities {
                cursor.paragraph(&format!("• {resp}"), &regular);
            }
            cursor.space(2.0);
        }
    }

    let has_education = resume.education.iter().any(|e| !e.school.is_empty());
    if has_education {
        cursor.heading("EDUCATION", &bold);
        for edu in &resume.education {
            if edu.school.is_empty() {
                continue;
            }
            let mut degree = edu.degree.clone();
            if !edu.field.is_empty() {
                if degree.is_empty() {
                    degree = edu.field.clone();
                } else {
                    degree.push_str(&format!(" in {}", edu.field));
                }
            }
            if !degree.is_empty() {
                cursor.line(&degree, SUBHEADING_SIZE, &bold);
            }

            let mut school = edu.school.clone();
            if !edu.start_date.is_empty() || !edu.end_date.is_empty() {
                school.push_str(&format!(" | {} - {}", edu.start_date, edu.end_date));
            }
            cursor.paragraph(&school, &regular);
            if !edu.description.is_empty() {
                cursor.paragraph(&edu.description, &regular);
            }
            cursor.space(2.0);
        }
    }

    let skills: Vec<&str> = resume
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !skills.is_empty() {
        cursor.heading("SKILLS", &bold);
        cursor.paragraph(&skills.join(" • "), &regular);
        cursor.space(2.0);
    }

    let has_projects = resume.projects.iter().any(|p| !p.title.is_empty());
    if has_projects {
        cursor.heading("PROJECTS", &bold);
        for proj in &resume.projects {
            if proj.title.is_empty() {
                continue;
            }
            let mut project_title = proj.title.clone();
            if !proj.link.is_empty() {
                project_title.push_str(&format!(" | {}", proj.link));
            }
            cursor.line(&project_title, SUBHEADING_SIZE, &bold);
            if !proj.technologies.is_empty() {
                cursor.paragraph(&format!("Technologies: {}", proj.technologies), &regular);
            }
            if !proj.description.is_empty() {
                cursor.paragraph(&proj.description, &regular);
            }
            cursor.space(2.0);
        }
    }

    let has_activities = resume.activities.iter().any(|a| !a.title.is_empty());
    if has_activities {
        cursor.heading("ACTIVITIES & ACHIEVEMENTS", &bold);
        for act in &resume.activities {
            if act.title.is_empty() {
                continue;
            }
            let mut activity_title = act.title.clone();
            if !act.organization.is_empty() {
                activity_title.push_str(&format!(" - {}", act.organization));
            }
            cursor.line(&activity_title, SUBHEADING_SIZE, &bold);
            if !act.start_date.is_empty() || !act.end_date.is_empty() {
                cursor.paragraph(&format!("{} - {}", act.start_date, act.end_date), &regular);
            }
            if !act.description.is_empty() {
                cursor.paragraph(&act.description, &regular);
            }
            cursor.space(2.0);
        }
    }

    doc.save_to_bytes().context("failed to serialize PDF")
}

/// Suggested download filename for a rendered resume.
pub fn attachment_filename(resume: &ResumeDocument) -> String {
    let base = if resume.name.is_empty() {
        "Resume".to_string()
    } else {
        resume.name.replace(' ', "_")
    };
    format!("{base}_Resume.pdf")
}

/// Splits a description on bullet markers; text without markers is a single
/// paragraph.
fn split_bullets(description: &str) -> Vec<String> {
    if description.is_empty() {
        return vec![];
    }
    if description.contains('•') || description.contains('*') {
        description
            .replace('*', "•")
            .split('•')
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect()
    } else {
        vec![description.to_string()]
    }
}

struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor<'_> {
    fn heading(&mut self, text: &str, font: &IndirectFontRef) {
        self.space(2.0);
        self.line(text, HEADING_SIZE, font);
        self.space(1.0);
    }

    /// Writes one wrapped block of body text.
    fn paragraph(&mut self, text: &str, font: &IndirectFontRef) {
        for line in wrap_text(text, max_chars(BODY_SIZE)) {
            self.line(&line, BODY_SIZE, font);
        }
    }

    /// Writes a single unwrapped line at the left margin.
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        self.advance(size);
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
    }

    fn centered_line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        self.advance(size);
        let text_width = text.chars().count() as f32 * size * AVG_GLYPH_EM * PT_TO_MM;
        let x = ((PAGE_WIDTH_MM - text_width) / 2.0).max(MARGIN_MM);
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn space(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Moves the cursor down one line, breaking to a new page when the bottom
    /// margin is reached.
    fn advance(&mut self, size: f32) {
        let line_height = size * PT_TO_MM * 1.4;
        if self.y - line_height < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.y -= line_height;
    }
}

fn max_chars(size: f32) -> usize {
    let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    (usable / (size * AVG_GLYPH_EM * PT_TO_MM)) as usize
}

/// Greedy word wrap by estimated character budget.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resumes::document::{ExperienceItem, ProjectItem};

    fn sample_resume() -> ResumeDocument {
        ResumeDocument {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "+1-234-567-8900".to_string(),
            summary: "Experienced software developer with expertise in Python and JavaScript."
                .to_string(),
            experience: vec![ExperienceItem {
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                start_date: "2020".to_string(),
                current: true,
                description: "• Built services • Led migrations".to_string(),
                ..Default::default()
            }],
            skills: vec!["Python".to_string(), "Rust".to_string()],
            projects: vec![ProjectItem {
                title: "CLI tool".to_string(),
                description: "A resume parser".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_resume_pdf(&sample_resume()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_empty_document_still_produces_pdf() {
        let bytes = render_resume_pdf(&ResumeDocument::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_attachment_filename_replaces_spaces() {
        assert_eq!(attachment_filename(&sample_resume()), "John_Doe_Resume.pdf");
        assert_eq!(
            attachment_filename(&ResumeDocument::default()),
            "Resume_Resume.pdf"
        );
    }

    #[test]
    fn test_split_bullets_on_markers() {
        assert_eq!(
            split_bullets("• one • two"),
            vec!["one".to_string(), "two".to_string()]
        );
        assert_eq!(split_bullets("* starred"), vec!["starred".to_string()]);
        assert_eq!(split_bullets("plain text"), vec!["plain text".to_string()]);
        assert!(split_bullets("").is_empty());
    }

    #[test]
    fn test_wrap_text_respects_budget() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn test_wrap_text_long_word_gets_own_line() {
        let lines = wrap_text("a reallyreallylongword b", 10);
        assert_eq!(lines, vec!["a", "reallyreallylongword", "b"]);
    }
}
