// All LLM prompt constants for the analysis module.
// Templates use `{placeholder}` substitution; inputs are truncated first so a
// pasted novel of a resume cannot blow the prompt budget.

/// Truncation caps for the ATS evaluation prompt.
pub const ATS_RESUME_CAP: usize = 3000;
pub const ATS_JD_CAP: usize = 2000;

/// Truncation caps for the focused improvement prompt.
pub const IMPROVEMENT_RESUME_CAP: usize = 4000;
pub const IMPROVEMENT_JD_CAP: usize = 3000;

/// ATS evaluation prompt. Replace `{resume_text}` and `{jd_text}` before
/// sending. The example values anchor the model to the expected ranges.
pub const ATS_PROMPT_TEMPLATE: &str = r#"Analyze the resume for this role:
Job Description: {jd_text}
Resume: {resume_text}

Provide in this exact JSON format:
{
  "ats_score": 85,
  "matched_skills": ["JavaScript", "React", "Node.js"],
  "missing_skills": ["Python", "AWS"],
  "gap_analysis": ["Add cloud experience", "Include Python projects"],
  "keyword_density": 75,
  "skills_match": 80,
  "experience_match": 90
}

Return only the JSON, no other text."#;

/// Focused improvement prompt: asks for exact "replace this with that"
/// suggestions only. Replace `{resume_text}` and `{jd_text}` before sending.
pub const IMPROVEMENT_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer. Your single task is to analyze the provided RESUME against the JOB DESCRIPTION and suggest specific text replacements.

**RESUME:**
```
{resume_text}
```

**JOB DESCRIPTION:**
```
{jd_text}
```

**Instructions:**
1. Read the resume and job description carefully.
2. Identify phrases in the resume that can be improved to better match the job description.
3. For each improvement, provide the exact original text and the exact improved text.
4. The improved text should be more impactful, use keywords from the job description, and quantify results where possible.
5. Your response MUST be ONLY a JSON object with the keys "specific_improvements" and "skill_additions".
6. Do not include any other analysis, summaries, or explanations.

**JSON Output Format:**
```json
{
  "specific_improvements": [
    {
      "section": "experience",
      "original_text": "Responsible for data cleaning and preprocessing.",
      "improved_text": "Engineered data pipelines that cleaned and preprocessed over 500GB of raw data, improving data quality by 30% and enabling more accurate modeling.",
      "reason": "Quantifies the impact with specific metrics (500GB, 30%) and uses a stronger action verb ('Engineered').",
      "keywords_added": ["data pipelines", "data quality"]
    }
  ],
  "skill_additions": [
    {
      "skill": "TensorFlow",
      "reason": "The job description explicitly lists TensorFlow as a required skill.",
      "section_to_add": "Skills"
    }
  ]
}
```

The "section" field must be one of: "summary", "experience", "education", "projects".

Return ONLY the JSON object."#;

/// Truncates `text` to at most `cap` bytes on a char boundary.
pub fn truncate(text: &str, cap: usize) -> &str {
    if text.len() <= cap {
        return text;
    }
    let mut end = cap;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Fills a prompt template with the (truncated) resume and JD texts.
pub fn fill(template: &str, resume_text: &str, jd_text: &str) -> String {
    template
        .replace("{resume_text}", resume_text)
        .replace("{jd_text}", jd_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_input_untouched() {
        assert_eq!(truncate("hello", 100), "hello");
    }

    #[test]
    fn test_truncate_respects_cap() {
        let long = "a".repeat(5000);
        assert_eq!(truncate(&long, 3000).len(), 3000);
    }

    #[test]
    fn test_truncate_lands_on_char_boundary() {
        // 'é' is two bytes; a cap in the middle must back off
        let text = "é".repeat(10);
        let out = truncate(&text, 5);
        assert_eq!(out.len(), 4);
        assert!(out.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_fill_substitutes_both_placeholders() {
        let prompt = fill(ATS_PROMPT_TEMPLATE, "RESUME BODY", "JD BODY");
        assert!(prompt.contains("Resume: RESUME BODY"));
        assert!(prompt.contains("Job Description: JD BODY"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{jd_text}"));
    }

    #[test]
    fn test_improvement_template_names_allowed_sections() {
        for section in ["summary", "experience", "education", "projects"] {
            assert!(IMPROVEMENT_PROMPT_TEMPLATE.contains(section));
        }
    }
}
