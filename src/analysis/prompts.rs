//! Single prompt for the nine-section ATS analysis

use crate::analysis::sections::SectionLabel;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Prompt template with `{resume}`, `{job}` and `{sections}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub ats_analysis: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            ats_analysis: ATS_ANALYSIS_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
}

impl PromptTemplates {
    /// Render the analysis prompt. Input text is embedded verbatim, whatever its length.
    pub fn render_ats_analysis(&self, params: &PromptParams) -> String {
        debug!(
            "Building prompt: resume {} chars, job description {} chars",
            params.resume_content.len(),
            params.job_content.len()
        );

        // Sections are substituted first so that resume or job text that
        // happens to contain a placeholder is left untouched.
        let prompt = self
            .ats_analysis
            .replace("{sections}", &section_instructions())
            .replacen("{resume}", &params.resume_content, 1);

        match prompt.rfind("{job}") {
            Some(at) => {
                let mut rendered = String::with_capacity(prompt.len() + params.job_content.len());
                rendered.push_str(&prompt[..at]);
                rendered.push_str(&params.job_content);
                rendered.push_str(&prompt[at + "{job}".len()..]);
                rendered
            }
            None => prompt,
        }
    }
}

/// One line per label: `LABEL: description`, separated by blank lines
fn section_instructions() -> String {
    let mut out = String::new();
    for label in SectionLabel::ALL {
        let _ = writeln!(out, "{} {}\n", label.as_str(), label.description());
    }
    out.trim_end().to_string()
}

const ATS_ANALYSIS_TEMPLATE: &str = r#"Act as a senior ATS (Applicant Tracking System) specialist with extensive experience in tech fields including software engineering, data science, data analysis, and big data engineering.

Evaluate the resume against the given job description, considering the competitive job market.
Provide detailed analysis to help improve the resume's effectiveness.

<RESUME>
{resume}
</RESUME>

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>

Provide analysis in the following structure, with ONLY these exact 9 sections:

{sections}

IMPORTANT: Format each section title in bold with a colon. Keep sections clearly separated.
IMPORTANT: Don't leave any section empty. Provide comprehensive information for each section."#;

#[cfg(test)]
mod tests {
    use super::*;

    fn params(resume: &str, job: &str) -> PromptParams {
        PromptParams {
            resume_content: resume.to_string(),
            job_content: job.to_string(),
        }
    }

    #[test]
    fn test_ats_analysis_rendering() {
        let templates = PromptTemplates::default();
        let prompt = templates.render_ats_analysis(&params(
            "Software Engineer with Python experience at Tech Corp.",
            "Senior Software Engineer role requiring React and Python.",
        ));

        assert!(prompt.contains("Software Engineer with Python experience at Tech Corp"));
        assert!(prompt.contains("Senior Software Engineer role requiring React and Python"));
        assert!(prompt.contains("<RESUME>"));
        assert!(prompt.contains("</JOB DESCRIPTION>"));
        assert!(prompt.contains("Format each section title in bold with a colon"));
        assert!(prompt.contains("Don't leave any section empty"));
    }

    #[test]
    fn test_every_label_is_enumerated_once() {
        let prompt = PromptTemplates::default().render_ats_analysis(&params("r", "j"));
        for label in SectionLabel::ALL {
            assert_eq!(prompt.matches(label.as_str()).count(), 1, "{}", label);
            assert!(prompt.contains(label.description()));
        }
        assert!(!prompt.contains("{sections}"));
    }

    #[test]
    fn test_long_input_is_not_truncated() {
        let resume = "experience ".repeat(50_000);
        let job = "requirement ".repeat(20_000);
        let prompt = PromptTemplates::default().render_ats_analysis(&params(&resume, &job));

        assert!(prompt.contains(&resume));
        assert!(prompt.contains(&job));
    }

    #[test]
    fn test_placeholder_text_in_input_is_left_alone() {
        let prompt = PromptTemplates::default()
            .render_ats_analysis(&params("I wrote {job} templates", "Needs {resume} review"));

        assert!(prompt.contains("I wrote {job} templates"));
        assert!(prompt.contains("Needs {resume} review"));
    }

    #[test]
    fn test_rendering_is_pure() {
        let templates = PromptTemplates::default();
        let p = params("same resume", "same job");
        assert_eq!(templates.render_ats_analysis(&p), templates.render_ats_analysis(&p));
    }
}
