//! Resume-vs-job analysis pipeline: prompt, completion, section parsing

use crate::analysis::client::CompletionClient;
use crate::analysis::prompts::{PromptParams, PromptTemplates};
use crate::analysis::sections::{ParsedSections, SectionLabel, SectionParser};
use crate::error::{Result, ResumeAnalyzerError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Inputs for one analysis. Owned by the caller and never retained.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_description: String,
}

impl AnalysisRequest {
    pub fn new(resume_text: impl Into<String>, job_description: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_description: job_description.into(),
        }
    }

    /// A blank job description stops the pipeline before anything is sent.
    /// Empty resume text is allowed through: a PDF without a text layer
    /// still gets an analysis, however thin.
    pub fn validate(&self) -> Result<()> {
        if self.job_description.trim().is_empty() {
            return Err(ResumeAnalyzerError::MissingInput(
                "Please enter the job description.".to_string(),
            ));
        }
        if self.resume_text.trim().is_empty() {
            warn!("Resume text is empty; the analysis will likely be low quality");
        }
        Ok(())
    }
}

/// Result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// Reply text as returned, or the error message when the call failed
    pub raw_reply: String,
    pub sections: ParsedSections,
    /// Set when the completion call failed
    pub completion_error: Option<String>,
    pub model: String,
    pub processing_time_ms: u64,
}

impl AnalysisOutcome {
    pub fn is_failure(&self) -> bool {
        self.completion_error.is_some()
    }

    /// Labels the model was asked for but did not produce (or left empty)
    pub fn missing_sections(&self) -> Vec<SectionLabel> {
        SectionLabel::ALL
            .into_iter()
            .filter(|label| {
                self.sections
                    .get(*label)
                    .map_or(true, |content| content.trim().is_empty())
            })
            .collect()
    }
}

/// Runs the analysis against an injected completion backend.
///
/// Holds only immutable collaborators, so one analyzer can serve any number
/// of concurrent requests without their text mixing.
pub struct ResumeAnalyzer<C> {
    client: C,
    prompt_templates: PromptTemplates,
    parser: SectionParser<SectionLabel>,
}

impl<C: CompletionClient> ResumeAnalyzer<C> {
    pub fn new(client: C) -> Result<Self> {
        Ok(Self {
            client,
            prompt_templates: PromptTemplates::default(),
            parser: SectionParser::canonical()?,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn build_prompt(&self, request: &AnalysisRequest) -> String {
        self.prompt_templates.render_ats_analysis(&PromptParams {
            resume_content: request.resume_text.clone(),
            job_content: request.job_description.clone(),
        })
    }

    /// Parse a reply obtained elsewhere (e.g. saved from an earlier run)
    pub fn parse_reply(&self, raw: &str) -> ParsedSections {
        self.parser.parse_reply(raw)
    }

    /// Validate, prompt, call the model and split its reply.
    ///
    /// A failed completion call is not an error here: its message becomes
    /// the reply text (which matches no label) and is recorded in
    /// `completion_error`.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        request.validate()?;
        let start_time = Instant::now();

        let prompt = self.build_prompt(request);
        info!(
            "Submitting analysis to {} ({} prompt chars)",
            self.client.model_name(),
            prompt.len()
        );

        let (raw_reply, completion_error) = match self.client.submit(&prompt).await {
            Ok(reply) => (reply, None),
            Err(e) => {
                warn!("Completion failed: {}", e);
                (format!("Error in generating response: {}", e), Some(e.to_string()))
            }
        };

        let sections = self.parser.parse_reply(&raw_reply);
        info!("Parsed {} of {} sections", sections.len(), SectionLabel::ALL.len());

        Ok(AnalysisOutcome {
            raw_reply,
            sections,
            completion_error,
            model: self.client.model_name().to_string(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
