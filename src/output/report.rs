//! Report structure shared by all output formats

use crate::analysis::analyzer::AnalysisOutcome;
use crate::analysis::sections::{ParsedSections, SectionLabel};
use crate::output::render::{score_value, RenderedSection, ScoreTier, SectionBody, SectionRenderer};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a formatter needs to present one analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,

    /// Completion failure message, when the model call did not succeed
    pub completion_error: Option<String>,

    /// Numeric match score, when the score section held one
    pub score: Option<ScoreSummary>,

    /// Label text -> trimmed content, as parsed from the reply
    pub sections: ParsedSections,

    /// Display blocks for every non-empty section, in display order
    pub rendered: Vec<RenderedSection>,

    /// Labels with no usable content
    pub missing_sections: Vec<SectionLabel>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_reply: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub resume_file: String,
    pub model: String,
    pub processing_time_ms: u64,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub value: i64,
    pub tier: ScoreTier,
}

impl AnalysisReport {
    pub fn from_outcome(
        outcome: AnalysisOutcome,
        renderer: &SectionRenderer,
        resume_file: &str,
        include_raw_reply: bool,
    ) -> Self {
        let rendered = renderer.render(&outcome.sections);
        let score = Self::score_summary(&rendered);
        let missing_sections = outcome.missing_sections();

        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                resume_file: resume_file.to_string(),
                model: outcome.model,
                processing_time_ms: outcome.processing_time_ms,
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            completion_error: outcome.completion_error,
            score,
            sections: outcome.sections,
            rendered,
            missing_sections,
            raw_reply: include_raw_reply.then_some(outcome.raw_reply),
        }
    }

    fn score_summary(rendered: &[RenderedSection]) -> Option<ScoreSummary> {
        rendered.iter().find_map(|section| match &section.body {
            SectionBody::Score { text, tier: Some(tier) } => Some(ScoreSummary {
                value: score_value(text)?,
                tier: *tier,
            }),
            _ => None,
        })
    }

    pub fn has_content(&self) -> bool {
        !self.rendered.is_empty()
    }
}
