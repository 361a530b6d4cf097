//! Model-backed analysis: prompt construction, the completion client and
//! reply parsing

pub mod analyzer;
pub mod client;
pub mod prompts;
pub mod sections;

pub use analyzer::{AnalysisOutcome, AnalysisRequest, ResumeAnalyzer};
pub use client::{CompletionClient, GeminiClient};
pub use sections::{ParsedSections, SectionLabel, SectionParser};
