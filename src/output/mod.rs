//! Presentation: section rendering, reports and output formats

pub mod formatter;
pub mod render;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use render::{parse_score, ScoreTier, SectionRenderer};
pub use report::AnalysisReport;
