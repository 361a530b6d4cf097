//! Error handling for the resume analyzer application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeAnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeAnalyzerError>;

/// Transport failures talking to the completion API
impl From<reqwest::Error> for ResumeAnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResumeAnalyzerError::Network(format!("request timed out: {}", err))
        } else {
            ResumeAnalyzerError::Network(err.to_string())
        }
    }
}
