//! Input manager for handling different file types

use crate::error::{Result, ResumeAnalyzerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::path::Path;

/// Routes input files to the matching extractor.
///
/// Holds no state: every call reads the file afresh.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from a resume file (PDF, TXT or MD)
    pub async fn extract_resume(&self, path: &Path) -> Result<String> {
        self.extract_text(path, &[FileType::Pdf, FileType::Text, FileType::Markdown])
            .await
    }

    /// Extract text from a job description file (TXT or MD)
    pub async fn extract_job_description(&self, path: &Path) -> Result<String> {
        self.extract_text(path, &[FileType::Text, FileType::Markdown])
            .await
    }

    async fn extract_text(&self, path: &Path, allowed: &[FileType]) -> Result<String> {
        if !path.exists() {
            return Err(ResumeAnalyzerError::MissingInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        if !allowed.contains(&file_type) {
            return Err(ResumeAnalyzerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        let text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ResumeAnalyzerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        Ok(text)
    }
}
