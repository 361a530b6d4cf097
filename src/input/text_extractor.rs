//! Text extraction from various file formats

use crate::error::{Result, ResumeAnalyzerError};
use log::{info, warn};
use pulldown_cmark::{Event, Parser, Tag};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let pages = extract_pdf_pages(&bytes).map_err(|e| {
            ResumeAnalyzerError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })?;

        info!("{}", page_progress(pages.len()));
        Ok(join_pages(&pages))
    }
}

/// Extract each page's text from an in-memory PDF.
///
/// `pdf_extract` panics on some malformed documents, so the call is
/// isolated behind an unwind boundary and turned into an error.
pub fn extract_pdf_pages(bytes: &[u8]) -> Result<Vec<String>> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ResumeAnalyzerError::PdfExtraction(e.to_string())),
        Err(_) => Err(ResumeAnalyzerError::PdfExtraction(
            "extractor panicked on a malformed document".to_string(),
        )),
    }
}

/// Progress line reported once the page count is known
pub fn page_progress(pages: usize) -> String {
    match pages {
        1 => "Extracting text from 1 page...".to_string(),
        n => format!("Extracting text from {} pages...", n),
    }
}

/// Concatenate page texts, each page starting on a new line.
///
/// A document with no pages, or only blank pages, yields text that trims to
/// empty. That is logged rather than treated as a failure.
pub fn join_pages(pages: &[String]) -> String {
    let text: String = pages.iter().map(|page| format!("\n{}", page)).collect();

    if text.trim().is_empty() {
        warn!(
            "No extractable text found in {} page(s); continuing with empty resume text",
            pages.len()
        );
    }

    text
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Strip Markdown syntax, keeping one line per block element
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
