//! Output formatters: console, JSON, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{Result, ResumeAnalyzerError};
use crate::output::render::{Block, ScoreTier, SectionBody, Span};
use crate::output::report::AnalysisReport;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for notes and documentation
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter with the dark card layout
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates the different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

fn tier_color(tier: Option<ScoreTier>) -> Color {
    match tier {
        Some(ScoreTier::High) => Color::Green,
        Some(ScoreTier::Medium) => Color::Yellow,
        Some(ScoreTier::Low) => Color::Red,
        None => Color::White,
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            _ => ("▓", Color::Cyan),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_spans(&self, spans: &[Span]) -> String {
        spans
            .iter()
            .map(|span| match span {
                Span::Plain(text) => text.clone(),
                Span::Emphasis(text) if self.use_colors => text.bold().on_blue().to_string(),
                Span::Emphasis(text) => format!("*{}*", text),
            })
            .collect()
    }

    fn format_blocks(&self, blocks: &[Block], output: &mut String) {
        for block in blocks {
            match block {
                Block::Paragraph { spans } => {
                    for line in self.format_spans(spans).lines() {
                        output.push_str(&format!("  {}\n", line));
                    }
                }
                Block::List { items } => {
                    for item in items {
                        output.push_str(&format!("  • {}\n", self.format_spans(item)));
                    }
                }
            }
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📝 Resume Analysis Results", 1));
        output.push_str(&format!(
            "Generated: {} | Model: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.model,
            report.metadata.processing_time_ms
        ));

        if let Some(error) = &report.completion_error {
            output.push_str(&format!(
                "\n{} {}\n",
                self.colorize("❌ Analysis failed:", Color::Red),
                error
            ));
        }

        for section in &report.rendered {
            output.push_str(&self.format_header(&section.title, 2));
            match &section.body {
                SectionBody::Score { text, tier } => {
                    let line = format!("  {}", text);
                    if self.use_colors {
                        output.push_str(&format!("{}\n", line.color(tier_color(*tier)).bold()));
                    } else {
                        output.push_str(&format!("{}\n", line));
                    }
                }
                SectionBody::Blocks { blocks } => self.format_blocks(blocks, &mut output),
            }
        }

        if report.completion_error.is_none() && !report.missing_sections.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize(
                    &format!(
                        "ℹ️  {} of 9 sections were not returned by the model",
                        report.missing_sections.len()
                    ),
                    Color::BrightBlack
                )
            ));
        }

        if let Some(raw) = &report.raw_reply {
            output.push_str(&self.format_header("Raw Reply", 2));
            output.push_str(raw);
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    /// Bold emphasized words, unless the reply already bolded them
    fn format_spans(spans: &[Span]) -> String {
        spans
            .iter()
            .enumerate()
            .map(|(i, span)| match span {
                Span::Plain(text) => text.clone(),
                Span::Emphasis(text) => {
                    let opened = i > 0 && spans[i - 1].text().ends_with("**");
                    let closed = spans.get(i + 1).is_some_and(|next| next.text().starts_with("**"));
                    if opened && closed {
                        text.clone()
                    } else {
                        format!("**{}**", text)
                    }
                }
            })
            .collect()
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Analysis Results\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Model:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.model,
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!("**Resume:** `{}`\n\n", report.metadata.resume_file));
        }

        if let Some(error) = &report.completion_error {
            output.push_str(&format!("> **Analysis failed:** {}\n\n", error));
        }

        for section in &report.rendered {
            output.push_str(&format!("## {}\n\n", section.title));
            match &section.body {
                SectionBody::Score { text, tier } => match tier {
                    Some(tier) => output.push_str(&format!("**{}** ({})\n\n", text, tier.as_str())),
                    None => output.push_str(&format!("{}\n\n", text)),
                },
                SectionBody::Blocks { blocks } => {
                    for block in blocks {
                        match block {
                            Block::Paragraph { spans } => {
                                let text = Self::format_spans(spans).replace('\n', "  \n");
                                output.push_str(&format!("{}\n\n", text));
                            }
                            Block::List { items } => {
                                for item in items {
                                    output.push_str(&format!("- {}\n", Self::format_spans(item)));
                                }
                                output.push('\n');
                            }
                        }
                    }
                }
            }
        }

        if let Some(raw) = &report.raw_reply {
            output.push_str("## Raw Reply\n\n```text\n");
            output.push_str(raw);
            output.push_str("\n```\n");
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

/// Askama template for HTML output
#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ResumeAI - Smart ATS Analyzer</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background-color: #0F172A;
            color: #E2E8F0;
            max-width: 960px;
            margin: 0 auto;
            padding: 2rem;
        }
        .result-header {
            font-size: 1.8rem;
            font-weight: 600;
            color: #F8FAFC;
            padding-bottom: 0.5rem;
            border-bottom: 2px solid #334155;
        }
        .meta { color: #94A3B8; font-size: 0.9rem; }
        .card {
            background-color: #1E293B;
            border-radius: 0.5rem;
            padding: 1.5rem;
            margin-bottom: 1rem;
            border: 1px solid #334155;
        }
        .section-header {
            font-size: 1.3rem;
            font-weight: 600;
            color: #F8FAFC;
            padding: 0.5rem 0;
            border-bottom: 1px solid #334155;
            margin-bottom: 0.5rem;
        }
        .percentage-match { font-size: 3rem; font-weight: 700; }
        .para { white-space: pre-line; }
        .highlight {
            background-color: #1E40AF;
            padding: 0.2rem 0.5rem;
            border-radius: 0.3rem;
            font-weight: 500;
        }
        .error { border-color: #EF4444; }
        .success { color: #10B981; }
        .warning { color: #F59E0B; }
        .danger { color: #EF4444; }
    </style>
    {% endif %}
</head>
<body>
    <div class="result-header">Resume Analysis Results</div>
    <p class="meta">Generated: {{ generated_at }} | Model: {{ model }} | Processing time: {{ processing_time }}ms | Resume: {{ resume_file }}</p>
    {% if has_error %}
    <div class="card error">
        <div class="section-header danger">Analysis failed</div>
        <p>{{ error_message }}</p>
    </div>
    {% endif %}
    {% for section in sections %}
    <div class="card">
        <div class="section-header">{{ section.title }}</div>
        {% if section.is_score %}
        <div class="percentage-match {{ section.score_class }}">{{ section.score_text }}</div>
        {% else %}
        {% for block in section.blocks %}
        {% if block.is_list %}
        <ul>
            {% for item in block.items %}
            <li>{% for span in item %}{% if span.emphasis %}<span class="highlight">{{ span.text }}</span>{% else %}{{ span.text }}{% endif %}{% endfor %}</li>
            {% endfor %}
        </ul>
        {% else %}
        {% for item in block.items %}
        <p class="para">{% for span in item %}{% if span.emphasis %}<span class="highlight">{{ span.text }}</span>{% else %}{{ span.text }}{% endif %}{% endfor %}</p>
        {% endfor %}
        {% endif %}
        {% endfor %}
        {% endif %}
    </div>
    {% endfor %}
    <p class="meta">Generated by resume-analyzer v{{ version }}</p>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    model: String,
    processing_time: u64,
    resume_file: String,
    has_error: bool,
    error_message: String,
    sections: Vec<HtmlSection>,
    version: String,
}

struct HtmlSection {
    title: String,
    is_score: bool,
    score_text: String,
    score_class: String,
    blocks: Vec<HtmlBlock>,
}

/// A paragraph is a block with exactly one item
struct HtmlBlock {
    is_list: bool,
    items: Vec<Vec<HtmlSpan>>,
}

struct HtmlSpan {
    text: String,
    emphasis: bool,
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn html_spans(spans: &[Span]) -> Vec<HtmlSpan> {
        spans
            .iter()
            .map(|span| HtmlSpan {
                text: span.text().to_string(),
                emphasis: matches!(span, Span::Emphasis(_)),
            })
            .collect()
    }

    fn score_class(tier: Option<ScoreTier>) -> &'static str {
        match tier {
            Some(ScoreTier::High) => "success",
            Some(ScoreTier::Medium) => "warning",
            Some(ScoreTier::Low) => "danger",
            None => "",
        }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        let sections = report
            .rendered
            .iter()
            .map(|section| match &section.body {
                SectionBody::Score { text, tier } => HtmlSection {
                    title: section.title.clone(),
                    is_score: true,
                    score_text: text.clone(),
                    score_class: Self::score_class(*tier).to_string(),
                    blocks: Vec::new(),
                },
                SectionBody::Blocks { blocks } => HtmlSection {
                    title: section.title.clone(),
                    is_score: false,
                    score_text: String::new(),
                    score_class: String::new(),
                    blocks: blocks
                        .iter()
                        .map(|block| match block {
                            Block::Paragraph { spans } => HtmlBlock {
                                is_list: false,
                                items: vec![Self::html_spans(spans)],
                            },
                            Block::List { items } => HtmlBlock {
                                is_list: true,
                                items: items.iter().map(|item| Self::html_spans(item)).collect(),
                            },
                        })
                        .collect(),
                },
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: report
                .metadata
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            model: report.metadata.model.clone(),
            processing_time: report.metadata.processing_time_ms,
            resume_file: report.metadata.resume_file.clone(),
            has_error: report.completion_error.is_some(),
            error_message: report.completion_error.clone().unwrap_or_default(),
            sections,
            version: report.metadata.version.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeAnalyzerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true)
    }

    pub fn with_options(use_colors: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}
