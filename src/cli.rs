//! CLI interface for the resume analyzer

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-analyzer")]
#[command(about = "ATS-style resume analysis against a job description")]
#[command(long_about = "Send a resume and a job description to a hosted language model and render its nine-section ATS report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Resume plus job description, shared by `analyze` and `prompt`
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Path to resume file (PDF, TXT, MD)
    #[arg(short, long)]
    pub resume: PathBuf,

    /// Path to job description file (TXT, MD)
    #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
    pub job: Option<PathBuf>,

    /// Job description text given inline
    #[arg(long)]
    pub job_text: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include the model's raw reply in the output
        #[arg(long)]
        raw: bool,
    },

    /// Print the prompt that would be sent, without calling the API
    Prompt {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Parse and render a previously saved raw reply
    Render {
        /// File holding the raw reply text
        #[arg(long)]
        reply: PathBuf,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
