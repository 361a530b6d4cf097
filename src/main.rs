//! Resume analyzer: ATS-style resume analysis with a hosted language model

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_analyzer::analysis::prompts::{PromptParams, PromptTemplates};
use resume_analyzer::analysis::{AnalysisOutcome, AnalysisRequest, GeminiClient, ResumeAnalyzer, SectionParser};
use resume_analyzer::cli::{self, Cli, Commands, ConfigAction, InputArgs};
use resume_analyzer::config::{Config, OutputFormat};
use resume_analyzer::input::InputManager;
use resume_analyzer::output::formatter::{save_report_to_file, suggest_filename};
use resume_analyzer::output::{AnalysisReport, ReportGenerator, SectionRenderer};
use resume_analyzer::{Result, ResumeAnalyzerError};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::load_or_default(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            input,
            model,
            output,
            save,
            raw,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let interactive = format == OutputFormat::Console && save.is_none();

            if interactive {
                println!("🚀 Resume analysis");
                println!("📄 Resume: {}", input.resume.display());
            }

            let (resume_text, job_text) = read_inputs(&input).await?;

            let mut api_config = config.clone();
            if let Some(model) = model {
                api_config.api.model = model;
            }
            info!("Using model {}", api_config.api.model);

            let client = GeminiClient::from_config(&api_config)?;
            let analyzer = ResumeAnalyzer::new(client)?;

            let progress = spinner("Analyzing your resume against the job description... This may take a minute.");
            let outcome = analyzer
                .analyze(&AnalysisRequest::new(resume_text, job_text))
                .await;
            progress.finish_and_clear();
            let outcome = outcome?;

            let report = AnalysisReport::from_outcome(
                outcome,
                &SectionRenderer::new()?,
                &input.resume.to_string_lossy(),
                raw || config.output.show_raw_reply,
            );
            emit_report(&report, format, save.as_deref(), config.output.color_output)?;
        }

        Commands::Prompt { input } => {
            let (resume_text, job_text) = read_inputs(&input).await?;
            let prompt = PromptTemplates::default().render_ats_analysis(&PromptParams {
                resume_content: resume_text,
                job_content: job_text,
            });
            println!("{}", prompt);
        }

        Commands::Render {
            reply,
            output,
            save,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let raw_reply = tokio::fs::read_to_string(&reply).await?;

            let parser = SectionParser::canonical()?;
            let outcome = AnalysisOutcome {
                sections: parser.parse_reply(&raw_reply),
                raw_reply,
                completion_error: None,
                model: "saved reply".to_string(),
                processing_time_ms: 0,
            };

            let report = AnalysisReport::from_outcome(
                outcome,
                &SectionRenderer::new()?,
                &reply.to_string_lossy(),
                config.output.show_raw_reply,
            );
            emit_report(&report, format, save.as_deref(), config.output.color_output)?;
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let key_status = match config.api_key() {
                        Ok(_) => "✅ configured",
                        Err(_) => "❌ not set",
                    };
                    println!("⚙️  Current Configuration\n");
                    println!("File: {}", path.display());
                    println!("Model: {}", config.api.model);
                    println!("Endpoint: {}", config.api.endpoint);
                    println!("API key ({}): {}", config.api.api_key_env, key_status);
                    match config.timeout() {
                        Some(timeout) => println!("Timeout: {}s", timeout.as_secs()),
                        None => println!("Timeout: none"),
                    }
                    println!("\nOutput:");
                    println!("  Format: {:?}", config.output.format);
                    println!("  Colors: {}", config.output.color_output);
                    println!("  Show raw reply: {}", config.output.show_raw_reply);
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset: {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(ResumeAnalyzerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

/// Read the resume and job description, rejecting missing or blank input
/// before any extraction work is done.
async fn read_inputs(input: &InputArgs) -> Result<(String, String)> {
    if !input.resume.exists() {
        return Err(ResumeAnalyzerError::MissingInput(format!(
            "Please upload your resume first: {} does not exist",
            input.resume.display()
        )));
    }
    cli::validate_file_extension(&input.resume, &["pdf", "txt", "md"])
        .map_err(|e| ResumeAnalyzerError::InvalidInput(format!("Resume file: {}", e)))?;

    let input_manager = InputManager::new();

    let job_text = match (&input.job_text, &input.job) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => {
            cli::validate_file_extension(path, &["txt", "md"]).map_err(|e| {
                ResumeAnalyzerError::InvalidInput(format!("Job description file: {}", e))
            })?;
            input_manager.extract_job_description(path).await?
        }
        (None, None) => String::new(),
    };

    if job_text.trim().is_empty() {
        return Err(ResumeAnalyzerError::MissingInput(
            "Please enter the job description.".to_string(),
        ));
    }

    let progress = spinner(format!("Extracting text from {}...", input.resume.display()));
    let resume_text = input_manager.extract_resume(&input.resume).await;
    progress.finish_and_clear();
    let resume_text = resume_text?;

    info!(
        "Resume text: {} characters, job description: {} characters",
        resume_text.len(),
        job_text.len()
    );

    Ok((resume_text, job_text))
}

fn spinner(message: impl Into<std::borrow::Cow<'static, str>>) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        progress.set_style(style);
    }
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn emit_report(
    report: &AnalysisReport,
    format: OutputFormat,
    save: Option<&Path>,
    color_output: bool,
) -> Result<()> {
    match save {
        Some(target) => {
            let path = if target.is_dir() {
                target.join(suggest_filename(&format, &report.metadata.resume_file, true))
            } else {
                target.to_path_buf()
            };
            let content = ReportGenerator::with_options(false).generate_report(report, &format)?;
            save_report_to_file(&content, &path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => {
            let content = ReportGenerator::with_options(color_output).generate_report(report, &format)?;
            println!("{}", content);
        }
    }
    Ok(())
}
