//! Completion client for the hosted Gemini text-generation API
//!
//! Everything that talks to the model goes through [`CompletionClient`], so
//! the rest of the pipeline can be driven by a fake responder in tests.

use crate::config::Config;
use crate::error::{Result, ResumeAnalyzerError};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A text-generation backend: one prompt in, one free-text reply out
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn submit(&self, prompt: &str) -> Result<String>;

    /// Model identifier reported in analysis output
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for `models/{model}:generateContent`
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ResumeAnalyzerError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    /// Build a client from configuration, resolving the API key
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_key()?,
            config.api.endpoint.clone(),
            config.api.model.clone(),
            config.timeout(),
        )
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn submit(&self, prompt: &str) -> Result<String> {
        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("POST {} ({} prompt chars)", self.url(), prompt.len());

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Completion API returned {}: {}", status, message);
            return Err(ResumeAnalyzerError::Completion(format!(
                "API error (status {}): {}",
                status.as_u16(),
                message
            )));
        }

        decode_reply(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Pull the reply text out of a `generateContent` response body
fn decode_reply(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    if let Some(usage) = &response.usage_metadata {
        debug!(
            "Completion succeeded: prompt_tokens={}, output_tokens={}",
            usage.prompt_token_count, usage.candidates_token_count
        );
    }

    let Some(candidate) = response.candidates.first() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(ResumeAnalyzerError::Completion(format!(
            "prompt was rejected: {}",
            reason
        )));
    };

    let text: String = candidate
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.as_deref())
        .collect();

    if text.is_empty() {
        return Err(ResumeAnalyzerError::Completion(format!(
            "model returned no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}
