//! Headline summarization through Azure OpenAI chat completions.

use crate::config::{Credentials, HarvestConfig};
use crate::error::SummaryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You summarize financial news. Given timestamped headlines, \
write a short briefing of the main themes, most recent first.";

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, SummaryError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<String>,
    message: Option<String>,
}

/// Summarizer backed by an Azure OpenAI deployment
pub struct AzureSummarizer {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl AzureSummarizer {
    pub fn new(credentials: &Credentials, config: &HarvestConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            url: completions_url(
                &credentials.endpoint,
                &config.azure_deployment,
                &config.azure_api_version,
            ),
            api_key: credentials.api_key.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for AzureSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, SummaryError> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.2,
        };

        ::log::info!("Requesting summary of {} prompt bytes", prompt.len());
        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        classify_response(status, &body)
    }
}

pub fn completions_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        endpoint.trim_end_matches('/'),
        deployment,
        api_version
    )
}

/// Turns a provider response into summary text or a typed provider error
pub fn classify_response(status: u16, body: &str) -> Result<String, SummaryError> {
    if !(200..300).contains(&status) {
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => (
                envelope.error.code.unwrap_or_default(),
                envelope.error.message.unwrap_or_else(|| body.to_string()),
            ),
            Err(_) => (String::new(), body.to_string()),
        };
        return Err(match (status, code.as_str()) {
            (400, "content_filter") => SummaryError::ContentStopped(message),
            (400, _) => SummaryError::InvalidArgument(message),
            _ => SummaryError::Api { status, message },
        });
    }

    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| SummaryError::Api {
        status,
        message: format!("unreadable response: {}", e),
    })?;
    let choice = parsed.choices.into_iter().next().ok_or_else(|| SummaryError::Api {
        status,
        message: "response contained no choices".to_string(),
    })?;

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(SummaryError::ContentStopped(
            "completion was cut off by the content filter".to_string(),
        ));
    }

    match choice.message.and_then(|m| m.content) {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(SummaryError::ContentStopped(format!(
            "empty completion (finish reason {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        ))),
    }
}
