use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::auth::Token;
use crate::error::{CommitLensError, Result};

const QUOTA_STATUS: &str = "RESOURCE_EXHAUSTED";

pub struct GeminiClient {
    client: Client,
    generate_url: Url,
    api_key: Token,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentDto {
    #[serde(default)]
    candidates: Vec<CandidateDto>,
    prompt_feedback: Option<PromptFeedbackDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateDto {
    content: Option<ContentDto>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDto {
    #[serde(default)]
    parts: Vec<PartDto>,
}

#[derive(Debug, Deserialize)]
struct PartDto {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedbackDto {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelopeDto {
    error: ErrorDto,
}

#[derive(Debug, Deserialize)]
struct ErrorDto {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GenerateContentDto {
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(CommitLensError::AiService(format!(
                "Prompt was blocked: {reason}"
            )));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| CommitLensError::AiService("Response has no candidates".to_string()))?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(CommitLensError::AiService(format!(
                "Response has no text (finish reason: {reason})"
            )));
        }

        Ok(text.to_string())
    }
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: Token) -> Result<Self> {
        let client = Client::builder()
            .user_agent("CommitLens/0.1.0")
            .build()
            .map_err(|e| CommitLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let model = model.strip_prefix("models/").unwrap_or(model);
        let method = format!("{model}:generateContent");
        let mut generate_url = Url::parse(base_url)
            .map_err(|e| CommitLensError::Config(format!("Invalid Gemini API URL: {e}")))?;
        generate_url
            .path_segments_mut()
            .map_err(|()| CommitLensError::Config(format!("Invalid Gemini API URL: {base_url}")))?
            .pop_if_empty()
            .extend(["v1beta", "models", method.as_str()]);

        Ok(Self {
            client,
            generate_url,
            api_key,
        })
    }

    /// Send one prompt and return the model's text, trimmed.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "thinkingConfig": { "thinkingBudget": 0 } },
        });

        debug!("POST {}", self.generate_url);
        let response = self
            .client
            .post(self.generate_url.clone())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &text));
        }

        serde_json::from_str::<GenerateContentDto>(&text)
            .map_err(|e| CommitLensError::AiService(format!("Malformed response: {e}")))?
            .into_text()
    }
}

fn classify_failure(status: StatusCode, body: &str) -> CommitLensError {
    let (message, api_status) = match serde_json::from_str::<ErrorEnvelopeDto>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.to_string(), String::new()),
    };

    if status == StatusCode::TOO_MANY_REQUESTS || api_status == QUOTA_STATUS {
        CommitLensError::AiQuota(message)
    } else {
        CommitLensError::AiService(format!("{status}: {message}"))
    }
}
