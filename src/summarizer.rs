use reqwest::header;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::Config;
use crate::error::AppError;

/// Chat-completions request body
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Build the fixed "2l" prompt around the extracted document text.
pub fn build_2l_prompt(text: &str) -> String {
    format!(
        "\nYou are an expert equity research analyst. Given the following content from a web page or PDF, \
extract the information and present it in this custom format called '2l':\n\n\
1. Key pointers and very important\n\
2. Summarize this (if possible, add % with this)\n\
3. A 2-3 line final summary (if possible, add % with this)\n\
4. Explain to a 5-year-old\n\
5. In one word (a proper heading with process)\n\
6. Is it good or bad for the company (in 2 lines)\n\n\
Only output in structured format. Do not explain.\n\n\
Here is the content:\n{}\n",
        text
    )
}

/// Thin client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(config.llm_timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build LLM HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Ask the model for a "2l" summary of `text` and return its raw reply.
    #[tracing::instrument(skip(self, text), fields(model = %self.model, chars = text.chars().count()))]
    pub async fn generate_2l_format(&self, text: &str) -> Result<String, AppError> {
        let prompt = build_2l_prompt(text);
        self.complete(&prompt).await
    }

    /// Single-turn completion, no retries.
    pub async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::LlmError("OPENAI_API_KEY not set".to_string()))?;

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let full_url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("Calling chat completions API: {}", full_url);

        let response = self
            .http
            .post(&full_url)
            .bearer_auth(api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("Network error calling LLM API: {}", e);
                AppError::LlmError(format!("Failed to call LLM API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!("LLM API error: Status {}, Body: {}", status, error_text);
            return Err(AppError::LlmError(format!("LLM API returned error status: {}", status)));
        }

        let api_response = response.json::<ChatResponse>().await.map_err(|e| {
            error!("Failed to parse LLM API JSON response: {}", e);
            AppError::LlmError(format!("Failed to parse LLM API response: {}", e))
        })?;

        match api_response.choices.into_iter().next() {
            Some(choice) => {
                let content = choice.message.content.unwrap_or_default();
                info!("Received LLM response. Content length: {}", content.len());
                Ok(content)
            }
            None => {
                error!("LLM API returned no choices in the response.");
                Err(AppError::LlmError("LLM API returned no choices".to_string()))
            }
        }
    }
}
