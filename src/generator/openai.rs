//! OpenAI-compatible chat completions backend.
//!
//! Sends one `POST {base_url}/chat/completions` request per prompt with a
//! system and a user message, and returns the first choice's content.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{Result, TodoError};
use crate::generator::{Prompt, TextGenerator};

const USER_AGENT: &str = concat!("daily-todo/", env!("CARGO_PKG_VERSION"));

/// Chat completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completions response body (only the fields we read).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Text generator backed by an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct OpenAiGenerator {
    api_key: String,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenAiGenerator {
    /// Build a generator from configuration.
    ///
    /// Fails with a config error when no API key is set, so commands can bail
    /// out before touching any files.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        Ok(Self {
            api_key,
            endpoint: chat_endpoint(&config.base_url),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    /// The full chat completions URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TextGenerator for OpenAiGenerator {
    fn complete(&self, prompt: &Prompt) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "requesting completion");

        let response = ureq::post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send_json(&body);

        match response {
            Ok(resp) => {
                let parsed: ChatResponse = resp
                    .into_json()
                    .map_err(|e| TodoError::generator(format!("invalid response body: {}", e)))?;
                extract_content(parsed)
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(TodoError::generator(format!("HTTP {}: {}", code, body.trim())))
            }
            Err(e) => Err(TodoError::generator(e.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Join the base URL and the chat completions path.
fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Pull the first choice's text out of a response.
fn extract_content(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TodoError::generator("response contained no choices"))?;
    Ok(choice.message.content.unwrap_or_default().trim().to_string())
}
