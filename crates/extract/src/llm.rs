use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExtractError;

/// Seam between the orchestrator and whatever serves the model. Tests drive
/// the pipeline with a scripted implementation.
#[async_trait]
pub trait ExtractionModel: Send + Sync {
    /// One complete, non-streaming structured-JSON completion.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ExtractError>;
}

/// Ollama chat client. Requests a single full JSON response per call and
/// sleeps a fixed cooldown after each successful call to bound request rate
/// against the shared model server.
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    cooldown: Duration,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>, // "json" for structured output
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, cooldown: Duration) -> Self {
        Self {
            base_url,
            model,
            cooldown,
            client: reqwest::Client::new(),
        }
    }

    pub fn default() -> Self {
        Self::new(
            "http://localhost:11434".to_string(),
            "phi4".to_string(),
            Duration::from_secs(8),
        )
    }

    async fn chat(&self, system: &str, prompt: &str, json: bool) -> Result<String, ExtractError> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            format: json.then(|| "json".to_string()),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractError::ModelCall(format!("failed to reach Ollama: {e}")))?;

        if !response.status().is_success() {
            return Err(ExtractError::ModelCall(format!(
                "Ollama request failed: {}",
                response.status()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::ModelCall(format!("failed to parse Ollama response: {e}")))?;

        Ok(chat_response.message.content)
    }

    /// Plain text completion without the structured-output constraint or the
    /// cooldown; used by the query side.
    pub async fn generate(&self, prompt: &str) -> Result<String, ExtractError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractError::ModelCall(format!("failed to reach Ollama: {e}")))?;

        if !response.status().is_success() {
            return Err(ExtractError::ModelCall(format!(
                "Ollama request failed: {}",
                response.status()
            )));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::ModelCall(format!("failed to parse Ollama response: {e}")))?;

        Ok(generate_response.response)
    }
}

#[async_trait]
impl ExtractionModel for OllamaClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ExtractError> {
        let response = self.chat(system, prompt, true).await?;

        // Post-call cooldown: simple rate limiting for the shared model
        // server. Applied only after success; an errored call returns
        // immediately.
        debug!(cooldown_ms = self.cooldown.as_millis() as u64, "Model call cooldown");
        tokio::time::sleep(self.cooldown).await;

        Ok(response)
    }
}
