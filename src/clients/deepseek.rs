use crate::config::KeyFromEnv;
use crate::core::LowLevelClient;
use crate::error::{AIError, DeepSeekError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

const DEEPSEEK_URL: &str = "https://api.deepseek.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct DeepSeekRequest {
    model: String,
    messages: Vec<DeepSeekMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct DeepSeekMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct DeepSeekResponse {
    choices: Vec<DeepSeekChoice>,
}

#[derive(Debug, Deserialize)]
struct DeepSeekChoice {
    message: DeepSeekResponseMessage,
}

#[derive(Debug, Deserialize)]
struct DeepSeekResponseMessage {
    content: String,
}

/// Configuration for DeepSeek client
#[derive(Clone)]
pub struct DeepSeekConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl KeyFromEnv for DeepSeekConfig {
    const KEY_NAME: &'static str = "DEEPSEEK_API_KEY";
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: Self::find_key().unwrap_or_default(),
            model: "deepseek-chat".to_string(),
            max_tokens: 400,
            temperature: 0.7,
        }
    }
}

impl DeepSeekConfig {
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl fmt::Debug for DeepSeekConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepSeekConfig")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct DeepSeekClient {
    config: DeepSeekConfig,
    client: Client,
}

impl Default for DeepSeekClient {
    fn default() -> Self {
        Self::new(DeepSeekConfig::default())
    }
}

impl DeepSeekClient {
    /// Create a new DeepSeek client with full configuration
    pub fn new(config: DeepSeekConfig) -> Self {
        info!(model = %config.model, "Creating new DeepSeek client");
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &DeepSeekConfig {
        &self.config
    }
}

#[async_trait]
impl LowLevelClient for DeepSeekClient {
    #[instrument(
        target = "quizzify::clients",
        skip(self, prompt),
        fields(prompt_len = prompt.len(), model = %self.config.model)
    )]
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        if self.config.api_key.is_empty() {
            error!("DEEPSEEK_API_KEY is not set");
            return Err(AIError::DeepSeek(DeepSeekError::Authentication));
        }

        let request = DeepSeekRequest {
            model: self.config.model.clone(),
            messages: vec![DeepSeekMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to DeepSeek API");
        let response = self
            .client
            .post(DEEPSEEK_URL)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                AIError::DeepSeek(DeepSeekError::Http(e.to_string()))
            })?;

        let status = response.status();
        debug!(status = %status, "Received response from DeepSeek API");

        if status == 429 {
            warn!("DeepSeek API rate limit exceeded");
            return Err(AIError::DeepSeek(DeepSeekError::RateLimit));
        }

        if status == 401 {
            error!("DeepSeek API authentication failed");
            return Err(AIError::DeepSeek(DeepSeekError::Authentication));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "DeepSeek API error");
            return Err(AIError::DeepSeek(DeepSeekError::Api(error_text)));
        }

        let deepseek_response: DeepSeekResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse DeepSeek response JSON");
            AIError::DeepSeek(DeepSeekError::Http(e.to_string()))
        })?;

        let text = deepseek_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                error!("No choices in DeepSeek response");
                AIError::DeepSeek(DeepSeekError::Api("No choices in response".to_string()))
            })?;

        info!(response_len = text.len(), "Received DeepSeek response");
        Ok(text)
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
