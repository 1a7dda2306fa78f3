use crate::clients::{
    ClaudeClient, ClaudeConfig, DeepSeekClient, DeepSeekConfig, MockClient, MockHandle,
    MockResponse,
};
use crate::config::KeyFromEnv;
use crate::core::LowLevelClient;
use crate::error::AIError;
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Which provider backs a [`FlexibleClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClientType {
    Claude,
    #[value(name = "deepseek")]
    DeepSeek,
    Mock,
}

impl Default for ClientType {
    /// Pick the first provider with an API key available, falling back to the mock.
    fn default() -> Self {
        if ClaudeConfig::has_key() {
            Self::Claude
        } else if DeepSeekConfig::has_key() {
            Self::DeepSeek
        } else {
            Self::Mock
        }
    }
}

impl FromStr for ClientType {
    type Err = String;

    /// Parse client type from string (case insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claude" => Ok(Self::Claude),
            "deepseek" => Ok(Self::DeepSeek),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown client type: '{}'. Supported: claude, deepseek, mock", s)),
        }
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientType::Claude => write!(f, "Claude"),
            ClientType::DeepSeek => write!(f, "DeepSeek"),
            ClientType::Mock => write!(f, "Mock"),
        }
    }
}

/// Flexible client that wraps any LowLevelClient and provides factory functions
#[derive(Debug, Clone)]
pub struct FlexibleClient {
    inner: Arc<Mutex<Box<dyn LowLevelClient>>>,
}

impl FlexibleClient {
    /// Create a new FlexibleClient wrapping the given client
    pub fn new(client: Box<dyn LowLevelClient>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Build the client for `client_type` from environment configuration.
    ///
    /// The mock variant is created with an empty script, so every call fails;
    /// use [`FlexibleClient::mock`] when the replies matter.
    pub fn from_type(client_type: ClientType) -> Self {
        match client_type {
            ClientType::Claude => Self::claude(ClaudeConfig::default()),
            ClientType::DeepSeek => Self::deepseek(DeepSeekConfig::default()),
            ClientType::Mock => Self::mock().0,
        }
    }

    /// Create a FlexibleClient with a Claude client
    pub fn claude(config: ClaudeConfig) -> Self {
        Self::new(Box::new(ClaudeClient::new(config)))
    }

    /// Create a FlexibleClient with a DeepSeek client
    pub fn deepseek(config: DeepSeekConfig) -> Self {
        Self::new(Box::new(DeepSeekClient::new(config)))
    }

    /// Create a FlexibleClient with a mock and return the handle for configuration
    pub fn mock() -> (Self, Arc<MockHandle>) {
        let (mock_client, handle) = MockClient::new();
        (Self::new(Box::new(mock_client)), handle)
    }

    /// Create a FlexibleClient mock with predefined responses
    pub fn mock_with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (mock_client, handle) = MockClient::with_responses(responses);
        (Self::new(Box::new(mock_client)), handle)
    }

    /// Replace the wrapped client.
    pub fn swap(&self, client: Box<dyn LowLevelClient>) {
        *self.inner.lock().unwrap_or_else(|p| p.into_inner()) = client;
    }

    fn current(&self) -> Box<dyn LowLevelClient> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).clone_box()
    }
}

#[async_trait]
impl LowLevelClient for FlexibleClient {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        // Clone the client to avoid holding the mutex across await
        let client = self.current();
        client.ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
