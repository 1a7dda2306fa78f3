use std::env;
use std::time::Duration;

/// Upper bound on the number of questions a single generation round may request.
pub const MAX_QUESTIONS: usize = 10;

/// Topic used when the caller leaves the topic blank.
pub const DEFAULT_TOPIC: &str = "General Knowledge";

/// Trait for types that can retrieve their configuration key from environment variables
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Find the API key by checking environment variables first, then .env file
    fn find_key() -> Option<String> {
        // First try to load .env file (silently fail if not found)
        let _ = dotenvy::dotenv();

        env::var(Self::KEY_NAME).ok().filter(|k| !k.trim().is_empty())
    }

    /// Whether a key is available, without returning it
    fn has_key() -> bool {
        Self::find_key().is_some()
    }
}

/// How strictly a generated candidate is checked before it enters the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Only require a `question` text that is not already in the bank.
    #[default]
    Lenient,
    /// Additionally require choices keyed exactly A, B, C, D and an answer naming one of them.
    Strict,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub max_questions: usize,
    pub default_topic: String,
    /// Bound on every call to the text-generation client.
    pub request_timeout: Duration,
    pub validation: ValidationMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_questions: MAX_QUESTIONS,
            default_topic: DEFAULT_TOPIC.to_string(),
            request_timeout: Duration::from_secs(60),
            validation: ValidationMode::Lenient,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }
}
