use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("{0} is not initialized")]
    NotInitialized(&'static str),
    #[error("No context found: {0}")]
    NoContext(String),
    #[error("Failed to generate question: {0}")]
    Generation(#[from] AIError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Question bank is empty")]
    EmptyBank,
}

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("No documents found")]
    NoDocuments,
}

#[derive(Error, Debug)]
pub enum AIError {
    #[error("Claude API error: {0}")]
    Claude(#[from] ClaudeError),
    #[error("DeepSeek API error: {0}")]
    DeepSeek(#[from] DeepSeekError),
    #[error("Mock error: {0}")]
    Mock(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Error, Debug)]
pub enum ClaudeError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}

#[derive(Error, Debug)]
pub enum DeepSeekError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}
