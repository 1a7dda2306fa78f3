//! Collaborator seams: the text-generation client and the passage retriever.
//!
//! The generator only ever sees these two traits. Concrete providers live in
//! `crate::clients`; the in-memory passage store lives in `crate::retrieval`.

use crate::error::{AIError, RetrievalError};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Low-level model client abstraction.
///
/// Implementors provide `ask_raw`, which sends one fully formatted prompt and
/// returns the text of the first candidate unmodified. Cleaning and parsing
/// are the caller's job.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;
}

// Implement Clone for Box<dyn LowLevelClient>
impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }
}

/// A chunk of source text returned by a retriever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub text: String,
}

impl Passage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Semantic search over the loaded documents. An empty result is legal.
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<Vec<Passage>, RetrievalError>;
}

#[async_trait]
impl<R: Retriever + ?Sized> Retriever for Arc<R> {
    async fn search(&self, query: &str) -> Result<Vec<Passage>, RetrievalError> {
        self.as_ref().search(query).await
    }
}

#[async_trait]
impl<R: Retriever + ?Sized> Retriever for Box<R> {
    async fn search(&self, query: &str) -> Result<Vec<Passage>, RetrievalError> {
        self.as_ref().search(query).await
    }
}
