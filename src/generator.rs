//! Question generation: retrieve context, prompt the model, keep what validates.
//!
//! A round makes exactly `num_questions` attempts. Attempts that fail, do not
//! parse, or repeat an earlier question are skipped rather than retried, so
//! the resulting bank may be shorter than requested or even empty.

use crate::bank::QuestionBank;
use crate::config::{GeneratorConfig, ValidationMode};
use crate::core::{LowLevelClient, Retriever};
use crate::error::{AIError, QuizError};
use crate::interceptors::Interceptor;
use crate::json_utils::parse_question;
use crate::prompt::{join_context, render_quiz_prompt};
use crate::question::RawQuestion;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Why a decoded candidate was kept out of the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingQuestion,
    Duplicate,
    /// Only produced in [`ValidationMode::Strict`].
    Malformed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingQuestion => write!(f, "missing \"question\" field"),
            RejectReason::Duplicate => write!(f, "duplicate question"),
            RejectReason::Malformed => write!(f, "choices or answer key malformed"),
        }
    }
}

/// Result of a single generation attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Accepted,
    Rejected(RejectReason),
    Unparseable(serde_json::Error),
    Failed(QuizError),
}

impl AttemptOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AttemptOutcome::Accepted)
    }
}

/// The bank produced by a round plus what happened on each attempt.
#[derive(Debug)]
pub struct GenerationReport {
    pub bank: QuestionBank,
    pub outcomes: Vec<AttemptOutcome>,
}

impl GenerationReport {
    pub fn attempts(&self) -> usize {
        self.outcomes.len()
    }

    pub fn accepted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_accepted()).count()
    }
}

pub struct QuizGenerator {
    topic: String,
    num_questions: usize,
    config: GeneratorConfig,
    retriever: Option<Box<dyn Retriever>>,
    client: Option<Box<dyn LowLevelClient>>,
    interceptor: Option<Arc<dyn Interceptor>>,
    question_bank: QuestionBank,
}

impl fmt::Debug for QuizGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizGenerator")
            .field("topic", &self.topic)
            .field("num_questions", &self.num_questions)
            .field("config", &self.config)
            .field("has_retriever", &self.retriever.is_some())
            .field("has_client", &self.client.is_some())
            .field("bank_len", &self.question_bank.len())
            .finish()
    }
}

impl QuizGenerator {
    /// Configure a generator with default settings.
    ///
    /// A blank or missing topic becomes "General Knowledge". Fails with
    /// `QuizError::Configuration` when more than ten questions are requested.
    pub fn new(
        topic: Option<&str>,
        num_questions: usize,
        retriever: Option<Box<dyn Retriever>>,
    ) -> Result<Self, QuizError> {
        Self::with_config(topic, num_questions, retriever, GeneratorConfig::default())
    }

    pub fn with_config(
        topic: Option<&str>,
        num_questions: usize,
        retriever: Option<Box<dyn Retriever>>,
        config: GeneratorConfig,
    ) -> Result<Self, QuizError> {
        if num_questions > config.max_questions {
            return Err(QuizError::Configuration(format!(
                "Number of questions cannot exceed {} (requested {})",
                config.max_questions, num_questions
            )));
        }

        let topic = match topic.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => config.default_topic.clone(),
        };

        info!(target: "quizzify::generator", %topic, num_questions, "Configured quiz generator");
        Ok(Self {
            topic,
            num_questions,
            config,
            retriever,
            client: None,
            interceptor: None,
            question_bank: QuestionBank::new(),
        })
    }

    /// Bind the text-generation client.
    pub fn init_client<C: LowLevelClient + 'static>(&mut self, client: C) {
        self.client = Some(Box::new(client));
    }

    #[must_use]
    pub fn with_client<C: LowLevelClient + 'static>(mut self, client: C) -> Self {
        self.init_client(client);
        self
    }

    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn num_questions(&self) -> usize {
        self.num_questions
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Questions accepted so far in the round in progress.
    pub fn question_bank(&self) -> &QuestionBank {
        &self.question_bank
    }

    fn ensure_ready(&self) -> Result<(&dyn LowLevelClient, &dyn Retriever), QuizError> {
        let client = self
            .client
            .as_deref()
            .ok_or(QuizError::NotInitialized("Text-generation client"))?;
        let retriever = self
            .retriever
            .as_deref()
            .ok_or(QuizError::NotInitialized("Retriever"))?;
        Ok((client, retriever))
    }

    /// Ask the model for one question and return its reply untouched.
    ///
    /// The reply may still be wrapped in markdown code fences.
    #[instrument(target = "quizzify::generator", skip(self), fields(topic = %self.topic))]
    pub async fn generate_one(&self) -> Result<String, QuizError> {
        let (client, retriever) = self.ensure_ready()?;

        let passages = retriever
            .search(&self.topic)
            .await
            .map_err(|e| QuizError::NoContext(e.to_string()))?;
        if passages.is_empty() {
            return Err(QuizError::NoContext(format!(
                "no documents found for topic '{}'",
                self.topic
            )));
        }

        let context = join_context(passages.iter().map(|p| p.text.as_str()));
        let prompt = render_quiz_prompt(&self.topic, &context);
        debug!(
            target: "quizzify::generator",
            passages = passages.len(),
            prompt_len = prompt.len(),
            "Sending quiz prompt"
        );

        let timeout = self.config.request_timeout;
        let raw = match tokio::time::timeout(timeout, client.ask_raw(prompt.clone())).await {
            Ok(reply) => reply?,
            Err(_) => {
                warn!(target: "quizzify::generator", ?timeout, "Model call timed out");
                return Err(AIError::Timeout(timeout).into());
            }
        };

        if let Some(interceptor) = &self.interceptor {
            if let Err(e) = interceptor.save(&prompt, &raw).await {
                warn!(target: "quizzify::generator", error = %e, "Failed to save transcript");
            }
        }

        Ok(raw)
    }

    /// Run a full round and return the bank.
    pub async fn generate_quiz(&mut self) -> Result<QuestionBank, QuizError> {
        Ok(self.generate_quiz_report().await?.bank)
    }

    /// Run a full round: exactly `num_questions` attempts, each recorded.
    ///
    /// Only a missing client or retriever aborts the round; every other
    /// failure is logged and shrinks the bank.
    #[instrument(
        target = "quizzify::generator",
        skip(self),
        fields(topic = %self.topic, num_questions = self.num_questions)
    )]
    pub async fn generate_quiz_report(&mut self) -> Result<GenerationReport, QuizError> {
        self.ensure_ready()?;
        self.question_bank = QuestionBank::new();

        let mut outcomes = Vec::with_capacity(self.num_questions);
        for attempt in 1..=self.num_questions {
            let reply = self.generate_one().await;
            let outcome = match reply {
                Ok(raw) => self.process_response(&raw),
                Err(e @ QuizError::NotInitialized(_)) => return Err(e),
                Err(e) => AttemptOutcome::Failed(e),
            };

            match &outcome {
                AttemptOutcome::Accepted => {
                    info!(
                        target: "quizzify::generator",
                        attempt,
                        "Successfully generated a unique question"
                    )
                }
                AttemptOutcome::Rejected(reason) => {
                    warn!(
                        target: "quizzify::generator",
                        attempt,
                        %reason,
                        "Duplicate or invalid question detected"
                    )
                }
                AttemptOutcome::Unparseable(e) => {
                    warn!(
                        target: "quizzify::generator",
                        attempt,
                        error = %e,
                        "Failed to decode question JSON"
                    )
                }
                AttemptOutcome::Failed(e) => {
                    warn!(
                        target: "quizzify::generator",
                        attempt,
                        error = %e,
                        "Question generation attempt failed"
                    )
                }
            }
            outcomes.push(outcome);
        }

        let bank = std::mem::take(&mut self.question_bank);
        info!(
            target: "quizzify::generator",
            accepted = bank.len(),
            attempts = outcomes.len(),
            "Quiz generation finished"
        );
        Ok(GenerationReport { bank, outcomes })
    }

    /// Clean, decode and validate one raw reply, adding it to the bank when accepted.
    pub fn process_response(&mut self, raw: &str) -> AttemptOutcome {
        let candidate = match parse_question(raw) {
            Ok(candidate) => candidate,
            Err(e) => return AttemptOutcome::Unparseable(e),
        };

        if let Err(reason) = self.check(&candidate) {
            return AttemptOutcome::Rejected(reason);
        }

        match candidate.into_question() {
            Some(question) => {
                self.question_bank.push_unique(question);
                AttemptOutcome::Accepted
            }
            None => AttemptOutcome::Rejected(RejectReason::MissingQuestion),
        }
    }

    /// Whether `candidate` may enter the bank: it has question text that no
    /// banked question already uses (exact match). Strict mode also checks
    /// the choice keys and the answer key.
    pub fn validate(&self, candidate: &RawQuestion) -> bool {
        self.check(candidate).is_ok()
    }

    fn check(&self, candidate: &RawQuestion) -> Result<(), RejectReason> {
        let text = candidate.question.as_deref().ok_or(RejectReason::MissingQuestion)?;
        if self.question_bank.contains_text(text) {
            return Err(RejectReason::Duplicate);
        }
        if self.config.validation == ValidationMode::Strict {
            let well_formed = candidate
                .clone()
                .into_question()
                .map(|q| q.is_well_formed())
                .unwrap_or(false);
            if !well_formed {
                return Err(RejectReason::Malformed);
            }
        }
        Ok(())
    }
}
