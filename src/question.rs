//! Quiz question records as produced by the model and consumed by the session.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys a well-formed question uses for its four choices, in order.
pub const CHOICE_KEYS: [&str; 4] = ["A", "B", "C", "D"];

/// One answer option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Choice {
    /// Single-letter identifier, A through D
    #[schemars(regex(pattern = r"^[ABCD]$"))]
    pub key: String,
    /// Display text of the option
    pub value: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.key, self.value)
    }
}

/// A question accepted into a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(
    title = "Quiz Question",
    description = "A multiple-choice question grounded in the loaded documents"
)]
pub struct Question {
    /// The prompt shown to the quiz taker
    pub question: String,
    /// The four options, keyed A to D
    pub choices: Vec<Choice>,
    /// Key of the correct choice
    #[schemars(regex(pattern = r"^[ABCD]$"))]
    pub answer: String,
    /// Why the answer is correct
    pub explanation: String,
}

impl Question {
    /// Whether `selected` names the correct choice.
    ///
    /// The chosen option, rendered as `"K) value"`, must start with `answer`,
    /// so answers like `"B"`, `"B)"` and `"B) text"` all match choice B.
    pub fn is_correct(&self, selected: &str) -> bool {
        let answer = self.answer.trim();
        if selected.trim().eq_ignore_ascii_case(answer) {
            return true;
        }
        self.choice(selected)
            .is_some_and(|choice| choice.to_string().starts_with(answer))
    }

    pub fn choice(&self, key: &str) -> Option<&Choice> {
        let key = key.trim();
        self.choices.iter().find(|c| c.key.eq_ignore_ascii_case(key))
    }

    /// Choices exactly A, B, C, D (in that order) and a non-empty answer
    /// that exactly one of them scores as correct.
    pub fn is_well_formed(&self) -> bool {
        let keys_ok = self.choices.len() == CHOICE_KEYS.len()
            && self
                .choices
                .iter()
                .zip(CHOICE_KEYS)
                .all(|(choice, key)| choice.key == key);
        let matching = self
            .choices
            .iter()
            .filter(|c| self.is_correct(&c.key))
            .count();
        keys_ok && !self.answer.trim().is_empty() && matching == 1
    }

    /// Pretty-printed JSON schema of a question record.
    pub fn json_schema_pretty() -> String {
        let schema = schema_for!(Question);
        serde_json::to_string_pretty(&schema)
            .unwrap_or_else(|_| "Schema serialization failed".to_string())
    }
}

/// A candidate as decoded from model output, before validation.
///
/// Only the shape is enforced here. A missing `question` is a validation
/// rejection rather than a decoding failure, so it is kept optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl RawQuestion {
    /// Converts into a `Question`, or `None` when the question text is absent.
    pub fn into_question(self) -> Option<Question> {
        let question = self.question?;
        Some(Question {
            question,
            choices: self.choices,
            answer: self.answer,
            explanation: self.explanation,
        })
    }
}
