pub mod bank;
pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod generator;
pub mod interceptors;
pub mod json_utils;
pub mod prompt;
pub mod question;
pub mod retrieval;
pub mod session;

// Convenient re-exports
pub use bank::QuestionBank;
pub use generator::{AttemptOutcome, GenerationReport, QuizGenerator};
pub use question::{Choice, Question};
pub use session::{Direction, QuizManager, SessionState};
