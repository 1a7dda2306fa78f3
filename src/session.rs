//! Circular navigation over a finished question bank.
//!
//! The current position is owned by [`SessionState`], not by the manager, so
//! a [`QuizManager`] can be rebuilt on every interaction without losing place.

use crate::bank::QuestionBank;
use crate::error::SessionError;
use crate::question::Question;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    pub fn offset(self) -> i64 {
        match self {
            Direction::Next => 1,
            Direction::Previous => -1,
        }
    }
}

/// Read-only view over a bank with wrap-around indexing.
#[derive(Debug, Clone, Copy)]
pub struct QuizManager<'a> {
    questions: &'a [Question],
    total_questions: usize,
}

impl<'a> QuizManager<'a> {
    /// An empty slice is accepted here; every retrieval on it fails with `EmptyBank`.
    pub fn new(questions: &'a [Question]) -> Self {
        Self {
            questions,
            total_questions: questions.len(),
        }
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// `index` reduced into `[0, total)`, negative values counting back from the end.
    pub fn normalize(&self, index: i64) -> Result<usize, SessionError> {
        if self.total_questions == 0 {
            return Err(SessionError::EmptyBank);
        }
        // A bank never holds anywhere near i64::MAX questions.
        let total = self.total_questions as i64;
        Ok(index.rem_euclid(total) as usize)
    }

    pub fn get_question_at_index(&self, index: i64) -> Result<&'a Question, SessionError> {
        let valid_index = self.normalize(index)?;
        Ok(&self.questions[valid_index])
    }

    /// Move the caller's position one step in `direction`, wrapping at both ends.
    /// Returns the new position, which is also written back into `position`.
    pub fn next_question_index(
        &self,
        position: &mut usize,
        direction: Direction,
    ) -> Result<usize, SessionError> {
        let current = *position as i64;
        let new_index = self.normalize(current + direction.offset())?;
        debug!(
            target: "quizzify::session",
            from = *position,
            to = new_index,
            ?direction,
            "Moved question index"
        );
        *position = new_index;
        Ok(new_index)
    }
}

/// What the quiz taker sees after answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub answer: String,
    pub explanation: String,
}

/// Caller-owned session record: the active bank and the current position.
///
/// Empty until a bank is installed; installing always resets the position to 0.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    bank: Option<QuestionBank>,
    index: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.bank.is_some()
    }

    /// Discard the current bank ahead of a new generation round.
    pub fn begin_round(&mut self) {
        self.bank = None;
        self.index = 0;
    }

    /// Make `bank` the active quiz, starting at the first question.
    ///
    /// An empty bank is refused and leaves the session empty.
    pub fn install_bank(&mut self, bank: QuestionBank) -> Result<(), SessionError> {
        self.index = 0;
        if bank.is_empty() {
            self.bank = None;
            return Err(SessionError::EmptyBank);
        }
        debug!(target: "quizzify::session", questions = bank.len(), "Installed question bank");
        self.bank = Some(bank);
        Ok(())
    }

    pub fn bank(&self) -> Option<&QuestionBank> {
        self.bank.as_ref()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.bank.as_ref().map_or(0, QuestionBank::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn manager(&self) -> QuizManager<'_> {
        QuizManager::new(self.bank.as_ref().map(QuestionBank::as_slice).unwrap_or(&[]))
    }

    pub fn current(&self) -> Result<&Question, SessionError> {
        self.manager().get_question_at_index(self.index as i64)
    }

    pub fn advance(&mut self, direction: Direction) -> Result<usize, SessionError> {
        let questions = self.bank.as_ref().map(QuestionBank::as_slice).unwrap_or(&[]);
        let manager = QuizManager::new(questions);
        manager.next_question_index(&mut self.index, direction)
    }

    /// Score `selected` against the current question.
    pub fn submit_answer(&self, selected: &str) -> Result<AnswerFeedback, SessionError> {
        let question = self.current()?;
        Ok(AnswerFeedback {
            correct: question.is_correct(selected),
            answer: question.answer.clone(),
            explanation: question.explanation.clone(),
        })
    }
}
