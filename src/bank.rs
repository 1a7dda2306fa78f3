use crate::question::Question;
use std::ops::Index;

/// Insertion-ordered questions with unique `question` text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive match on the question text.
    pub fn contains_text(&self, text: &str) -> bool {
        self.questions.iter().any(|q| q.question == text)
    }

    /// Appends `question` unless its text is already present. Returns whether it was added.
    pub fn push_unique(&mut self, question: Question) -> bool {
        if self.contains_text(&question.question) {
            return false;
        }
        self.questions.push(question);
        true
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }
}

impl Index<usize> for QuestionBank {
    type Output = Question;

    fn index(&self, index: usize) -> &Question {
        &self.questions[index]
    }
}

impl<'a> IntoIterator for &'a QuestionBank {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// Builds a bank, dropping later duplicates.
impl FromIterator<Question> for QuestionBank {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        let mut bank = Self::new();
        for question in iter {
            bank.push_unique(question);
        }
        bank
    }
}
