use tracing::debug;

use crate::models::{AnswerKey, Question, Selection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub correct: bool,
    pub key: Option<AnswerKey>,
}

impl Grade {
    pub fn key_display(&self) -> String {
        self.key
            .as_ref()
            .map(AnswerKey::display)
            .unwrap_or_else(|| AnswerKey::unknown().to_string())
    }
}

/// Scores a submission against the question's top-voted answer.
/// Multi-answer questions need the exact label set; there is no partial credit.
pub fn grade(question: &Question, submission: &Selection) -> Grade {
    let key = question.answer_key();

    let correct = match &key {
        _ if submission.is_empty() => false,
        None => false,
        Some(AnswerKey::Single(label)) => submission.len() == 1 && submission.contains(*label),
        Some(AnswerKey::Multiple(labels)) => submission.labels() == labels,
    };

    debug!(
        submitted = %submission.as_label_string(),
        correct,
        "graded submission"
    );

    Grade { correct, key }
}
