use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{QuizError, Result};
use crate::models::Question;
use crate::vote::Vote;

// Shape of a question in the scraped source file
#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    options: Map<String, Value>,
    #[serde(default)]
    votes: Option<Vec<String>>,
}

/// Read-only list of questions addressed by 0-based index.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    questions: Vec<Question>,
}

impl QuestionStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let store = Self::from_json(&content)?;
        info!(path = %path.display(), count = store.len(), "loaded question store");
        Ok(store)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: Vec<RawQuestion> = serde_json::from_str(content)?;
        let questions = raw
            .into_iter()
            .enumerate()
            .map(|(index, rq)| convert(index, rq))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { questions })
    }

    #[cfg(test)]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn require(&self, index: usize) -> Result<&Question> {
        self.get(index).ok_or(QuizError::QuestionOutOfRange {
            index,
            total: self.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn convert(index: usize, raw: RawQuestion) -> Result<Question> {
    let mut options = Vec::with_capacity(raw.options.len());
    for (key, value) in raw.options {
        let label = single_label(&key).ok_or_else(|| QuizError::InvalidQuestion {
            index,
            reason: format!("option key '{}' is not a single uppercase letter", key),
        })?;
        let Value::String(text) = value else {
            return Err(QuizError::InvalidQuestion {
                index,
                reason: format!("option '{}' is not a string", key),
            });
        };
        options.push((label, text));
    }

    let mut votes = Vec::new();
    let mut top_vote_malformed = false;
    for (rank, entry) in raw.votes.unwrap_or_default().into_iter().enumerate() {
        match Vote::parse(&entry) {
            Some(vote) => votes.push(vote),
            None => {
                top_vote_malformed |= rank == 0;
                warn!(index, rank, vote = %entry, "dropping malformed vote entry");
            }
        }
    }

    Ok(Question {
        prompt: raw.question,
        options,
        votes,
        top_vote_malformed,
    })
}

fn single_label(key: &str) -> Option<char> {
    let mut chars = key.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(c),
        _ => None,
    }
}
