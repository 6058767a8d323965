#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::vote::Vote;

static NUMBERING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Question\s*#\d+\s*").expect("valid numbering regex"));

const ANSWER_MARKER: &str = "Correct Answer:";

// Strips the scraped "Question #12" prefix from a prompt
pub fn clean_prompt(raw: &str) -> String {
    NUMBERING_RE.replace_all(raw.trim(), "").trim().to_string()
}

// Option text sometimes carries a trailing "Correct Answer: X" annotation
pub fn clean_option(raw: &str) -> &str {
    raw.split(ANSWER_MARKER).next().unwrap_or_default().trim()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<(char, String)>,
    pub votes: Vec<Vote>,
    /// The highest-ranked vote string did not parse, so there is no answer key
    /// even when later votes are valid.
    #[serde(default)]
    pub top_vote_malformed: bool,
}

impl Question {
    pub fn clean_prompt(&self) -> String {
        clean_prompt(&self.prompt)
    }

    pub fn clean_options(&self) -> Vec<(char, &str)> {
        self.options
            .iter()
            .map(|(label, text)| (*label, clean_option(text)))
            .collect()
    }

    /// Options formatted one per line as `A. text`.
    pub fn options_text(&self) -> String {
        self.clean_options()
            .iter()
            .map(|(label, text)| format!("{}. {}", label, text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn top_vote(&self) -> Option<&Vote> {
        if self.top_vote_malformed {
            return None;
        }
        self.votes.first()
    }

    pub fn answer_key(&self) -> Option<AnswerKey> {
        self.top_vote().map(AnswerKey::from_vote)
    }

    pub fn is_multi_select(&self) -> bool {
        matches!(self.answer_key(), Some(AnswerKey::Multiple(_)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerKey {
    Single(char),
    Multiple(BTreeSet<char>),
}

impl AnswerKey {
    pub fn from_vote(vote: &Vote) -> Self {
        match vote.labels.iter().next() {
            Some(label) if vote.labels.len() == 1 => AnswerKey::Single(*label),
            _ => AnswerKey::Multiple(vote.labels.clone()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnswerKey::Single(_) => 1,
            AnswerKey::Multiple(labels) => labels.len(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            AnswerKey::Single(label) => label.to_string(),
            AnswerKey::Multiple(labels) => labels.iter().collect(),
        }
    }

    // Marker shown when a question has no vote-derived key
    pub fn unknown() -> &'static str {
        "?"
    }
}

/// The option labels a user has picked for the current question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection(BTreeSet<char>);

impl Selection {
    pub fn single(label: char) -> Self {
        Self(BTreeSet::from([label]))
    }

    pub fn from_labels<I: IntoIterator<Item = char>>(labels: I) -> Self {
        Self(labels.into_iter().collect())
    }

    pub fn toggle(&mut self, label: char) {
        if !self.0.remove(&label) {
            self.0.insert(label);
        }
    }

    pub fn replace(&mut self, label: char) {
        self.0.clear();
        self.0.insert(label);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, label: char) -> bool {
        self.0.contains(&label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn labels(&self) -> &BTreeSet<char> {
        &self.0
    }

    pub fn as_label_string(&self) -> String {
        self.0.iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    InOrder,
    Exam,
    Revision,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::InOrder => "in_order",
            SessionMode::Exam => "exam",
            SessionMode::Revision => "revision",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in_order" | "in-order" | "inorder" | "order" => Some(SessionMode::InOrder),
            "exam" => Some(SessionMode::Exam),
            "revision" | "review" => Some(SessionMode::Revision),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionMode::InOrder => "In Order",
            SessionMode::Exam => "Exam",
            SessionMode::Revision => "Revision",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SessionMode::InOrder => {
                "Walk through questions sequentially from a starting number for a chosen count"
            }
            SessionMode::Exam => "Random set of 60 questions for a full practice exam",
            SessionMode::Revision => "Revisit only the questions you previously answered incorrectly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub correct: u32,
    pub incorrect: u32,
    pub accuracy: f64,
}

impl SessionSummary {
    pub fn new(correct: u32, incorrect: u32) -> Self {
        let answered = correct + incorrect;
        let accuracy = if answered == 0 {
            0.0
        } else {
            correct as f64 / answered as f64 * 100.0
        };
        Self {
            correct,
            incorrect,
            accuracy,
        }
    }

    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
