use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Could not persist {path}: {message}")]
    Persist { path: String, message: String },

    #[error("Invalid question at index {index}: {reason}")]
    InvalidQuestion { index: usize, reason: String },

    #[error("Question index {index} is out of range (store has {total})")]
    QuestionOutOfRange { index: usize, total: usize },

    #[error("No questions to present")]
    EmptyPool,

    #[error("No option selected")]
    EmptySelection,

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Explanation still pending")]
    ExplanationPending,
}

pub type Result<T> = std::result::Result<T, QuizError>;
