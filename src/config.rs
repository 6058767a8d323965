use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const APP_DIR: &str = "certquiz";
const DEFAULT_QUESTIONS_NAME: &str = "questions.json";
const DEFAULT_LEDGER_NAME: &str = "wrong_questions.json";
const DEFAULT_DB_NAME: &str = "history.db";
const DEFAULT_LOG_NAME: &str = "certquiz.log";

pub const QUESTIONS_ENV: &str = "CERTQUIZ_QUESTIONS";
pub const LEDGER_ENV: &str = "CERTQUIZ_LEDGER";
pub const DB_ENV: &str = "CERTQUIZ_DB";
pub const LOG_FILE_ENV: &str = "CERTQUIZ_LOG_FILE";
pub const EXPLAIN_CMD_ENV: &str = "CERTQUIZ_EXPLAIN_CMD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub questions: PathBuf,
    pub ledger: PathBuf,
    pub history: PathBuf,
    pub log: PathBuf,
}

impl Paths {
    /// Flag beats environment variable beats the per-user config directory.
    pub fn resolve(questions: Option<PathBuf>, ledger: Option<PathBuf>) -> Self {
        Self {
            questions: pick(questions, QUESTIONS_ENV, DEFAULT_QUESTIONS_NAME),
            ledger: pick(ledger, LEDGER_ENV, DEFAULT_LEDGER_NAME),
            history: pick(None, DB_ENV, DEFAULT_DB_NAME),
            log: pick(None, LOG_FILE_ENV, DEFAULT_LOG_NAME),
        }
    }
}

/// Program used to explain missed questions, if any. Blank values count as unset.
pub fn explain_command(flag: Option<String>) -> Option<String> {
    flag
        .or_else(|| std::env::var(EXPLAIN_CMD_ENV).ok())
        .map(|cmd| cmd.trim().to_string())
        .filter(|cmd| !cmd.is_empty())
}

fn pick(flag: Option<PathBuf>, env_key: &str, default_name: &str) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Ok(path) = std::env::var(env_key) {
        return PathBuf::from(path);
    }
    app_dir().join(default_name)
}

pub fn app_dir() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);

    std::fs::create_dir_all(&config_dir).ok();
    config_dir
}

/// Routes `tracing` output to a file, since the terminal UI owns the screen.
/// Logging is silently disabled when the file cannot be opened.
pub fn init_logging(path: &Path) {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
