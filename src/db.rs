use chrono::Utc;
use rusqlite::{params, Connection, Result};
use serde::Serialize;
use std::path::Path;

use crate::models::{SessionMode, SessionSummary};

pub struct Database {
    conn: Connection,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub id: i64,
    pub mode: SessionMode,
    pub pool_size: i64,
    pub correct: i64,
    pub incorrect: i64,
    pub accuracy: f64,
    pub finished_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub total_sessions: i64,
    pub total_answered: i64,
    pub overall_accuracy: f64,
    pub best_exam_accuracy: Option<f64>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mode TEXT NOT NULL CHECK(mode IN ('in_order', 'exam', 'revision')),
                pool_size INTEGER NOT NULL,
                correct INTEGER NOT NULL,
                incorrect INTEGER NOT NULL,
                accuracy REAL NOT NULL,
                finished_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_mode ON sessions(mode);
            CREATE INDEX IF NOT EXISTS idx_sessions_finished ON sessions(finished_at);
            "#,
        )?;
        Ok(())
    }

    // Only completed sessions are recorded
    pub fn record_session(
        &self,
        mode: SessionMode,
        pool_size: usize,
        summary: &SessionSummary,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sessions (mode, pool_size, correct, incorrect, accuracy, finished_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                mode.as_str(),
                pool_size as i64,
                summary.correct,
                summary.incorrect,
                summary.accuracy,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, mode, pool_size, correct, incorrect, accuracy, finished_at
             FROM sessions
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let mode_str: String = row.get(1)?;
            Ok(SessionRecord {
                id: row.get(0)?,
                mode: SessionMode::from_str(&mode_str).unwrap_or(SessionMode::InOrder),
                pool_size: row.get(2)?,
                correct: row.get(3)?,
                incorrect: row.get(4)?,
                accuracy: row.get(5)?,
                finished_at: row.get(6)?,
            })
        })?;

        rows.collect()
    }

    pub fn get_stats(&self) -> Result<Stats> {
        let (total_sessions, correct, incorrect): (i64, i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(correct), 0), COALESCE(SUM(incorrect), 0) FROM sessions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let best_exam_accuracy: Option<f64> = self.conn.query_row(
            "SELECT MAX(accuracy) FROM sessions WHERE mode = 'exam'",
            [],
            |row| row.get(0),
        )?;

        let total_answered = correct + incorrect;
        let overall_accuracy = if total_answered == 0 {
            0.0
        } else {
            correct as f64 / total_answered as f64 * 100.0
        };

        Ok(Stats {
            total_sessions,
            total_answered,
            overall_accuracy,
            best_exam_accuracy,
        })
    }
}
