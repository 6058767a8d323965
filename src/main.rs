mod config;
mod db;
mod error;
mod explain;
mod grader;
mod ledger;
mod models;
mod session;
mod store;
mod tui;
mod vote;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::Paths;
use db::Database;
use explain::CommandExplainer;
use ledger::MistakeTracker;
use models::JsonOutput;
use session::Explainer;
use store::QuestionStore;

const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Parser)]
#[command(name = "certquiz")]
#[command(about = "A terminal quiz trainer for multiple-choice certification exams")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the questions file
    #[arg(long, global = true)]
    questions: Option<PathBuf>,

    /// Path to the missed-questions ledger
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Program that explains missed questions (called with the question and its options)
    #[arg(long, global = true)]
    explain_cmd: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive quiz (default)
    Tui,

    /// Show a question with its answer and votes
    Show {
        /// Question number (1-based)
        number: usize,
    },

    /// Manage the missed-questions ledger
    #[command(subcommand)]
    Mistakes(MistakeCommands),

    /// List recently completed sessions
    History {
        /// Maximum number of sessions to show
        #[arg(long, short, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },

    /// Show overall statistics
    Stats,
}

#[derive(Subcommand)]
enum MistakeCommands {
    /// List tracked questions
    List,

    /// Remove every tracked question
    Clear,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let paths = Paths::resolve(cli.questions.clone(), cli.ledger.clone());
    config::init_logging(&paths.log);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let store = QuestionStore::load(&paths.questions)?;
            let tracker = MistakeTracker::open(&paths.ledger);
            let db = open_history(&paths)?;
            let explainer = config::explain_command(cli.explain_cmd.clone())
                .map(|program| Box::new(CommandExplainer::new(program)) as Box<dyn Explainer>);
            tui::run(store, tracker, db, explainer)?;
        }

        Commands::Show { number } => {
            let store = QuestionStore::load(&paths.questions)?;
            let tracker = MistakeTracker::open(&paths.ledger);
            let Some(question) = number.checked_sub(1).and_then(|i| store.get(i)) else {
                let msg = format!("Question {} not found ({} available)", number, store.len());
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::<()>::err(msg))?);
                } else {
                    println!("{}", msg);
                }
                return Ok(());
            };

            let answer = question
                .answer_key()
                .map(|k| k.display())
                .unwrap_or_else(|| models::AnswerKey::unknown().to_string());
            let votes: Vec<String> = question.votes.iter().map(ToString::to_string).collect();
            let record = tracker.get(number - 1);

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "number": number,
                        "question": question.clean_prompt(),
                        "options": question.clean_options(),
                        "answer": answer,
                        "votes": votes,
                        "mistake": record,
                    })))?
                );
            } else {
                println!("Question #{}", number);
                println!();
                println!("{}", question.clean_prompt());
                println!();
                println!("{}", question.options_text());
                println!();
                println!("Answer: {}", answer);
                println!(
                    "Votes: {}",
                    if votes.is_empty() {
                        "-".to_string()
                    } else {
                        votes.join(", ")
                    }
                );
                if let Some(r) = record {
                    println!(
                        "Missed (last answer {}), correct since: {}",
                        r.last_wrong, r.correct_count
                    );
                }
            }
        }

        Commands::Mistakes(cmd) => match cmd {
            MistakeCommands::List => {
                let tracker = MistakeTracker::open(&paths.ledger);
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(tracker.records()))?);
                } else if tracker.is_empty() {
                    println!("No missed questions.");
                } else {
                    println!("{:<8} {:<12} CORRECT SINCE", "NUMBER", "LAST WRONG");
                    println!("{}", "-".repeat(36));
                    for (index, record) in tracker.records() {
                        println!(
                            "{:<8} {:<12} {}/{}",
                            index + 1,
                            record.last_wrong,
                            record.correct_count,
                            ledger::MASTERY_THRESHOLD
                        );
                    }
                }
            }

            MistakeCommands::Clear => {
                let mut tracker = MistakeTracker::open(&paths.ledger);
                let removed = tracker.clear()?;
                if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                            "removed": removed,
                            "path": tracker.path().display().to_string()
                        })))?
                    );
                } else {
                    println!(
                        "Cleared {} missed questions from {}.",
                        removed,
                        tracker.path().display()
                    );
                }
            }
        },

        Commands::History { limit } => {
            let db = open_history(&paths)?;
            let sessions = db.recent_sessions(limit)?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&sessions))?);
            } else if sessions.is_empty() {
                println!("No completed sessions yet.");
            } else {
                println!(
                    "{:<5} {:<10} {:>5} {:>8} {:>6} {:>9}  FINISHED",
                    "ID", "MODE", "SIZE", "CORRECT", "WRONG", "ACCURACY"
                );
                println!("{}", "-".repeat(72));
                for s in sessions {
                    println!(
                        "{:<5} {:<10} {:>5} {:>8} {:>6} {:>8.1}%  {}",
                        s.id,
                        s.mode.label(),
                        s.pool_size,
                        s.correct,
                        s.incorrect,
                        s.accuracy,
                        truncate(&s.finished_at, 19)
                    );
                }
            }
        }

        Commands::Stats => {
            let db = open_history(&paths)?;
            let stats = db.get_stats()?;
            let tracker = MistakeTracker::open(&paths.ledger);
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "total_sessions": stats.total_sessions,
                        "total_answered": stats.total_answered,
                        "overall_accuracy": stats.overall_accuracy,
                        "best_exam_accuracy": stats.best_exam_accuracy,
                        "to_revise": tracker.len()
                    })))?
                );
            } else {
                println!("=== Quiz Statistics ===");
                println!("Completed sessions: {}", stats.total_sessions);
                println!("Questions answered: {}", stats.total_answered);
                println!("Overall accuracy: {:.1}%", stats.overall_accuracy);
                match stats.best_exam_accuracy {
                    Some(best) => println!("Best exam: {:.1}%", best),
                    None => println!("Best exam: -"),
                }
                println!("Questions to revise: {}", tracker.len());
            }
        }
    }

    Ok(())
}

fn open_history(paths: &Paths) -> Result<Database, Box<dyn std::error::Error>> {
    let db = Database::open(&paths.history)?;
    db.init()?;
    Ok(db)
}

fn truncate(s: &str, max_len: usize) -> &str {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
