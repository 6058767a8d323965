//! Quiz sessions: building the question pool for a mode and driving it one
//! question at a time through submit, grade and advance.

use rand::seq::index::sample;
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::error::{QuizError, Result};
use crate::grader::grade;
use crate::ledger::{CorrectOutcome, MistakeTracker};
use crate::models::{Selection, SessionMode, SessionSummary};
use crate::store::QuestionStore;

pub const EXAM_SIZE: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionParams {
    InOrder { start: i64, count: i64 },
    Exam { size: usize },
    Revision,
}

/// The resolved, ordered pool of store indices for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub mode: SessionMode,
    pub pool: Vec<usize>,
    // 1-based number of the first question, only meaningful for in-order sessions
    pub abs_start: usize,
}

impl SessionPlan {
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

pub fn build<R: Rng + ?Sized>(
    params: &SessionParams,
    store: &QuestionStore,
    tracker: &MistakeTracker,
    rng: &mut R,
) -> SessionPlan {
    let plan = match params {
        SessionParams::InOrder { start, count } => build_in_order(store.len(), *start, *count),
        SessionParams::Exam { size } => build_exam(store.len(), *size, rng),
        SessionParams::Revision => build_revision(tracker, store.len()),
    };
    info!(mode = plan.mode.as_str(), questions = plan.len(), "built session pool");
    plan
}

/// Parses the in-order setup fields. Anything that is not an integer is rejected.
pub fn parse_in_order_input(start: &str, count: &str) -> Option<(i64, i64)> {
    let start = start.trim().parse::<i64>().ok()?;
    let count = count.trim().parse::<i64>().ok()?;
    Some((start, count))
}

pub fn build_in_order(total: usize, start: i64, count: i64) -> SessionPlan {
    if total == 0 || count <= 0 {
        return SessionPlan {
            mode: SessionMode::InOrder,
            pool: Vec::new(),
            abs_start: 1,
        };
    }

    let start = start.clamp(1, total as i64) as usize;
    let end = (start - 1).saturating_add(count as usize).min(total);

    SessionPlan {
        mode: SessionMode::InOrder,
        pool: (start - 1..end).collect(),
        abs_start: start,
    }
}

pub fn build_exam<R: Rng + ?Sized>(total: usize, size: usize, rng: &mut R) -> SessionPlan {
    let amount = size.min(total);
    SessionPlan {
        mode: SessionMode::Exam,
        pool: sample(rng, total, amount).into_vec(),
        abs_start: 1,
    }
}

/// Tracked indices the store no longer has (a shorter or different question
/// file) are left out of the pool.
pub fn build_revision(tracker: &MistakeTracker, total: usize) -> SessionPlan {
    let (pool, stale): (Vec<usize>, Vec<usize>) = tracker
        .sorted_indices()
        .into_iter()
        .partition(|&index| index < total);
    if !stale.is_empty() {
        warn!(?stale, total, "skipping ledger entries beyond the question store");
    }

    SessionPlan {
        mode: SessionMode::Revision,
        pool,
        abs_start: 1,
    }
}

/// Source of natural-language explanations for a missed question.
pub trait Explainer {
    fn explain(&self, question: &str, options: &str) -> std::result::Result<String, String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationState {
    NotRequested,
    Pending,
    Ready(String),
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub index: usize,
    pub correct: bool,
    pub submitted: String,
    pub answer: String,
    pub votes: Vec<String>,
    pub explanation: ExplanationState,
    pub ledger_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Next(usize),
    Complete(SessionSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Question,
    Graded(Verdict),
    Complete,
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Question => "showing a question",
            Phase::Graded(_) => "showing a graded answer",
            Phase::Complete => "complete",
        }
    }
}

pub struct SessionRunner {
    plan: SessionPlan,
    position: usize,
    correct: u32,
    incorrect: u32,
    explanations: bool,
    phase: Phase,
}

impl SessionRunner {
    pub fn new(plan: SessionPlan) -> Self {
        Self {
            plan,
            position: 0,
            correct: 0,
            incorrect: 0,
            explanations: false,
            phase: Phase::Idle,
        }
    }

    /// When enabled, a wrong answer holds the session until an explanation
    /// has been supplied or skipped.
    pub fn with_explanations(mut self, enabled: bool) -> Self {
        self.explanations = enabled;
        self
    }

    pub fn start(&mut self) -> Result<usize> {
        if self.plan.is_empty() {
            return Err(QuizError::EmptyPool);
        }
        self.position = 0;
        self.correct = 0;
        self.incorrect = 0;
        self.phase = Phase::Question;
        info!(
            mode = self.plan.mode.as_str(),
            questions = self.plan.len(),
            "session started"
        );
        Ok(self.plan.pool[0])
    }

    pub fn mode(&self) -> SessionMode {
        self.plan.mode
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    /// Store index of the question on screen, if any.
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Question | Phase::Graded(_) => self.plan.pool.get(self.position).copied(),
            Phase::Idle | Phase::Complete => None,
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.phase {
            Phase::Graded(verdict) => Some(verdict),
            _ => None,
        }
    }

    pub fn progress_label(&self) -> String {
        let base = format!("Question {}/{}", self.position + 1, self.plan.len());
        if self.plan.mode == SessionMode::InOrder {
            format!("{} (Overall #{})", base, self.plan.abs_start + self.position)
        } else {
            base
        }
    }

    pub fn submit(
        &mut self,
        store: &QuestionStore,
        tracker: &mut MistakeTracker,
        selection: &Selection,
    ) -> Result<Verdict> {
        if self.phase != Phase::Question {
            return Err(self.invalid("submit an answer"));
        }
        if selection.is_empty() {
            return Err(QuizError::EmptySelection);
        }

        let index = self.plan.pool[self.position];
        let question = store.require(index)?;
        let result = grade(question, selection);
        let submitted = selection.as_label_string();

        let ledger = if result.correct {
            self.correct += 1;
            tracker.record_correct(index).map(|outcome| {
                if outcome != CorrectOutcome::Untracked {
                    debug!(index, ?outcome, "revision progress");
                }
            })
        } else {
            self.incorrect += 1;
            tracker.record_wrong(index, &submitted)
        };
        let ledger_error = ledger.err().map(|e| {
            error!(index, error = %e, "ledger update failed");
            e.to_string()
        });

        let explanation = if !result.correct && self.explanations {
            ExplanationState::Pending
        } else {
            ExplanationState::NotRequested
        };

        let verdict = Verdict {
            index,
            correct: result.correct,
            submitted,
            answer: result.key_display(),
            votes: question.votes.iter().map(ToString::to_string).collect(),
            explanation,
            ledger_error,
        };
        self.phase = Phase::Graded(verdict.clone());
        Ok(verdict)
    }

    /// Asks `explainer` about the current question. Failures become the
    /// explanation text rather than an error.
    pub fn resolve_explanation(
        &mut self,
        explainer: &dyn Explainer,
        store: &QuestionStore,
    ) -> Result<()> {
        let index = self.pending_index("fetch an explanation")?;
        let question = store.require(index)?;
        let text = match explainer.explain(&question.clean_prompt(), &question.options_text()) {
            Ok(text) => text,
            Err(e) => {
                error!(index, error = %e, "explanation request failed");
                format!("[Error fetching explanation: {}]", e)
            }
        };
        self.set_explanation(ExplanationState::Ready(text));
        Ok(())
    }

    pub fn skip_explanation(&mut self) -> Result<()> {
        self.pending_index("skip an explanation")?;
        self.set_explanation(ExplanationState::Skipped);
        Ok(())
    }

    pub fn advance(&mut self) -> Result<Step> {
        let Phase::Graded(verdict) = &self.phase else {
            return Err(self.invalid("advance"));
        };
        if verdict.explanation == ExplanationState::Pending {
            return Err(QuizError::ExplanationPending);
        }

        if self.position + 1 < self.plan.len() {
            self.position += 1;
            self.phase = Phase::Question;
            Ok(Step::Next(self.plan.pool[self.position]))
        } else {
            self.phase = Phase::Complete;
            let summary = SessionSummary::new(self.correct, self.incorrect);
            info!(
                mode = self.plan.mode.as_str(),
                correct = summary.correct,
                incorrect = summary.incorrect,
                "session complete"
            );
            Ok(Step::Complete(summary))
        }
    }

    pub fn summary(&self) -> Result<SessionSummary> {
        if self.phase != Phase::Complete {
            return Err(self.invalid("summarise"));
        }
        Ok(SessionSummary::new(self.correct, self.incorrect))
    }

    fn pending_index(&self, action: &'static str) -> Result<usize> {
        match &self.phase {
            Phase::Graded(v) if v.explanation == ExplanationState::Pending => Ok(v.index),
            _ => Err(self.invalid(action)),
        }
    }

    fn set_explanation(&mut self, state: ExplanationState) {
        if let Phase::Graded(verdict) = &mut self.phase {
            verdict.explanation = state;
        }
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            action,
            state: self.phase.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use crate::vote::Vote;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    // Question i answers 'A', except every fifth which needs "BC"
    fn make_store(total: usize) -> QuestionStore {
        let questions = (0..total)
            .map(|i| Question {
                prompt: format!("Question #{} prompt {}", i + 1, i),
                options: vec![
                    ('A', "alpha".to_string()),
                    ('B', "bravo".to_string()),
                    ('C', "charlie".to_string()),
                ],
                votes: if i % 5 == 4 {
                    vec![Vote::parse("BC (80%)").unwrap(), Vote::parse("B (20%)").unwrap()]
                } else {
                    vec![Vote::parse("A (100%)").unwrap()]
                },
                top_vote_malformed: false,
            })
            .collect();
        QuestionStore::from_questions(questions)
    }

    fn setup_tracker() -> (tempfile::TempDir, MistakeTracker) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let tracker = MistakeTracker::open(dir.path().join("wrong_questions.json"));
        (dir, tracker)
    }

    mod builder_tests {
        use super::*;

        #[test]
        fn in_order_truncates_tail() {
            let plan = build_in_order(90, 85, 10);
            assert_eq!(plan.pool, (84..=89).collect::<Vec<_>>());
            assert_eq!(plan.len(), 6);
            assert_eq!(plan.abs_start, 85);
        }

        #[test]
        fn in_order_clamps_start() {
            assert_eq!(build_in_order(10, 0, 2).pool, vec![0, 1]);
            assert_eq!(build_in_order(10, -5, 1).pool, vec![0]);
            assert_eq!(build_in_order(10, 500, 3).pool, vec![9]);
        }

        #[test]
        fn in_order_zero_or_negative_count_is_empty() {
            assert!(build_in_order(10, 1, 0).is_empty());
            assert!(build_in_order(10, 1, -3).is_empty());
        }

        #[test]
        fn in_order_empty_store() {
            assert!(build_in_order(0, 1, 10).is_empty());
        }

        #[test]
        fn in_order_huge_count() {
            let plan = build_in_order(5, 2, i64::MAX);
            assert_eq!(plan.pool, vec![1, 2, 3, 4]);
        }

        #[test]
        fn parse_input_rejects_non_integers() {
            assert_eq!(parse_in_order_input("3", " 10 "), Some((3, 10)));
            assert!(parse_in_order_input("abc", "10").is_none());
            assert!(parse_in_order_input("1", "").is_none());
            assert!(parse_in_order_input("1.5", "2").is_none());
        }

        #[test]
        fn exam_caps_at_store_size() {
            let mut rng = StdRng::seed_from_u64(7);
            let plan = build_exam(40, EXAM_SIZE, &mut rng);
            assert_eq!(plan.len(), 40);
            let unique: HashSet<_> = plan.pool.iter().collect();
            assert_eq!(unique.len(), 40);
        }

        #[test]
        fn exam_samples_without_replacement() {
            let mut rng = StdRng::seed_from_u64(42);
            let plan = build_exam(500, EXAM_SIZE, &mut rng);
            assert_eq!(plan.len(), 60);
            let unique: HashSet<_> = plan.pool.iter().collect();
            assert_eq!(unique.len(), 60);
            assert!(plan.pool.iter().all(|i| *i < 500));
            assert_eq!(plan.mode, SessionMode::Exam);
        }

        #[test]
        fn exam_empty_store() {
            let mut rng = StdRng::seed_from_u64(1);
            assert!(build_exam(0, EXAM_SIZE, &mut rng).is_empty());
        }

        #[test]
        fn revision_uses_sorted_ledger() {
            let (_dir, mut tracker) = setup_tracker();
            tracker.record_wrong(30, "B").unwrap();
            tracker.record_wrong(2, "C").unwrap();
            let plan = build_revision(&tracker, 40);
            assert_eq!(plan.pool, vec![2, 30]);
            assert_eq!(plan.mode, SessionMode::Revision);
        }

        #[test]
        fn revision_skips_indices_beyond_store() {
            let (_dir, mut tracker) = setup_tracker();
            tracker.record_wrong(0, "B").unwrap();
            tracker.record_wrong(50, "C").unwrap();

            let plan = build_revision(&tracker, 1);
            assert_eq!(plan.pool, vec![0]);
            // Stale entries stay in the ledger
            assert!(tracker.contains(50));
        }

        #[test]
        fn revision_with_only_stale_indices_is_empty() {
            let store = make_store(1);
            let (_dir, mut tracker) = setup_tracker();
            tracker.record_wrong(50, "C").unwrap();
            let mut rng = StdRng::seed_from_u64(1);

            let plan = build(&SessionParams::Revision, &store, &tracker, &mut rng);
            assert!(plan.is_empty());
            let mut runner = SessionRunner::new(plan);
            assert!(matches!(runner.start(), Err(QuizError::EmptyPool)));
        }

        #[test]
        fn build_dispatches_by_params() {
            let store = make_store(20);
            let (_dir, tracker) = setup_tracker();
            let mut rng = StdRng::seed_from_u64(3);

            let plan = build(
                &SessionParams::InOrder { start: 3, count: 2 },
                &store,
                &tracker,
                &mut rng,
            );
            assert_eq!(plan.pool, vec![2, 3]);

            let plan = build(&SessionParams::Exam { size: 5 }, &store, &tracker, &mut rng);
            assert_eq!(plan.len(), 5);

            let plan = build(&SessionParams::Revision, &store, &tracker, &mut rng);
            assert!(plan.is_empty());
        }
    }

    mod runner_tests {
        use super::*;

        #[test]
        fn empty_pool_never_shows_a_question() {
            let (_dir, tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_revision(&tracker, 10));
            assert!(matches!(runner.start(), Err(QuizError::EmptyPool)));
            assert!(runner.current_index().is_none());
            assert!(runner.verdict().is_none());
        }

        #[test]
        fn full_session_counts_and_summarises() {
            let store = make_store(10);
            let (_dir, mut tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_in_order(10, 1, 10));
            assert_eq!(runner.start().unwrap(), 0);

            for step in 0..10 {
                let answer = if step < 7 { 'A' } else { 'C' };
                let index = runner.current_index().unwrap();
                let selection = if index % 5 == 4 && step < 7 {
                    Selection::from_labels(['B', 'C'])
                } else {
                    Selection::single(answer)
                };
                runner.submit(&store, &mut tracker, &selection).unwrap();
                runner.advance().unwrap();
            }

            let summary = runner.summary().unwrap();
            assert_eq!(summary.correct, 7);
            assert_eq!(summary.incorrect, 3);
            assert_eq!(summary.accuracy, 70.0);
            assert_eq!(tracker.sorted_indices(), vec![7, 8, 9]);
        }

        #[test]
        fn wrong_answer_is_recorded_with_label_string() {
            let store = make_store(5);
            let (_dir, mut tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_in_order(5, 5, 1));
            runner.start().unwrap();

            let verdict = runner
                .submit(&store, &mut tracker, &Selection::from_labels(['A', 'C']))
                .unwrap();
            assert!(!verdict.correct);
            assert_eq!(verdict.submitted, "AC");
            assert_eq!(verdict.answer, "BC");
            assert_eq!(verdict.votes, vec!["BC (80%)", "B (20%)"]);
            assert_eq!(tracker.get(4).unwrap().last_wrong, "AC");
        }

        #[test]
        fn correct_answer_updates_ledger_in_any_mode() {
            let store = make_store(3);
            let (_dir, mut tracker) = setup_tracker();
            tracker.record_wrong(1, "B").unwrap();

            let mut rng = StdRng::seed_from_u64(9);
            let mut runner = SessionRunner::new(build_exam(3, EXAM_SIZE, &mut rng));
            runner.start().unwrap();
            loop {
                runner
                    .submit(&store, &mut tracker, &Selection::single('A'))
                    .unwrap();
                if let Step::Complete(_) = runner.advance().unwrap() {
                    break;
                }
            }

            assert_eq!(tracker.get(1).unwrap().correct_count, 1);
        }

        #[test]
        fn revision_retires_after_three_sessions() {
            let store = make_store(3);
            let (_dir, mut tracker) = setup_tracker();
            tracker.record_wrong(2, "C").unwrap();

            for _ in 0..3 {
                let mut runner = SessionRunner::new(build_revision(&tracker, store.len()));
                runner.start().unwrap();
                runner
                    .submit(&store, &mut tracker, &Selection::single('A'))
                    .unwrap();
                runner.advance().unwrap();
            }

            assert!(tracker.is_empty());
            let mut runner = SessionRunner::new(build_revision(&tracker, store.len()));
            assert!(runner.start().is_err());
        }

        #[test]
        fn in_order_progress_label_shows_overall_number() {
            let mut runner = SessionRunner::new(build_in_order(90, 85, 10));
            runner.start().unwrap();
            assert_eq!(runner.progress_label(), "Question 1/6 (Overall #85)");
        }

        #[test]
        fn exam_progress_label() {
            let mut rng = StdRng::seed_from_u64(5);
            let mut runner = SessionRunner::new(build_exam(10, 4, &mut rng));
            runner.start().unwrap();
            assert_eq!(runner.progress_label(), "Question 1/4");
        }

        #[test]
        fn question_without_votes_grades_incorrect() {
            let store = QuestionStore::from_questions(vec![Question {
                prompt: "q".to_string(),
                options: vec![('A', "a".to_string())],
                votes: vec![],
                top_vote_malformed: false,
            }]);
            let (_dir, mut tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_in_order(1, 1, 1));
            runner.start().unwrap();

            let verdict = runner
                .submit(&store, &mut tracker, &Selection::single('A'))
                .unwrap();
            assert!(!verdict.correct);
            assert_eq!(verdict.answer, "?");
            assert!(verdict.votes.is_empty());
        }

        #[test]
        fn ledger_failure_does_not_abort_grading() {
            let store = make_store(2);
            let dir = tempfile::tempdir().unwrap();
            let mut tracker = MistakeTracker::open(dir.path().join("nope").join("ledger.json"));
            let mut runner = SessionRunner::new(build_in_order(2, 1, 2));
            runner.start().unwrap();

            let verdict = runner
                .submit(&store, &mut tracker, &Selection::single('B'))
                .unwrap();
            assert!(verdict.ledger_error.is_some());
            assert_eq!(runner.incorrect(), 1);
            assert!(runner.advance().is_ok());
        }
    }

    mod transition_tests {
        use super::*;

        #[test]
        fn submit_before_start_is_invalid() {
            let store = make_store(2);
            let (_dir, mut tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_in_order(2, 1, 2));
            let err = runner
                .submit(&store, &mut tracker, &Selection::single('A'))
                .unwrap_err();
            assert!(matches!(
                err,
                QuizError::InvalidTransition { state: "idle", .. }
            ));
        }

        #[test]
        fn double_submit_is_invalid() {
            let store = make_store(2);
            let (_dir, mut tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_in_order(2, 1, 2));
            runner.start().unwrap();
            runner
                .submit(&store, &mut tracker, &Selection::single('A'))
                .unwrap();
            assert!(runner
                .submit(&store, &mut tracker, &Selection::single('B'))
                .is_err());
            assert_eq!(runner.correct(), 1);
            assert_eq!(runner.incorrect(), 0);
        }

        #[test]
        fn empty_selection_is_ignored() {
            let store = make_store(2);
            let (_dir, mut tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_in_order(2, 1, 2));
            runner.start().unwrap();
            assert!(matches!(
                runner.submit(&store, &mut tracker, &Selection::default()),
                Err(QuizError::EmptySelection)
            ));
            assert!(runner.verdict().is_none());
            assert_eq!(runner.current_index(), Some(0));
        }

        #[test]
        fn advance_requires_graded() {
            let mut runner = SessionRunner::new(build_in_order(2, 1, 2));
            runner.start().unwrap();
            assert!(runner.advance().is_err());
        }

        #[test]
        fn summary_requires_complete() {
            let mut runner = SessionRunner::new(build_in_order(2, 1, 2));
            assert!(runner.summary().is_err());
            runner.start().unwrap();
            assert!(runner.summary().is_err());
        }

        #[test]
        fn advance_walks_pool_then_completes() {
            let store = make_store(3);
            let (_dir, mut tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_in_order(3, 2, 2));
            runner.start().unwrap();

            runner
                .submit(&store, &mut tracker, &Selection::single('A'))
                .unwrap();
            assert_eq!(runner.advance().unwrap(), Step::Next(2));
            runner
                .submit(&store, &mut tracker, &Selection::single('A'))
                .unwrap();
            assert_eq!(
                runner.advance().unwrap(),
                Step::Complete(SessionSummary::new(2, 0))
            );
            assert!(runner.current_index().is_none());
        }
    }

    mod explanation_tests {
        use super::*;

        struct FixedExplainer(std::result::Result<String, String>);

        impl Explainer for FixedExplainer {
            fn explain(
                &self,
                question: &str,
                options: &str,
            ) -> std::result::Result<String, String> {
                assert!(!question.contains("Question #"));
                assert!(options.starts_with("A. alpha"));
                self.0.clone()
            }
        }

        fn graded_wrong() -> (tempfile::TempDir, QuestionStore, SessionRunner) {
            let store = make_store(2);
            let (dir, mut tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_in_order(2, 1, 2)).with_explanations(true);
            runner.start().unwrap();
            let verdict = runner
                .submit(&store, &mut tracker, &Selection::single('C'))
                .unwrap();
            assert_eq!(verdict.explanation, ExplanationState::Pending);
            (dir, store, runner)
        }

        #[test]
        fn pending_explanation_blocks_advance() {
            let (_dir, _store, mut runner) = graded_wrong();
            assert!(matches!(
                runner.advance(),
                Err(QuizError::ExplanationPending)
            ));
            runner.skip_explanation().unwrap();
            assert_eq!(
                runner.verdict().unwrap().explanation,
                ExplanationState::Skipped
            );
            assert!(runner.advance().is_ok());
        }

        #[test]
        fn explainer_text_is_attached() {
            let (_dir, store, mut runner) = graded_wrong();
            let explainer = FixedExplainer(Ok("A is the object store.".to_string()));
            runner.resolve_explanation(&explainer, &store).unwrap();
            assert_eq!(
                runner.verdict().unwrap().explanation,
                ExplanationState::Ready("A is the object store.".to_string())
            );
            assert!(runner.advance().is_ok());
        }

        #[test]
        fn explainer_failure_becomes_text() {
            let (_dir, store, mut runner) = graded_wrong();
            let explainer = FixedExplainer(Err("timeout".to_string()));
            runner.resolve_explanation(&explainer, &store).unwrap();
            assert_eq!(
                runner.verdict().unwrap().explanation,
                ExplanationState::Ready("[Error fetching explanation: timeout]".to_string())
            );
        }

        #[test]
        fn correct_answer_needs_no_explanation() {
            let store = make_store(2);
            let (_dir, mut tracker) = setup_tracker();
            let mut runner = SessionRunner::new(build_in_order(2, 1, 2)).with_explanations(true);
            runner.start().unwrap();
            let verdict = runner
                .submit(&store, &mut tracker, &Selection::single('A'))
                .unwrap();
            assert_eq!(verdict.explanation, ExplanationState::NotRequested);
            assert!(runner.skip_explanation().is_err());
            assert!(runner.advance().is_ok());
        }

        #[test]
        fn explanation_resolves_only_once() {
            let (_dir, store, mut runner) = graded_wrong();
            let explainer = FixedExplainer(Ok("first".to_string()));
            runner.resolve_explanation(&explainer, &store).unwrap();
            assert!(matches!(
                runner.resolve_explanation(&explainer, &store),
                Err(QuizError::InvalidTransition { .. })
            ));
            assert!(runner.skip_explanation().is_err());
            assert_eq!(
                runner.verdict().unwrap().explanation,
                ExplanationState::Ready("first".to_string())
            );
        }
    }
}
