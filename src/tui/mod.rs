mod ui;
mod widgets;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::error;

use crate::db::Database;
use crate::error::QuizError;
use crate::ledger::MistakeTracker;
use crate::models::{Question, Selection, SessionMode, SessionSummary};
use crate::session::{
    self, ExplanationState, Explainer, SessionParams, SessionPlan, SessionRunner, Step, EXAM_SIZE,
};
use crate::store::QuestionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Menu,
    Setup,
    Question,
    Summary,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Start,
    Count,
}

#[derive(Debug, Clone)]
pub struct SetupForm {
    pub start: String,
    pub count: String,
    pub focus: SetupField,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            start: "1".to_string(),
            count: String::new(),
            focus: SetupField::Count,
        }
    }
}

impl SetupForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            SetupField::Start => &mut self.start,
            SetupField::Count => &mut self.count,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SetupField::Start => SetupField::Count,
            SetupField::Count => SetupField::Start,
        };
    }
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

pub struct App {
    store: QuestionStore,
    tracker: MistakeTracker,
    db: Database,
    explainer: Option<Box<dyn Explainer>>,
    pub view: View,
    pub menu: StatefulList<SessionMode>,
    pub help_shown: bool,
    pub setup: SetupForm,
    pub runner: Option<SessionRunner>,
    pub cursor: usize,
    pub selection: Selection,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: QuestionStore, tracker: MistakeTracker, db: Database) -> Self {
        Self {
            store,
            tracker,
            db,
            explainer: None,
            view: View::Menu,
            menu: StatefulList::with_items(vec![
                SessionMode::InOrder,
                SessionMode::Exam,
                SessionMode::Revision,
            ]),
            help_shown: false,
            setup: SetupForm::default(),
            runner: None,
            cursor: 0,
            selection: Selection::default(),
            status: None,
            should_quit: false,
        }
    }

    /// Missed answers wait for an explanation (or a skip) when an explainer is set.
    pub fn with_explainer(mut self, explainer: Option<Box<dyn Explainer>>) -> Self {
        self.explainer = explainer;
        self
    }

    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    pub fn tracker(&self) -> &MistakeTracker {
        &self.tracker
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.runner.as_ref()?.summary().ok()
    }

    pub fn current_question(&self) -> Option<&Question> {
        let index = self.runner.as_ref()?.current_index()?;
        self.store.get(index)
    }

    fn return_to_menu(&mut self) {
        self.runner = None;
        self.selection.clear();
        self.cursor = 0;
        self.view = View::Menu;
    }

    fn choose_mode(&mut self) {
        let Some(mode) = self.menu.selected_item().copied() else {
            return;
        };
        self.status = None;

        let params = match mode {
            SessionMode::InOrder => {
                self.setup = SetupForm::default();
                self.view = View::Setup;
                return;
            }
            SessionMode::Exam => SessionParams::Exam { size: EXAM_SIZE },
            SessionMode::Revision => SessionParams::Revision,
        };
        let plan = session::build(&params, &self.store, &self.tracker, &mut rand::thread_rng());
        self.begin(plan);
    }

    fn start_in_order(&mut self) {
        // Malformed numbers leave the form open
        let Some((start, count)) =
            session::parse_in_order_input(&self.setup.start, &self.setup.count)
        else {
            return;
        };
        let params = SessionParams::InOrder { start, count };
        let plan = session::build(&params, &self.store, &self.tracker, &mut rand::thread_rng());
        self.begin(plan);
    }

    fn begin(&mut self, plan: SessionPlan) {
        let mut runner = SessionRunner::new(plan).with_explanations(self.explainer.is_some());
        match runner.start() {
            Ok(_) => {
                self.runner = Some(runner);
                self.selection.clear();
                self.cursor = 0;
                self.view = View::Question;
            }
            Err(QuizError::EmptyPool) => {
                self.runner = None;
                self.view = View::Empty;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn pick_option(&mut self, label: char) {
        let Some(question) = self.current_question() else {
            return;
        };
        let Some(pos) = question.options.iter().position(|(l, _)| *l == label) else {
            return;
        };
        let multi = question.is_multi_select();
        self.cursor = pos;
        if multi {
            self.selection.toggle(label);
        } else {
            self.selection.replace(label);
        }
    }

    fn pick_at_cursor(&mut self) {
        let label = self
            .current_question()
            .and_then(|q| q.options.get(self.cursor))
            .map(|(label, _)| *label);
        if let Some(label) = label {
            self.pick_option(label);
        }
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = self.current_question().map_or(0, |q| q.options.len());
        if len == 0 {
            return;
        }
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    fn submit(&mut self) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        match runner.submit(&self.store, &mut self.tracker, &self.selection) {
            Ok(verdict) => {
                self.status = verdict
                    .ledger_error
                    .map(|e| format!("Could not save mistakes: {}", e));
            }
            Err(QuizError::EmptySelection) => {}
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn advance(&mut self) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        match runner.advance() {
            Ok(Step::Next(_)) => {
                self.selection.clear();
                self.cursor = 0;
                self.status = None;
            }
            Ok(Step::Complete(summary)) => {
                let mode = runner.mode();
                let pool_size = runner.plan().len();
                if let Err(e) = self.db.record_session(mode, pool_size, &summary) {
                    error!(error = %e, "failed to record session history");
                    self.status = Some(format!("Could not save session history: {}", e));
                }
                self.view = View::Summary;
            }
            Err(QuizError::ExplanationPending) => {
                self.status = Some("Press e for the explanation or s to skip".to_string());
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn explain(&mut self) {
        let (Some(runner), Some(explainer)) = (self.runner.as_mut(), self.explainer.as_deref())
        else {
            return;
        };
        self.status = runner
            .resolve_explanation(explainer, &self.store)
            .err()
            .map(|e| e.to_string());
    }

    fn skip_explanation(&mut self) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        self.status = runner.skip_explanation().err().map(|e| e.to_string());
    }

    pub fn explanation_pending(&self) -> bool {
        self.runner
            .as_ref()
            .and_then(|r| r.verdict())
            .is_some_and(|v| v.explanation == ExplanationState::Pending)
    }

    fn is_graded(&self) -> bool {
        self.runner.as_ref().is_some_and(|r| r.verdict().is_some())
    }

    fn handle_key(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        match self.view {
            View::Menu => match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('j') | KeyCode::Down => self.menu.next(),
                KeyCode::Char('k') | KeyCode::Up => self.menu.previous(),
                KeyCode::Char('?') => self.help_shown = !self.help_shown,
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => self.choose_mode(),
                _ => {}
            },

            View::Setup => match key {
                KeyCode::Esc => self.return_to_menu(),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    self.setup.toggle_focus()
                }
                KeyCode::Backspace => {
                    self.setup.focused_mut().pop();
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                    self.setup.focused_mut().push(c);
                }
                KeyCode::Enter => self.start_in_order(),
                _ => {}
            },

            View::Question => match key {
                KeyCode::Esc => self.return_to_menu(),
                KeyCode::Char('e') if self.explanation_pending() => self.explain(),
                KeyCode::Char('s') if self.explanation_pending() => self.skip_explanation(),
                KeyCode::Enter | KeyCode::Char('n') if self.is_graded() => self.advance(),
                _ if self.is_graded() => {}
                KeyCode::Enter => self.submit(),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(true),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(false),
                KeyCode::Char(' ') => self.pick_at_cursor(),
                KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                    self.pick_option(c.to_ascii_uppercase())
                }
                _ => {}
            },

            View::Summary | View::Empty => match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Enter | KeyCode::Esc => self.return_to_menu(),
                _ => {}
            },
        }
        Ok(())
    }
}

pub fn run(
    store: QuestionStore,
    tracker: MistakeTracker,
    db: Database,
    explainer: Option<Box<dyn Explainer>>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, tracker, db).with_explainer(explainer);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
