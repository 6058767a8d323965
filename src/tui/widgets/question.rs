use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::models::Question;
use crate::session::{ExplanationState, Verdict};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let (Some(runner), Some(question)) = (&app.runner, app.current_question()) else {
        let block = Block::default().borders(Borders::ALL).title(" Question ");
        f.render_widget(Paragraph::new("No question").block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40), // Prompt
            Constraint::Min(5),         // Options
            Constraint::Length(7),      // Feedback
        ])
        .split(area);

    let missed = runner
        .current_index()
        .is_some_and(|index| app.tracker().contains(index));
    draw_prompt(f, &runner.progress_label(), question, missed, chunks[0]);
    draw_options(f, app, question, chunks[1]);
    draw_feedback(f, runner.verdict(), chunks[2]);
}

fn draw_prompt(f: &mut Frame, progress: &str, question: &Question, missed: bool, area: Rect) {
    let mut text = vec![Line::from(question.clean_prompt())];
    if missed {
        text.insert(
            0,
            Line::from(Span::styled(
                "Previously missed",
                Style::default().fg(Color::Magenta),
            )),
        );
    }
    if let Some(key) = question.answer_key() {
        if key.len() > 1 {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                format!("(Select {})", key.len()),
                Style::default().fg(Color::Cyan),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", progress))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_options(f: &mut Frame, app: &App, question: &Question, area: Rect) {
    let multi = question.is_multi_select();

    let items: Vec<ListItem> = question
        .clean_options()
        .into_iter()
        .map(|(label, text)| {
            let chosen = app.selection.contains(label);
            let marker = match (multi, chosen) {
                (true, true) => "[x]",
                (true, false) => "[ ]",
                (false, true) => "(*)",
                (false, false) => "( )",
            };
            let style = if chosen {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), style),
                Span::styled(format!("{}. {}", label, text), style),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Options ")
        .title_style(Style::default().fg(Color::Cyan));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.cursor));

    f.render_stateful_widget(list, area, &mut state);
}

fn draw_feedback(f: &mut Frame, verdict: Option<&Verdict>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Feedback ")
        .title_style(Style::default().fg(Color::Cyan));

    let Some(verdict) = verdict else {
        f.render_widget(block, area);
        return;
    };

    let headline = if verdict.correct {
        Span::styled(
            "Correct!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )
    } else {
        Span::styled(
            format!(
                "Incorrect! You chose {}, answer: {}",
                verdict.submitted, verdict.answer
            ),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )
    };

    let mut text = vec![Line::from(headline)];
    if !verdict.votes.is_empty() {
        text.push(Line::from(vec![
            Span::styled("Votes: ", Style::default().fg(Color::Gray)),
            Span::styled(verdict.votes.join(", "), Style::default().fg(Color::White)),
        ]));
    }

    match &verdict.explanation {
        ExplanationState::Pending => text.push(Line::from(Span::styled(
            "Press e for an explanation or s to skip",
            Style::default().fg(Color::DarkGray),
        ))),
        ExplanationState::Ready(explanation) => {
            text.push(Line::from(""));
            text.extend(explanation.lines().map(|l| Line::from(l.to_string())));
        }
        ExplanationState::NotRequested | ExplanationState::Skipped => {}
    }

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
