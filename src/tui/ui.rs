use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::widgets::{menu, question, setup, summary};
use super::{App, View};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_title(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_help_bar(f, app, chunks[2]);
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "Certification Quiz",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(runner) = &app.runner {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} mode", runner.mode().label()),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} correct, {} wrong", runner.correct(), runner.incorrect()),
            Style::default().fg(Color::Green),
        ));
    }

    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!(
            "{} questions, {} to revise",
            app.store().len(),
            app.tracker().len()
        ),
        Style::default().fg(Color::Gray),
    ));

    let title = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" certquiz "));

    f.render_widget(title, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Menu => menu::draw(f, app, area),
        View::Setup => setup::draw(f, app, area),
        View::Question => question::draw(f, app, area),
        View::Summary => summary::draw(f, app, area),
        View::Empty => summary::draw_empty(f, app, area),
    }
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));

    let mut spans = match app.view {
        View::Menu => vec![
            key("j/k"),
            Span::raw(" Nav  "),
            key("<CR>"),
            Span::raw(" Start  "),
            key("?"),
            Span::raw(" Help  "),
            key("q"),
            Span::raw(" Quit"),
        ],
        View::Setup => vec![
            key("0-9"),
            Span::raw(" Edit  "),
            key("<Tab>"),
            Span::raw(" Field  "),
            key("<CR>"),
            Span::raw(" Start  "),
            key("<Esc>"),
            Span::raw(" Menu"),
        ],
        View::Question if app.explanation_pending() => vec![
            key("e"),
            Span::raw(" Explain  "),
            key("s"),
            Span::raw(" Skip  "),
            key("<Esc>"),
            Span::raw(" Menu"),
        ],
        View::Question if app.runner.as_ref().is_some_and(|r| r.verdict().is_some()) => vec![
            key("<CR>/n"),
            Span::raw(" Next  "),
            key("<Esc>"),
            Span::raw(" Menu"),
        ],
        View::Question => vec![
            key("A-E"),
            Span::raw(" Pick  "),
            key("j/k"),
            Span::raw(" Nav  "),
            key("<Space>"),
            Span::raw(" Pick  "),
            key("<CR>"),
            Span::raw(" Submit  "),
            key("<Esc>"),
            Span::raw(" Menu"),
        ],
        View::Summary | View::Empty => vec![
            key("<CR>"),
            Span::raw(" Menu  "),
            key("q"),
            Span::raw(" Quit"),
        ],
    };

    if let Some(status) = &app.status {
        spans.push(Span::raw("  | "));
        spans.push(Span::styled(status.as_str(), Style::default().fg(Color::Red)));
    }

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
