use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::SessionMode;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Session Summary ")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let Some(summary) = app.summary() else {
        f.render_widget(Paragraph::new("No session finished").block(block), area);
        return;
    };

    let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

    let text = vec![
        Line::from(vec![
            Span::styled("Correct:  ", Style::default().fg(Color::Gray)),
            Span::styled(summary.correct.to_string(), bold(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("Wrong:    ", Style::default().fg(Color::Gray)),
            Span::styled(summary.incorrect.to_string(), bold(Color::Red)),
        ]),
        Line::from(vec![
            Span::styled("Accuracy: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.1}%", summary.accuracy), bold(Color::Blue)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} questions left to revise", app.tracker().len()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Paragraph::new(text).block(block), area);
}

pub fn draw_empty(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Nothing To Do ")
        .title_style(Style::default().fg(Color::Cyan));

    let message = match app.menu.selected_item() {
        Some(SessionMode::Revision) => "No revision questions available.",
        _ => "No questions match that selection.",
    };

    let text = Line::from(Span::styled(
        message,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));

    f.render_widget(Paragraph::new(text).block(block), area);
}
