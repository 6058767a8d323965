use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::{App, SetupField};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.setup;

    let field = |label: &'static str, value: &str, focused: bool| {
        let value_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused { "█" } else { "" };
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Gray)),
            Span::styled(value.to_string(), value_style),
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
        ])
    };

    let text = vec![
        field(
            "Start from question #: ",
            &form.start,
            form.focus == SetupField::Start,
        ),
        field(
            "Number of questions:   ",
            &form.count,
            form.focus == SetupField::Count,
        ),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} questions available", app.store().len()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" In Order Mode ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}
