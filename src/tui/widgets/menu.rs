use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let help_height = if app.help_shown { 8 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),           // Mode list
            Constraint::Length(help_height), // Help text
            Constraint::Min(0),
        ])
        .split(area);

    draw_modes(f, app, chunks[0]);
    if app.help_shown {
        draw_help(f, app, chunks[1]);
    }
}

fn draw_modes(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .menu
        .items
        .iter()
        .map(|mode| {
            ListItem::new(Line::from(vec![Span::styled(
                format!("{} Mode", mode.label()),
                Style::default().fg(Color::White),
            )]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Select Mode ")
        .title_style(Style::default().fg(Color::Cyan));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.menu.selected);

    f.render_stateful_widget(list, area, &mut state);
}

fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let mut text = Vec::new();
    for mode in &app.menu.items {
        text.push(Line::from(Span::styled(
            format!("{} Mode:", mode.label()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        text.push(Line::from(format!("  {}", mode.description())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
