//! Header and footer rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::control::ControlSurface;

const KEY_HELP: &[(&str, &str)] = &[
    ("Space", "play/pause"),
    ("s", "stop"),
    ("n", "next"),
    ("Enter", "play"),
    ("d", "remove"),
    ("Shift+↑↓", "move"),
    ("l", "login"),
    ("L", "logout"),
    ("u", "paste callback"),
    ("q", "quit"),
];

pub fn render_header(frame: &mut Frame, area: Rect, surface: &ControlSurface) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Title
            Constraint::Length(30), // Auth status
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("Wizbot Player", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("  live video requests", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(title, chunks[0]);

    let (auth_text, auth_style) = if surface.auth.authenticated {
        let text = match &surface.auth.username {
            Some(name) => format!("Logged in · {}", name),
            None => "Logged in".to_string(),
        };
        (text, Style::default().fg(Color::Green))
    } else {
        ("Not logged in (l)".to_string(), Style::default().fg(Color::Yellow))
    };

    let auth = Paragraph::new(auth_text)
        .style(auth_style)
        .block(Block::default().borders(Borders::ALL).title(" Account "));
    frame.render_widget(auth, chunks[1]);
}

pub fn render_footer(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(KEY_HELP.len() * 2);
    for (key, action) in KEY_HELP {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default().fg(Color::Black).bg(Color::Green),
        ));
        spans.push(Span::raw(format!(" {}  ", action)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
