//! Now-playing block rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::control::ControlSurface;
use crate::model::PlaybackStatus;

pub fn render_now_playing(frame: &mut Frame, area: Rect, surface: &ControlSurface) {
    let status_color = match surface.playback.status {
        PlaybackStatus::Playing => Color::Green,
        PlaybackStatus::Paused => Color::Yellow,
        PlaybackStatus::Loading => Color::Cyan,
        PlaybackStatus::Stopped => Color::DarkGray,
    };

    let mut status_line = vec![
        Span::raw("Status: "),
        Span::styled(
            surface.status_label(),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        ),
    ];
    if surface.playback.buffering {
        status_line.push(Span::styled(" · buffering", Style::default().fg(Color::Cyan)));
    }

    let title = surface.now_playing_title();
    let title_line = if title.is_empty() {
        Line::styled("Waiting", Style::default().fg(Color::DarkGray))
    } else {
        let icon = if surface.playback.status == PlaybackStatus::Playing { "▶" } else { "⏸" };
        Line::from(format!("{} {}", icon, title))
    };

    let toggle_hint = if surface.playback.status == PlaybackStatus::Playing {
        "[Space] pause"
    } else {
        "[Space] play"
    };
    let controls = Line::styled(
        format!("{}   [s] stop   [n] next", toggle_hint),
        Style::default().fg(Color::DarkGray),
    );

    let block = Paragraph::new(vec![Line::from(status_line), title_line, controls]).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Now Playing ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(block, area);
}
