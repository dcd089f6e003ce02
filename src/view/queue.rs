//! Request queue rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
    Frame,
};

use crate::control::ControlSurface;
use crate::model::PlaybackStatus;

use super::utils::{format_minutes, truncate_string};

pub fn render_queue(frame: &mut Frame, area: Rect, surface: &ControlSurface) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Queue ")
        .title_bottom(Line::from(format!(" {} ", surface.queue.len())).right_aligned())
        .padding(Padding::horizontal(1));

    if surface.queue.is_empty() {
        let empty = Paragraph::new(
            "No videos waiting. Requests from viewers show up here automatically.",
        )
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // borders + padding
    let title_width = (area.width as usize).saturating_sub(6);
    let is_playing = surface.playback.status == PlaybackStatus::Playing;

    let items: Vec<ListItem> = surface
        .queue
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let active = surface.is_active(item);
            let selected = i == surface.selected;

            let marker = match (active, is_playing) {
                (true, true) => "▶ ",
                (true, false) => "• ",
                _ => "  ",
            };

            let title_style = match (selected, active) {
                (true, _) => Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                _ => Style::default().fg(Color::White),
            };

            let mut lines = vec![Line::from(vec![
                Span::raw(marker),
                Span::styled(truncate_string(&item.title, title_width.saturating_sub(2)), title_style),
            ])];

            let mut meta = Vec::new();
            if let Some(by) = &item.requested_by {
                meta.push(format!("requested by {}", by));
            }
            if let Some(seconds) = item.duration.filter(|d| *d > 0.0) {
                meta.push(format!("length {}", format_minutes(seconds)));
            }
            if !meta.is_empty() {
                lines.push(Line::styled(
                    format!("  {}", meta.join(" · ")),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(block);
    let mut list_state = ListState::default();
    list_state.select(Some(surface.selected));

    frame.render_stateful_widget(list, area, &mut list_state);
}
