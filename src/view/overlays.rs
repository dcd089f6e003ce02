//! Overlay rendering (callback URL prompt)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_callback_prompt(frame: &mut Frame, buffer: &str) {
    let area = frame.area();

    let popup_width = 64.min(area.width.saturating_sub(4));
    let popup_height = 6.min(area.height.saturating_sub(2));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(format!("{}▏", buffer)),
        Line::styled(
            "Paste the wizbot:// link from the browser",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let prompt = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Login callback (Enter to submit, Esc to cancel) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(prompt, popup_area);
}
