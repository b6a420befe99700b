use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme;

/// Modal notification popup. Shown when a reminder fires or when form
/// validation fails; blocks normal input until dismissed.
pub struct Alert;

impl Alert {
    pub fn render(frame: &mut Frame, area: Rect, message: &str) {
        let popup_w = area.width.min(50).max(24);
        let popup_h = area.height.min(8).max(5);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Reminder ")
            .title_style(theme::current().alert)
            .borders(Borders::ALL)
            .border_style(theme::current().alert);

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let lines = vec![
            Line::from(Span::styled(message.to_string(), Style::default())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(":Dismiss", theme::current().dim),
            ]),
        ];

        let para = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(para, inner);
    }
}
