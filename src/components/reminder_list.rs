use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::store::Reminder;
use crate::theme;
use crate::timefmt;

pub struct ReminderList;

impl ReminderList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        reminders: &[Reminder],
        selected_index: usize,
        now: DateTime<Local>,
    ) {
        let w = area.width as usize;

        let title = if w >= 25 {
            format!(" Reminders ({}) ", reminders.len())
        } else {
            " Reminders ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        if reminders.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No reminders. Press n to add one.")
                .style(theme::current().dim);
            frame.render_widget(msg, inner);
            return;
        }

        // Insertion order, no sorting.
        let items: Vec<ListItem> = reminders
            .iter()
            .enumerate()
            .map(|(i, reminder)| {
                let expired = reminder.trigger_time <= now;
                let row = format!(
                    " {} - {} {} ({})",
                    reminder.text,
                    timefmt::format_date(reminder.trigger_time),
                    timefmt::format_time(reminder.trigger_time, false),
                    timefmt::time_left(reminder.trigger_time, now),
                );

                let style = if i == selected_index {
                    theme::current().selected
                } else if expired {
                    theme::current().expired
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(Span::styled(row, style)))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}
