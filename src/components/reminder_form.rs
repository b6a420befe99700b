use chrono::Local;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::store::EditPrefill;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Text,
    Date,
    Time,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Text => FormField::Date,
            FormField::Date => FormField::Time,
            FormField::Time => FormField::Text,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Text => FormField::Time,
            FormField::Date => FormField::Text,
            FormField::Time => FormField::Date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub text: String,
    pub date: String,
    pub time: String,
    pub active_field: FormField,
    /// Set when the form was opened by editing an existing reminder.
    pub editing: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            date: Local::now().format("%Y-%m-%d").to_string(),
            time: "09:00 AM".to_string(),
            active_field: FormField::Text,
            editing: false,
        }
    }

    /// Repopulate the form from a reminder being edited.
    pub fn from_prefill(prefill: EditPrefill) -> Self {
        Self {
            text: prefill.text,
            date: prefill.date,
            time: prefill.time,
            active_field: FormField::Text,
            editing: true,
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Text => self.text.push(c),
            FormField::Date => self.date.push(c),
            FormField::Time => self.time.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Text => {
                self.text.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Time => {
                self.time.pop();
            }
        }
    }
}

pub struct ReminderForm;

impl ReminderForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &FormState) {
        // Center the form popup
        let form_w = area.width.min(46).max(30);
        let form_h = area.height.min(10).max(8);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        // Clear background
        frame.render_widget(Clear, form_area);

        let title = if state.editing { " Edit Reminder " } else { " New Reminder " };
        let block = Block::default()
            .title(title)
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // text
            Constraint::Length(1), // date
            Constraint::Length(1), // time
            Constraint::Length(1), // format hint
            Constraint::Length(1), // spacer
            Constraint::Length(1), // key help
            Constraint::Min(0),
        ])
        .split(inner);

        render_field(frame, rows[0], "Text:", &state.text, state.active_field == FormField::Text);
        render_field(frame, rows[1], "Date:", &state.date, state.active_field == FormField::Date);
        render_field(frame, rows[2], "Time:", &state.time, state.active_field == FormField::Time);

        let hint = Paragraph::new(Span::styled(
            "       YYYY-MM-DD / HH:MM AM|PM",
            theme::current().dim,
        ));
        frame.render_widget(hint, rows[3]);

        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme::current().dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[5]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };

    let style = if active {
        Style::default().fg(ratatui::style::Color::Cyan)
    } else {
        Style::default()
    };

    let spans = vec![
        Span::styled(format!("{:<7}", label), theme::current().dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
