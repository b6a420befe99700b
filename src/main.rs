mod app;
mod components;
mod event;
mod schedule;
mod storage;
mod store;
mod theme;
mod timefmt;
mod tui;

use std::time::Duration;

use app::{App, InputMode};
use chrono::Local;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};

fn main() -> Result<()> {
    color_eyre::install()?;

    let mut app = App::new()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        // Expiry firings mutate the collection; drain before drawing so the
        // frame reflects removals and the alert queue.
        app.drain_timer_events()?;

        terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: listing + status bar
            let layout = Layout::vertical([
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

            components::ReminderList::render(
                frame,
                layout[0],
                app.reminders(),
                app.selected,
                Local::now(),
            );

            // Render entry form overlay
            if let Some(ref form) = app.form_state {
                components::ReminderForm::render(frame, area, form);
            }

            // Render notification overlay (takes priority over the form)
            if let Some(alert) = app.current_alert() {
                components::Alert::render(frame, area, alert);
            }

            // Render help overlay
            if app.show_help {
                render_help(frame, area);
            }

            // Status bar
            render_status_bar(frame, layout[1], app, area.width);
        })?;

        if let Some(key) = event::next_key_event(Duration::from_millis(100))? {
            // Clear status message on any key
            app.status_message = None;

            // Help overlay takes priority
            if app.show_help {
                if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                    app.show_help = false;
                }
                continue;
            }

            // A pending notification must be acknowledged first
            if app.current_alert().is_some() {
                if key.code == KeyCode::Enter || key.code == KeyCode::Esc {
                    app.dismiss_alert();
                }
                continue;
            }

            match app.input_mode {
                InputMode::Form => handle_form_input(app, key.code)?,
                InputMode::Normal => handle_normal_input(app, key.code, key.modifiers)?,
            }
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('n'), _) => app.open_form(),
        (KeyCode::Char('e'), _) | (KeyCode::Enter, _) => app.edit_selected()?,
        (KeyCode::Char('d'), _) => app.delete_selected()?,
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.select_prev(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.select_next(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
    Ok(())
}

fn handle_form_input(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form()?,
        KeyCode::Tab => {
            if let Some(ref mut form) = app.form_state {
                form.active_field = form.active_field.next();
            }
        }
        KeyCode::BackTab => {
            if let Some(ref mut form) = app.form_state {
                form.active_field = form.active_field.prev();
            }
        }
        KeyCode::Backspace => {
            if let Some(ref mut form) = app.form_state {
                form.backspace();
            }
        }
        KeyCode::Char(c) => {
            if let Some(ref mut form) = app.form_state {
                form.input_char(c);
            }
        }
        _ => {}
    }
    Ok(())
}

fn render_status_bar(frame: &mut ratatui::Frame, area: Rect, app: &App, w: u16) {
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let w = w as usize;

    let mode_str = match app.input_mode {
        InputMode::Normal => "Reminders",
        InputMode::Form => {
            if app.form_state.as_ref().is_some_and(|f| f.editing) {
                "Reminders [Edit]"
            } else {
                "Reminders [New]"
            }
        }
    };

    // Show status message if present, otherwise show context-aware hints
    let right_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        match app.input_mode {
            InputMode::Form if w >= 50 => " Tab:Next Enter:Save Esc:Cancel".to_string(),
            InputMode::Normal if w >= 60 => {
                " jk:Move n:New e:Edit d:Del ?:Help q:Quit".to_string()
            }
            InputMode::Normal if w >= 40 => " n:New d:Del q:Quit".to_string(),
            _ => " q:Quit".to_string(),
        }
    };

    let left = format!(" {} ", mode_str);
    let padding_len = w.saturating_sub(left.len() + right_text.len());
    let padding = " ".repeat(padding_len);

    let line = Line::from(vec![
        Span::styled(left, theme::current().status),
        Span::styled(padding, theme::current().status),
        Span::styled(right_text, theme::current().status),
    ]);

    let bar = Paragraph::new(line).style(theme::current().status);
    frame.render_widget(bar, area);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.min(46).max(30);
    let popup_h = area.height.min(16).max(10);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let desc_style = Style::default();
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let lines = vec![
        Line::from(Span::styled("List", section_style)),
        Line::from(vec![
            Span::styled("  j/k ", key_style),
            Span::styled("or ", theme::DIM_STYLE),
            Span::styled("\u{2191}/\u{2193}  ", key_style),
            Span::styled("Move selection", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("Actions", section_style)),
        Line::from(vec![
            Span::styled("  n         ", key_style),
            Span::styled("New reminder", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  e/Enter   ", key_style),
            Span::styled("Edit selected (remove and refill)", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  d         ", key_style),
            Span::styled("Delete selected", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("Form", section_style)),
        Line::from(vec![
            Span::styled("  Tab       ", key_style),
            Span::styled("Next field", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", key_style),
            Span::styled("Save, Esc to cancel", desc_style),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", theme::DIM_STYLE),
            Span::styled("Esc     ", key_style),
            Span::styled("Quit / close popup", desc_style),
        ]),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
