use std::collections::VecDeque;

use color_eyre::Result;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::components::reminder_form::FormState;
use crate::schedule::{Scheduler, TimerEvent};
use crate::storage::Storage;
use crate::store::{AddOutcome, Reminder, ReminderStore};

const VALIDATION_MESSAGE: &str = "Please enter valid reminder text, date, and time.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Form,
}

pub struct App {
    pub running: bool,
    pub input_mode: InputMode,
    pub selected: usize,
    pub form_state: Option<FormState>,
    pub status_message: Option<String>,
    pub show_help: bool,
    /// Pending notification popups, shown one at a time, FIFO.
    alerts: VecDeque<String>,
    store: ReminderStore,
    timer_rx: UnboundedReceiver<TimerEvent>,
}

impl App {
    pub fn new() -> Result<Self> {
        let storage = Storage::at_default_location()?;
        let (scheduler, timer_rx) = Scheduler::new()?;
        Ok(Self::with_store(ReminderStore::load(storage, scheduler), timer_rx))
    }

    fn with_store(store: ReminderStore, timer_rx: UnboundedReceiver<TimerEvent>) -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            selected: 0,
            form_state: None,
            status_message: None,
            show_help: false,
            alerts: VecDeque::new(),
            store,
            timer_rx,
        }
    }

    pub fn reminders(&self) -> &[Reminder] {
        self.store.reminders()
    }

    /// Drain the timer channel. An expiry raises its notification and then
    /// removes the reminder; a firing whose id was removed in the meantime
    /// is dropped. Ticks carry no data; the caller redraws every pass.
    pub fn drain_timer_events(&mut self) -> Result<()> {
        while let Ok(event) = self.timer_rx.try_recv() {
            if let TimerEvent::Fired(id) = event {
                if let Some(reminder) = self.store.get(id) {
                    self.alerts.push_back(format!("Reminder: {}", reminder.text));
                    self.store.remove(id)?;
                    self.clamp_selection();
                }
            }
        }
        Ok(())
    }

    pub fn current_alert(&self) -> Option<&str> {
        self.alerts.front().map(|s| s.as_str())
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    pub fn open_form(&mut self) {
        self.form_state = Some(FormState::new());
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    /// Submit the entry form. Invalid input raises the validation alert and
    /// keeps the form open for correction.
    pub fn submit_form(&mut self) -> Result<()> {
        let Some(form) = self.form_state.as_ref() else {
            return Ok(());
        };
        match self.store.add(&form.text, &form.date, &form.time)? {
            AddOutcome::Added(_) => {
                self.close_form();
                self.status_message = Some("Reminder set".to_string());
            }
            AddOutcome::InvalidInput => {
                self.alerts.push_back(VALIDATION_MESSAGE.to_string());
            }
        }
        Ok(())
    }

    /// Editing is destructive prefill: the reminder is removed and its
    /// fields land back in the form; saving assigns a new id.
    pub fn edit_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_id() else {
            return Ok(());
        };
        if let Some(prefill) = self.store.edit(id)? {
            self.form_state = Some(FormState::from_prefill(prefill));
            self.input_mode = InputMode::Form;
            self.clamp_selection();
        }
        Ok(())
    }

    pub fn delete_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_id() else {
            return Ok(());
        };
        self.store.remove(id)?;
        self.clamp_selection();
        self.status_message = Some("Reminder deleted".to_string());
        Ok(())
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.store.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn selected_id(&self) -> Option<u64> {
        self.store.reminders().get(self.selected).map(|r| r.id)
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.store.len() {
            self.selected = self.store.len().saturating_sub(1);
        }
    }
}
