use chrono::{DateTime, Days, Local};
use color_eyre::Result;

use crate::schedule::{Scheduler, TimerHandle};
use crate::storage::{Storage, StoredReminder};
use crate::timefmt;

/// A live reminder: persisted fields plus the two timer handles that are
/// re-armed on every load and released exactly once, on removal.
#[derive(Debug)]
pub struct Reminder {
    pub id: u64,
    pub text: String,
    pub trigger_time: DateTime<Local>,
    expiry: TimerHandle,
    tick: TimerHandle,
}

/// Result of an add attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(u64),
    InvalidInput,
}

/// Prefill values handed back to the entry form when editing. Editing is
/// destructive: the record is removed and resubmission assigns a new id.
#[derive(Debug, Clone, PartialEq)]
pub struct EditPrefill {
    pub text: String,
    pub date: String,
    pub time: String,
}

/// The reminder collection: insertion-ordered records, a monotonically
/// increasing id counter, write-through persistence, and timer scheduling.
pub struct ReminderStore {
    reminders: Vec<Reminder>,
    next_id: u64,
    storage: Storage,
    scheduler: Scheduler,
}

impl ReminderStore {
    /// Read the persisted collection and re-arm every record. Already-past
    /// trigger times get a zero delay and fire on the next scheduler pass.
    /// Does not re-persist; the reloaded set is what was stored.
    pub fn load(storage: Storage, scheduler: Scheduler) -> Self {
        let stored = storage.read();
        let next_id = stored.iter().map(|r| r.id).max().map_or(0, |max| max + 1);

        let now = Local::now();
        let reminders = stored
            .into_iter()
            .map(|r| {
                let delay = delay_until(r.trigger_time, now);
                Reminder {
                    expiry: scheduler.once(delay, r.id),
                    tick: scheduler.tick(),
                    id: r.id,
                    text: r.text,
                    trigger_time: r.trigger_time,
                }
            })
            .collect();

        Self {
            reminders,
            next_id,
            storage,
            scheduler,
        }
    }

    /// Create a reminder from raw form input. Blank or unparseable input is
    /// rejected without mutation. A trigger time not strictly in the future
    /// rolls forward one calendar day ("same time tomorrow").
    pub fn add(&mut self, text: &str, date_str: &str, time_str: &str) -> Result<AddOutcome> {
        let text = text.trim();
        let date_str = date_str.trim();
        let time_str = time_str.trim();
        if text.is_empty() || date_str.is_empty() || time_str.is_empty() {
            return Ok(AddOutcome::InvalidInput);
        }

        let now = Local::now();
        let Some(parsed) = timefmt::parse_date_time(date_str, time_str) else {
            return Ok(AddOutcome::InvalidInput);
        };
        let trigger_time = if parsed <= now {
            match parsed.checked_add_days(Days::new(1)) {
                Some(t) => t,
                None => return Ok(AddOutcome::InvalidInput),
            }
        } else {
            parsed
        };

        let id = self.next_id;
        self.next_id += 1;

        self.reminders.push(Reminder {
            expiry: self.scheduler.once(delay_until(trigger_time, now), id),
            tick: self.scheduler.tick(),
            id,
            text: text.to_string(),
            trigger_time,
        });
        self.persist()?;
        Ok(AddOutcome::Added(id))
    }

    /// Remove a reminder, cancelling both of its timers first so a queued
    /// callback can never fire for it. Unknown ids are a silent no-op.
    pub fn remove(&mut self, id: u64) -> Result<()> {
        let Some(index) = self.reminders.iter().position(|r| r.id == id) else {
            return Ok(());
        };
        let reminder = self.reminders.remove(index);
        reminder.expiry.cancel();
        reminder.tick.cancel();
        self.persist()
    }

    /// Hand back the reminder's fields in form-input shape, then remove it.
    pub fn edit(&mut self, id: u64) -> Result<Option<EditPrefill>> {
        let Some(reminder) = self.reminders.iter().find(|r| r.id == id) else {
            return Ok(None);
        };
        let prefill = EditPrefill {
            text: reminder.text.clone(),
            date: timefmt::format_date(reminder.trigger_time),
            time: timefmt::format_time(reminder.trigger_time, true),
        };
        self.remove(id)?;
        Ok(Some(prefill))
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn get(&self, id: u64) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let stored: Vec<StoredReminder> = self
            .reminders
            .iter()
            .map(|r| StoredReminder {
                id: r.id,
                text: r.text.clone(),
                trigger_time: r.trigger_time,
            })
            .collect();
        self.storage.write(&stored)
    }
}

fn delay_until(trigger_time: DateTime<Local>, now: DateTime<Local>) -> std::time::Duration {
    trigger_time
        .signed_duration_since(now)
        .to_std()
        .unwrap_or(std::time::Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    use chrono::TimeZone;
    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::schedule::TimerEvent;

    fn storage_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("reminder-store-test-{}-{}", std::process::id(), name))
            .join("reminders.json")
    }

    fn fresh_storage(name: &str) -> Storage {
        let path = storage_path(name);
        let _ = std::fs::remove_file(&path);
        Storage::new(path)
    }

    fn reopen_storage(name: &str) -> Storage {
        Storage::new(storage_path(name))
    }

    fn empty_store(name: &str) -> (ReminderStore, UnboundedReceiver<TimerEvent>) {
        let (scheduler, rx) = Scheduler::new().unwrap();
        (ReminderStore::load(fresh_storage(name), scheduler), rx)
    }

    fn add_tomorrow(store: &mut ReminderStore, text: &str) -> u64 {
        let tomorrow = Local::now().checked_add_days(Days::new(1)).unwrap();
        let outcome = store
            .add(text, &timefmt::format_date(tomorrow), "11:30 AM")
            .unwrap();
        match outcome {
            AddOutcome::Added(id) => id,
            AddOutcome::InvalidInput => panic!("expected a valid add"),
        }
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let (mut store, _rx) = empty_store("ids");
        let a = add_tomorrow(&mut store, "first");
        let b = add_tomorrow(&mut store, "second");
        let c = add_tomorrow(&mut store, "third");
        assert!(a < b && b < c);
    }

    #[test]
    fn blank_input_is_rejected_without_mutation() {
        let (mut store, _rx) = empty_store("blank");
        assert_eq!(
            store.add("water plants", "", "2:30 PM").unwrap(),
            AddOutcome::InvalidInput
        );
        assert_eq!(
            store.add("   ", "2030-06-01", "2:30 PM").unwrap(),
            AddOutcome::InvalidInput
        );
        assert_eq!(
            store.add("water plants", "2030-06-01", "   ").unwrap(),
            AddOutcome::InvalidInput
        );
        assert!(store.is_empty());
        assert!(store.storage.read().is_empty());
    }

    #[test]
    fn unparseable_input_is_rejected_without_mutation() {
        let (mut store, _rx) = empty_store("unparseable");
        assert_eq!(
            store.add("x", "someday", "2:30 PM").unwrap(),
            AddOutcome::InvalidInput
        );
        assert!(store.is_empty());
    }

    #[test]
    fn past_time_today_rolls_to_tomorrow() {
        let (mut store, _rx) = empty_store("rollforward");
        let now = Local::now();
        let date_str = timefmt::format_date(now);
        let time_str = timefmt::format_time(now - chrono::Duration::minutes(2), false);

        let parsed = timefmt::parse_date_time(&date_str, &time_str).unwrap();
        let expected = if parsed <= now {
            parsed.checked_add_days(Days::new(1)).unwrap()
        } else {
            // Shortly after midnight the minute before now formats to a
            // wall-clock time later today; no roll-forward then.
            parsed
        };

        let outcome = store.add("stretch", &date_str, &time_str).unwrap();
        let AddOutcome::Added(id) = outcome else {
            panic!("expected a valid add");
        };
        let trigger = store.get(id).unwrap().trigger_time;
        assert_eq!(trigger, expected);
        assert!(trigger > now);
    }

    #[test]
    fn remove_is_idempotent_and_forgets_the_id() {
        let (mut store, _rx) = empty_store("remove");
        let id = add_tomorrow(&mut store, "buy milk");
        store.remove(id).unwrap();
        assert!(store.get(id).is_none());
        // Second removal of the same id must succeed silently.
        store.remove(id).unwrap();
        store.remove(9999).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn edit_prefills_and_removes() {
        let (mut store, _rx) = empty_store("edit");
        let trigger = Local.with_ymd_and_hms(2030, 6, 1, 14, 30, 0).single().unwrap();
        let outcome = store.add("dentist", "2030-06-01", "2:30 PM").unwrap();
        let AddOutcome::Added(id) = outcome else {
            panic!("expected a valid add");
        };

        let prefill = store.edit(id).unwrap().unwrap();
        assert_eq!(
            prefill,
            EditPrefill {
                text: "dentist".to_string(),
                date: timefmt::format_date(trigger),
                time: "2:30 PM:00".to_string(),
            }
        );
        assert!(store.get(id).is_none());

        assert_eq!(store.edit(id).unwrap(), None);
    }

    #[test]
    fn reload_reproduces_records_and_seeds_the_counter() {
        let storage_name = "reload";
        {
            let (scheduler, _rx) = Scheduler::new().unwrap();
            let mut store = ReminderStore::load(fresh_storage(storage_name), scheduler);
            add_tomorrow(&mut store, "first");
            add_tomorrow(&mut store, "second");
        }

        let (scheduler, _rx) = Scheduler::new().unwrap();
        let mut store = ReminderStore::load(reopen_storage(storage_name), scheduler);
        let texts: Vec<&str> = store.reminders().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(store.reminders()[0].id, 0);
        assert_eq!(store.reminders()[1].id, 1);

        // Counter resumes one past the highest persisted id.
        let id = add_tomorrow(&mut store, "third");
        assert_eq!(id, 2);
    }

    #[test]
    fn past_due_reminder_fires_promptly_on_load() {
        let storage = fresh_storage("pastdue");
        storage
            .write(&[StoredReminder {
                id: 5,
                text: "missed while closed".to_string(),
                trigger_time: Local::now() - chrono::Duration::hours(1),
            }])
            .unwrap();

        let (scheduler, mut rx) = Scheduler::new().unwrap();
        let store = ReminderStore::load(reopen_storage("pastdue"), scheduler);
        assert_eq!(store.len(), 1);

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match rx.try_recv() {
                Ok(TimerEvent::Fired(id)) => {
                    assert_eq!(id, 5);
                    break;
                }
                _ => {
                    assert!(Instant::now() < deadline, "expiry timer never fired");
                    thread::sleep(Duration::from_millis(5));
                }
            }
        }
    }

    #[test]
    fn removal_cancels_the_expiry_timer() {
        let storage = fresh_storage("cancel");
        storage
            .write(&[StoredReminder {
                id: 0,
                text: "soon".to_string(),
                trigger_time: Local::now() + chrono::Duration::milliseconds(150),
            }])
            .unwrap();

        let (scheduler, mut rx) = Scheduler::new().unwrap();
        let mut store = ReminderStore::load(reopen_storage("cancel"), scheduler);
        store.remove(0).unwrap();

        thread::sleep(Duration::from_millis(400));
        while let Ok(ev) = rx.try_recv() {
            assert_ne!(ev, TimerEvent::Fired(0), "cancelled reminder fired");
        }
    }
}
