use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};

/// Persisted form of a reminder. Timer handles are runtime-only and are
/// re-armed on load. Field names stay camelCase to match the historical
/// blob layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReminder {
    pub id: u64,
    pub text: String,
    pub trigger_time: DateTime<Local>,
}

/// File-backed reminder storage. One JSON document holding the whole
/// ordered collection; unreadable or malformed data degrades to empty.
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage at the platform data directory
    /// (e.g. `~/.local/share/reminder-tui/reminders.json`).
    pub fn at_default_location() -> Result<Self> {
        let dir = dirs::data_dir().ok_or_else(|| eyre!("No data directory on this platform"))?;
        Ok(Self::new(dir.join("reminder-tui").join("reminders.json")))
    }

    pub fn read(&self) -> Vec<StoredReminder> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    pub fn write(&self, reminders: &[StoredReminder]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(reminders)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
