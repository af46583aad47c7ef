use super::SavingsStore;
use crate::core::{Note, Reminder, SavingEntry};
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const NOTE_KEY: &str = "main";

/// Store backed by a `fjall` keyspace on disk.
///
/// Savings are keyed by creation time followed by id so that iteration
/// yields them in creation order.
pub struct DiskStore {
    keyspace: Keyspace,
    savings: PartitionHandle,
    notes: PartitionHandle,
    reminders: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
        let keyspace = Config::new(path.join("db"))
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let savings = keyspace.open_partition("savings", PartitionCreateOptions::default())?;
        let notes = keyspace.open_partition("notes", PartitionCreateOptions::default())?;
        let reminders = keyspace.open_partition("reminders", PartitionCreateOptions::default())?;
        debug!("Opened store at {}", path.display());

        Ok(Self {
            keyspace,
            savings,
            notes,
            reminders,
        })
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush store")
    }
}

fn saving_key(entry: &SavingEntry) -> String {
    let micros = entry.timestamp.timestamp_micros().max(0);
    format!("{micros:020}-{}", entry.id)
}

impl SavingsStore for DiskStore {
    fn list_savings(&self) -> Result<Vec<SavingEntry>> {
        let mut entries = Vec::new();
        for item in self.savings.iter() {
            let (_, value) = item?;
            entries.push(serde_json::from_slice(&value).context("Corrupt saving record")?);
        }
        Ok(entries)
    }

    fn add_saving(&self, entry: &SavingEntry) -> Result<()> {
        self.savings
            .insert(saving_key(entry), serde_json::to_vec(entry)?)?;
        debug!("Disk PUT saving {}", entry.id);
        self.persist()
    }

    fn delete_saving(&self, id: &str) -> Result<bool> {
        let suffix = format!("-{id}");
        let mut found = None;
        for item in self.savings.iter() {
            let (key, _) = item?;
            if key.ends_with(suffix.as_bytes()) {
                found = Some(key);
                break;
            }
        }

        match found {
            Some(key) => {
                self.savings.remove(key)?;
                debug!("Disk REMOVE saving {}", id);
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn load_note(&self) -> Result<Option<Note>> {
        match self.notes.get(NOTE_KEY)? {
            Some(value) => Ok(Some(
                serde_json::from_slice(&value).context("Corrupt note record")?,
            )),
            None => Ok(None),
        }
    }

    fn save_note(&self, note: &Note) -> Result<()> {
        self.notes.insert(NOTE_KEY, serde_json::to_vec(note)?)?;
        self.persist()
    }

    fn list_reminders(&self) -> Result<Vec<Reminder>> {
        let mut reminders = Vec::new();
        for item in self.reminders.iter() {
            let (_, value) = item?;
            reminders.push(serde_json::from_slice(&value).context("Corrupt reminder record")?);
        }
        Ok(reminders)
    }

    fn put_reminder(&self, reminder: &Reminder) -> Result<()> {
        self.reminders
            .insert(reminder.id.as_str(), serde_json::to_vec(reminder)?)?;
        self.persist()
    }

    fn delete_reminder(&self, id: &str) -> Result<bool> {
        if !self.reminders.contains_key(id)? {
            return Ok(false);
        }
        self.reminders.remove(id)?;
        self.persist()?;
        Ok(true)
    }
}
