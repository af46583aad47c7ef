use super::SavingsStore;
use crate::core::{Note, Reminder, SavingEntry};
use anyhow::{Result, anyhow};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Default)]
struct Records {
    savings: Vec<SavingEntry>,
    note: Option<Note>,
    reminders: Vec<Reminder>,
}

/// Store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>> {
        self.inner
            .read()
            .map_err(|_| anyhow!("Memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>> {
        self.inner
            .write()
            .map_err(|_| anyhow!("Memory store lock poisoned"))
    }
}

impl SavingsStore for MemoryStore {
    fn list_savings(&self) -> Result<Vec<SavingEntry>> {
        Ok(self.read()?.savings.clone())
    }

    fn add_saving(&self, entry: &SavingEntry) -> Result<()> {
        debug!("Memory PUT saving {}", entry.id);
        self.write()?.savings.push(entry.clone());
        Ok(())
    }

    fn delete_saving(&self, id: &str) -> Result<bool> {
        let mut records = self.write()?;
        let before = records.savings.len();
        records.savings.retain(|e| e.id != id);
        debug!("Memory REMOVE saving {}", id);
        Ok(records.savings.len() != before)
    }

    fn load_note(&self) -> Result<Option<Note>> {
        Ok(self.read()?.note.clone())
    }

    fn save_note(&self, note: &Note) -> Result<()> {
        self.write()?.note = Some(note.clone());
        Ok(())
    }

    fn list_reminders(&self) -> Result<Vec<Reminder>> {
        Ok(self.read()?.reminders.clone())
    }

    fn put_reminder(&self, reminder: &Reminder) -> Result<()> {
        let mut records = self.write()?;
        match records.reminders.iter_mut().find(|r| r.id == reminder.id) {
            Some(existing) => *existing = reminder.clone(),
            None => records.reminders.push(reminder.clone()),
        }
        Ok(())
    }

    fn delete_reminder(&self, id: &str) -> Result<bool> {
        let mut records = self.write()?;
        let before = records.reminders.len();
        records.reminders.retain(|r| r.id != id);
        Ok(records.reminders.len() != before)
    }
}
