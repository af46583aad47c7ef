pub mod disk;
pub mod memory;

use crate::core::{Note, Reminder, SavingEntry};
use anyhow::Result;

pub use disk::DiskStore;
pub use memory::MemoryStore;

/// Persistence for one user's savings, note and reminders.
///
/// Savings come back in creation order. Aggregation never depends on how
/// records are stored, only on the returned snapshot.
pub trait SavingsStore: Send + Sync {
    fn list_savings(&self) -> Result<Vec<SavingEntry>>;
    fn add_saving(&self, entry: &SavingEntry) -> Result<()>;
    /// Returns `false` when no saving has this id.
    fn delete_saving(&self, id: &str) -> Result<bool>;

    fn load_note(&self) -> Result<Option<Note>>;
    fn save_note(&self, note: &Note) -> Result<()>;

    fn list_reminders(&self) -> Result<Vec<Reminder>>;
    /// Inserts the reminder, or replaces the one with the same id.
    fn put_reminder(&self, reminder: &Reminder) -> Result<()>;
    fn delete_reminder(&self, id: &str) -> Result<bool>;
}
