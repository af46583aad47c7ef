use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(text: &str, now: DateTime<Utc>) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            bail!("Reminder text cannot be empty");
        }
        Ok(Reminder {
            id: Ulid::new().to_string(),
            text: text.to_string(),
            completed: false,
            created_at: now,
        })
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Open reminders before completed ones, newest first within each group.
pub fn display_order(a: &Reminder, b: &Reminder) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| b.created_at.cmp(&a.created_at))
}
