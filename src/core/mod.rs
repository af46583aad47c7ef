//! Core savings logic, free of storage and terminal concerns

pub mod aggregate;
pub mod config;
pub mod currency;
pub mod insight;
pub mod log;
pub mod note;
pub mod reminder;
pub mod saving;

// Re-export main types for cleaner imports
pub use currency::{BASE_CURRENCY, CurrencyCode, RateTable};
pub use insight::InsightProvider;
pub use note::Note;
pub use reminder::Reminder;
pub use saving::{NewSaving, SavingEntry};
