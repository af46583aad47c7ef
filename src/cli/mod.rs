pub mod breakdown;
pub mod insights;
pub mod notes;
pub mod reminders;
pub mod savings;
pub mod setup;
pub mod total;
pub mod trend;
pub mod ui;
