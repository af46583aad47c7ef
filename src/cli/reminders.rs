use super::ui;
use crate::App;
use crate::core::Reminder;
use crate::core::reminder::display_order;
use anyhow::{Result, bail};
use chrono::{Local, Utc};
use comfy_table::{Cell, Color};
use tracing::info;

pub fn add(app: &App, text: &str) -> Result<String> {
    let reminder = Reminder::new(text, Utc::now())?;
    app.store.put_reminder(&reminder)?;
    info!(id = %reminder.id, "Added reminder");
    Ok(format!("Added reminder [{}]", reminder.id))
}

pub fn list(app: &App) -> Result<String> {
    let reminders = app.store.list_reminders()?;
    Ok(render(reminders))
}

pub fn render(mut reminders: Vec<Reminder>) -> String {
    if reminders.is_empty() {
        return ui::style_text("No reminders.", ui::StyleType::Subtle);
    }
    reminders.sort_by(display_order);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Reminder"),
        ui::header_cell("Created"),
        ui::header_cell("Id"),
    ]);
    for reminder in &reminders {
        let (mark, text) = if reminder.completed {
            ("[x]", Cell::new(&reminder.text).fg(Color::DarkGrey))
        } else {
            ("[ ]", Cell::new(&reminder.text))
        };
        table.add_row(vec![
            Cell::new(mark),
            text,
            Cell::new(
                reminder
                    .created_at
                    .with_timezone(&Local)
                    .format("%b %-d, %Y")
                    .to_string(),
            ),
            Cell::new(ui::style_text(&reminder.id, ui::StyleType::Subtle)),
        ]);
    }
    table.to_string()
}

fn find(app: &App, id: &str) -> Result<Reminder> {
    match app.store.list_reminders()?.into_iter().find(|r| r.id == id) {
        Some(reminder) => Ok(reminder),
        None => bail!("No reminder with id {}", id),
    }
}

pub fn toggle(app: &App, id: &str) -> Result<String> {
    let mut reminder = find(app, id)?;
    reminder.toggle();
    app.store.put_reminder(&reminder)?;
    info!(%id, completed = reminder.completed, "Toggled reminder");
    Ok(if reminder.completed {
        format!("Completed reminder [{id}]")
    } else {
        format!("Reopened reminder [{id}]")
    })
}

pub fn delete(app: &App, id: &str) -> Result<String> {
    if !app.store.delete_reminder(id)? {
        bail!("No reminder with id {}", id);
    }
    info!(%id, "Deleted reminder");
    Ok(format!("Deleted reminder [{id}]"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn app() -> App {
        App::with_store(AppConfig::default(), Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let app = app();
        assert!(add(&app, "   ").is_err());
        assert!(app.store.list_reminders().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_and_delete() {
        let app = app();
        add(&app, "Deposit at the bank").unwrap();
        let id = app.store.list_reminders().unwrap()[0].id.clone();

        assert!(toggle(&app, &id).unwrap().starts_with("Completed"));
        assert!(app.store.list_reminders().unwrap()[0].completed);
        assert!(toggle(&app, &id).unwrap().starts_with("Reopened"));

        delete(&app, &id).unwrap();
        assert!(app.store.list_reminders().unwrap().is_empty());
        assert!(delete(&app, &id).is_err());
        assert!(toggle(&app, &id).is_err());
    }

    #[test]
    fn test_render_open_reminders_first() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let mut done = Reminder::new("pay rent", t0 + Duration::hours(2)).unwrap();
        done.toggle();
        let old = Reminder::new("old task", t0).unwrap();
        let new = Reminder::new("new task", t0 + Duration::hours(1)).unwrap();

        let output = render(vec![done, old, new]);
        let pos = |s: &str| output.find(s).unwrap();
        assert!(pos("new task") < pos("old task"));
        assert!(pos("old task") < pos("pay rent"));
        assert!(output.contains("[x]"));
    }
}
