use super::ui;
use crate::App;
use crate::core::Note;
use anyhow::Result;
use chrono::{Local, Utc};
use tracing::info;

pub fn show(app: &App) -> Result<String> {
    let Some(note) = app.store.load_note()? else {
        return Ok(ui::style_text("No note saved yet.", ui::StyleType::Subtle));
    };

    let mut out = format!(
        "{}\n{}\n\n{}",
        ui::style_text("Note", ui::StyleType::Title),
        note.content,
        ui::style_text(
            &format!(
                "Updated {}",
                note.updated_at.with_timezone(&Local).format("%b %-d, %Y %H:%M")
            ),
            ui::StyleType::Subtle
        )
    );
    if let Some(signature) = &note.signature {
        out.push_str(&format!("\n{}", ui::style_text(signature, ui::StyleType::Subtle)));
    }
    Ok(out)
}

pub fn set(app: &App, content: String) -> Result<String> {
    let note = Note::upsert(app.store.load_note()?, content, Utc::now());
    app.store.save_note(&note)?;
    info!("Saved note");
    Ok("Note saved.".to_string())
}
