use super::ui;
use crate::App;
use crate::core::aggregate::{self, DailyTotal};
use crate::core::{BASE_CURRENCY, SavingEntry};
use anyhow::Result;
use chrono::{Local, TimeZone};
use comfy_table::{Cell, Color};

pub fn run(app: &App) -> Result<String> {
    let entries = app.store.list_savings()?;
    Ok(render(&entries, &Local))
}

pub fn render<Tz: TimeZone>(entries: &[SavingEntry], tz: &Tz) -> String {
    if entries.len() <= 1 {
        return ui::style_text("Add more savings to see your trend.", ui::StyleType::Subtle);
    }
    render_series(&aggregate::trend(entries, tz))
}

pub fn render_series(series: &[DailyTotal]) -> String {
    let max = series.iter().map(|d| d.amount).fold(0.0, f64::max);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("Saved ({BASE_CURRENCY})")),
        ui::header_cell(""),
    ]);
    for day in series {
        table.add_row(vec![
            Cell::new(day.date.format("%b %-d").to_string()),
            ui::money_cell(day.amount, BASE_CURRENCY),
            Cell::new(ui::bar(day.amount, max)).fg(Color::Green),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Savings Trend", ui::StyleType::Title),
        table
    )
}
