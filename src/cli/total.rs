use super::ui;
use crate::App;
use crate::core::{CurrencyCode, RateTable, SavingEntry, aggregate};
use anyhow::Result;
use comfy_table::Cell;

pub fn run(app: &App) -> Result<String> {
    let entries = app.store.list_savings()?;
    Ok(render(&entries, &app.rates, &app.config.display_currencies))
}

/// Total savings shown in each display currency.
pub fn render(entries: &[SavingEntry], rates: &RateTable, currencies: &[CurrencyCode]) -> String {
    let total = aggregate::total(entries);

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Total")]);
    for currency in currencies {
        let value = if rates.is_convertible(*currency) {
            ui::money_cell(rates.from_base(total, *currency), *currency)
        } else {
            ui::na_cell(true)
        };
        table.add_row(vec![
            Cell::new(format!("{} ({})", currency.name(), currency)),
            value,
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Total Savings", ui::StyleType::Title),
        table
    )
}
