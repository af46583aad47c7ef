use super::ui;
use crate::App;
use crate::core::saving::{BALANCE_ADJUSTMENT, balance_adjustment};
use crate::core::{BASE_CURRENCY, CurrencyCode, NewSaving, SavingEntry, aggregate, currency};
use anyhow::{Result, bail};
use chrono::{Local, Utc};
use comfy_table::Cell;
use tracing::{info, warn};

pub fn add(
    app: &App,
    amount: f64,
    currency: Option<CurrencyCode>,
    category: Option<String>,
) -> Result<String> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Amount must be a positive number, got {}", amount);
    }
    if category.as_deref().map(str::trim) == Some(BALANCE_ADJUSTMENT) {
        bail!("\"{}\" is reserved for set-total", BALANCE_ADJUSTMENT);
    }
    let currency = currency.unwrap_or(app.config.default_currency);
    if !app.rates.is_convertible(currency) {
        warn!("Refusing saving in {currency}: no conversion rate");
        bail!(
            "No conversion rate for {}, the saving would not count towards the total",
            currency
        );
    }

    let entry = SavingEntry::create(
        NewSaving {
            amount,
            currency,
            category,
        },
        &app.rates,
        Utc::now(),
    )?;
    app.store.add_saving(&entry)?;
    info!(id = %entry.id, "Added saving");

    Ok(format!(
        "Saved {} ({}) under {} [{}]",
        currency::format_amount(entry.amount, entry.currency)?,
        currency::format_amount(entry.base_amount, BASE_CURRENCY)?,
        entry.category(),
        entry.id
    ))
}

pub fn list(app: &App) -> Result<String> {
    let entries = app.store.list_savings()?;
    Ok(render_list(&entries))
}

pub fn render_list(entries: &[SavingEntry]) -> String {
    if entries.is_empty() {
        return ui::style_text("No savings recorded yet.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
        ui::header_cell(&format!("Value ({BASE_CURRENCY})")),
        ui::header_cell("Id"),
    ]);

    let mut unconvertible = 0;
    for entry in aggregate::newest_first(entries) {
        let base_cell = if entry.is_unconvertible() {
            unconvertible += 1;
            ui::na_cell(true)
        } else {
            ui::money_cell(entry.base_amount, BASE_CURRENCY)
        };
        table.add_row(vec![
            Cell::new(
                entry
                    .timestamp
                    .with_timezone(&Local)
                    .format("%b %-d, %Y")
                    .to_string(),
            ),
            Cell::new(entry.category()),
            ui::money_cell(entry.amount, entry.currency),
            base_cell,
            Cell::new(ui::style_text(&entry.id, ui::StyleType::Subtle)),
        ]);
    }

    let mut output = table.to_string();
    if unconvertible > 0 {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("{unconvertible} saving(s) had no conversion rate and count as zero."),
                ui::StyleType::Warning,
            )
        ));
    }
    output
}

pub fn delete(app: &App, id: &str) -> Result<String> {
    if !app.store.delete_saving(id)? {
        bail!("No saving with id {}", id);
    }
    info!(%id, "Deleted saving");
    Ok(format!("Deleted saving {id}"))
}

/// Records the balance adjustment that makes the total equal `amount`.
pub fn set_total(app: &App, amount: f64, currency: Option<CurrencyCode>) -> Result<String> {
    if !amount.is_finite() {
        bail!("Total must be a finite number, got {}", amount);
    }
    let currency = currency.unwrap_or(BASE_CURRENCY);
    if !app.rates.is_convertible(currency) {
        bail!("No conversion rate for {}", currency);
    }

    let desired = app.rates.to_base(amount, currency);
    let current = aggregate::total(&app.store.list_savings()?);
    let Some(adjustment) = balance_adjustment(current, desired) else {
        return Ok(format!(
            "Total is already {}",
            currency::format_amount(current, BASE_CURRENCY)?
        ));
    };

    let entry = SavingEntry::create(adjustment, &app.rates, Utc::now())?;
    app.store.add_saving(&entry)?;
    info!(id = %entry.id, delta = entry.base_amount, "Recorded balance adjustment");

    Ok(format!(
        "Adjusted total by {} to {}",
        currency::format_amount(entry.base_amount, BASE_CURRENCY)?,
        currency::format_amount(desired, BASE_CURRENCY)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::store::MemoryStore;

    fn app() -> App {
        App::with_store(AppConfig::default(), Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_add_uses_default_currency() {
        let app = app();
        let output = add(&app, 50000.0, None, Some("Food".to_string())).unwrap();
        assert!(output.contains("Le 50,000"));
        assert!(output.contains("$2.38"));

        let entries = app.store.list_savings().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].currency, CurrencyCode::Sll);
        assert_eq!(entries[0].category(), "Food");
    }

    #[test]
    fn test_add_rejects_non_positive_amounts() {
        let app = app();
        assert!(add(&app, 0.0, Some(CurrencyCode::Usd), None).is_err());
        assert!(add(&app, -4.0, Some(CurrencyCode::Usd), None).is_err());
        assert!(add(&app, f64::NAN, Some(CurrencyCode::Usd), None).is_err());
        assert!(app.store.list_savings().unwrap().is_empty());
    }

    #[test]
    fn test_add_rejects_reserved_category() {
        let app = app();
        let category = Some(BALANCE_ADJUSTMENT.to_string());
        assert!(add(&app, 5.0, Some(CurrencyCode::Usd), category).is_err());
    }

    #[test]
    fn test_set_total_records_adjustment() {
        let app = app();
        add(&app, 10.0, Some(CurrencyCode::Usd), Some("Food".to_string())).unwrap();

        set_total(&app, 15.0, None).unwrap();

        let entries = app.store.list_savings().unwrap();
        assert_eq!(entries.len(), 2);
        let adjustment = &entries[1];
        assert_eq!(adjustment.category(), BALANCE_ADJUSTMENT);
        assert_eq!(adjustment.amount, 5.0);
        assert_eq!(adjustment.currency, BASE_CURRENCY);
        assert_eq!(aggregate::total(&entries), 15.0);
        assert_eq!(aggregate::by_category(&entries).get("Food"), Some(&10.0));
        assert_eq!(aggregate::by_category(&entries).len(), 1);
    }

    #[test]
    fn test_set_total_to_same_value_records_nothing() {
        let app = app();
        add(&app, 10.0, Some(CurrencyCode::Usd), None).unwrap();
        let output = set_total(&app, 10.0, Some(CurrencyCode::Usd)).unwrap();
        assert!(output.contains("already"));
        assert_eq!(app.store.list_savings().unwrap().len(), 1);
    }

    #[test]
    fn test_set_total_in_other_currency() {
        let app = app();
        add(&app, 10.0, Some(CurrencyCode::Usd), None).unwrap();
        set_total(&app, 21000.0, Some(CurrencyCode::Sll)).unwrap();
        let total = aggregate::total(&app.store.list_savings().unwrap());
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_delete_unknown_id_fails() {
        let app = app();
        assert!(delete(&app, "missing").is_err());
    }

    #[test]
    fn test_delete_removes_entry() {
        let app = app();
        add(&app, 10.0, Some(CurrencyCode::Usd), None).unwrap();
        add(&app, 3.0, Some(CurrencyCode::Usd), None).unwrap();
        let id = app.store.list_savings().unwrap()[0].id.clone();

        delete(&app, &id).unwrap();
        let entries = app.store.list_savings().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(aggregate::total(&entries), 3.0);
    }

    #[test]
    fn test_render_list_empty() {
        assert!(render_list(&[]).contains("No savings recorded yet."));
    }

    #[test]
    fn test_render_list_flags_unconvertible() {
        let app = app();
        add(&app, 1500.0, Some(CurrencyCode::Jpy), None).unwrap();
        let mut entries = app.store.list_savings().unwrap();
        entries[0].base_amount = 0.0;
        let output = render_list(&entries);
        assert!(output.contains("¥1,500.00"));
        assert!(output.contains("no conversion rate"));
    }
}
