use super::ui;
use crate::App;
use crate::core::aggregate::{self, CategoryPalette, CategoryTotal};
use crate::core::{BASE_CURRENCY, SavingEntry};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub fn run(app: &App) -> Result<String> {
    let entries = app.store.list_savings()?;
    Ok(render(&entries))
}

pub fn render(entries: &[SavingEntry]) -> String {
    let breakdown = aggregate::category_breakdown(entries);
    if breakdown.is_empty() {
        return ui::style_text(
            "Categorize your savings to see a breakdown.",
            ui::StyleType::Subtle,
        );
    }
    let palette = CategoryPalette::assign(&breakdown, ui::CHART_COLORS.len());
    render_breakdown(&breakdown, &palette)
}

/// Renders an already computed breakdown with colours from `palette`.
pub fn render_breakdown(breakdown: &[CategoryTotal], palette: &CategoryPalette) -> String {
    let sum: f64 = breakdown.iter().map(|c| c.value).sum();
    let max = breakdown.iter().map(|c| c.value).fold(0.0, f64::max);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell(&format!("Saved ({BASE_CURRENCY})")),
        ui::header_cell("Share (%)"),
        ui::header_cell(""),
    ]);

    for category in breakdown {
        let color = ui::CHART_COLORS[palette.slot_for(&category.name).unwrap_or(0)];
        let share = if sum > 0.0 {
            Cell::new(format!("{:.1}%", category.value / sum * 100.0))
                .set_alignment(CellAlignment::Right)
        } else {
            ui::na_cell(false)
        };
        table.add_row(vec![
            Cell::new(&category.name).fg(color),
            ui::money_cell(category.value, BASE_CURRENCY),
            share,
            Cell::new(ui::bar(category.value, max)).fg(color),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Savings by Category", ui::StyleType::Title),
        table
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CurrencyCode;
    use crate::core::saving::BALANCE_ADJUSTMENT;
    use chrono::Utc;

    fn entry(base_amount: f64, category: &str) -> SavingEntry {
        SavingEntry {
            id: category.to_string(),
            amount: base_amount,
            currency: CurrencyCode::Usd,
            base_amount,
            category: Some(category.to_string()),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_render_breakdown() {
        let output = render(&[
            entry(30.0, "Food"),
            entry(10.0, "Rent"),
            entry(100.0, BALANCE_ADJUSTMENT),
        ]);
        assert!(output.contains("Food"));
        assert!(output.contains("$30.00"));
        assert!(output.contains("75.0%"));
        assert!(output.contains("25.0%"));
        assert!(!output.contains(BALANCE_ADJUSTMENT));
    }

    #[test]
    fn test_render_only_adjustments() {
        let output = render(&[entry(5.0, BALANCE_ADJUSTMENT)]);
        assert!(output.contains("Categorize your savings"));
    }
}
