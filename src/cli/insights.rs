use super::ui;
use crate::App;
use crate::core::aggregate::{self, CategoryPalette};
use crate::core::insight::{self, ChartAdvice, SavingsSummary};
use anyhow::{Result, anyhow};
use futures::join;
use tracing::warn;

pub async fn run(app: &App) -> Result<String> {
    let provider = app.insight.as_deref().ok_or_else(|| {
        anyhow!("No insight provider configured, add `insight.base_url` to the config file")
    })?;

    let entries = app.store.list_savings()?;
    let breakdown = aggregate::category_breakdown(&entries);

    // Charts need more than one saving, or at least one category.
    let wants_history = entries.len() > 1;
    let wants_categories = !breakdown.is_empty();

    let spinner = ui::new_spinner("Asking for insights...");
    let (summary, history, categories) = join!(
        insight::summarize_savings(provider, &entries),
        async {
            if wants_history {
                Some(insight::history_chart_advice(provider, &entries).await)
            } else {
                None
            }
        },
        async {
            if wants_categories {
                Some(insight::category_chart_advice(provider, &breakdown).await)
            } else {
                None
            }
        },
    );
    spinner.finish_and_clear();

    let mut sections = vec![render_summary(summary)];

    if let Some(history) = history {
        sections.push(render_chart(
            "Savings History",
            &history,
            &super::trend::render(&entries, &chrono::Local),
        ));
    }
    if let Some(categories) = categories {
        let palette = CategoryPalette::assign(&breakdown, ui::CHART_COLORS.len());
        sections.push(render_chart(
            "Savings by Category",
            &categories,
            &super::breakdown::render_breakdown(&breakdown, &palette),
        ));
    }

    Ok(sections.join("\n\n"))
}

fn render_summary(summary: Result<SavingsSummary>) -> String {
    match summary {
        Ok(summary) => format!(
            "{}\n{}\n\n{}\n{}",
            ui::style_text("Summary", ui::StyleType::Title),
            summary.summary,
            ui::style_text("Recommendation", ui::StyleType::Title),
            summary.recommendation
        ),
        Err(e) => {
            warn!(error = %e, "Savings summary failed");
            ui::style_text(
                &format!("Could not generate a summary: {e}"),
                ui::StyleType::Error,
            )
        }
    }
}

fn render_chart(title: &str, advice: &ChartAdvice, chart: &str) -> String {
    let mut out = format!(
        "{}\n{}",
        ui::style_text(title, ui::StyleType::Title),
        ui::style_text(&advice.description, ui::StyleType::Subtle)
    );
    if advice.is_3d {
        out.push_str(&format!(
            "\n{}",
            ui::style_text("3D charts are drawn flat in the terminal.", ui::StyleType::Subtle)
        ));
    }
    if let Some(error) = &advice.error {
        out.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("Chart advice unavailable: {error}"),
                ui::StyleType::Warning
            )
        ));
    }
    out.push_str("\n\n");
    out.push_str(chart);
    out
}
