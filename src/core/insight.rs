//! Natural-language insights about savings, produced by an external model.

use crate::core::aggregate::CategoryTotal;
use crate::core::saving::SavingEntry;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_HISTORY_CHART: &str = "line chart";
pub const DEFAULT_CATEGORY_CHART: &str = "pie chart";

/// One saving as the insight model sees it: UTC date and base amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingRow {
    pub date: String,
    pub amount: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSummary {
    pub summary: String,
    pub recommendation: String,
}

#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn summarize(&self, rows: &[SavingRow]) -> Result<SavingsSummary>;
    async fn visualize_history(&self, rows: &[HistoryRow]) -> Result<String>;
    async fn visualize_categories(&self, rows: &[CategoryRow]) -> Result<String>;
}

pub fn saving_rows(entries: &[SavingEntry]) -> Vec<SavingRow> {
    entries
        .iter()
        .map(|e| SavingRow {
            date: e.timestamp.date_naive().format("%Y-%m-%d").to_string(),
            amount: e.base_amount,
            category: e.category().to_string(),
        })
        .collect()
}

pub fn history_rows(entries: &[SavingEntry]) -> Vec<HistoryRow> {
    entries
        .iter()
        .map(|e| HistoryRow {
            date: e.timestamp.date_naive().format("%Y-%m-%d").to_string(),
            amount: e.base_amount,
        })
        .collect()
}

pub fn category_rows(breakdown: &[CategoryTotal]) -> Vec<CategoryRow> {
    breakdown
        .iter()
        .map(|c| CategoryRow {
            category: c.name.clone(),
            amount: c.value,
        })
        .collect()
}

/// Summary of the saving habits in `entries`.
///
/// An empty history is answered locally without calling the provider.
pub async fn summarize_savings(
    provider: &dyn InsightProvider,
    entries: &[SavingEntry],
) -> Result<SavingsSummary> {
    if entries.is_empty() {
        return Ok(SavingsSummary {
            summary: "You haven't added any savings yet.".to_string(),
            recommendation:
                "Start by adding your first saving entry to see your financial journey begin!"
                    .to_string(),
        });
    }
    provider.summarize(&saving_rows(entries)).await
}

/// How a chart should be drawn, as described by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartAdvice {
    pub description: String,
    pub is_3d: bool,
    /// Set when the provider failed and the default chart was chosen.
    pub error: Option<String>,
}

impl ChartAdvice {
    fn from_result(result: Result<String>, fallback: &str) -> Self {
        match result {
            Ok(description) if !description.trim().is_empty() => {
                debug!(%description, "Received chart advice");
                ChartAdvice {
                    is_3d: description.to_lowercase().contains("3d"),
                    description,
                    error: None,
                }
            }
            Ok(_) => ChartAdvice {
                description: fallback.to_string(),
                is_3d: false,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "Chart advice failed, using {fallback}");
                ChartAdvice {
                    description: fallback.to_string(),
                    is_3d: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

pub async fn history_chart_advice(
    provider: &dyn InsightProvider,
    entries: &[SavingEntry],
) -> ChartAdvice {
    let result = provider.visualize_history(&history_rows(entries)).await;
    ChartAdvice::from_result(result, DEFAULT_HISTORY_CHART)
}

pub async fn category_chart_advice(
    provider: &dyn InsightProvider,
    breakdown: &[CategoryTotal],
) -> ChartAdvice {
    let result = provider
        .visualize_categories(&category_rows(breakdown))
        .await;
    ChartAdvice::from_result(result, DEFAULT_CATEGORY_CHART)
}
