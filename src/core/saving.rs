//! Saving entries and how they are created.

use crate::core::currency::{BASE_CURRENCY, CurrencyCode, RateTable};
use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{LazyLock, Mutex};
use tracing::{debug, warn};
use ulid::Generator;

pub const DEFAULT_CATEGORY: &str = "General";

/// Reserved category of entries that correct the running total.
pub const BALANCE_ADJUSTMENT: &str = "Balance Adjustment";

/// Differences smaller than this are not worth an adjustment entry.
const ADJUSTMENT_EPSILON: f64 = 1e-9;

/// A recorded saving.
///
/// `base_amount` is computed once, with the rate in effect when the entry was
/// created, and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingEntry {
    pub id: String,
    pub amount: f64,
    // Records written before multi-currency support were all in leones.
    #[serde(default = "legacy_currency")]
    pub currency: CurrencyCode,
    pub base_amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    pub timestamp: DateTime<Utc>,
}

fn legacy_currency() -> CurrencyCode {
    CurrencyCode::Sll
}

// Shared so that ids minted within the same millisecond still increase.
static ID_GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

/// Next saving id. Ids sort in the order they were handed out.
fn next_id() -> Result<String> {
    let mut generator = ID_GENERATOR
        .lock()
        .map_err(|_| anyhow!("Saving id generator lock poisoned"))?;
    let id = generator
        .generate()
        .map_err(|e| anyhow!("Failed to generate saving id: {e:?}"))?;
    Ok(id.to_string())
}

/// Input collected for a new saving.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSaving {
    pub amount: f64,
    pub currency: CurrencyCode,
    pub category: Option<String>,
}

impl SavingEntry {
    /// Creates an entry from `new`, freezing the current rate of its currency.
    pub fn create(new: NewSaving, rates: &RateTable, timestamp: DateTime<Utc>) -> Result<Self> {
        if !new.amount.is_finite() {
            bail!("Amount must be a finite number, got {}", new.amount);
        }

        let base_amount = rates.to_base(new.amount, new.currency);
        let category = normalize_category(new.category.as_deref()).to_string();
        let entry = SavingEntry {
            id: next_id()?,
            amount: new.amount,
            currency: new.currency,
            base_amount,
            category: Some(category),
            timestamp,
        };

        if entry.is_unconvertible() {
            warn!(id = %entry.id, currency = %entry.currency, "Saving has no base amount");
        }
        debug!(?entry, "Created saving entry");
        Ok(entry)
    }

    /// Category used for grouping; missing or blank categories are "General".
    pub fn category(&self) -> &str {
        normalize_category(self.category.as_deref())
    }

    pub fn is_adjustment(&self) -> bool {
        self.category() == BALANCE_ADJUSTMENT
    }

    /// A non-zero amount that converted to nothing had no usable rate.
    pub fn is_unconvertible(&self) -> bool {
        self.amount != 0.0 && self.base_amount == 0.0
    }
}

fn normalize_category(category: Option<&str>) -> &str {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => DEFAULT_CATEGORY,
    }
}

/// Builds the adjustment that moves `current_total` to `desired_total`.
///
/// Both totals are in base units. Returns `None` when they already agree.
pub fn balance_adjustment(current_total: f64, desired_total: f64) -> Option<NewSaving> {
    let delta = desired_total - current_total;
    if !delta.is_finite() || delta.abs() < ADJUSTMENT_EPSILON {
        return None;
    }
    Some(NewSaving {
        amount: delta,
        currency: BASE_CURRENCY,
        category: Some(BALANCE_ADJUSTMENT.to_string()),
    })
}
