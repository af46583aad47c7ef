//! Currency table and conversions to and from the base unit.

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Currency every amount is normalized to for aggregation.
pub const BASE_CURRENCY: CurrencyCode = CurrencyCode::Usd;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Sll,
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 5] = [
        CurrencyCode::Sll,
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Jpy,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::Sll => "SLL",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Jpy => "JPY",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurrencyCode::Sll => "Sierra Leonean Leone",
            CurrencyCode::Usd => "United States Dollar",
            CurrencyCode::Eur => "Euro",
            CurrencyCode::Gbp => "British Pound",
            CurrencyCode::Jpy => "Japanese Yen",
        }
    }

    /// Display prefix and number of fraction digits.
    fn display_convention(&self) -> (&'static str, usize) {
        match self {
            CurrencyCode::Sll => ("Le ", 0),
            CurrencyCode::Usd => ("$", 2),
            CurrencyCode::Eur => ("€", 2),
            CurrencyCode::Gbp => ("£", 2),
            CurrencyCode::Jpy => ("¥", 2),
        }
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SLL" => Ok(CurrencyCode::Sll),
            "USD" => Ok(CurrencyCode::Usd),
            "EUR" => Ok(CurrencyCode::Eur),
            "GBP" => Ok(CurrencyCode::Gbp),
            "JPY" => Ok(CurrencyCode::Jpy),
            _ => Err(anyhow!("Unsupported currency: {}", s)),
        }
    }
}

/// Immutable table of conversion rates into the base unit.
///
/// A rate is the number of base units one unit of the currency is worth.
/// Codes missing from the table are unconvertible: every conversion through
/// them yields `0.0` instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<CurrencyCode, f64>,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::from_rates([
            (CurrencyCode::Usd, 1.0),
            (CurrencyCode::Sll, 1.0 / 21000.0),
            (CurrencyCode::Eur, 1.08),
            (CurrencyCode::Gbp, 1.26),
            (CurrencyCode::Jpy, 1.0 / 157.0),
        ])
    }
}

impl RateTable {
    pub fn from_rates(rates: impl IntoIterator<Item = (CurrencyCode, f64)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    /// Returns a copy of this table with `overrides` applied on top.
    ///
    /// Fails when an override is not a finite, strictly positive number.
    pub fn with_overrides(&self, overrides: &HashMap<CurrencyCode, f64>) -> Result<Self> {
        let mut rates = self.rates.clone();
        for (code, rate) in overrides {
            if !rate.is_finite() || *rate <= 0.0 {
                bail!("Invalid rate for {}: {}", code, rate);
            }
            rates.insert(*code, *rate);
        }
        Ok(Self { rates })
    }

    /// Rate of `code` into the base unit, `0.0` when the code has no rate.
    pub fn rate_to_base(&self, code: CurrencyCode) -> f64 {
        self.rates.get(&code).copied().unwrap_or(0.0)
    }

    pub fn is_convertible(&self, code: CurrencyCode) -> bool {
        self.rate_to_base(code) > 0.0
    }

    /// Converts `amount` in `code` into base units. No rounding is applied.
    pub fn to_base(&self, amount: f64, code: CurrencyCode) -> f64 {
        let rate = self.rate_to_base(code);
        if rate == 0.0 && amount != 0.0 {
            warn!("No conversion rate for {code}, treating {amount} as unconvertible");
        }
        amount * rate
    }

    /// Converts a base-unit amount into `code`, `0.0` when the code has no rate.
    pub fn from_base(&self, base_amount: f64, code: CurrencyCode) -> f64 {
        let rate = self.rate_to_base(code);
        if rate > 0.0 {
            base_amount / rate
        } else {
            warn!("No conversion rate for {code}, cannot convert {base_amount} from base");
            0.0
        }
    }
}

/// Formats `amount` for display in the currency named by `code`.
///
/// Unknown codes fall back to `"<code> <amount>"` with two decimals.
/// Non-finite amounts are rejected rather than rendered.
pub fn format(amount: f64, code: &str) -> Result<String> {
    match code.parse::<CurrencyCode>() {
        Ok(currency) => format_amount(amount, currency),
        Err(_) => {
            ensure_finite(amount)?;
            Ok(format!("{} {:.2}", code, round_to(amount, 2)))
        }
    }
}

/// Formats `amount` using the display convention of `currency`.
pub fn format_amount(amount: f64, currency: CurrencyCode) -> Result<String> {
    ensure_finite(amount)?;

    let (prefix, decimals) = currency.display_convention();
    let rounded = round_to(amount.abs(), decimals);
    let digits = format!("{rounded:.decimals$}");
    let body = match digits.split_once('.') {
        Some((whole, fraction)) => format!("{}.{}", group_thousands(whole), fraction),
        None => group_thousands(&digits),
    };
    let sign = if amount < 0.0 && rounded != 0.0 {
        "-"
    } else {
        ""
    };

    Ok(match currency {
        // The leone keeps its prefix ahead of the sign: "Le -5,000".
        CurrencyCode::Sll => format!("{prefix}{sign}{body}"),
        _ => format!("{sign}{prefix}{body}"),
    })
}

fn ensure_finite(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        bail!("Cannot display non-finite amount: {}", amount);
    }
    Ok(())
}

/// Rounds half away from zero, like the usual display rounding for money.
///
/// Values too large to scale are returned as is; they have no fraction left.
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
