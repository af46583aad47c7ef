//! Derived views over a snapshot of saving entries.
//!
//! Everything here sums stored base amounts. Nothing is recomputed from the
//! native amount, so historical totals do not move when rates change.
use crate::core::currency::round_to;
use crate::core::saving::SavingEntry;
use chrono::{NaiveDate, TimeZone};
use std::collections::BTreeMap;

/// Sum of base amounts, `0.0` for no entries.
pub fn total(entries: &[SavingEntry]) -> f64 {
    entries.iter().map(|e| e.base_amount).sum()
}

/// Base amount per category, leaving out balance adjustments.
pub fn by_category(entries: &[SavingEntry]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.is_adjustment()) {
        *totals.entry(entry.category().to_string()).or_insert(0.0) += entry.base_amount;
    }
    totals
}

/// Base amount per calendar day in `tz`, ascending by date.
pub fn by_day<Tz: TimeZone>(entries: &[SavingEntry], tz: &Tz) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for entry in entries {
        let day = entry.timestamp.with_timezone(tz).date_naive();
        *totals.entry(day).or_insert(0.0) += entry.base_amount;
    }
    totals
}

/// Entries ordered newest first. Entries sharing a timestamp keep their
/// relative order.
pub fn newest_first(entries: &[SavingEntry]) -> Vec<&SavingEntry> {
    let mut sorted: Vec<&SavingEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
}

/// Category totals rounded to cents, largest first.
pub fn category_breakdown(entries: &[SavingEntry]) -> Vec<CategoryTotal> {
    let mut breakdown: Vec<CategoryTotal> = by_category(entries)
        .into_iter()
        .map(|(name, value)| CategoryTotal {
            name,
            value: round_to(value, 2),
        })
        .collect();
    // by_category yields names in order, so the stable sort breaks ties by name
    breakdown.sort_by(|a, b| b.value.total_cmp(&a.value));
    breakdown
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Daily totals rounded to cents, oldest first.
pub fn trend<Tz: TimeZone>(entries: &[SavingEntry], tz: &Tz) -> Vec<DailyTotal> {
    by_day(entries, tz)
        .into_iter()
        .map(|(date, amount)| DailyTotal {
            date,
            amount: round_to(amount, 2),
        })
        .collect()
}

/// Stable assignment of chart colour slots to categories.
///
/// Built once from a breakdown before anything is drawn. Slots cycle through
/// `palette_size` colours in breakdown order; categories already assigned keep
/// their slot when the palette is extended.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPalette {
    palette_size: usize,
    slots: BTreeMap<String, usize>,
}

impl CategoryPalette {
    pub fn assign(breakdown: &[CategoryTotal], palette_size: usize) -> Self {
        let mut palette = Self {
            palette_size: palette_size.max(1),
            slots: BTreeMap::new(),
        };
        palette.extend(breakdown);
        palette
    }

    /// Gives a slot to every category in `breakdown` that has none yet.
    pub fn extend(&mut self, breakdown: &[CategoryTotal]) {
        for (index, category) in breakdown.iter().enumerate() {
            if !self.slots.contains_key(&category.name) {
                self.slots
                    .insert(category.name.clone(), index % self.palette_size);
            }
        }
    }

    pub fn slot_for(&self, category: &str) -> Option<usize> {
        self.slots.get(category).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCode;
    use crate::core::saving::{BALANCE_ADJUSTMENT, DEFAULT_CATEGORY};
    use chrono::{DateTime, FixedOffset, Utc};

    fn entry(id: &str, base_amount: f64, category: Option<&str>, ts: &str) -> SavingEntry {
        SavingEntry {
            id: id.to_string(),
            amount: base_amount,
            currency: CurrencyCode::Usd,
            base_amount,
            category: category.map(str::to_string),
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc),
        }
    }

    fn sample() -> Vec<SavingEntry> {
        vec![
            entry("a", 10.0, Some("Food"), "2024-06-01T09:00:00Z"),
            entry("b", 5.0, Some(BALANCE_ADJUSTMENT), "2024-06-01T10:00:00Z"),
            entry("c", 2.5, Some("Transport"), "2024-06-02T08:00:00Z"),
            entry("d", 4.0, Some("Food"), "2024-06-03T18:30:00Z"),
        ]
    }

    #[test]
    fn test_total_empty_is_zero() {
        assert_eq!(total(&[]), 0.0);
    }

    #[test]
    fn test_total_is_order_independent() {
        let entries = sample();
        let mut reversed = entries.clone();
        reversed.reverse();
        assert_eq!(total(&entries), 21.5);
        assert_eq!(total(&reversed), total(&entries));
    }

    #[test]
    fn test_by_category_excludes_adjustments() {
        let entries = vec![
            entry("a", 10.0, Some("Food"), "2024-06-01T09:00:00Z"),
            entry("b", 5.0, Some(BALANCE_ADJUSTMENT), "2024-06-01T10:00:00Z"),
        ];
        let categories = by_category(&entries);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories.get("Food"), Some(&10.0));
        assert_eq!(total(&entries), 15.0);
    }

    #[test]
    fn test_by_category_defaults_missing_category() {
        let entries = vec![
            entry("a", 1.0, None, "2024-06-01T09:00:00Z"),
            entry("b", 2.0, Some(""), "2024-06-01T10:00:00Z"),
            entry("c", 3.0, Some(DEFAULT_CATEGORY), "2024-06-01T11:00:00Z"),
        ];
        let categories = by_category(&entries);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories.get(DEFAULT_CATEGORY), Some(&6.0));
    }

    #[test]
    fn test_by_day_groups_same_calendar_day() {
        let days = by_day(&sample(), &Utc);
        let keys: Vec<String> = days.keys().map(|d| d.to_string()).collect();
        assert_eq!(keys, vec!["2024-06-01", "2024-06-02", "2024-06-03"]);
        assert_eq!(days.values().copied().collect::<Vec<_>>(), vec![15.0, 2.5, 4.0]);
    }

    #[test]
    fn test_by_day_uses_local_calendar_day() {
        // 23:30 UTC is already the next day at UTC+2.
        let entries = vec![
            entry("a", 1.0, None, "2024-06-01T23:30:00Z"),
            entry("b", 2.0, None, "2024-06-02T01:00:00Z"),
        ];
        let utc_days = by_day(&entries, &Utc);
        assert_eq!(utc_days.len(), 2);

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let local_days = by_day(&entries, &plus_two);
        assert_eq!(local_days.len(), 1);
        let day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert_eq!(local_days.get(&day), Some(&3.0));
    }

    #[test]
    fn test_delete_removes_only_that_entry() {
        let entries = sample();
        let remaining: Vec<SavingEntry> =
            entries.iter().filter(|e| e.id != "c").cloned().collect();

        assert_eq!(total(&remaining), total(&entries) - 2.5);
        assert!(!by_category(&remaining).contains_key("Transport"));
        assert_eq!(by_category(&remaining).get("Food"), Some(&14.0));
        let day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(!by_day(&remaining, &Utc).contains_key(&day));
        assert_eq!(by_day(&remaining, &Utc).len(), 2);
    }

    #[test]
    fn test_newest_first_keeps_insertion_order_for_ties() {
        let entries = vec![
            entry("first", 1.0, None, "2024-06-01T09:00:00Z"),
            entry("second", 1.0, None, "2024-06-01T09:00:00Z"),
            entry("latest", 1.0, None, "2024-06-02T09:00:00Z"),
        ];
        let ids: Vec<&str> = newest_first(&entries).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["latest", "first", "second"]);
    }

    #[test]
    fn test_category_breakdown_sorted_and_rounded() {
        let entries = vec![
            entry("a", 1.004, Some("Books"), "2024-06-01T09:00:00Z"),
            entry("b", 7.0, Some("Food"), "2024-06-01T10:00:00Z"),
            entry("c", 1.0, Some("Art"), "2024-06-01T11:00:00Z"),
            entry("d", 100.0, Some(BALANCE_ADJUSTMENT), "2024-06-01T12:00:00Z"),
        ];
        let breakdown = category_breakdown(&entries);
        let names: Vec<&str> = breakdown.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Art", "Books"]);
        assert_eq!(breakdown[2].value, 1.0);
    }

    #[test]
    fn test_trend_rounds_daily_totals() {
        let entries = vec![
            entry("a", 1.111, None, "2024-06-01T09:00:00Z"),
            entry("b", 2.222, None, "2024-06-01T19:00:00Z"),
        ];
        let series = trend(&entries, &Utc);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].amount, 3.33);
    }

    #[test]
    fn test_palette_is_stable_across_updates() {
        let first = vec![
            CategoryTotal {
                name: "Food".to_string(),
                value: 10.0,
            },
            CategoryTotal {
                name: "Rent".to_string(),
                value: 5.0,
            },
        ];
        let mut palette = CategoryPalette::assign(&first, 5);
        assert_eq!(palette.slot_for("Food"), Some(0));
        assert_eq!(palette.slot_for("Rent"), Some(1));

        // Rent overtakes Food; existing slots do not move.
        let second = vec![
            CategoryTotal {
                name: "Rent".to_string(),
                value: 50.0,
            },
            CategoryTotal {
                name: "Food".to_string(),
                value: 10.0,
            },
            CategoryTotal {
                name: "Gifts".to_string(),
                value: 1.0,
            },
        ];
        palette.extend(&second);
        assert_eq!(palette.slot_for("Food"), Some(0));
        assert_eq!(palette.slot_for("Rent"), Some(1));
        assert_eq!(palette.slot_for("Gifts"), Some(2));
        assert_eq!(palette.slot_for("Travel"), None);
    }

    #[test]
    fn test_palette_cycles_colours() {
        let breakdown: Vec<CategoryTotal> = (0..7)
            .map(|i| CategoryTotal {
                name: format!("c{i}"),
                value: (10 - i) as f64,
            })
            .collect();
        let palette = CategoryPalette::assign(&breakdown, 5);
        assert_eq!(palette.slot_for("c5"), Some(0));
        assert_eq!(palette.slot_for("c6"), Some(1));
    }
}
