use uuid::Uuid;

use crate::models::CostEntry;

/// Flag a cost when it rises above the trailing average by more than 5%.
pub const PRICE_TOLERANCE: f64 = 1.05;

/// How many older entries feed the trailing average.
pub const TRAILING_WINDOW: usize = 6;

/// Scan one item's cost history (most-recent-first) and return the ids of
/// entries priced above the tolerance band over their trailing average.
/// Presence in the result is the entire signal.
pub fn flag_price_outliers(entries: &[CostEntry]) -> Vec<Uuid> {
    let priced: Vec<&CostEntry> = entries.iter().filter(|e| e.cost > 0.0).collect();
    if priced.len() < 2 {
        return Vec::new();
    }

    let mut flagged = Vec::new();
    for (i, entry) in priced.iter().enumerate() {
        let older = &priced[i + 1..(i + 1 + TRAILING_WINDOW).min(priced.len())];
        if older.is_empty() {
            continue;
        }
        let average = older.iter().map(|e| e.cost).sum::<f64>() / older.len() as f64;
        if entry.cost > average * PRICE_TOLERANCE {
            flagged.push(entry.id);
        }
    }
    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(costs: &[f64]) -> Vec<CostEntry> {
        let newest = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        costs
            .iter()
            .enumerate()
            .map(|(i, &cost)| CostEntry {
                id: Uuid::new_v4(),
                cost,
                recorded_at: newest - Duration::days(i as i64),
            })
            .collect()
    }

    #[test]
    fn spike_above_five_percent_flags_only_the_spike() {
        let entries = series(&[130.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0]);
        let flagged = flag_price_outliers(&entries);
        assert_eq!(flagged, vec![entries[0].id]);
    }

    #[test]
    fn three_percent_rise_stays_inside_the_band() {
        let entries = series(&[103.0, 100.0, 100.0]);
        assert!(flag_price_outliers(&entries).is_empty());
    }

    #[test]
    fn exactly_five_percent_is_not_an_outlier() {
        let entries = series(&[105.0, 100.0, 100.0]);
        assert!(flag_price_outliers(&entries).is_empty());
    }

    #[test]
    fn single_entry_produces_no_flags() {
        let entries = series(&[400.0]);
        assert!(flag_price_outliers(&entries).is_empty());
    }

    #[test]
    fn zero_cost_entries_are_dropped_before_comparison() {
        let entries = series(&[130.0, 0.0, 100.0]);
        let flagged = flag_price_outliers(&entries);
        assert_eq!(flagged, vec![entries[0].id]);
    }

    #[test]
    fn trailing_average_uses_at_most_six_older_entries() {
        // Six cheap entries inside the window, one expensive entry beyond
        // it that must not drag the average up.
        let entries = series(&[112.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 500.0]);
        let flagged = flag_price_outliers(&entries);
        assert_eq!(flagged, vec![entries[0].id]);
    }

    #[test]
    fn oldest_entry_is_never_compared() {
        let entries = series(&[100.0, 9_000.0]);
        let flagged = flag_price_outliers(&entries);
        assert!(flagged.is_empty());
    }
}
