use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::FinancialSnapshot;

/// Category-partitioned sums computed from first-party event tables.
#[derive(Debug, Clone, Default)]
pub struct DirectTotals {
    pub revenue: f64,
    pub cogs_food: f64,
    pub cogs_beverage: f64,
    pub waste_food: f64,
    pub waste_beverage: f64,
    pub labour_wages: f64,
    pub labour_super: f64,
    pub labour_overtime: f64,
    pub overhead: f64,
    pub ops_supplies: f64,
}

/// Pre-aggregated totals supplied by an external accounting/POS import,
/// scoped to the same period.
#[derive(Debug, Clone, Default)]
pub struct ImportedTotals {
    pub revenue: f64,
    pub cogs_food: f64,
    pub cogs_beverage: f64,
    pub waste_food: f64,
    pub waste_beverage: f64,
    pub labour: f64,
    pub overhead: f64,
    pub ops_supplies: f64,
}

impl ImportedTotals {
    /// Fold one imported record into the matching metric. Unknown data
    /// types are ignored.
    pub fn apply(&mut self, data_type: &str, amount: f64) {
        match data_type {
            "revenue" => self.revenue += amount,
            "cogs_food" => self.cogs_food += amount,
            "cogs_beverage" => self.cogs_beverage += amount,
            "waste_food" => self.waste_food += amount,
            "waste_beverage" => self.waste_beverage += amount,
            "labour" => self.labour += amount,
            "overhead" => self.overhead += amount,
            "ops_supplies" => self.ops_supplies += amount,
            _ => {}
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Direct channel wins whenever it carries a non-zero sum. A legitimately
/// zero direct metric is indistinguishable from "no rows" here, so it
/// falls back to the imported channel and can under-report a true zero.
fn merge_metric(direct: f64, imported: f64) -> f64 {
    if direct != 0.0 {
        direct
    } else {
        imported
    }
}

fn pct_of(value: f64, revenue: f64) -> f64 {
    if revenue == 0.0 {
        0.0
    } else {
        value / revenue * 100.0
    }
}

/// Reduce both channel sums for one (org, period) into a snapshot row.
///
/// Pure: the caller supplies `generated_at`, so re-running with unchanged
/// inputs yields a value-identical snapshot.
pub fn build_snapshot(
    org_id: Uuid,
    period_start: NaiveDate,
    period_end: NaiveDate,
    period_type: &str,
    direct: &DirectTotals,
    imported: &ImportedTotals,
    generated_at: DateTime<Utc>,
) -> FinancialSnapshot {
    let revenue = merge_metric(direct.revenue, imported.revenue);
    let cogs_food = merge_metric(direct.cogs_food, imported.cogs_food);
    let cogs_beverage = merge_metric(direct.cogs_beverage, imported.cogs_beverage);
    let waste_food = merge_metric(direct.waste_food, imported.waste_food);
    let waste_beverage = merge_metric(direct.waste_beverage, imported.waste_beverage);
    let overhead = merge_metric(direct.overhead, imported.overhead);
    let ops_supplies = merge_metric(direct.ops_supplies, imported.ops_supplies);

    // Labour merges at the total level: when the imported channel wins,
    // the wage/super/overtime split is unknown and stays zero.
    let direct_labour = direct.labour_wages + direct.labour_super + direct.labour_overtime;
    let (labour_wages, labour_super, labour_overtime, labour_total) = if direct_labour != 0.0 {
        (
            direct.labour_wages,
            direct.labour_super,
            direct.labour_overtime,
            direct_labour,
        )
    } else {
        (0.0, 0.0, 0.0, imported.labour)
    };

    let gross_profit = revenue - (cogs_food + cogs_beverage + waste_food + waste_beverage);
    let prime_cost = cogs_food + cogs_beverage + labour_total + ops_supplies;
    let net_profit = gross_profit - labour_total - ops_supplies - overhead;

    let fixed_costs = overhead + labour_total + ops_supplies;
    let contribution_margin = if revenue == 0.0 {
        0.0
    } else {
        gross_profit / revenue
    };
    // A loss-making margin has no finite break-even; report 0.
    let break_even = if contribution_margin <= 0.0 {
        0.0
    } else {
        fixed_costs / contribution_margin
    };

    let primaries = [
        revenue,
        cogs_food,
        cogs_beverage,
        labour_total,
        overhead,
        ops_supplies,
    ];
    let present = primaries.iter().filter(|v| **v != 0.0).count();
    let completeness = present as f64 / primaries.len() as f64 * 100.0;

    FinancialSnapshot {
        org_id,
        period_start,
        period_end,
        period_type: period_type.to_string(),
        revenue_total: round2(revenue),
        cogs_food: round2(cogs_food),
        cogs_beverage: round2(cogs_beverage),
        cogs_waste_food: round2(waste_food),
        cogs_waste_beverage: round2(waste_beverage),
        labour_wages: round2(labour_wages),
        labour_super: round2(labour_super),
        labour_overtime: round2(labour_overtime),
        labour_total: round2(labour_total),
        overhead_total: round2(overhead),
        ops_supplies_total: round2(ops_supplies),
        gross_profit: round2(gross_profit),
        gross_margin_pct: round2(pct_of(gross_profit, revenue)),
        prime_cost: round2(prime_cost),
        prime_cost_pct: round2(pct_of(prime_cost, revenue)),
        net_profit: round2(net_profit),
        net_profit_pct: round2(pct_of(net_profit, revenue)),
        labour_pct: round2(pct_of(labour_total, revenue)),
        overhead_pct: round2(pct_of(overhead, revenue)),
        ops_supplies_pct: round2(pct_of(ops_supplies, revenue)),
        break_even_revenue: round2(break_even),
        data_completeness_pct: round2(completeness),
        generated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bounds() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
        )
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 8, 2, 0, 0).unwrap()
    }

    fn snapshot_for(direct: DirectTotals, imported: ImportedTotals) -> FinancialSnapshot {
        let (start, end) = bounds();
        build_snapshot(Uuid::new_v4(), start, end, "weekly", &direct, &imported, at())
    }

    #[test]
    fn zero_revenue_guards_every_ratio() {
        let snapshot = snapshot_for(
            DirectTotals {
                overhead: 900.0,
                labour_wages: 400.0,
                ..DirectTotals::default()
            },
            ImportedTotals::default(),
        );

        assert_eq!(snapshot.revenue_total, 0.0);
        assert_eq!(snapshot.gross_margin_pct, 0.0);
        assert_eq!(snapshot.prime_cost_pct, 0.0);
        assert_eq!(snapshot.net_profit_pct, 0.0);
        assert_eq!(snapshot.labour_pct, 0.0);
        assert_eq!(snapshot.overhead_pct, 0.0);
        assert_eq!(snapshot.ops_supplies_pct, 0.0);
        assert_eq!(snapshot.break_even_revenue, 0.0);
        assert!(snapshot.gross_margin_pct.is_finite());
    }

    #[test]
    fn direct_channel_wins_over_imported() {
        let snapshot = snapshot_for(
            DirectTotals {
                revenue: 10_000.0,
                ..DirectTotals::default()
            },
            ImportedTotals {
                revenue: 8_500.0,
                ..ImportedTotals::default()
            },
        );
        assert_eq!(snapshot.revenue_total, 10_000.0);
    }

    // Known limitation: a true zero in the direct channel cannot be told
    // apart from an absent direct channel, so imported data wins.
    #[test]
    fn zero_direct_metric_falls_back_to_imported() {
        let snapshot = snapshot_for(
            DirectTotals::default(),
            ImportedTotals {
                cogs_food: 2_100.0,
                ..ImportedTotals::default()
            },
        );
        assert_eq!(snapshot.cogs_food, 2_100.0);
    }

    #[test]
    fn derived_ratios_match_hand_computation() {
        let snapshot = snapshot_for(
            DirectTotals {
                revenue: 20_000.0,
                cogs_food: 5_000.0,
                cogs_beverage: 1_000.0,
                waste_food: 500.0,
                waste_beverage: 100.0,
                labour_wages: 5_000.0,
                labour_super: 550.0,
                labour_overtime: 450.0,
                overhead: 3_000.0,
                ops_supplies: 600.0,
            },
            ImportedTotals::default(),
        );

        // gross = 20000 - 6600 = 13400
        assert_eq!(snapshot.gross_profit, 13_400.0);
        assert_eq!(snapshot.gross_margin_pct, 67.0);
        // prime = 5000 + 1000 + 6000 + 600 = 12600
        assert_eq!(snapshot.prime_cost, 12_600.0);
        assert_eq!(snapshot.prime_cost_pct, 63.0);
        // net = 13400 - 6000 - 600 - 3000 = 3800
        assert_eq!(snapshot.net_profit, 3_800.0);
        assert_eq!(snapshot.net_profit_pct, 19.0);
        assert_eq!(snapshot.labour_total, 6_000.0);
        assert_eq!(snapshot.labour_pct, 30.0);
        // break-even = 9600 / 0.67
        assert_eq!(snapshot.break_even_revenue, 14_328.36);
        assert_eq!(snapshot.data_completeness_pct, 100.0);
    }

    #[test]
    fn loss_making_margin_reports_zero_break_even() {
        let snapshot = snapshot_for(
            DirectTotals {
                revenue: 1_000.0,
                cogs_food: 1_500.0,
                overhead: 200.0,
                ..DirectTotals::default()
            },
            ImportedTotals::default(),
        );
        assert!(snapshot.gross_profit < 0.0);
        assert_eq!(snapshot.break_even_revenue, 0.0);
    }

    #[test]
    fn completeness_counts_nonzero_primary_metrics() {
        let snapshot = snapshot_for(
            DirectTotals {
                revenue: 9_000.0,
                cogs_food: 2_000.0,
                labour_wages: 2_500.0,
                ..DirectTotals::default()
            },
            ImportedTotals::default(),
        );
        // revenue, cogs_food, labour of six
        assert_eq!(snapshot.data_completeness_pct, 50.0);
    }

    #[test]
    fn imported_labour_fallback_leaves_split_empty() {
        let snapshot = snapshot_for(
            DirectTotals::default(),
            ImportedTotals {
                labour: 4_800.0,
                ..ImportedTotals::default()
            },
        );
        assert_eq!(snapshot.labour_total, 4_800.0);
        assert_eq!(snapshot.labour_wages, 0.0);
        assert_eq!(snapshot.labour_super, 0.0);
        assert_eq!(snapshot.labour_overtime, 0.0);
    }

    #[test]
    fn rebuild_with_same_inputs_is_identical() {
        let (start, end) = bounds();
        let org = Uuid::new_v4();
        let direct = DirectTotals {
            revenue: 12_345.678,
            cogs_food: 3_210.999,
            ..DirectTotals::default()
        };
        let imported = ImportedTotals::default();

        let first = build_snapshot(org, start, end, "weekly", &direct, &imported, at());
        let second = build_snapshot(org, start, end, "weekly", &direct, &imported, at());
        assert_eq!(first, second);
    }

    #[test]
    fn monetary_outputs_are_rounded_to_cents() {
        let snapshot = snapshot_for(
            DirectTotals {
                revenue: 1_000.555,
                cogs_food: 333.333,
                ..DirectTotals::default()
            },
            ImportedTotals::default(),
        );
        assert_eq!(snapshot.revenue_total, 1_000.56);
        assert_eq!(snapshot.cogs_food, 333.33);
    }

    #[test]
    fn unknown_imported_data_type_is_ignored() {
        let mut imported = ImportedTotals::default();
        imported.apply("revenue", 100.0);
        imported.apply("revenue", 50.0);
        imported.apply("gift_cards", 999.0);
        assert_eq!(imported.revenue, 150.0);
        assert_eq!(imported.overhead, 0.0);
    }
}
