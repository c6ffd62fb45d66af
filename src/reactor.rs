use uuid::Uuid;

use crate::models::{
    Alert, AlertLevel, FinancialSnapshot, IssueRecord, ModuleHealthRecord, ModuleStatus,
};

// Fixed threshold rules. Not configurable at runtime; tests assert
// against the same constants the engine reads.
pub const LABOUR_PCT_CRITICAL: f64 = 32.0;
pub const LABOUR_PCT_WARNING: f64 = 28.0;
pub const FOOD_COST_PCT_CRITICAL: f64 = 35.0;
pub const OPS_SUPPLIES_PCT_WARNING: f64 = 4.0;
pub const NET_PROFIT_PCT_CRITICAL: f64 = 5.0;
pub const AUDIT_SCORE_CRITICAL: f64 = 50.0;
pub const AUDIT_SCORE_WARNING: f64 = 75.0;

/// Everything a reactor run consumes. Every field is optional or may be
/// empty; missing inputs skip the rules that depend on them.
#[derive(Debug, Clone, Default)]
pub struct ReactorInputs {
    pub snapshot: Option<FinancialSnapshot>,
    pub health: Vec<ModuleHealthRecord>,
    pub audit_score: Option<f64>,
    pub issues: Vec<IssueRecord>,
}

fn alert(level: AlertLevel, title: &str, detail: String, source: &str) -> Alert {
    Alert {
        id: Uuid::new_v4(),
        level,
        title: title.to_string(),
        detail,
        source_module: source.to_string(),
    }
}

/// Apply the threshold rules in declared order. The returned list keeps
/// rule-evaluation order; it is never re-sorted by severity, because the
/// order governs display.
pub fn evaluate(inputs: &ReactorInputs) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(snapshot) = &inputs.snapshot {
        if snapshot.labour_pct > LABOUR_PCT_CRITICAL {
            alerts.push(alert(
                AlertLevel::Critical,
                "Labour cost high",
                format!(
                    "Labour is {:.1}% of revenue (threshold {:.0}%).",
                    snapshot.labour_pct, LABOUR_PCT_CRITICAL
                ),
                "financials",
            ));
        } else if snapshot.labour_pct > LABOUR_PCT_WARNING {
            alerts.push(alert(
                AlertLevel::Warning,
                "Labour cost trending high",
                format!(
                    "Labour is {:.1}% of revenue (watch threshold {:.0}%).",
                    snapshot.labour_pct, LABOUR_PCT_WARNING
                ),
                "financials",
            ));
        }

        // Skip the food-cost rule entirely on zero revenue.
        if snapshot.revenue_total > 0.0 {
            let food_cost_pct = snapshot.cogs_food / snapshot.revenue_total * 100.0;
            if food_cost_pct > FOOD_COST_PCT_CRITICAL {
                alerts.push(alert(
                    AlertLevel::Critical,
                    "Food cost high",
                    format!(
                        "Food cost is {:.1}% of revenue (threshold {:.0}%).",
                        food_cost_pct, FOOD_COST_PCT_CRITICAL
                    ),
                    "financials",
                ));
            }
        }

        if snapshot.ops_supplies_pct > OPS_SUPPLIES_PCT_WARNING {
            alerts.push(alert(
                AlertLevel::Warning,
                "Operating supplies high",
                format!(
                    "Operating supplies are {:.1}% of revenue (threshold {:.0}%).",
                    snapshot.ops_supplies_pct, OPS_SUPPLIES_PCT_WARNING
                ),
                "financials",
            ));
        }

        if snapshot.net_profit_pct < NET_PROFIT_PCT_CRITICAL {
            alerts.push(alert(
                AlertLevel::Critical,
                "Net profit low",
                format!(
                    "Net profit is {:.1}% of revenue (threshold {:.0}%).",
                    snapshot.net_profit_pct, NET_PROFIT_PCT_CRITICAL
                ),
                "financials",
            ));
        }
    }

    if let Some(score) = inputs.audit_score {
        if score < AUDIT_SCORE_CRITICAL {
            alerts.push(alert(
                AlertLevel::Critical,
                "Audit score low",
                format!("Latest audit scored {score:.0} (threshold {AUDIT_SCORE_CRITICAL:.0})."),
                "audit",
            ));
        } else if score < AUDIT_SCORE_WARNING {
            alerts.push(alert(
                AlertLevel::Warning,
                "Audit score low",
                format!("Latest audit scored {score:.0} (threshold {AUDIT_SCORE_WARNING:.0})."),
                "audit",
            ));
        }
    }

    for record in &inputs.health {
        let last = record
            .last_data_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        match record.status {
            ModuleStatus::Stale => alerts.push(alert(
                AlertLevel::Critical,
                &format!("{} data stale", record.module_key),
                format!("Last data at {last}."),
                &record.module_key,
            )),
            ModuleStatus::Disconnected => alerts.push(alert(
                AlertLevel::Warning,
                &format!("{} disconnected", record.module_key),
                format!("Last data at {last}."),
                &record.module_key,
            )),
            _ => {}
        }
    }

    for issue in &inputs.issues {
        let level = if issue.severity == "high" {
            AlertLevel::Critical
        } else {
            AlertLevel::Warning
        };
        alerts.push(alert(level, &issue.title, issue.detail.clone(), "issues"));
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot_with(labour_pct: f64, revenue: f64, cogs_food: f64) -> FinancialSnapshot {
        FinancialSnapshot {
            org_id: Uuid::new_v4(),
            period_start: chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            period_end: chrono::NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
            period_type: "weekly".to_string(),
            revenue_total: revenue,
            cogs_food,
            cogs_beverage: 0.0,
            cogs_waste_food: 0.0,
            cogs_waste_beverage: 0.0,
            labour_wages: 0.0,
            labour_super: 0.0,
            labour_overtime: 0.0,
            labour_total: 0.0,
            overhead_total: 0.0,
            ops_supplies_total: 0.0,
            gross_profit: 0.0,
            gross_margin_pct: 0.0,
            prime_cost: 0.0,
            prime_cost_pct: 0.0,
            net_profit: 0.0,
            net_profit_pct: 20.0,
            labour_pct,
            overhead_pct: 0.0,
            ops_supplies_pct: 0.0,
            break_even_revenue: 0.0,
            data_completeness_pct: 100.0,
            generated_at: Utc.with_ymd_and_hms(2026, 3, 8, 2, 0, 0).unwrap(),
        }
    }

    fn health_record(key: &str, status: ModuleStatus) -> ModuleHealthRecord {
        ModuleHealthRecord {
            module_key: key.to_string(),
            score: 50,
            status,
            last_data_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()),
            record_count: 3,
        }
    }

    #[test]
    fn labour_at_33_pct_raises_exactly_one_critical() {
        let inputs = ReactorInputs {
            snapshot: Some(snapshot_with(33.0, 10_000.0, 0.0)),
            ..ReactorInputs::default()
        };
        let alerts = evaluate(&inputs);
        let labour: Vec<&Alert> = alerts
            .iter()
            .filter(|a| a.title.starts_with("Labour"))
            .collect();
        assert_eq!(labour.len(), 1);
        assert_eq!(labour[0].level, AlertLevel::Critical);
        assert_eq!(labour[0].title, "Labour cost high");
    }

    #[test]
    fn labour_at_30_pct_raises_only_the_warning() {
        let inputs = ReactorInputs {
            snapshot: Some(snapshot_with(30.0, 10_000.0, 0.0)),
            ..ReactorInputs::default()
        };
        let alerts = evaluate(&inputs);
        let labour: Vec<&Alert> = alerts
            .iter()
            .filter(|a| a.title.starts_with("Labour"))
            .collect();
        assert_eq!(labour.len(), 1);
        assert_eq!(labour[0].level, AlertLevel::Warning);
        assert_eq!(labour[0].title, "Labour cost trending high");
    }

    #[test]
    fn zero_revenue_skips_the_food_cost_rule() {
        let inputs = ReactorInputs {
            snapshot: Some(snapshot_with(0.0, 0.0, 4_000.0)),
            ..ReactorInputs::default()
        };
        let alerts = evaluate(&inputs);
        assert!(alerts.iter().all(|a| a.title != "Food cost high"));
    }

    #[test]
    fn food_cost_over_35_pct_is_critical() {
        let inputs = ReactorInputs {
            snapshot: Some(snapshot_with(0.0, 10_000.0, 3_600.0)),
            ..ReactorInputs::default()
        };
        let alerts = evaluate(&inputs);
        let found = alerts.iter().find(|a| a.title == "Food cost high").unwrap();
        assert_eq!(found.level, AlertLevel::Critical);
    }

    #[test]
    fn missing_snapshot_skips_financial_rules_without_error() {
        let inputs = ReactorInputs {
            health: vec![health_record("labour", ModuleStatus::Fresh)],
            ..ReactorInputs::default()
        };
        let alerts = evaluate(&inputs);
        assert!(alerts.is_empty());
    }

    #[test]
    fn stale_module_is_critical_and_disconnected_is_warning() {
        let inputs = ReactorInputs {
            health: vec![
                health_record("safety_checks", ModuleStatus::Stale),
                health_record("pos_revenue", ModuleStatus::Disconnected),
                health_record("recipes", ModuleStatus::Recent),
            ],
            ..ReactorInputs::default()
        };
        let alerts = evaluate(&inputs);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert_eq!(alerts[0].title, "safety_checks data stale");
        assert!(alerts[0].detail.contains("Last data at"));
        assert_eq!(alerts[1].level, AlertLevel::Warning);
        assert_eq!(alerts[1].title, "pos_revenue disconnected");
    }

    #[test]
    fn issues_pass_through_with_severity_mapping() {
        let inputs = ReactorInputs {
            issues: vec![
                IssueRecord {
                    severity: "high".to_string(),
                    title: "Fridge 2 over temp".to_string(),
                    detail: "Logged 9C at 04:00.".to_string(),
                },
                IssueRecord {
                    severity: "medium".to_string(),
                    title: "Supplier invoice mismatch".to_string(),
                    detail: "Invoice 4411 differs from PO.".to_string(),
                },
            ],
            ..ReactorInputs::default()
        };
        let alerts = evaluate(&inputs);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert_eq!(alerts[0].title, "Fridge 2 over temp");
        assert_eq!(alerts[0].detail, "Logged 9C at 04:00.");
        assert_eq!(alerts[1].level, AlertLevel::Warning);
    }

    #[test]
    fn audit_score_bands() {
        let critical = evaluate(&ReactorInputs {
            audit_score: Some(40.0),
            ..ReactorInputs::default()
        });
        assert_eq!(critical[0].level, AlertLevel::Critical);

        let warning = evaluate(&ReactorInputs {
            audit_score: Some(70.0),
            ..ReactorInputs::default()
        });
        assert_eq!(warning[0].level, AlertLevel::Warning);

        let clean = evaluate(&ReactorInputs {
            audit_score: Some(90.0),
            ..ReactorInputs::default()
        });
        assert!(clean.is_empty());
    }

    #[test]
    fn alerts_keep_rule_evaluation_order() {
        let mut snapshot = snapshot_with(33.0, 10_000.0, 3_600.0);
        snapshot.ops_supplies_pct = 5.0;
        snapshot.net_profit_pct = 2.0;
        let inputs = ReactorInputs {
            snapshot: Some(snapshot),
            health: vec![health_record("waste_logs", ModuleStatus::Stale)],
            audit_score: Some(60.0),
            issues: vec![IssueRecord {
                severity: "high".to_string(),
                title: "Pest sighting".to_string(),
                detail: "Back dock, reported by AM shift.".to_string(),
            }],
        };
        let titles: Vec<String> = evaluate(&inputs).into_iter().map(|a| a.title).collect();
        assert_eq!(
            titles,
            vec![
                "Labour cost high",
                "Food cost high",
                "Operating supplies high",
                "Net profit low",
                "Audit score low",
                "waste_logs data stale",
                "Pest sighting",
            ]
        );
    }
}
