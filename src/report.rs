use std::fmt::Write;

use crate::health::HealthReport;
use crate::models::{Alert, FinancialSnapshot};

/// Render the operational report the daily email and dashboard consume:
/// latest snapshot, module freshness, and the current alert list.
pub fn build_report(
    org_label: &str,
    snapshot: Option<&FinancialSnapshot>,
    health: &HealthReport,
    alerts: &[Alert],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Operational Health Report");
    let _ = writeln!(output, "Generated for {org_label}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Financial Snapshot");

    match snapshot {
        None => {
            let _ = writeln!(output, "No snapshot has been aggregated yet.");
        }
        Some(s) => {
            let _ = writeln!(
                output,
                "Period {} to {} ({})",
                s.period_start, s.period_end, s.period_type
            );
            let _ = writeln!(output, "- Revenue: ${:.2}", s.revenue_total);
            let _ = writeln!(
                output,
                "- Gross profit: ${:.2} ({:.1}%)",
                s.gross_profit, s.gross_margin_pct
            );
            let _ = writeln!(
                output,
                "- Prime cost: ${:.2} ({:.1}%)",
                s.prime_cost, s.prime_cost_pct
            );
            let _ = writeln!(
                output,
                "- Net profit: ${:.2} ({:.1}%)",
                s.net_profit, s.net_profit_pct
            );
            let _ = writeln!(output, "- Labour: {:.1}% of revenue", s.labour_pct);
            let _ = writeln!(output, "- Break-even revenue: ${:.2}", s.break_even_revenue);
            let _ = writeln!(
                output,
                "- Data completeness: {:.0}%",
                s.data_completeness_pct
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Module Health ({}/100)", health.overall_score);

    if health.modules.is_empty() {
        let _ = writeln!(output, "No modules are tracked for this organization.");
    } else {
        for module in &health.modules {
            let last = module
                .last_data_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "never".to_string());
            let _ = writeln!(
                output,
                "- {}: {} ({}, last data {}, {} records)",
                module.module_key,
                module.score,
                module.status.as_str(),
                last,
                module.record_count
            );
        }
    }

    if !health.recommendations.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "### Recommendations");
        for text in &health.recommendations {
            let _ = writeln!(output, "- {text}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Alerts");

    if alerts.is_empty() {
        let _ = writeln!(output, "No alerts raised.");
    } else {
        for alert in alerts {
            let _ = writeln!(
                output,
                "- [{}] {}: {}",
                alert.level.as_str(),
                alert.title,
                alert.detail
            );
        }
    }

    output
}
