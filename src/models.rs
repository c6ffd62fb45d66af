use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One persisted, period-scoped financial aggregate for an organization.
/// Natural key: (org_id, period_start, period_end, period_type).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSnapshot {
    pub org_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub period_type: String,
    pub revenue_total: f64,
    pub cogs_food: f64,
    pub cogs_beverage: f64,
    pub cogs_waste_food: f64,
    pub cogs_waste_beverage: f64,
    pub labour_wages: f64,
    pub labour_super: f64,
    pub labour_overtime: f64,
    pub labour_total: f64,
    pub overhead_total: f64,
    pub ops_supplies_total: f64,
    pub gross_profit: f64,
    pub gross_margin_pct: f64,
    pub prime_cost: f64,
    pub prime_cost_pct: f64,
    pub net_profit: f64,
    pub net_profit_pct: f64,
    pub labour_pct: f64,
    pub overhead_pct: f64,
    pub ops_supplies_pct: f64,
    pub break_even_revenue: f64,
    pub data_completeness_pct: f64,
    pub generated_at: DateTime<Utc>,
}

/// Freshness status for one tracked operational module.
///
/// The five time-driven statuses are a pure function of elapsed time since
/// the module's last record. `Disconnected` is reported only by the
/// sync-registry source when an integration's connection flag is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Fresh,
    Recent,
    Stale,
    VeryStale,
    NoData,
    Disconnected,
}

impl ModuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Fresh => "fresh",
            ModuleStatus::Recent => "recent",
            ModuleStatus::Stale => "stale",
            ModuleStatus::VeryStale => "very_stale",
            ModuleStatus::NoData => "no_data",
            ModuleStatus::Disconnected => "disconnected",
        }
    }
}

/// Raw freshness signal for one module, before scoring.
#[derive(Debug, Clone)]
pub struct ModuleSignal {
    pub module_key: String,
    pub last_data_at: Option<DateTime<Utc>>,
    pub record_count: i64,
    pub connected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleHealthRecord {
    pub module_key: String,
    pub score: i32,
    pub status: ModuleStatus,
    pub last_data_at: Option<DateTime<Utc>>,
    pub record_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }
}

/// One prioritized alert. Alerts are recomputed fresh on every reactor run
/// and listed in rule-evaluation order.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: Uuid,
    pub level: AlertLevel,
    pub title: String,
    pub detail: String,
    pub source_module: String,
}

/// Unresolved issue raised by an upstream module; title and detail pass
/// straight through to the alert it becomes.
#[derive(Debug, Clone)]
pub struct IssueRecord {
    pub severity: String,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Casual,
}

impl EmploymentType {
    pub fn parse(value: &str) -> Self {
        match value {
            "casual" => EmploymentType::Casual,
            "part_time" => EmploymentType::PartTime,
            _ => EmploymentType::FullTime,
        }
    }
}

/// One rostered shift. Read-only input to the fatigue assessor.
#[derive(Debug, Clone)]
pub struct ShiftRecord {
    pub worker_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// A rest gap between shifts on consecutive days that fell below the
/// minimum break.
#[derive(Debug, Clone, Serialize)]
pub struct RestGapViolation {
    pub first_shift_date: NaiveDate,
    pub second_shift_date: NaiveDate,
    pub gap_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LongShift {
    pub date: NaiveDate,
    pub worked_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FatigueAssessment {
    pub worker_id: Uuid,
    pub consecutive_days: i64,
    pub max_consecutive_allowed: i64,
    pub short_gaps: Vec<RestGapViolation>,
    pub long_shifts: Vec<LongShift>,
    pub total_weekly_hours: f64,
    pub risk_level: RiskLevel,
    pub warnings: Vec<String>,
}

/// One cost observation for a trackable item, consumed read-only by the
/// price anomaly detector.
#[derive(Debug, Clone)]
pub struct CostEntry {
    pub id: Uuid,
    pub cost: f64,
    pub recorded_at: DateTime<Utc>,
}
