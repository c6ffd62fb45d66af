use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ModuleHealthRecord, ModuleSignal, ModuleStatus};

/// Named domain modules scored from their per-module "last sync" rows.
pub const SYNC_MODULES: &[&str] = &[
    "recipes",
    "ingredients",
    "safety_checks",
    "labour",
    "reservations",
    "pos_revenue",
];

/// Raw data tables scored directly, one count + latest-timestamp query
/// pair per table. (module_key, table, timestamp column)
pub const TABLE_MODULES: &[(&str, &str, &str)] = &[
    ("recipes", "recipes", "updated_at"),
    ("pantry_items", "pantry_items", "updated_at"),
    ("safety_logs", "safety_logs", "logged_at"),
    ("prep_lists", "prep_lists", "prepared_at"),
    ("cleaning_completions", "cleaning_completions", "completed_at"),
    ("waste_logs", "waste_entries", "recorded_at"),
];

pub const FRESH_MAX_HOURS: f64 = 24.0;
pub const RECENT_MAX_HOURS: f64 = 72.0;
pub const STALE_MAX_HOURS: f64 = 168.0;
pub const VERY_STALE_MAX_HOURS: f64 = 336.0;

const STALEST_LIMIT: usize = 3;

/// Which signal source feeds the scorer. Both produce the same record
/// shape so the reactor and UI treat them uniformly; selection is driven
/// by the tenant's persisted operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthSource {
    SyncRegistry,
    TableScan,
}

impl HealthSource {
    pub fn from_operating_mode(mode: &str) -> Self {
        match mode {
            "integrated" => HealthSource::SyncRegistry,
            _ => HealthSource::TableScan,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sync" => Some(HealthSource::SyncRegistry),
            "tables" => Some(HealthSource::TableScan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub overall_score: i32,
    pub modules: Vec<ModuleHealthRecord>,
    pub stalest: Vec<ModuleHealthRecord>,
    pub recommendations: Vec<String>,
}

/// Map elapsed hours since the last record onto a status and score.
/// Two distinct hour bands both carry the very_stale label but decay to
/// different scores.
pub fn freshness_score(hours_since: Option<f64>) -> (ModuleStatus, i32) {
    match hours_since {
        None => (ModuleStatus::NoData, 0),
        Some(h) if h <= FRESH_MAX_HOURS => (ModuleStatus::Fresh, 100),
        Some(h) if h <= RECENT_MAX_HOURS => (ModuleStatus::Recent, 75),
        Some(h) if h <= STALE_MAX_HOURS => (ModuleStatus::Stale, 50),
        Some(h) if h <= VERY_STALE_MAX_HOURS => (ModuleStatus::VeryStale, 25),
        Some(_) => (ModuleStatus::VeryStale, 10),
    }
}

fn score_signal(signal: &ModuleSignal, now: DateTime<Utc>) -> ModuleHealthRecord {
    let (status, score) = if !signal.connected {
        (ModuleStatus::Disconnected, 0)
    } else {
        let hours = signal
            .last_data_at
            .map(|t| (now - t).num_minutes() as f64 / 60.0);
        freshness_score(hours)
    };

    ModuleHealthRecord {
        module_key: signal.module_key.clone(),
        score,
        status,
        last_data_at: signal.last_data_at,
        record_count: signal.record_count,
    }
}

fn recommendation_for(record: &ModuleHealthRecord) -> Option<String> {
    let last = record
        .last_data_at
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string());
    match record.status {
        ModuleStatus::NoData => Some(format!(
            "No records have ever been captured for {}; connect the integration or start logging this area.",
            record.module_key
        )),
        ModuleStatus::VeryStale => Some(format!(
            "Data for {} is severely out of date (last entry {}); review whether this area is still being recorded.",
            record.module_key,
            last.unwrap_or_else(|| "unknown".to_string())
        )),
        ModuleStatus::Stale => Some(format!(
            "{} is falling behind (last entry {}); schedule a catch-up entry.",
            record.module_key,
            last.unwrap_or_else(|| "unknown".to_string())
        )),
        ModuleStatus::Disconnected => Some(format!(
            "The {} integration is disconnected; reconnect it to resume syncing.",
            record.module_key
        )),
        ModuleStatus::Fresh | ModuleStatus::Recent => None,
    }
}

/// Score every tracked module and roll the results up into an overall
/// score, the stalest three modules, and their recommendations.
pub fn score_modules(signals: &[ModuleSignal], now: DateTime<Utc>) -> HealthReport {
    let modules: Vec<ModuleHealthRecord> =
        signals.iter().map(|s| score_signal(s, now)).collect();

    let overall_score = if modules.is_empty() {
        0
    } else {
        let total: i64 = modules.iter().map(|m| m.score as i64).sum();
        (total as f64 / modules.len() as f64).round() as i32
    };

    let mut ranked = modules.clone();
    ranked.sort_by(|a, b| {
        a.score
            .cmp(&b.score)
            .then_with(|| a.module_key.cmp(&b.module_key))
    });
    let stalest: Vec<ModuleHealthRecord> =
        ranked.into_iter().take(STALEST_LIMIT).collect();

    let recommendations: Vec<String> =
        stalest.iter().filter_map(recommendation_for).collect();

    HealthReport {
        overall_score,
        modules,
        stalest,
        recommendations,
    }
}
