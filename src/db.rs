use anyhow::Context;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::health::{HealthSource, SYNC_MODULES, TABLE_MODULES};
use crate::models::{CostEntry, FinancialSnapshot, IssueRecord, ModuleSignal, ShiftRecord};
use crate::snapshot::{DirectTotals, ImportedTotals};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn fetch_organization(pool: &PgPool, org_id: Uuid) -> anyhow::Result<(String, String)> {
    let row = sqlx::query(
        "SELECT name, operating_mode FROM ops_health.organizations WHERE id = $1",
    )
    .bind(org_id)
    .fetch_optional(pool)
    .await?
    .with_context(|| format!("organization {org_id} not found"))?;
    Ok((row.get("name"), row.get("operating_mode")))
}

async fn sum_query(
    pool: &PgPool,
    sql: &str,
    org_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<f64> {
    let row = sqlx::query(sql)
        .bind(org_id)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;
    Ok(row.get("total"))
}

/// A failed metric source degrades to zero; a partial snapshot beats no
/// snapshot. The miss is folded into the completeness score downstream.
fn zero_on_error(result: anyhow::Result<f64>, metric: &str) -> f64 {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(metric, error = %err, "metric source failed; treating as zero");
            0.0
        }
    }
}

/// Category-partitioned sums from the first-party event tables the org
/// already owns.
pub async fn fetch_direct_totals(
    pool: &PgPool,
    org_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> DirectTotals {
    let revenue = sum_query(
        pool,
        "SELECT COALESCE(SUM(amount), 0)::float8 AS total \
         FROM ops_health.payments WHERE org_id = $1 AND paid_at BETWEEN $2 AND $3",
        org_id,
        start,
        end,
    )
    .await;
    let cogs_food = sum_query(
        pool,
        "SELECT COALESCE(SUM(cost), 0)::float8 AS total \
         FROM ops_health.cost_entries \
         WHERE org_id = $1 AND category = 'food' AND recorded_at::date BETWEEN $2 AND $3",
        org_id,
        start,
        end,
    )
    .await;
    let cogs_beverage = sum_query(
        pool,
        "SELECT COALESCE(SUM(cost), 0)::float8 AS total \
         FROM ops_health.cost_entries \
         WHERE org_id = $1 AND category = 'beverage' AND recorded_at::date BETWEEN $2 AND $3",
        org_id,
        start,
        end,
    )
    .await;
    let waste_food = sum_query(
        pool,
        "SELECT COALESCE(SUM(amount), 0)::float8 AS total \
         FROM ops_health.waste_entries \
         WHERE org_id = $1 AND category = 'food' AND recorded_at::date BETWEEN $2 AND $3",
        org_id,
        start,
        end,
    )
    .await;
    let waste_beverage = sum_query(
        pool,
        "SELECT COALESCE(SUM(amount), 0)::float8 AS total \
         FROM ops_health.waste_entries \
         WHERE org_id = $1 AND category = 'beverage' AND recorded_at::date BETWEEN $2 AND $3",
        org_id,
        start,
        end,
    )
    .await;
    let overhead = sum_query(
        pool,
        "SELECT COALESCE(SUM(amount), 0)::float8 AS total \
         FROM ops_health.expense_entries \
         WHERE org_id = $1 AND expense_type = 'overhead' AND recorded_on BETWEEN $2 AND $3",
        org_id,
        start,
        end,
    )
    .await;
    let ops_supplies = sum_query(
        pool,
        "SELECT COALESCE(SUM(amount), 0)::float8 AS total \
         FROM ops_health.expense_entries \
         WHERE org_id = $1 AND expense_type = 'ops_supplies' AND recorded_on BETWEEN $2 AND $3",
        org_id,
        start,
        end,
    )
    .await;

    let labour = fetch_labour_sums(pool, org_id, start, end).await;
    let (labour_wages, labour_super, labour_overtime) = match labour {
        Ok(split) => split,
        Err(err) => {
            tracing::warn!(metric = "labour", error = %err, "metric source failed; treating as zero");
            (0.0, 0.0, 0.0)
        }
    };

    DirectTotals {
        revenue: zero_on_error(revenue, "revenue"),
        cogs_food: zero_on_error(cogs_food, "cogs_food"),
        cogs_beverage: zero_on_error(cogs_beverage, "cogs_beverage"),
        waste_food: zero_on_error(waste_food, "waste_food"),
        waste_beverage: zero_on_error(waste_beverage, "waste_beverage"),
        labour_wages,
        labour_super,
        labour_overtime,
        overhead: zero_on_error(overhead, "overhead"),
        ops_supplies: zero_on_error(ops_supplies, "ops_supplies"),
    }
}

async fn fetch_labour_sums(
    pool: &PgPool,
    org_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<(f64, f64, f64)> {
    let row = sqlx::query(
        "SELECT COALESCE(SUM(wages), 0)::float8 AS wages, \
                COALESCE(SUM(superannuation), 0)::float8 AS superannuation, \
                COALESCE(SUM(overtime), 0)::float8 AS overtime \
         FROM ops_health.shifts WHERE org_id = $1 AND shift_date BETWEEN $2 AND $3",
    )
    .bind(org_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;
    Ok((
        row.get("wages"),
        row.get("superannuation"),
        row.get("overtime"),
    ))
}

/// Pre-aggregated totals imported from external accounting/POS feeds,
/// scoped to the same period. Degrades to empty on failure like any
/// other metric source.
pub async fn fetch_imported_totals(
    pool: &PgPool,
    org_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> ImportedTotals {
    let rows = sqlx::query(
        "SELECT data_type, amount FROM ops_health.imported_financials \
         WHERE org_id = $1 AND period_start >= $2 AND period_end <= $3",
    )
    .bind(org_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await;

    let mut totals = ImportedTotals::default();
    match rows {
        Ok(rows) => {
            for row in rows {
                let data_type: String = row.get("data_type");
                totals.apply(&data_type, row.get("amount"));
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "imported financials unavailable; treating as empty");
        }
    }
    totals
}

/// Upsert keyed by the natural key so a re-run for the same period wins
/// cleanly. If the upsert cannot be applied, fall back to a plain insert;
/// readers de-duplicate by max(generated_at). A failure even on the
/// fallback insert is fatal.
pub async fn upsert_snapshot(pool: &PgPool, snapshot: &FinancialSnapshot) -> anyhow::Result<()> {
    const UPSERT: &str = "INSERT INTO ops_health.financial_snapshots \
        (id, org_id, period_start, period_end, period_type, revenue_total, \
         cogs_food, cogs_beverage, cogs_waste_food, cogs_waste_beverage, \
         labour_wages, labour_super, labour_overtime, labour_total, \
         overhead_total, ops_supplies_total, gross_profit, gross_margin_pct, \
         prime_cost, prime_cost_pct, net_profit, net_profit_pct, labour_pct, \
         overhead_pct, ops_supplies_pct, break_even_revenue, \
         data_completeness_pct, generated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                 $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28) \
         ON CONFLICT (org_id, period_start, period_end, period_type) DO UPDATE SET \
         revenue_total = EXCLUDED.revenue_total, \
         cogs_food = EXCLUDED.cogs_food, \
         cogs_beverage = EXCLUDED.cogs_beverage, \
         cogs_waste_food = EXCLUDED.cogs_waste_food, \
         cogs_waste_beverage = EXCLUDED.cogs_waste_beverage, \
         labour_wages = EXCLUDED.labour_wages, \
         labour_super = EXCLUDED.labour_super, \
         labour_overtime = EXCLUDED.labour_overtime, \
         labour_total = EXCLUDED.labour_total, \
         overhead_total = EXCLUDED.overhead_total, \
         ops_supplies_total = EXCLUDED.ops_supplies_total, \
         gross_profit = EXCLUDED.gross_profit, \
         gross_margin_pct = EXCLUDED.gross_margin_pct, \
         prime_cost = EXCLUDED.prime_cost, \
         prime_cost_pct = EXCLUDED.prime_cost_pct, \
         net_profit = EXCLUDED.net_profit, \
         net_profit_pct = EXCLUDED.net_profit_pct, \
         labour_pct = EXCLUDED.labour_pct, \
         overhead_pct = EXCLUDED.overhead_pct, \
         ops_supplies_pct = EXCLUDED.ops_supplies_pct, \
         break_even_revenue = EXCLUDED.break_even_revenue, \
         data_completeness_pct = EXCLUDED.data_completeness_pct, \
         generated_at = EXCLUDED.generated_at";

    const PLAIN_INSERT: &str = "INSERT INTO ops_health.financial_snapshots \
        (id, org_id, period_start, period_end, period_type, revenue_total, \
         cogs_food, cogs_beverage, cogs_waste_food, cogs_waste_beverage, \
         labour_wages, labour_super, labour_overtime, labour_total, \
         overhead_total, ops_supplies_total, gross_profit, gross_margin_pct, \
         prime_cost, prime_cost_pct, net_profit, net_profit_pct, labour_pct, \
         overhead_pct, ops_supplies_pct, break_even_revenue, \
         data_completeness_pct, generated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                 $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)";

    if let Err(err) = bind_snapshot(sqlx::query(UPSERT), snapshot)
        .execute(pool)
        .await
    {
        tracing::warn!(error = %err, "snapshot upsert failed; falling back to plain insert");
        bind_snapshot(sqlx::query(PLAIN_INSERT), snapshot)
            .execute(pool)
            .await
            .context("snapshot insert failed after upsert fallback")?;
    }
    Ok(())
}

fn bind_snapshot<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    s: &'q FinancialSnapshot,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(Uuid::new_v4())
        .bind(s.org_id)
        .bind(s.period_start)
        .bind(s.period_end)
        .bind(&s.period_type)
        .bind(s.revenue_total)
        .bind(s.cogs_food)
        .bind(s.cogs_beverage)
        .bind(s.cogs_waste_food)
        .bind(s.cogs_waste_beverage)
        .bind(s.labour_wages)
        .bind(s.labour_super)
        .bind(s.labour_overtime)
        .bind(s.labour_total)
        .bind(s.overhead_total)
        .bind(s.ops_supplies_total)
        .bind(s.gross_profit)
        .bind(s.gross_margin_pct)
        .bind(s.prime_cost)
        .bind(s.prime_cost_pct)
        .bind(s.net_profit)
        .bind(s.net_profit_pct)
        .bind(s.labour_pct)
        .bind(s.overhead_pct)
        .bind(s.ops_supplies_pct)
        .bind(s.break_even_revenue)
        .bind(s.data_completeness_pct)
        .bind(s.generated_at)
}

/// Latest snapshot per org. Selecting by max(generated_at) also defends
/// against duplicate rows accumulated in the degraded insert mode.
pub async fn fetch_latest_snapshot(
    pool: &PgPool,
    org_id: Uuid,
) -> anyhow::Result<Option<FinancialSnapshot>> {
    let row = sqlx::query(
        "SELECT org_id, period_start, period_end, period_type, revenue_total, \
                cogs_food, cogs_beverage, cogs_waste_food, cogs_waste_beverage, \
                labour_wages, labour_super, labour_overtime, labour_total, \
                overhead_total, ops_supplies_total, gross_profit, gross_margin_pct, \
                prime_cost, prime_cost_pct, net_profit, net_profit_pct, labour_pct, \
                overhead_pct, ops_supplies_pct, break_even_revenue, \
                data_completeness_pct, generated_at \
         FROM ops_health.financial_snapshots \
         WHERE org_id = $1 ORDER BY generated_at DESC LIMIT 1",
    )
    .bind(org_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| FinancialSnapshot {
        org_id: row.get("org_id"),
        period_start: row.get("period_start"),
        period_end: row.get("period_end"),
        period_type: row.get("period_type"),
        revenue_total: row.get("revenue_total"),
        cogs_food: row.get("cogs_food"),
        cogs_beverage: row.get("cogs_beverage"),
        cogs_waste_food: row.get("cogs_waste_food"),
        cogs_waste_beverage: row.get("cogs_waste_beverage"),
        labour_wages: row.get("labour_wages"),
        labour_super: row.get("labour_super"),
        labour_overtime: row.get("labour_overtime"),
        labour_total: row.get("labour_total"),
        overhead_total: row.get("overhead_total"),
        ops_supplies_total: row.get("ops_supplies_total"),
        gross_profit: row.get("gross_profit"),
        gross_margin_pct: row.get("gross_margin_pct"),
        prime_cost: row.get("prime_cost"),
        prime_cost_pct: row.get("prime_cost_pct"),
        net_profit: row.get("net_profit"),
        net_profit_pct: row.get("net_profit_pct"),
        labour_pct: row.get("labour_pct"),
        overhead_pct: row.get("overhead_pct"),
        ops_supplies_pct: row.get("ops_supplies_pct"),
        break_even_revenue: row.get("break_even_revenue"),
        data_completeness_pct: row.get("data_completeness_pct"),
        generated_at: row.get("generated_at"),
    }))
}

/// Fetch raw freshness signals for the selected source. Both sources
/// return the same shape so downstream scoring is uniform.
pub async fn fetch_health_signals(
    pool: &PgPool,
    org_id: Uuid,
    source: HealthSource,
) -> anyhow::Result<Vec<ModuleSignal>> {
    match source {
        HealthSource::SyncRegistry => fetch_sync_signals(pool, org_id).await,
        HealthSource::TableScan => Ok(fetch_table_signals(pool, org_id).await),
    }
}

async fn fetch_sync_signals(pool: &PgPool, org_id: Uuid) -> anyhow::Result<Vec<ModuleSignal>> {
    let rows = sqlx::query(
        "SELECT module_key, last_synced_at, record_count, connected \
         FROM ops_health.module_syncs WHERE org_id = $1",
    )
    .bind(org_id)
    .fetch_all(pool)
    .await?;

    let mut found: std::collections::HashMap<String, ModuleSignal> =
        std::collections::HashMap::new();
    for row in rows {
        let module_key: String = row.get("module_key");
        found.insert(
            module_key.clone(),
            ModuleSignal {
                module_key,
                last_data_at: row.get("last_synced_at"),
                record_count: row.get("record_count"),
                connected: row.get("connected"),
            },
        );
    }

    // A module the registry tracks but the org has never synced still
    // surfaces, as no_data.
    Ok(SYNC_MODULES
        .iter()
        .map(|key| {
            found.remove(*key).unwrap_or(ModuleSignal {
                module_key: key.to_string(),
                last_data_at: None,
                record_count: 0,
                connected: true,
            })
        })
        .collect())
}

async fn fetch_table_signals(pool: &PgPool, org_id: Uuid) -> Vec<ModuleSignal> {
    let mut signals = Vec::with_capacity(TABLE_MODULES.len());
    for (module_key, table, ts_column) in TABLE_MODULES {
        let sql = format!(
            "SELECT COUNT(*) AS n, MAX({ts_column}) AS latest FROM ops_health.{table} \
             WHERE org_id = $1"
        );
        let signal = match sqlx::query(&sql).bind(org_id).fetch_one(pool).await {
            Ok(row) => ModuleSignal {
                module_key: module_key.to_string(),
                last_data_at: row.get::<Option<DateTime<Utc>>, _>("latest"),
                record_count: row.get("n"),
                connected: true,
            },
            Err(err) => {
                tracing::warn!(module = module_key, error = %err, "table scan failed; reporting no data");
                ModuleSignal {
                    module_key: module_key.to_string(),
                    last_data_at: None,
                    record_count: 0,
                    connected: true,
                }
            }
        };
        signals.push(signal);
    }
    signals
}

pub async fn fetch_latest_audit_score(
    pool: &PgPool,
    org_id: Uuid,
) -> anyhow::Result<Option<f64>> {
    let row = sqlx::query(
        "SELECT score FROM ops_health.audit_scores \
         WHERE org_id = $1 ORDER BY assessed_at DESC LIMIT 1",
    )
    .bind(org_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| r.get("score")))
}

/// Issue tracking is an optional feature per tenant; a failed query
/// degrades to an empty list so the reactor run still completes.
pub async fn fetch_open_issues(pool: &PgPool, org_id: Uuid) -> Vec<IssueRecord> {
    let rows = sqlx::query(
        "SELECT severity, title, detail FROM ops_health.issue_records \
         WHERE org_id = $1 AND NOT resolved ORDER BY created_at",
    )
    .bind(org_id)
    .fetch_all(pool)
    .await;

    match rows {
        Ok(rows) => rows
            .into_iter()
            .map(|row| IssueRecord {
                severity: row.get("severity"),
                title: row.get("title"),
                detail: row.get("detail"),
            })
            .collect(),
        Err(err) => {
            tracing::warn!(error = %err, "issue records unavailable; continuing without them");
            Vec::new()
        }
    }
}

pub async fn fetch_workers(
    pool: &PgPool,
    org_id: Uuid,
    worker_id: Option<Uuid>,
) -> anyhow::Result<Vec<(Uuid, String, String)>> {
    let mut sql = String::from(
        "SELECT id, full_name, employment_type FROM ops_health.workers WHERE org_id = $1",
    );
    if worker_id.is_some() {
        sql.push_str(" AND id = $2");
    }
    sql.push_str(" ORDER BY full_name");

    let mut query = sqlx::query(&sql).bind(org_id);
    if let Some(id) = worker_id {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            (
                row.get("id"),
                row.get("full_name"),
                row.get("employment_type"),
            )
        })
        .collect())
}

pub async fn fetch_shifts(
    pool: &PgPool,
    org_id: Uuid,
    worker_id: Uuid,
    since: NaiveDate,
) -> anyhow::Result<Vec<ShiftRecord>> {
    let rows = sqlx::query(
        "SELECT worker_id, shift_date, start_time, end_time, break_minutes \
         FROM ops_health.shifts \
         WHERE org_id = $1 AND worker_id = $2 AND shift_date >= $3 \
         ORDER BY shift_date, start_time",
    )
    .bind(org_id)
    .bind(worker_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ShiftRecord {
            worker_id: row.get("worker_id"),
            date: row.get("shift_date"),
            start_time: row.get("start_time"),
            end_time: row.get("end_time"),
            break_minutes: row.get::<i32, _>("break_minutes") as i64,
        })
        .collect())
}

pub async fn fetch_cost_series(
    pool: &PgPool,
    org_id: Uuid,
    item_id: Uuid,
) -> anyhow::Result<Vec<CostEntry>> {
    let rows = sqlx::query(
        "SELECT id, cost, recorded_at FROM ops_health.cost_entries \
         WHERE org_id = $1 AND item_id = $2 ORDER BY recorded_at DESC",
    )
    .bind(org_id)
    .bind(item_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| CostEntry {
            id: row.get("id"),
            cost: row.get("cost"),
            recorded_at: row.get("recorded_at"),
        })
        .collect())
}

/// Bulk-load imported financial totals from a CSV export, idempotent on
/// source_key.
pub async fn import_csv(
    pool: &PgPool,
    org_id: Uuid,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        data_type: String,
        amount: f64,
        period_start: NaiveDate,
        period_end: NaiveDate,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO ops_health.imported_financials
            (id, org_id, data_type, amount, period_start, period_end, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(org_id)
        .bind(&row.data_type)
        .bind(row.amount)
        .bind(row.period_start)
        .bind(row.period_end)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

fn seed_id(n: u32) -> Uuid {
    Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0000u128 + n as u128)
}

/// Load a realistic demo organization covering every engine input.
pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let org_id = Uuid::parse_str("7c9e4c2a-58b1-4f6d-9a2e-4f0b6d8c1a3e")?;
    let cook_id = Uuid::parse_str("2f8d1b7e-6a3c-4d9f-8e1b-5c7a9d2f4b6e")?;
    let casual_id = Uuid::parse_str("9a4b2c8d-1e6f-4a3b-bc5d-7e9f1a3b5c7d")?;
    let flour_id = seed_id(900);

    sqlx::query(
        r#"
        INSERT INTO ops_health.organizations (id, name, operating_mode)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name, operating_mode = EXCLUDED.operating_mode
        "#,
    )
    .bind(org_id)
    .bind("Harbourside Bistro")
    .bind("integrated")
    .execute(pool)
    .await?;

    let workers = vec![
        (cook_id, "Remy Tran", "full_time", "cook_grade_3"),
        (casual_id, "Skye Donohue", "casual", "foh_level_2"),
    ];
    for (id, name, employment_type, classification) in workers {
        sqlx::query(
            r#"
            INSERT INTO ops_health.workers (id, org_id, full_name, employment_type, classification)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                employment_type = EXCLUDED.employment_type,
                classification = EXCLUDED.classification
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(name)
        .bind(employment_type)
        .bind(classification)
        .execute(pool)
        .await?;
    }

    let week = |d: u32| NaiveDate::from_ymd_opt(2026, 3, d).context("invalid date");

    let payments = vec![
        (seed_id(1), 2_840.50, week(2)?),
        (seed_id(2), 3_105.00, week(3)?),
        (seed_id(3), 2_410.75, week(4)?),
        (seed_id(4), 3_890.25, week(5)?),
        (seed_id(5), 4_466.00, week(6)?),
    ];
    for (id, amount, paid_at) in payments {
        sqlx::query(
            r#"
            INSERT INTO ops_health.payments (id, org_id, amount, paid_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(amount)
        .bind(paid_at)
        .execute(pool)
        .await?;
    }

    // Flour cost series ends in a spike the anomaly detector should flag.
    let costs = vec![
        (seed_id(10), flour_id, "food", 42.00, week(1)?),
        (seed_id(11), flour_id, "food", 41.50, week(2)?),
        (seed_id(12), flour_id, "food", 42.00, week(3)?),
        (seed_id(13), flour_id, "food", 42.25, week(4)?),
        (seed_id(14), flour_id, "food", 55.90, week(6)?),
        (seed_id(15), seed_id(901), "beverage", 310.00, week(3)?),
        (seed_id(16), seed_id(901), "beverage", 298.00, week(5)?),
    ];
    for (id, item_id, category, cost, on) in costs {
        sqlx::query(
            r#"
            INSERT INTO ops_health.cost_entries (id, org_id, item_id, category, cost, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(item_id)
        .bind(category)
        .bind(cost)
        .bind(Utc.from_utc_datetime(&on.and_hms_opt(6, 0, 0).context("invalid time")?))
        .execute(pool)
        .await?;
    }

    let waste = vec![
        (seed_id(20), "food", 86.40, week(3)?),
        (seed_id(21), "beverage", 24.00, week(5)?),
    ];
    for (id, category, amount, on) in waste {
        sqlx::query(
            r#"
            INSERT INTO ops_health.waste_entries (id, org_id, category, amount, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(category)
        .bind(amount)
        .bind(Utc.from_utc_datetime(&on.and_hms_opt(21, 30, 0).context("invalid time")?))
        .execute(pool)
        .await?;
    }

    let expenses = vec![
        (seed_id(30), "overhead", 1_450.00, week(2)?),
        (seed_id(31), "overhead", 380.00, week(5)?),
        (seed_id(32), "ops_supplies", 240.00, week(4)?),
    ];
    for (id, expense_type, amount, on) in expenses {
        sqlx::query(
            r#"
            INSERT INTO ops_health.expense_entries (id, org_id, expense_type, amount, recorded_on)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(expense_type)
        .bind(amount)
        .bind(on)
        .execute(pool)
        .await?;
    }

    // Remy works the full week including an overnight with a tight
    // turnaround; Skye has a two hour casual shift.
    let shifts = vec![
        (seed_id(40), cook_id, week(2)?, (9, 0), (17, 0), 30, 232.00, 26.68, 0.0),
        (seed_id(41), cook_id, week(3)?, (9, 0), (17, 0), 30, 232.00, 26.68, 0.0),
        (seed_id(42), cook_id, week(4)?, (14, 0), (22, 0), 30, 232.00, 26.68, 0.0),
        (seed_id(43), cook_id, week(5)?, (6, 0), (14, 0), 30, 232.00, 26.68, 58.00),
        (seed_id(44), cook_id, week(6)?, (22, 0), (6, 0), 30, 232.00, 26.68, 116.00),
        (seed_id(45), casual_id, week(6)?, (18, 0), (20, 0), 0, 76.40, 8.79, 0.0),
    ];
    for (id, worker_id, date, start, end, break_minutes, wages, superannuation, overtime) in shifts
    {
        sqlx::query(
            r#"
            INSERT INTO ops_health.shifts
            (id, org_id, worker_id, shift_date, start_time, end_time, break_minutes,
             wages, superannuation, overtime)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(worker_id)
        .bind(date)
        .bind(chrono::NaiveTime::from_hms_opt(start.0, start.1, 0).context("invalid time")?)
        .bind(chrono::NaiveTime::from_hms_opt(end.0, end.1, 0).context("invalid time")?)
        .bind(break_minutes)
        .bind(wages)
        .bind(superannuation)
        .bind(overtime)
        .execute(pool)
        .await?;
    }

    let syncs = vec![
        ("recipes", Some((2026, 3, 6, 7)), 48i64, true),
        ("ingredients", Some((2026, 3, 6, 7)), 212, true),
        ("safety_checks", Some((2026, 2, 20, 9)), 31, true),
        ("labour", Some((2026, 3, 6, 5)), 164, true),
        ("reservations", None, 0, true),
        ("pos_revenue", Some((2026, 3, 1, 23)), 8_412, false),
    ];
    for (module_key, last, record_count, connected) in syncs {
        let last_synced_at = match last {
            Some((y, m, d, h)) => Some(
                Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
                    .single()
                    .context("invalid timestamp")?,
            ),
            None => None,
        };
        sqlx::query(
            r#"
            INSERT INTO ops_health.module_syncs
            (org_id, module_key, last_synced_at, record_count, connected)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (org_id, module_key) DO UPDATE
            SET last_synced_at = EXCLUDED.last_synced_at,
                record_count = EXCLUDED.record_count,
                connected = EXCLUDED.connected
            "#,
        )
        .bind(org_id)
        .bind(module_key)
        .bind(last_synced_at)
        .bind(record_count)
        .bind(connected)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO ops_health.audit_scores (id, org_id, score, assessed_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(seed_id(50))
    .bind(org_id)
    .bind(68.0)
    .bind(
        Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0)
            .single()
            .context("invalid timestamp")?,
    )
    .execute(pool)
    .await?;

    let issues = vec![
        (
            seed_id(60),
            "high",
            "Fridge 2 over temperature",
            "Overnight probe logged 9C; stock moved to fridge 1.",
        ),
        (
            seed_id(61),
            "medium",
            "Supplier invoice mismatch",
            "Invoice 4411 is $118.20 over the purchase order.",
        ),
    ];
    for (id, severity, title, detail) in issues {
        sqlx::query(
            r#"
            INSERT INTO ops_health.issue_records (id, org_id, severity, title, detail)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(severity)
        .bind(title)
        .bind(detail)
        .execute(pool)
        .await?;
    }

    Ok(())
}
