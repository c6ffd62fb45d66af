use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod anomaly;
mod db;
mod fatigue;
mod health;
mod models;
mod reactor;
mod report;
mod snapshot;

use health::HealthSource;
use models::EmploymentType;

#[derive(Parser)]
#[command(name = "ops-health-engine")]
#[command(about = "Operational health and financial reconciliation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import pre-aggregated financial totals from a CSV file
    Import {
        #[arg(long)]
        org: Uuid,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Aggregate one period into a financial snapshot and persist it
    Snapshot {
        #[arg(long)]
        org: Uuid,
        #[arg(long)]
        period_start: NaiveDate,
        #[arg(long)]
        period_end: NaiveDate,
        #[arg(long, default_value = "daily")]
        period_type: String,
        #[arg(long)]
        json: bool,
    },
    /// Score module data freshness
    Health {
        #[arg(long)]
        org: Uuid,
        /// Override the org's operating mode: "sync" or "tables"
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Run the threshold rules and list the current alerts
    Alerts {
        #[arg(long)]
        org: Uuid,
        #[arg(long)]
        json: bool,
    },
    /// Assess roster fatigue and compliance risk per worker
    Fatigue {
        #[arg(long)]
        org: Uuid,
        #[arg(long)]
        worker: Option<Uuid>,
        #[arg(long, default_value_t = 7)]
        since_days: i64,
        #[arg(long)]
        json: bool,
    },
    /// Flag price outliers in one trackable item's cost history
    Anomalies {
        #[arg(long)]
        org: Uuid,
        #[arg(long)]
        item: Uuid,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown operational report
    Report {
        #[arg(long)]
        org: Uuid,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { org, csv } => {
            let inserted = db::import_csv(&pool, org, &csv).await?;
            println!("Inserted {inserted} imported totals from {}.", csv.display());
        }
        Commands::Snapshot {
            org,
            period_start,
            period_end,
            period_type,
            json,
        } => {
            validate_period(period_start, period_end, &period_type)?;
            let direct = db::fetch_direct_totals(&pool, org, period_start, period_end).await;
            let imported =
                db::fetch_imported_totals(&pool, org, period_start, period_end).await;
            let snapshot = snapshot::build_snapshot(
                org,
                period_start,
                period_end,
                &period_type,
                &direct,
                &imported,
                Utc::now(),
            );
            db::upsert_snapshot(&pool, &snapshot).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!(
                    "Snapshot for {} to {} ({}):",
                    snapshot.period_start, snapshot.period_end, snapshot.period_type
                );
                println!(
                    "- revenue ${:.2}, gross profit ${:.2} ({:.1}%)",
                    snapshot.revenue_total, snapshot.gross_profit, snapshot.gross_margin_pct
                );
                println!(
                    "- prime cost ${:.2} ({:.1}%), net profit ${:.2} ({:.1}%)",
                    snapshot.prime_cost,
                    snapshot.prime_cost_pct,
                    snapshot.net_profit,
                    snapshot.net_profit_pct
                );
                println!(
                    "- break-even ${:.2}, completeness {:.0}%",
                    snapshot.break_even_revenue, snapshot.data_completeness_pct
                );
            }
        }
        Commands::Health { org, source, json } => {
            let health = run_health(&pool, org, source.as_deref()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("Overall health score: {}/100", health.overall_score);
                for module in &health.modules {
                    println!(
                        "- {}: {} ({})",
                        module.module_key,
                        module.score,
                        module.status.as_str()
                    );
                }
                for text in &health.recommendations {
                    println!("! {text}");
                }
            }
        }
        Commands::Alerts { org, json } => {
            let (_, mode) = db::fetch_organization(&pool, org).await?;
            let source = HealthSource::from_operating_mode(&mode);
            let signals = db::fetch_health_signals(&pool, org, source).await?;
            let health = health::score_modules(&signals, Utc::now());

            let inputs = reactor::ReactorInputs {
                snapshot: db::fetch_latest_snapshot(&pool, org).await?,
                health: health.modules,
                audit_score: db::fetch_latest_audit_score(&pool, org).await?,
                issues: db::fetch_open_issues(&pool, org).await,
            };
            let alerts = reactor::evaluate(&inputs);

            if json {
                println!("{}", serde_json::to_string_pretty(&alerts)?);
            } else if alerts.is_empty() {
                println!("No alerts raised.");
            } else {
                for alert in &alerts {
                    println!(
                        "[{}] {}: {}",
                        alert.level.as_str(),
                        alert.title,
                        alert.detail
                    );
                }
            }
        }
        Commands::Fatigue {
            org,
            worker,
            since_days,
            json,
        } => {
            let since = fatigue::cutoff_date(since_days);
            let workers = db::fetch_workers(&pool, org, worker).await?;
            if workers.is_empty() {
                println!("No matching workers for this organization.");
                return Ok(());
            }

            let mut assessments = Vec::new();
            for (worker_id, name, employment_type) in workers {
                let shifts = db::fetch_shifts(&pool, org, worker_id, since).await?;
                let assessment = fatigue::assess_worker(
                    worker_id,
                    &shifts,
                    EmploymentType::parse(&employment_type),
                );
                assessments.push((name, assessment));
            }

            if json {
                let payload: Vec<_> = assessments.iter().map(|(_, a)| a).collect();
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                for (name, assessment) in &assessments {
                    println!(
                        "{name}: {} risk, {:.1}h over {} consecutive day(s)",
                        assessment.risk_level.as_str(),
                        assessment.total_weekly_hours,
                        assessment.consecutive_days
                    );
                    for warning in &assessment.warnings {
                        println!("  ! {warning}");
                    }
                }
            }
        }
        Commands::Anomalies { org, item, json } => {
            let entries = db::fetch_cost_series(&pool, org, item).await?;
            let flagged = anomaly::flag_price_outliers(&entries);

            if json {
                println!("{}", serde_json::to_string_pretty(&flagged)?);
            } else if flagged.is_empty() {
                println!("No price anomalies across {} entries.", entries.len());
            } else {
                println!("Flagged {} of {} entries:", flagged.len(), entries.len());
                for entry in entries.iter().filter(|e| flagged.contains(&e.id)) {
                    println!(
                        "- {} at ${:.2} on {}",
                        entry.id,
                        entry.cost,
                        entry.recorded_at.format("%Y-%m-%d")
                    );
                }
            }
        }
        Commands::Report { org, out } => {
            let (name, mode) = db::fetch_organization(&pool, org).await?;
            let source = HealthSource::from_operating_mode(&mode);
            let signals = db::fetch_health_signals(&pool, org, source).await?;
            let health = health::score_modules(&signals, Utc::now());

            let snapshot = db::fetch_latest_snapshot(&pool, org).await?;
            let inputs = reactor::ReactorInputs {
                snapshot: snapshot.clone(),
                health: health.modules.clone(),
                audit_score: db::fetch_latest_audit_score(&pool, org).await?,
                issues: db::fetch_open_issues(&pool, org).await,
            };
            let alerts = reactor::evaluate(&inputs);

            let report = report::build_report(&name, snapshot.as_ref(), &health, &alerts);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

async fn run_health(
    pool: &PgPool,
    org: Uuid,
    source_flag: Option<&str>,
) -> anyhow::Result<health::HealthReport> {
    let source = match source_flag {
        Some(flag) => HealthSource::parse(flag)
            .with_context(|| format!("unknown health source '{flag}' (expected sync or tables)"))?,
        None => {
            let (_, mode) = db::fetch_organization(pool, org).await?;
            HealthSource::from_operating_mode(&mode)
        }
    };
    let signals = db::fetch_health_signals(pool, org, source).await?;
    Ok(health::score_modules(&signals, Utc::now()))
}

fn validate_period(start: NaiveDate, end: NaiveDate, period_type: &str) -> anyhow::Result<()> {
    if start > end {
        anyhow::bail!("period_start {start} is after period_end {end}");
    }
    if period_type.trim().is_empty() {
        anyhow::bail!("period_type must not be empty");
    }
    Ok(())
}
