//! ARBLEDGER — multi-leg bet settlement and aggregation engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! reads a wager snapshot, and prints every arbitrage group followed by
//! overall, monthly and (optionally) per-counterparty statistics.
//!
//! Usage: `arbledger [snapshot.json]`

use anyhow::Result;
use tracing::info;

use arbledger::config;
use arbledger::engine::cluster_with;
use arbledger::format::{format_percent, format_profit};
use arbledger::report::{stats, summarize};
use arbledger::storage;

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load_or_default("config.toml")?;

    init_logging();

    let snapshot = std::env::args()
        .nth(1)
        .unwrap_or_else(|| cfg.report.snapshot_path.clone());
    let symbol = cfg.report.currency_symbol.as_str();

    info!(
        snapshot = %snapshot,
        slot_policy = ?cfg.engine.slot_policy,
        "ARBLEDGER starting up"
    );

    let wagers = storage::load_wagers(Some(&snapshot))?;
    let groups = cluster_with(&wagers, cfg.engine.slot_policy)?;

    // -- Groups ----------------------------------------------------------

    for summary in summarize(&groups) {
        println!("{}", summary.render(symbol));
    }

    // -- Statistics ------------------------------------------------------

    let totals = stats::overall(&groups);
    println!("\nOverall: {}", totals.render(symbol));

    println!("\nMonthly:");
    for (month, period) in stats::monthly(&groups) {
        println!("  {month}: {}", period.render(symbol));
    }

    if cfg.report.show_counterparties {
        println!("\nCounterparties:");
        for (name, house) in stats::by_counterparty(&groups) {
            println!(
                "  {name:<20} legs={} settled={} profit={} roi={}",
                house.legs,
                house.settled_legs,
                format_profit(house.profit, symbol),
                format_percent(house.roi()),
            );
        }
    }

    info!(
        wagers = wagers.len(),
        groups = groups.len(),
        resolved = totals.resolved,
        profit = %totals.profit,
        "Report complete"
    );

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("arbledger=info"));

    let json_logging = std::env::var("ARBLEDGER_LOG_JSON").is_ok();

    // Logs go to stderr so the report on stdout stays clean.
    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
