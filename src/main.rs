use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;

use sales_dashboard::{Dashboard, DashboardConfig, SnapshotCache};

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::parse();

    let cache = SnapshotCache::new();
    let snapshot = cache
        .load(&config.sales, &config.customers)
        .context("cannot start without both datasets")?;
    let dashboard = Dashboard::new(snapshot);

    let selection = config.selection(&dashboard);
    let mut report = dashboard.report(config.view, &selection);
    if let Some(max) = config.rows {
        report.limit_rows(max);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if config.pretty {
        serde_json::to_writer_pretty(&mut out, &report)?;
    } else {
        serde_json::to_writer(&mut out, &report)?;
    }
    writeln!(out)?;
    Ok(())
}
