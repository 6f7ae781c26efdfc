//! Handler for the `watch` command.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::WatchArgs;
use crate::adapter::inbound::cli::{output, render};
use crate::application::{FundingMonitor, RefreshOutcome, ScanQuery};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;
use crate::infrastructure::factory::build_monitor;

/// Execute `watch`: refresh on a fixed interval until Ctrl+C or the cycle
/// limit, printing one line per published snapshot.
pub async fn execute(config: &Config, args: &WatchArgs) -> Result<()> {
    let query = config.scan_query(&args.query.overrides())?;
    let interval = match args.interval_secs {
        Some(0) => {
            return Err(ConfigError::InvalidValue {
                field: "interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into())
        }
        Some(secs) => Duration::from_secs(secs),
        None => config.refresh_interval(),
    };
    let monitor = build_monitor(config);

    output::section(&format!("Watching {}", query.asset));
    output::field("Interval", format!("{}s", interval.as_secs()));
    output::field("Venues", monitor.venues().len());
    output::note("Press Ctrl+C to stop");

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let cycles = watch_until(&monitor, &query, interval, args.cycles, shutdown).await?;

    output::success(&format!("Stopped after {cycles} refreshes"));
    Ok(())
}

/// Refresh every `interval` until `shutdown` resolves or `limit` refreshes
/// ran. A refresh still in flight when `shutdown` resolves is abandoned.
async fn watch_until<F>(
    monitor: &FundingMonitor,
    query: &ScanQuery,
    interval: Duration,
    limit: Option<u64>,
    shutdown: F,
) -> Result<u64>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut cycles = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }

        let timestamp = Utc::now().format("%H:%M:%S").to_string();
        let outcome = tokio::select! {
            outcome = monitor.refresh(query) => outcome?,
            () = &mut shutdown => {
                info!("Shutdown signal received, abandoning refresh");
                break;
            }
        };
        match outcome {
            RefreshOutcome::Published(snapshot) => {
                output::info(&timestamp, "refresh", &render::watch_line(&snapshot));
            }
            RefreshOutcome::Superseded { generation, newer } => {
                warn!(generation, newer, "Refresh superseded, skipping output");
            }
        }

        cycles += 1;
        if limit.is_some_and(|limit| cycles >= limit) {
            break;
        }
    }

    Ok(cycles)
}
