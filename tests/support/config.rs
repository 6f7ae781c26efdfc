use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Shipped configuration template.
pub const TEMPLATE: &str = include_str!("../../fundwatch.toml.example");

/// Write `contents` to a unique file in the temp dir.
pub fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("fundwatch-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

/// Minimal valid configuration with a custom `[scan]` body.
pub fn with_scan(scan: &str) -> String {
    format!(
        r#"
[scan]
{scan}

[instruments.BTC]
hyperliquid = "BTC"
derive = "BTC-PERP"
binance = "BTCUSDT"
"#
    )
}

/// Minimal valid configuration.
pub fn minimal() -> String {
    with_scan(
        r#"asset = "BTC"
lookback_days = 7
resample = "1h"
threshold_pct = 0.01"#,
    )
}
