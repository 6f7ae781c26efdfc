//! Handler for the `check` command group.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::scan::ScanOverrides;
use crate::infrastructure::config::Config;

/// Validate a configuration file without fetching anything.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;
    let query = config.scan_query(&ScanOverrides::default())?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Scan");
    output::field("Asset", &query.asset);
    output::field("Lookback", format!("{} days", query.lookback.num_days()));
    output::field("Resample", query.freq);
    output::field("Threshold", format!("{}%", query.threshold_pct));

    output::section("Venues");
    let mapping = config.instruments_for(&query.asset);
    for venue in config.venues.enabled() {
        match mapping.get(&venue) {
            Some(instrument) => output::field(venue.label(), instrument),
            None => output::warning(&format!(
                "{} is enabled but has no {} instrument",
                venue.label(),
                query.asset
            )),
        }
    }

    if mapping.len() < 2 {
        output::warning("Fewer than two venues map this asset, spreads need two");
    }

    output::success("Configuration check complete");
    Ok(())
}
