//! Refresh monitor factory.

use crate::application::{FundingMonitor, SpreadRanker};
use crate::infrastructure::config::Config;

use super::source::build_sources;

/// Wire a monitor from configuration: enabled venues, every instrument
/// mapping, fill overrides, annualization and the fetch deadline.
pub fn build_monitor(config: &Config) -> FundingMonitor {
    let mut monitor = FundingMonitor::new(build_sources(&config.venues))
        .with_ranker(SpreadRanker::new(config.annualization.clone()))
        .with_fetch_deadline(config.fetch_deadline());

    for asset in config.instruments.keys() {
        monitor = monitor.with_instruments(asset.clone(), config.instruments_for(asset));
    }
    for (venue, policy) in config.venues.fill_policies() {
        monitor = monitor.with_fill_policy(venue, policy);
    }
    monitor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Venue;

    #[test]
    fn monitor_uses_enabled_venues() {
        let mut config = Config::parse_toml(include_str!("../../../fundwatch.toml.example")).unwrap();
        config.venues.binance.enabled = false;
        let monitor = build_monitor(&config);
        assert_eq!(monitor.venues(), vec![Venue::Hyperliquid, Venue::Derive]);
    }
}
