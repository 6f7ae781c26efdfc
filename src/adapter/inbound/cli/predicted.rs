//! Handler for the `predicted` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::PredictedArgs;
use crate::adapter::inbound::cli::{output, render};
use crate::domain::PredictedFunding;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory::build_predicted_client;

/// Execute `predicted`: one request to the aggregated predicted-funding
/// endpoint, optionally narrowed to one asset.
pub async fn execute(config: &Config, args: &PredictedArgs) -> Result<()> {
    let client = build_predicted_client(&config.venues);

    let pb = output::spinner("Fetching predicted funding...");
    let entries = match client.predicted_fundings().await {
        Ok(entries) => entries,
        Err(e) => {
            output::spinner_fail(&pb, "Request failed");
            return Err(e.into());
        }
    };
    output::spinner_success(&pb, "Fetched predicted funding");

    let entries = filter_asset(entries, args.asset.as_deref());

    if output::is_json() {
        output::json_output(json!({
            "type": "predicted",
            "payload": entries,
        }));
        return Ok(());
    }

    output::section("Predicted Funding");
    if entries.is_empty() {
        output::note("No predictions returned");
        return Ok(());
    }
    output::lines(&render::predicted_table(&entries, &config.annualization));
    Ok(())
}

fn filter_asset(entries: Vec<PredictedFunding>, asset: Option<&str>) -> Vec<PredictedFunding> {
    match asset {
        Some(asset) => entries
            .into_iter()
            .filter(|entry| entry.asset.eq_ignore_ascii_case(asset.trim()))
            .collect(),
        None => entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn entry(asset: &str) -> PredictedFunding {
        PredictedFunding {
            asset: asset.to_string(),
            venue: "HlPerp".to_string(),
            rate: dec!(0.0001),
            next_funding_time: Utc.timestamp_millis_opt(0).unwrap(),
        }
    }

    #[test]
    fn filter_is_case_insensitive() {
        let entries = vec![entry("BTC"), entry("ETH")];
        let kept = filter_asset(entries.clone(), Some(" btc "));
        assert_eq!(kept, vec![entry("BTC")]);
        assert_eq!(filter_asset(entries, None).len(), 2);
    }
}
