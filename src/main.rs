use clap::Parser;

use fundwatch::adapter::inbound::cli::command::Cli;
use fundwatch::adapter::inbound::cli::output::{self, OutputConfig};
use fundwatch::adapter::inbound::cli::run;

#[tokio::main]
async fn main() {
    // Environment overrides such as RUST_LOG may live in .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Some(forced) = cli.color.forced() {
        owo_colors::set_override(forced);
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = run(&cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
