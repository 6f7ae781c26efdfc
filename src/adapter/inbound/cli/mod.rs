//! Command-line adapter: argument parsing, dispatch and terminal output.

pub mod check;
pub mod command;
pub mod config;
pub mod output;
pub mod predicted;
pub mod render;
pub mod scan;
pub mod watch;

use std::path::Path;

use command::{CheckCommand, Cli, Commands, ConfigCommand};

use crate::error::Result;
use crate::infrastructure::config::Config;

/// Dispatch a parsed command line.
pub async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Scan(args) => {
            let config = load(&args.config.config, cli.verbose)?;
            scan::execute(&config, args).await
        }
        Commands::Watch(args) => {
            let config = load(&args.config.config, cli.verbose)?;
            watch::execute(&config, args).await
        }
        Commands::Predicted(args) => {
            let config = load(&args.config.config, cli.verbose)?;
            predicted::execute(&config, args).await
        }
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Check(CheckCommand::Config(arg)) => check::execute_config(&arg.config),
    }
}

/// Load configuration and start logging at the requested verbosity.
fn load(path: &Path, verbose: u8) -> Result<Config> {
    let config = Config::load(path)?;
    config.logging.clone().with_verbosity(verbose).init();
    output::header(env!("CARGO_PKG_VERSION"));
    Ok(config)
}
