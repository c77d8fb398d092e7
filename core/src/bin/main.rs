/// Chatflow CLI
///
/// Runs chat scripts interactively and checks them for problems before they
/// are deployed.

use chatflow_core::cli::{self, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run_cli_with_args(cli, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
