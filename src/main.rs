mod app;
mod cli;
mod config;
mod output;
mod utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--debug`
fn init_tracing(debug: bool) {
    let directive = if debug { "daytally=debug" } else { "daytally=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let (config, config_source) = Config::load();
    let cli = Cli::parse().with_config(&config);

    init_tracing(cli.debug);
    config_source.log();

    if let Err(e) = app::run(&cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
