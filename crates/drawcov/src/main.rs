//! drawcov CLI - coverage maps of guest memory regions

mod cli;
mod commands;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Initialize metrics recorder if enabled
    let metrics_handle = if cli.metrics {
        drawcov::metrics::CliRecorder::new().install()
    } else {
        None
    };
    drawcov::metrics::init();

    let default_level = if cli.verbose {
        "drawcov=debug"
    } else if cli.silent {
        "drawcov=error"
    } else {
        "drawcov=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(default_level.parse().unwrap()),
        )
        .with_target(false)
        .init();

    let exit_code = commands::run_command(&cli);

    if let Some(handle) = metrics_handle {
        handle.print_summary();
    }

    std::process::exit(exit_code);
}
