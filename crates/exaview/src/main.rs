mod cli;
mod commands;
mod config;
mod error;
mod output;
mod spinner;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use exaview_core::Dashboard;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::spinner::Spinner;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global).await,

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "exaview", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let dashboard_config = config::build_dashboard_config(&cli.global)?;
            let dashboard = Dashboard::with_indicator(
                dashboard_config,
                Arc::new(Spinner::new(cli.global.quiet)),
            )?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &dashboard, &cli.global)
                .await
                .map_err(|e| {
                    let cfg = config::load_config_or_default();
                    e.for_profile(&config::active_profile_name(&cli.global, &cfg))
                })
        }
    }
}
