mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use upway_core::UpwayClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local commands don't need a service connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Variables => commands::variables::handle(&cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "upway", &mut std::io::stdout());
            Ok(())
        }

        // Everything else reads from the data service
        cmd => {
            let client_config = config::build_client_config(&cli.global)?;
            let mut client = UpwayClient::connect(&client_config).await?;

            tracing::debug!(command = ?cmd, service = %client.service(), "dispatching command");
            let result = commands::dispatch(cmd, &mut client, &cli.global).await;
            client.logout().await;
            result
        }
    }
}
