//! Memoir CLI entry point.
//!
//! Binary name: `memoir`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{AnalyzeCommand, CallsCommand, Cli, Commands, IdentityCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,memoir=debug",
        _ => "trace",
    };

    if cli.otel {
        // Filtering is RUST_LOG-driven in OTel mode; the verbosity flags
        // only apply to the plain fmt subscriber.
        memoir_observe::tracing_setup::init_tracing(true)
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_target(false)
            .init();
    }

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "memoir", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (DB, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Search {
            user,
            query,
            types,
            threshold,
            limit,
        } => {
            cli::memory::search(&state, &user, &query, &types, threshold, limit, cli.json).await?;
        }

        Commands::Insights { user } => {
            cli::memory::insights(&state, &user, cli.json).await?;
        }

        Commands::Identity { action } => match action {
            IdentityCommand::Sync { user } => {
                cli::identity::sync(&state, &user, cli.json).await?;
            }
            IdentityCommand::Resync { user } => {
                cli::identity::resync(&state, &user, cli.json).await?;
            }
        },

        Commands::Calls { action } => match action {
            CallsCommand::Extract { user, limit } => {
                cli::calls::extract(&state, &user, limit, cli.json).await?;
            }
        },

        Commands::Analyze { action } => match action {
            AnalyzeCommand::Calls { user } => {
                cli::analyze::calls(&state, &user, cli.json).await?;
            }
            AnalyzeCommand::Promises { user } => {
                cli::analyze::promises(&state, &user, cli.json).await?;
            }
            AnalyzeCommand::Identity { user } => {
                cli::analyze::identity(&state, &user, cli.json).await?;
            }
        },

        Commands::Nightly { user_cap } => {
            cli::nightly::run(&state, user_cap, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    if cli.otel {
        memoir_observe::tracing_setup::shutdown_tracing();
    }

    Ok(())
}
