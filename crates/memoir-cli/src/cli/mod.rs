//! CLI command definitions and dispatch for the `memoir` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `memoir analyze calls`, `memoir identity sync`).

pub mod analyze;
pub mod calls;
pub mod identity;
pub mod memory;
pub mod nightly;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use uuid::Uuid;

/// Psychological memory and behavioral analytics for accountability coaching.
#[derive(Parser)]
#[command(name = "memoir", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans via OpenTelemetry (stdout exporter, for local debugging).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a user's memories by semantic similarity.
    Search {
        /// User id to search within.
        #[arg(long)]
        user: Uuid,

        /// Natural-language query.
        query: String,

        /// Restrict to these content types (comma-separated).
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,

        /// Minimum cosine similarity (0.0-1.0).
        #[arg(long)]
        threshold: Option<f32>,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Processed memory insights for a user (counts, trends, health).
    Insights {
        /// User id to report on.
        #[arg(long)]
        user: Uuid,
    },

    /// Identity baseline projection (sync, resync).
    Identity {
        #[command(subcommand)]
        action: IdentityCommand,
    },

    /// Call transcript extraction.
    Calls {
        #[command(subcommand)]
        action: CallsCommand,
    },

    /// Behavioral analyses over call, promise, and identity history.
    Analyze {
        #[command(subcommand)]
        action: AnalyzeCommand,
    },

    /// Run the nightly pattern aggregation batch over active users.
    Nightly {
        /// Maximum number of users to process in this run.
        #[arg(long)]
        user_cap: Option<usize>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum IdentityCommand {
    /// Project the user's identity answers into memory records.
    Sync {
        #[arg(long)]
        user: Uuid,
    },

    /// Delete identity-derived records, then project from scratch.
    Resync {
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(Subcommand)]
pub enum CallsCommand {
    /// Extract psychological snippets from recent call transcripts and
    /// persist them as memories.
    Extract {
        #[arg(long)]
        user: Uuid,

        /// How many recent calls to process.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum AnalyzeCommand {
    /// Call-success patterns: success rate, trend, tone effectiveness.
    Calls {
        #[arg(long)]
        user: Uuid,
    },

    /// Promise-keeping patterns: success rate, trend, category breakdown.
    Promises {
        #[arg(long)]
        user: Uuid,
    },

    /// Identity-vs-call correlation: growth evidence and consistency.
    Identity {
        #[arg(long)]
        user: Uuid,
    },
}
