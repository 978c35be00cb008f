//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Customs back office - clients, fleets, activity logs and declarations
#[derive(Parser, Debug)]
#[command(name = "customs-backoffice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage the UNP reference table
    Unp(UnpArgs),
}

/// Arguments for the serve command; unset values come from the configuration
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the unp command
#[derive(Parser, Debug)]
pub struct UnpArgs {
    #[command(subcommand)]
    pub action: UnpAction,
}

/// UNP reference table actions
#[derive(Subcommand, Debug)]
pub enum UnpAction {
    /// Register a nine-digit UNP so clients can sign up with it
    Add {
        /// The UNP value (e.g., "190000001")
        value: String,
    },
    /// List registered UNPs
    List,
}
