//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// taskdb - schema-managed SQLite task store
#[derive(Parser, Debug)]
#[command(name = "taskdb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: taskdb.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the database path (also settable via TASKDB_PATH)
    #[arg(short, long, global = true)]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the store, bootstrapping or migrating it as needed
    Open,

    /// Show schema version, tables, and derived objects
    Status(StatusArgs),

    /// Print the DDL of a schema version
    Schema(SchemaArgs),

    /// Execute an ad-hoc SQL query
    Query(QueryArgs),
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the schema command
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema version to render (default: current)
    #[arg(long = "version", value_name = "N")]
    pub schema_version: Option<u32>,
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// SQL query to execute
    pub sql: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
