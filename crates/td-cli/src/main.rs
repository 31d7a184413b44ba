//! taskdb CLI - open, inspect, and query task stores

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{open, query, schema, status};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Open => open::execute(&cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::Schema(args) => schema::execute(args, &cli.global),
        cli::Commands::Query(args) => query::execute(args, &cli.global),
    }
}
