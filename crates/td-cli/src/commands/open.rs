//! Open command: bring a store to the current schema.

use crate::cli::GlobalArgs;
use crate::commands::common::{self, open_store};
use anyhow::{Context, Result};
use td_store::OpenOutcome;

/// Execute the open command.
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let db = open_store(global)?;
    let version = db.version().context("Failed to read schema version")?;

    match db.open_outcome() {
        OpenOutcome::Bootstrapped => println!("Created task store at schema v{version}"),
        OpenOutcome::Upgraded { from } => {
            println!("Upgraded task store from v{from} to v{version}")
        }
        OpenOutcome::UpToDate => println!("Task store is up to date (schema v{version})"),
    }
    common::verbose(global, "Closing task store");
    db.close().context("Failed to close task store")
}
