//! Status command: schema version and object inventory.

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::{self, open_store};
use anyhow::{Context, Result};
use td_store::query::{summarize, StoreSummary};

/// Execute the status command.
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let db = open_store(global)?;
    let summary = summarize(db.conn()).context("Failed to inspect task store")?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize status")?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &StoreSummary) {
    println!("Schema version: v{}\n", summary.version);

    let rows: Vec<Vec<String>> = summary
        .tables
        .iter()
        .map(|t| vec![t.name.clone(), t.rows.to_string()])
        .collect();
    common::print_table(&["TABLE", "ROWS"], &rows);

    println!("\nIndices ({}):", summary.indices.len());
    for name in &summary.indices {
        println!("  {name}");
    }
    println!("Views ({}):", summary.views.len());
    for name in &summary.views {
        println!("  {name}");
    }
    println!("Triggers ({}):", summary.triggers.len());
    for name in &summary.triggers {
        println!("  {name}");
    }
}
