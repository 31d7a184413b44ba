//! Query command: ad-hoc SQL against the store.

use crate::cli::{GlobalArgs, QueryArgs};
use crate::commands::common::{self, open_store};
use anyhow::{Context, Result};

/// Execute the query command.
pub(crate) fn execute(args: &QueryArgs, global: &GlobalArgs) -> Result<()> {
    let db = open_store(global)?;
    let result =
        td_store::query::execute_query(db.conn(), &args.sql).context("Failed to execute query")?;

    if args.json {
        let json_rows = common::rows_to_json(&result.columns, &result.rows);
        let output = serde_json::to_string_pretty(&json_rows)
            .context("Failed to serialize query results")?;
        println!("{output}");
        return Ok(());
    }

    if result.rows.is_empty() {
        println!("(0 rows)");
        return Ok(());
    }
    let headers: Vec<&str> = result.columns.iter().map(|s| s.as_str()).collect();
    common::print_table(&headers, &result.rows);
    println!("\n({} rows)", result.rows.len());
    Ok(())
}
