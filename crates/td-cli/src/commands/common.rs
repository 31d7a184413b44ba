//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use td_core::config::MEMORY_PATH;
use td_core::{Config, CoreError};
use td_store::TaskDb;

use crate::cli::GlobalArgs;

/// Print a `[verbose]` line to stderr when verbose output is enabled.
pub(crate) fn verbose(global: &GlobalArgs, message: impl AsRef<str>) {
    if global.verbose {
        eprintln!("[verbose] {}", message.as_ref());
    }
}

/// Load configuration from `--config`, or from `taskdb.yml` in the current
/// directory. A missing default config falls back to built-in defaults.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    if let Some(path) = &global.config {
        return Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"));
    }
    match Config::load_from_dir(Path::new(".")) {
        Ok(config) => Ok(config),
        Err(CoreError::ConfigNotFound { path }) => {
            verbose(global, format!("No config at {path}, using defaults"));
            Ok(Config::default())
        }
        Err(e) => Err(e).context("Failed to load taskdb.yml"),
    }
}

/// Open the configured store, bootstrapping or migrating it first.
pub(crate) fn open_store(global: &GlobalArgs) -> Result<TaskDb> {
    let config = load_config(global)?;
    let path = config.resolve_database_path(global.database.as_deref());
    verbose(global, format!("Opening task store at {path}"));

    if path == MEMORY_PATH {
        return TaskDb::open_memory(&config).context("Failed to create in-memory task store");
    }
    TaskDb::open(Path::new(&path), &config)
        .with_context(|| format!("Failed to open task store at {path}"))
}

/// Calculate column widths for table formatting
fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }
    widths
}

/// Print a formatted table to stdout.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  "));

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  "));
    }
}

/// Convert string rows into JSON objects keyed by column, mapping `"null"` to null.
pub(crate) fn rows_to_json(columns: &[String], rows: &[Vec<String>]) -> Vec<serde_json::Value> {
    rows.iter()
        .map(|row| {
            let map: serde_json::Map<String, serde_json::Value> = columns
                .iter()
                .zip(row.iter())
                .map(|(col, val)| {
                    let json_val = if val == "null" {
                        serde_json::Value::Null
                    } else {
                        serde_json::Value::String(val.clone())
                    };
                    (col.clone(), json_val)
                })
                .collect();
            serde_json::Value::Object(map)
        })
        .collect()
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
