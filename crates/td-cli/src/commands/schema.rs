//! Schema command: print the DDL of a schema version.

use crate::cli::{GlobalArgs, SchemaArgs};
use crate::commands::common;
use anyhow::Result;
use td_store::Schema;

/// Execute the schema command. Does not touch any store.
pub(crate) fn execute(args: &SchemaArgs, global: &GlobalArgs) -> Result<()> {
    let schema = Schema::current();
    let version = args.schema_version.unwrap_or(schema.version());
    if !schema.is_known_version(version) {
        anyhow::bail!(
            "Unknown schema version {version}; known versions are 1 through {}",
            schema.version()
        );
    }

    let statements = schema.ddl_at(version);
    common::verbose(
        global,
        format!("Rendering {} statements for schema v{version}", statements.len()),
    );
    for statement in statements {
        println!("{statement};");
    }
    Ok(())
}
