//! CLI command implementations

pub(crate) mod common;
pub(crate) mod open;
pub(crate) mod query;
pub(crate) mod schema;
pub(crate) mod status;
