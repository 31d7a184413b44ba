//! td-core - Core types for taskdb
//!
//! Shared domain vocabulary used by the store engine and the CLI: task status
//! codes and their derived flags, packed colors, the seed context for the
//! default local task list, and YAML configuration.

pub mod color;
pub mod config;
pub mod error;
pub mod seed;
pub mod status;

pub use color::Color;
pub use config::{Config, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use seed::SeedList;
pub use status::TaskStatus;
