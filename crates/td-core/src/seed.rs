//! Seed context for the default task list created with a fresh store.
//!
//! The account identity is owned by the surrounding sync layer; the store
//! only records whatever identity it is handed here.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Account type tagging lists that are never synchronized.
pub const LOCAL_ACCOUNT_TYPE: &str = "LOCAL";

/// Attributes of the single task list inserted when a store is bootstrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedList {
    /// Owning account name
    #[serde(default = "default_account_name")]
    pub account_name: String,

    /// Owning account type
    #[serde(default = "default_account_type")]
    pub account_type: String,

    /// Display name of the list
    #[serde(default = "default_list_name")]
    pub list_name: String,

    /// List color
    #[serde(default = "default_list_color")]
    pub list_color: Color,

    /// List owner; empty for local lists
    #[serde(default)]
    pub owner: String,
}

fn default_account_name() -> String {
    "Local".to_string()
}

fn default_account_type() -> String {
    LOCAL_ACCOUNT_TYPE.to_string()
}

fn default_list_name() -> String {
    "Task list".to_string()
}

fn default_list_color() -> Color {
    Color::rgb(0, 0, 255)
}

impl Default for SeedList {
    fn default() -> Self {
        Self {
            account_name: default_account_name(),
            account_type: default_account_type(),
            list_name: default_list_name(),
            list_color: default_list_color(),
            owner: String::new(),
        }
    }
}
