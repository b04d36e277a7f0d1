//! CLI support for zinc-haystack
//!
//! The `zinc` binary is a thin shell over these functions so the same
//! operations can be driven from other tools.

mod check;
mod convert;
mod query;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{ConvertOptions, execute_convert};
pub use query::{QueryOptions, execute_query};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Zinc, filter or Haystack JSON error
    #[error("{0}")]
    Haystack(#[from] crate::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Use --input or pipe Zinc to stdin.")]
    NoInput,
}

/// Output format for grids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Zinc,
    Json,
    JsonPretty,
}

impl Format {
    pub fn from_flags(json: bool, pretty: bool) -> Self {
        match (json, pretty) {
            (false, _) => Format::Zinc,
            (true, false) => Format::Json,
            (true, true) => Format::JsonPretty,
        }
    }

    pub fn render(self, grid: &crate::Grid) -> String {
        match self {
            Format::Zinc => crate::encode(grid),
            Format::Json => crate::to_json(grid),
            Format::JsonPretty => crate::to_json_pretty(grid),
        }
    }
}
