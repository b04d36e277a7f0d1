//! Validate filters

use super::CliError;
use crate::parse_filter;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter to validate
    pub filter: String,
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Canonical form of the filter
    pub canonical: String,
    /// Whether the filter follows `->` through references
    pub multi_hop: bool,
}

/// Parse the filter and report its canonical form.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let filter = parse_filter(&options.filter)?;
    Ok(CheckResult {
        multi_hop: filter.paths().any(|p| p.len() > 1),
        canonical: filter.to_string(),
    })
}
