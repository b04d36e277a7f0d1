//! Run filters against Zinc input

use tracing::debug;

use super::{CliError, Format};
use crate::{Grid, MemoryStore, decode, parse_filter};

/// Options for the query command
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// The filter to run
    pub filter: String,
    /// Zinc grid text
    pub input: Option<String>,
    /// Output format
    pub format: Format,
    /// Attach display names to references whose targets are in the input
    pub fill_dis: bool,
}

/// Filter the input grid's rows, keeping the grid meta.
///
/// Rows carrying an `id` reference double as the lookup table for `->`
/// paths.
pub fn execute_query(options: &QueryOptions) -> Result<String, CliError> {
    let filter = parse_filter(&options.filter)?;
    let input = options.input.as_deref().ok_or(CliError::NoInput)?;
    let grid = decode(input)?;

    let store = MemoryStore::from_rows(grid.rows().iter().filter(|r| r.id().is_some()).cloned())?;
    let mut rows: Vec<_> = grid
        .rows()
        .iter()
        .filter(|row| filter.include(row, &store))
        .cloned()
        .collect();
    if options.fill_dis {
        for row in &mut rows {
            store.fill_dis(row);
        }
    }
    debug!(%filter, total = grid.len(), matched = rows.len(), "query finished");

    let result = Grid::new(grid.meta().clone(), rows);
    Ok(options.format.render(&result))
}
