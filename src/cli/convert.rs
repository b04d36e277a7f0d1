//! Zinc <-> Haystack JSON conversion

use super::{CliError, Format};
use crate::{Grid, ZincReader, grid_from_json};

/// Options for the convert command
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Zinc or JSON text
    pub input: Option<String>,
    /// Read the input as Haystack JSON and write Zinc
    pub from_json: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
}

/// Convert every grid in the input. Zinc input may hold a stream of grids
/// separated by blank lines; each becomes one JSON document per line.
pub fn execute_convert(options: &ConvertOptions) -> Result<String, CliError> {
    let input = options.input.as_deref().ok_or(CliError::NoInput)?;

    if options.from_json {
        let grid = grid_from_json(input)?;
        return Ok(Format::Zinc.render(&grid));
    }

    let format = Format::from_flags(true, options.pretty);
    let grids: Vec<Grid> = ZincReader::new(input).read_grids()?;
    let rendered: Vec<String> = grids.iter().map(|g| format.render(g)).collect();
    Ok(rendered.join("\n"))
}
