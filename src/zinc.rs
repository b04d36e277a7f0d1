//! # Zinc Grid Codec
//!
//! Zinc is a line-oriented text form for [`Grid`]s:
//!
//! ```text
//! ver:"2.0" <grid meta>
//! <col> <col meta>,<col> <col meta>,...
//! <cell>,<cell>,...
//! ```
//!
//! Every row carries exactly one cell per column. An empty cell, or the
//! bare literal `N`, leaves the tag absent from that row's [`Dict`].
//!
//! [`Dict`]: crate::Dict

pub mod reader;
pub mod writer;

pub use reader::ZincReader;
pub use writer::ZincWriter;

use tracing::debug;

use crate::error::Result;
use crate::value::Grid;

/// Decode one grid from Zinc text.
///
/// # Examples
///
/// ```
/// use zinc_haystack::{Value, decode};
///
/// let grid = decode("ver:\"2.0\"\nid,site,dis\n@a,M,\"Main\"\n").unwrap();
/// assert_eq!(grid.len(), 1);
/// assert_eq!(grid.rows()[0].get("site"), Some(&Value::Marker));
/// assert_eq!(grid.rows()[0].dis(), "Main");
/// ```
pub fn decode(text: &str) -> Result<Grid> {
    let grid = ZincReader::new(text).read_grid()?;
    debug!(rows = grid.len(), meta = grid.meta().len(), "decoded zinc grid");
    Ok(grid)
}

/// Encode a grid as Zinc text.
pub fn encode(grid: &Grid) -> String {
    let mut out = String::new();
    // writes into a String never fail
    let _ = ZincWriter::new(&mut out).write_grid(grid);
    debug!(rows = grid.len(), bytes = out.len(), "encoded zinc grid");
    out
}
