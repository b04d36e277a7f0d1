//! Haystack tag values, the Zinc grid format and the Haystack filter
//! language.
//!
//! - [`value`]: the closed set of tag values, [`Dict`] records and [`Grid`] tables
//! - [`zinc`]: reading and writing Zinc text
//! - [`parser`] / [`evaluator`]: parsing filters and matching them against records
//! - [`store`]: an in-memory record store that resolves `->` paths
//! - [`output`]: Haystack JSON
//!
//! ```
//! use zinc_haystack::{parse_filter, zinc};
//!
//! let grid = zinc::decode("ver:\"2.0\"\nid,dis,site\n@a,\"Main\",M\n@b,\"Annex\",\n").unwrap();
//! let filter = parse_filter("site and dis == \"Main\"").unwrap();
//! let hits: Vec<_> = grid.rows().iter().filter(|r| filter.matches(r)).collect();
//! assert_eq!(hits.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod store;
pub mod tz;
pub mod value;
pub mod zinc;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{CmpOp, Filter, FilterKind, Path};
pub use error::{Error, Result};
pub use evaluator::{NoResolver, Resolver};
pub use lexer::{Dialect, Tokenizer};
pub use output::{grid_from_json, grid_to_json, to_json, to_json_pretty};
pub use parser::{Parser, parse_filter};
pub use store::MemoryStore;
pub use tz::{TimeZone, ZoneDb, ZoneTable};
pub use value::{
    Binary, Coordinates, Date, DateTime, Dict, Grid, Number, Reference, Time, Uri, Value,
    apply_diff,
};
pub use zinc::{ZincReader, ZincWriter, decode, encode};
