//! # Haystack Filter Language - Abstract Syntax Tree
//!
//! A filter is a boolean predicate over a record's tags. Paths may follow
//! references from one record to another with `->`.
//!
//! ## Architecture Overview
//!
//! - **[path]** - `->` separated tag name chains
//! - **[operators]** - comparison operators
//! - **[filter]** - the filter tree and its canonical text form
//!
//! ## Quick Start
//!
//! ```text
//! point and siteRef->geoCity == "Richmond" and not disabled
//! ```
//!
//! Matches point records whose site lives in Richmond and that carry no
//! `disabled` tag.
//!
//! ## Grammar
//!
//! ```text
//! filter  := or
//! or      := and ("or" and)*
//! and     := atomic ("and" atomic)*
//! atomic  := "(" or ")" | "*" | "!" atomic | "not" path | path (op value)?
//! op      := "==" | "!=" | "<" | "<=" | ">" | ">=" | "~" | "~~"
//! path    := name ("->" name)*
//! ```
//!
//! `and` binds tighter than `or`; both associate to the left.
//!
//! ### Like
//!
//! `~` matches strings against a `%` wildcard at either end, `~~` does the
//! same ignoring case:
//!
//! - `"%foo"` - ends with `foo`
//! - `"foo%"` - starts with `foo`
//! - `"%foo%"` - contains `foo`
//!
//! ### Canonical form
//!
//! Every filter renders to one canonical string, computed once. Two
//! filters are equal exactly when their canonical strings are.
pub mod filter;
pub mod operators;
pub mod path;

pub use filter::{Filter, FilterKind, LikePattern};
pub use operators::CmpOp;
pub use path::Path;
