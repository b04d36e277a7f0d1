//! # Haystack Value Algebra
//!
//! A [`Value`] is one of a closed set of tag value kinds. Scalars carry
//! their own validation: constructors return [`crate::Error::InvalidValue`]
//! instead of producing a half-built value.
//!
//! - **Singletons** - `Marker`, `Remove` (tombstone) and `NA`
//! - **Scalars** - [`Number`], `String`, [`Uri`], [`Binary`],
//!   [`Coordinates`], [`Reference`], `Boolean`
//! - **Temporal** - [`Date`], [`Time`], [`DateTime`]
//! - **Collections** - `List` and [`Dict`]
//!
//! Equality is structural (with [`Reference`] compared by id).
//! [`Value::compare`] orders values of the same orderable kind: numbers,
//! strings, dates, times and date-times (by absolute instant).
//!
//! ## Examples
//!
//! ```
//! use zinc_haystack::{Dict, Number, Value};
//!
//! let rec = Dict::new()
//!     .with_marker("site")
//!     .with("area", Number::with_unit(3500.0, "ft²").unwrap())
//!     .with("dis", "Main St");
//!
//! assert_eq!(rec.get("site"), Some(&Value::Marker));
//! assert_eq!(rec.dis(), "Main St");
//! ```

mod dict;
mod grid;
mod number;
mod scalar;
mod temporal;

use std::cmp::Ordering;
use std::fmt;

pub use dict::{Dict, apply_diff};
pub use grid::Grid;
pub use number::Number;
pub use scalar::{Binary, Coordinates, Reference, Uri};
pub use temporal::{Date, DateTime, Time};

use crate::error::Result;
use crate::lexer::Dialect;
use crate::zinc::{ZincReader, writer};

/// A Haystack tag value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Presence-only flag
    Marker,

    /// Tombstone: deletes the key when applied as a diff
    Remove,

    /// Not available
    NA,

    Boolean(bool),

    Number(Number),

    String(String),

    Uri(Uri),

    Binary(Binary),

    Coordinates(Coordinates),

    Date(Date),

    Time(Time),

    DateTime(DateTime),

    Reference(Reference),

    /// Ordered sequence; written lossily by the Zinc writer
    List(Vec<Value>),

    Dict(Dict),
}

impl Value {
    /// Human-readable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Marker => "marker",
            Value::Remove => "remove",
            Value::NA => "na",
            Value::Boolean(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "str",
            Value::Uri(_) => "uri",
            Value::Binary(_) => "bin",
            Value::Coordinates(_) => "coord",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "dateTime",
            Value::Reference(_) => "ref",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
        }
    }

    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Ordering between two values of the same orderable kind.
    ///
    /// Returns `None` for different kinds and for kinds without an order.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// Parse a single value in Zinc syntax. `N` parses to `None`.
    pub fn parse_zinc(s: &str) -> Result<Option<Value>> {
        ZincReader::new(s).read_scalar()
    }

    /// Zinc rendering of this value; the same text as `Display`.
    pub fn to_zinc(&self) -> String {
        self.to_string()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writer::write_value(f, self, Dialect::Zinc)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::new(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

macro_rules! value_from {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$ty(v)
                }
            }
        )*
    };
}

value_from!(Number, Uri, Binary, Coordinates, Date, Time, DateTime, Reference, Dict);

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}
