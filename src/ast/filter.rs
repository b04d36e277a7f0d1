use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use crate::ast::{CmpOp, Path};
use crate::error::{Error, Result};
use crate::lexer::Dialect;
use crate::value::Value;
use crate::zinc::writer::{write_str_literal, write_value};

/// A parsed, immutable filter.
///
/// Equality and hashing go through the canonical string, which is built
/// on first use and then reused.
#[derive(Debug, Clone)]
pub struct Filter {
    kind: FilterKind,
    encoded: OnceLock<String>,
}

/// Filter tree node.
#[derive(Debug, Clone)]
pub enum FilterKind {
    /// Matches every record (`*`)
    All,

    /// Path resolves to a value
    Has(Path),

    /// Path does not resolve (`not path`)
    Missing(Path),

    /// Path resolves to a value of the literal's kind that compares as
    /// `op` requires
    Cmp { path: Path, op: CmpOp, value: Value },

    /// String wildcard match (`~`, or `~~` ignoring case)
    Like { path: Path, pattern: LikePattern },

    And(Box<Filter>, Box<Filter>),

    Or(Box<Filter>, Box<Filter>),

    /// Inverts the inner filter (`!(...)`)
    Not(Box<Filter>),
}

/// Where a like pattern's `%` wildcards sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    StartsWith,
    EndsWith,
    Contains,
}

/// A `~` / `~~` operand: a string with a leading and/or trailing `%`.
#[derive(Debug, Clone)]
pub struct LikePattern {
    source: String,
    literal: String,
    anchor: Anchor,
    case_insensitive: bool,
}

impl LikePattern {
    pub fn new(source: impl Into<String>, case_insensitive: bool) -> Result<Self> {
        let source = source.into();
        let (leading, rest) = match source.strip_prefix('%') {
            Some(rest) => (true, rest),
            None => (false, source.as_str()),
        };
        // a trailing `%%` is an escaped literal `%`, not a wildcard
        let (trailing, literal) = match rest.strip_suffix('%') {
            Some(literal) if literal.ends_with('%') => (false, literal),
            Some(literal) => (true, literal),
            None => (false, rest),
        };
        let anchor = match (leading, trailing) {
            (true, true) => Anchor::Contains,
            (true, false) => Anchor::EndsWith,
            (false, true) => Anchor::StartsWith,
            (false, false) => {
                return Err(Error::invalid_filter(
                    "~ (like) operator must contain a starting or ending '%'",
                ));
            }
        };
        if literal.is_empty() {
            return Err(Error::invalid_filter(
                "~ (like) operator must contain a string expression",
            ));
        }
        let literal = if case_insensitive {
            literal.to_uppercase()
        } else {
            literal.to_string()
        };
        Ok(LikePattern {
            source,
            literal,
            anchor,
            case_insensitive,
        })
    }

    /// The pattern as written, wildcards included.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn matches(&self, s: &str) -> bool {
        let upper;
        let s = if self.case_insensitive {
            upper = s.to_uppercase();
            upper.as_str()
        } else {
            s
        };
        match self.anchor {
            Anchor::StartsWith => s.starts_with(&self.literal),
            Anchor::EndsWith => s.ends_with(&self.literal),
            Anchor::Contains => s.contains(&self.literal),
        }
    }
}

impl Filter {
    pub fn new(kind: FilterKind) -> Self {
        Filter {
            kind,
            encoded: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    pub fn all() -> Self {
        Self::new(FilterKind::All)
    }

    pub fn has(path: &str) -> Result<Self> {
        Ok(Self::new(FilterKind::Has(Path::parse(path)?)))
    }

    pub fn missing(path: &str) -> Result<Self> {
        Ok(Self::new(FilterKind::Missing(Path::parse(path)?)))
    }

    pub fn cmp(path: Path, op: CmpOp, value: impl Into<Value>) -> Self {
        Self::new(FilterKind::Cmp {
            path,
            op,
            value: value.into(),
        })
    }

    pub fn eq(path: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::cmp(Path::parse(path)?, CmpOp::Eq, value))
    }

    pub fn ne(path: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::cmp(Path::parse(path)?, CmpOp::Ne, value))
    }

    pub fn lt(path: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::cmp(Path::parse(path)?, CmpOp::Lt, value))
    }

    pub fn le(path: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::cmp(Path::parse(path)?, CmpOp::Le, value))
    }

    pub fn gt(path: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::cmp(Path::parse(path)?, CmpOp::Gt, value))
    }

    pub fn ge(path: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::cmp(Path::parse(path)?, CmpOp::Ge, value))
    }

    /// `path ~ pattern`. The pattern must be a string with a `%` at one or
    /// both ends.
    pub fn like(path: &str, pattern: impl Into<Value>) -> Result<Self> {
        Self::like_path(Path::parse(path)?, pattern.into(), false)
    }

    /// Case-insensitive [`Filter::like`] (`~~`).
    pub fn ilike(path: &str, pattern: impl Into<Value>) -> Result<Self> {
        Self::like_path(Path::parse(path)?, pattern.into(), true)
    }

    pub(crate) fn like_path(path: Path, pattern: Value, case_insensitive: bool) -> Result<Self> {
        let Value::String(source) = pattern else {
            return Err(Error::invalid_filter("~ (like) operator only supports strings"));
        };
        let pattern = LikePattern::new(source, case_insensitive)?;
        Ok(Self::new(FilterKind::Like { path, pattern }))
    }

    pub fn and(self, other: Filter) -> Self {
        Self::new(FilterKind::And(Box::new(self), Box::new(other)))
    }

    pub fn or(self, other: Filter) -> Self {
        Self::new(FilterKind::Or(Box::new(self), Box::new(other)))
    }

    pub fn negate(self) -> Self {
        Self::new(FilterKind::Not(Box::new(self)))
    }

    /// Every path the filter reads, left to right.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        let mut found = Vec::new();
        self.collect_paths(&mut found);
        found.into_iter()
    }

    fn collect_paths<'f>(&'f self, found: &mut Vec<&'f Path>) {
        match &self.kind {
            FilterKind::All => {}
            FilterKind::Has(path)
            | FilterKind::Missing(path)
            | FilterKind::Cmp { path, .. }
            | FilterKind::Like { path, .. } => found.push(path),
            FilterKind::And(a, b) | FilterKind::Or(a, b) => {
                a.collect_paths(found);
                b.collect_paths(found);
            }
            FilterKind::Not(inner) => inner.collect_paths(found),
        }
    }

    /// Canonical text form. Parsing it yields an equal filter.
    pub fn encoded(&self) -> &str {
        self.encoded.get_or_init(|| {
            let mut out = String::new();
            // writes into a String never fail
            let _ = self.encode_into(&mut out);
            out
        })
    }

    fn is_compound(&self) -> bool {
        matches!(self.kind, FilterKind::And(..) | FilterKind::Or(..))
    }

    fn encode_into(&self, out: &mut String) -> fmt::Result {
        match &self.kind {
            FilterKind::All => out.write_char('*'),
            FilterKind::Has(path) => write!(out, "{path}"),
            FilterKind::Missing(path) => write!(out, "not {path}"),
            FilterKind::Cmp { path, op, value } => {
                write!(out, "{path}{op}")?;
                write_value(out, value, Dialect::Filter)
            }
            FilterKind::Like { path, pattern } => {
                let op = if pattern.case_insensitive { "~~" } else { "~" };
                write!(out, "{path}{op}")?;
                write_str_literal(out, &pattern.source)
            }
            FilterKind::And(a, b) => encode_compound(out, a, "and", b),
            FilterKind::Or(a, b) => encode_compound(out, a, "or", b),
            FilterKind::Not(inner) => write!(out, "!({})", inner.encoded()),
        }
    }
}

// compound operands are parenthesized so the text stays unambiguous
fn encode_compound(out: &mut String, a: &Filter, keyword: &str, b: &Filter) -> fmt::Result {
    for (i, operand) in [a, b].into_iter().enumerate() {
        if i > 0 {
            write!(out, " {keyword} ")?;
        }
        if operand.is_compound() {
            write!(out, "({})", operand.encoded())?;
        } else {
            out.write_str(operand.encoded())?;
        }
    }
    Ok(())
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.encoded() == other.encoded()
    }
}

impl Eq for Filter {}

impl Hash for Filter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.encoded().hash(state);
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoded())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_filter(s)
    }
}
