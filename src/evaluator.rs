use std::borrow::Cow;
use std::collections::HashMap;

use tracing::trace;

use crate::{
    ast::{CmpOp, Filter, FilterKind, Path},
    value::{Dict, Value},
};

/// Looks up records by reference id while following `->` paths.
///
/// Called synchronously, once per hop. Implementations backed by slow
/// storage should memoize on their side.
pub trait Resolver {
    fn find(&self, id: &str) -> Option<Cow<'_, Dict>>;
}

/// Resolver that never finds anything; multi-hop paths never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl Resolver for NoResolver {
    fn find(&self, _id: &str) -> Option<Cow<'_, Dict>> {
        None
    }
}

impl Resolver for HashMap<String, Dict> {
    fn find(&self, id: &str) -> Option<Cow<'_, Dict>> {
        self.get(id).map(Cow::Borrowed)
    }
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Option<Dict>,
{
    fn find(&self, id: &str) -> Option<Cow<'_, Dict>> {
        self(id).map(Cow::Owned)
    }
}

impl Filter {
    /// Decide whether `record` matches, resolving multi-hop paths through
    /// `resolver`.
    ///
    /// A path that cannot be followed (missing tag, non-reference hop,
    /// unknown id) leaves the predicate unmatched; `not path` then holds.
    pub fn include(&self, record: &Dict, resolver: &dyn Resolver) -> bool {
        match self.kind() {
            FilterKind::All => true,
            FilterKind::Has(path) => resolve_path(record, path, resolver, |v| v.is_some()),
            FilterKind::Missing(path) => resolve_path(record, path, resolver, |v| v.is_none()),
            FilterKind::Cmp { path, op, value } => resolve_path(record, path, resolver, |v| {
                v.is_some_and(|actual| compare(actual, *op, value))
            }),
            FilterKind::Like { path, pattern } => resolve_path(record, path, resolver, |v| {
                matches!(v, Some(Value::String(s)) if pattern.matches(s))
            }),
            FilterKind::And(a, b) => a.include(record, resolver) && b.include(record, resolver),
            FilterKind::Or(a, b) => a.include(record, resolver) || b.include(record, resolver),
            FilterKind::Not(inner) => !inner.include(record, resolver),
        }
    }

    /// [`Filter::include`] with no resolver: only single-tag paths can match.
    pub fn matches(&self, record: &Dict) -> bool {
        self.include(record, &NoResolver)
    }
}

/// Walk `path` from `record` and hand the final value (if any) to `test`.
fn resolve_path<T>(
    record: &Dict,
    path: &Path,
    resolver: &dyn Resolver,
    test: impl FnOnce(Option<&Value>) -> T,
) -> T {
    let (last, hops) = match path.names().split_last() {
        Some(split) => split,
        None => return test(None),
    };

    let mut current = Cow::Borrowed(record);
    for name in hops {
        let next = match current.get(name) {
            Some(Value::Reference(r)) => {
                trace!(tag = %name, id = %r.id(), "resolving path hop");
                resolver.find(r.id())
            }
            _ => None,
        };
        match next {
            Some(dict) => current = dict,
            None => return test(None),
        }
    }
    test(current.get(last))
}

/// Comparisons only hold between values of the same kind.
fn compare(actual: &Value, op: CmpOp, literal: &Value) -> bool {
    if !actual.same_kind(literal) {
        return false;
    }
    if op.is_ordering() {
        return actual
            .compare(literal)
            .is_some_and(|ordering| op.accepts(ordering));
    }
    (actual == literal) == (op == CmpOp::Eq)
}
