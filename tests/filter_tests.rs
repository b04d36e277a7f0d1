// tests/filter_tests.rs

use std::collections::{HashMap, HashSet};

use zinc_haystack::{
    CmpOp, Date, Dict, Error, Filter, FilterKind, NoResolver, Number, Path, Reference, Value,
    parse_filter,
};

fn parse(text: &str) -> Filter {
    parse_filter(text).unwrap()
}

fn resolver(records: &[Dict]) -> HashMap<String, Dict> {
    records
        .iter()
        .filter_map(|r| r.id().map(|id| (id.id().to_string(), r.clone())))
        .collect()
}

// ============================================================================
// Parsing and canonical form
// ============================================================================

#[test]
fn test_precedence() {
    assert_eq!(parse("a and b or c and d").to_string(), "(a and b) or (c and d)");
    assert_eq!(parse("a or b and c").to_string(), "a or (b and c)");
    assert_eq!(parse("(a or b) and c").to_string(), "(a or b) and c");
}

#[test]
fn test_predicates() {
    assert!(matches!(parse("*").kind(), FilterKind::All));
    assert!(matches!(parse("site").kind(), FilterKind::Has(_)));
    assert!(matches!(parse("not site").kind(), FilterKind::Missing(_)));
    let f = parse("curVal >= 72.5°F");
    let FilterKind::Cmp { path, op, value } = f.kind() else {
        panic!("expected comparison");
    };
    assert_eq!(path.to_string(), "curVal");
    assert_eq!(*op, CmpOp::Ge);
    assert_eq!(value, &Value::Number(Number::with_unit(72.5, "°F").unwrap()));
}

#[test]
fn test_canonical_idempotence() {
    let sources = [
        "*",
        "site",
        "not siteRef->geoCity",
        "dis == \"Main\"",
        "area != 3500ft²",
        "x < 5 and y <= -2.5",
        "ts > 2020-01-01T00:00:00Z UTC",
        "d >= 2015-02-15 or t < 08:30:00",
        "ok == true or ok == false",
        "ref == @site.1",
        "u == `http://a/b`",
        "n == NaN or n == -INF",
        "dis ~ \"%Floor%\" and name ~~ \"ahu%\"",
        "!(a and b) or !c",
        "(a or b) or (c and (d or e))",
        "s == \"tab\\there \\\"q\\\"\"",
    ];
    for source in sources {
        let filter = parse(source);
        let reparsed = parse(&filter.to_string());
        assert_eq!(reparsed, filter, "{source}");
        assert_eq!(reparsed.to_string(), filter.to_string());
    }
}

#[test]
fn test_equal_filters_hash_together() {
    let mut set = HashSet::new();
    set.insert(parse("a and b"));
    set.insert(parse("a   and    b"));
    set.insert(Filter::has("a").unwrap().and(Filter::has("b").unwrap()));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_from_str() {
    let filter: Filter = "site and area > 100".parse().unwrap();
    assert_eq!(filter.to_string(), "site and area>100");
}

#[test]
fn test_parse_errors() {
    let err = parse_filter("a ~ \"foo\"").unwrap_err();
    assert!(matches!(err, Error::Parse { line: 1, .. }));
    assert!(err.to_string().contains("'%'"));

    assert!(parse_filter("a ~ 5").unwrap_err().to_string().contains("only supports strings"));
    assert!(parse_filter("(a or b").unwrap_err().to_string().contains("Expecting ')'"));
    assert!(parse_filter("a b").is_err());
    assert!(parse_filter("a ==").is_err());
    assert!(parse_filter("").is_err());
}

#[test]
fn test_path_parse() {
    let path = Path::parse("equipRef->siteRef->dis").unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path.names(), ["equipRef", "siteRef", "dis"]);
    assert!(matches!(Path::parse("a->"), Err(Error::InvalidFilter(_))));
    assert!(Path::parse("a-b").is_err());
    assert!(Path::parse("").is_err());
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_like_operator() {
    let rec = |s: &str| Dict::new().with("dis", s);
    let ends = parse("dis ~ \"%foo\"");
    assert!(ends.matches(&rec("barfoo")));
    assert!(!ends.matches(&rec("foobar")));

    let starts = parse("dis ~ \"foo%\"");
    assert!(starts.matches(&rec("foobar")));
    assert!(!starts.matches(&rec("barfoo")));

    let contains = parse("dis ~ \"%foo%\"");
    assert!(contains.matches(&rec("xfoox")));
    assert!(!contains.matches(&rec("xfox")));

    let ci = parse("dis ~~ \"%FOO\"");
    assert!(ci.matches(&rec("barfoo")));
    assert!(!parse("dis ~ \"%FOO\"").matches(&rec("barfoo")));

    assert!(matches!(Filter::like("dis", "foo"), Err(Error::InvalidFilter(_))));

    // `%%` at the end is a literal percent sign
    let percent = parse("dis ~ \"%50%%\"");
    assert!(percent.matches(&rec("x50%")));
    assert!(!percent.matches(&rec("50%x")));
    assert!(!percent.matches(&rec("x50")));
    assert!(matches!(Filter::like("dis", "foo%%"), Err(Error::InvalidFilter(_))));
    // non-strings never match
    assert!(!ends.matches(&Dict::new().with("dis", 5i64)));
}

#[test]
fn test_comparisons() {
    let rec = Dict::new()
        .with("n", 10i64)
        .with("s", "beta")
        .with("d", Date::new(2015, 2, 15).unwrap())
        .with("m", Value::Marker)
        .with("b", true);
    assert!(parse("n > 5 and n <= 10 and n != 11").matches(&rec));
    assert!(!parse("n < 10").matches(&rec));
    assert!(parse("s > \"alpha\" and s < \"gamma\"").matches(&rec));
    assert!(parse("d >= 2015-02-15 and d < 2015-03-01").matches(&rec));
    assert!(parse("b == true").matches(&rec));
    assert!(!parse("b > false").matches(&rec));
    assert!(Filter::eq("m", Value::Marker).unwrap().matches(&rec));

    let neg_zero = Dict::new().with("x", Number::new(-0.0));
    assert!(parse("x >= 0").matches(&neg_zero));
    assert!(parse("x <= 0").matches(&neg_zero));
    assert!(!parse("x < 0").matches(&neg_zero));
}

#[test]
fn test_heterogeneous_comparison() {
    let rec = Dict::new().with("x", "5");
    let filter = Filter::eq("x", Number::new(5.0)).unwrap();
    assert!(!filter.matches(&rec));
    assert!(!parse("x != 5").matches(&rec));
    assert!(!parse("x > 1").matches(&rec));
}

#[test]
fn test_units_compare_by_value() {
    let rec = Dict::new().with("t", Number::with_unit(75.0, "°F").unwrap());
    assert!(parse("t > 70°F").matches(&rec));
    assert!(!parse("t == 75").matches(&rec));
}

#[test]
fn test_has_and_missing() {
    let rec = Dict::new().with_marker("site").with("dis", "x");
    assert!(parse("site and dis").matches(&rec));
    assert!(parse("not equip").matches(&rec));
    assert!(!parse("not site").matches(&rec));
    assert!(parse("!equip").matches(&rec));
    assert!(parse("*").matches(&Dict::new()));
}

#[test]
fn test_multi_hop_path() {
    let b = Dict::new()
        .with("id", Reference::new("b").unwrap())
        .with_marker("x");
    let a = Dict::new()
        .with("id", Reference::new("a").unwrap())
        .with("ref", Reference::new("b").unwrap());
    let filter = Filter::has("ref->x").unwrap();

    assert!(filter.include(&a, &resolver(&[a.clone(), b])));
    assert!(!filter.include(&a, &resolver(&[a.clone()])));
    assert!(!filter.include(&a, &NoResolver));
    assert!(parse("not ref->x").include(&a, &NoResolver));
}

#[test]
fn test_path_short_circuit() {
    let rec = Dict::new().with("a", "not a ref");
    let everything = |_: &str| Some(Dict::new().with_marker("b"));
    assert!(!parse("a->b").include(&rec, &everything));
    assert!(!parse("missing->b").include(&rec, &everything));
    assert!(parse("a->b").include(&Dict::new().with("a", Reference::new("z").unwrap()), &everything));
}

#[test]
fn test_three_hop_path() {
    let site = Dict::new()
        .with("id", Reference::new("s").unwrap())
        .with("geoCity", "Richmond");
    let equip = Dict::new()
        .with("id", Reference::new("e").unwrap())
        .with("siteRef", Reference::new("s").unwrap());
    let point = Dict::new()
        .with("id", Reference::new("p").unwrap())
        .with("equipRef", Reference::new("e").unwrap());
    let db = resolver(&[site, equip, point.clone()]);
    assert!(parse("equipRef->siteRef->geoCity == \"Richmond\"").include(&point, &db));
    assert!(!parse("equipRef->siteRef->geoCity == \"Paris\"").include(&point, &db));
}
