// tests/lexer_tests.rs

use zinc_haystack::{
    Coordinates, Date, Dialect, Error, Number, Reference, Time, TimeZone, Tokenizer, Uri, Value,
    ZincReader, ZoneTable,
};

fn zinc(text: &str) -> Value {
    Value::parse_zinc(text).unwrap().unwrap()
}

fn zinc_err(text: &str) -> Error {
    Value::parse_zinc(text).unwrap_err()
}

// ============================================================================
// Tokenizer primitives
// ============================================================================

#[test]
fn test_cursor_and_lines() {
    let mut t = Tokenizer::new("ab\ncd");
    assert_eq!((t.cur(), t.peek()), (Some('a'), Some('b')));
    assert_eq!(t.read_id().unwrap(), "ab");
    assert_eq!(t.line(), 1);
    t.consume_newline().unwrap();
    assert_eq!(t.line(), 2);
    assert_eq!(t.read_id().unwrap(), "cd");
    assert!(t.at_end());
    assert!(t.expect_end().is_ok());
}

#[test]
fn test_consume_newline_required() {
    let mut t = Tokenizer::new("x");
    let err = t.consume_newline().unwrap_err();
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_from_chars() {
    let mut t = Tokenizer::from_chars("@site".chars());
    let value = t.read_val(Dialect::Zinc).unwrap();
    assert_eq!(value, Some(Value::Reference(Reference::new("site").unwrap())));
}

// ============================================================================
// Value grammar
// ============================================================================

#[test]
fn test_reserved_words() {
    assert_eq!(Value::parse_zinc("N").unwrap(), None);
    assert_eq!(zinc("M"), Value::Marker);
    assert_eq!(zinc("R"), Value::Remove);
    assert_eq!(zinc("NA"), Value::NA);
    assert_eq!(zinc("T"), Value::Boolean(true));
    assert_eq!(zinc("F"), Value::Boolean(false));
    assert_eq!(zinc("INF"), Value::Number(Number::POS_INF));
    assert_eq!(zinc("-INF"), Value::Number(Number::NEG_INF));
    assert_eq!(zinc("NaN"), Value::Number(Number::NAN));
}

#[test]
fn test_unknown_word() {
    let err = zinc_err("Foo");
    assert!(err.to_string().starts_with("Unknown value identifier: Foo"));
}

#[test]
fn test_numbers() {
    assert_eq!(zinc("42"), Value::from(42i64));
    assert_eq!(zinc("-3.5"), Value::from(-3.5));
    assert_eq!(zinc("1_000"), Value::from(1000i64));
    assert_eq!(zinc("2.5e3"), Value::from(2500.0));
    assert_eq!(zinc("1E-2"), Value::from(0.01));
    assert_eq!(
        zinc("72.5°F"),
        Value::Number(Number::with_unit(72.5, "°F").unwrap())
    );
    assert_eq!(
        zinc("3.14dicts"),
        Value::Number(Number::with_unit(3.14, "dicts").unwrap())
    );
    assert_eq!(zinc("50%"), Value::Number(Number::with_unit(50.0, "%").unwrap()));
}

#[test]
fn test_dates_and_times() {
    assert_eq!(zinc("2015-02-15"), Value::Date(Date::new(2015, 2, 15).unwrap()));
    assert_eq!(zinc("08:30:00"), Value::Time(Time::hms(8, 30, 0).unwrap()));
    assert_eq!(zinc("08:30:00.5"), Value::Time(Time::new(8, 30, 0, 500).unwrap()));
    assert_eq!(zinc("08:30:00.05"), Value::Time(Time::new(8, 30, 0, 50).unwrap()));
    assert!(zinc_err("08:30:00.1234").to_string().contains("milliseconds"));
    assert!(zinc_err("8:30:00").to_string().contains("two digits"));
}

#[test]
fn test_date_construction_error_is_parse_error() {
    let err = zinc_err("2015-13-01");
    assert_eq!(err, Error::Parse { message: "Invalid month: 13".into(), line: 1 });
}

#[test]
fn test_datetimes() {
    let Value::DateTime(dt) = zinc("2020-06-01T08:00:00-04:00 New_York") else {
        panic!("expected datetime");
    };
    assert_eq!(dt.tz().name(), "New_York");
    assert_eq!(dt.offset(), -4 * 3600);
    assert_eq!(dt.to_string(), "2020-06-01T08:00:00-04:00 New_York");

    let Value::DateTime(utc) = zinc("2020-06-01T12:00:00Z") else {
        panic!("expected datetime");
    };
    assert_eq!(utc.tz().name(), "UTC");
    assert_eq!(utc.to_string(), "2020-06-01T12:00:00Z UTC");
}

#[test]
fn test_datetime_zone_errors() {
    assert!(zinc_err("2020-06-01T08:00:00-04:00").to_string().contains("timezone"));
    assert!(zinc_err("2020-06-01T08:00:00Z Atlantis").to_string().contains("Unknown timezone: Atlantis"));
}

#[test]
fn test_injected_zones() {
    let mut zones = ZoneTable::new();
    zones.insert(TimeZone::fixed("Base", 2 * 3600));
    let mut reader = ZincReader::new("2020-01-01T00:00:00+02:00 Base").with_zones(&zones);
    let Some(Value::DateTime(dt)) = reader.read_scalar().unwrap() else {
        panic!("expected datetime");
    };
    assert_eq!(dt.tz().name(), "Base");

    let mut reader = ZincReader::new("2020-01-01T00:00:00Z UTC").with_zones(&zones);
    assert!(reader.read_scalar().is_err());
}

#[test]
fn test_refs_bins_coords() {
    assert_eq!(zinc("@a.b:c~d-e_f"), Value::Reference(Reference::new("a.b:c~d-e_f").unwrap()));
    let Value::Reference(r) = zinc("@C \"Cdis\"") else {
        panic!("expected ref");
    };
    assert_eq!(r.dis(), Some("Cdis"));
    assert_eq!(zinc("Bin(text/plain)").to_string(), "Bin(text/plain)");
    assert!(zinc_err("Bin text/plain").to_string().contains("Expected '('"));
    assert!(zinc_err("Bin(text/plain").to_string().contains("end of bin literal"));
    assert_eq!(
        zinc("C(1.23,3.456)"),
        Value::Coordinates(Coordinates::new(1.23, 3.456).unwrap())
    );
    assert!(zinc_err("C(95,0)").to_string().contains("Invalid lat"));
}

#[test]
fn test_strings_and_uris() {
    assert_eq!(zinc(r#""a\tb\n\"q\" \$5 \\""#), Value::from("a\tb\n\"q\" $5 \\"));
    assert_eq!(zinc(r#""é""#), Value::from("é"));
    assert!(zinc_err("\"open").to_string().contains("end of str literal"));

    assert_eq!(zinc(r"`http://x/a\?b`"), Value::Uri(Uri::new(r"http://x/a\?b").unwrap()));
    assert_eq!(zinc(r"`a\`b`"), Value::Uri(Uri::new("a`b").unwrap()));
    assert!(zinc_err(r"`a\qb`").to_string().contains("URI escape sequence"));
}

#[test]
fn test_filter_dialect() {
    let mut t = Tokenizer::new("true");
    assert_eq!(t.read_val(Dialect::Filter).unwrap(), Some(Value::Boolean(true)));
    let mut t = Tokenizer::new("M");
    assert!(t.read_val(Dialect::Filter).is_err());
    let mut t = Tokenizer::new("INF");
    assert_eq!(t.read_val(Dialect::Filter).unwrap(), Some(Value::Number(Number::POS_INF)));
}

#[test]
fn test_error_char_and_line() {
    let err = ZincReader::new("ver:\"2.0\"\na\n#\n").read_grid().unwrap_err();
    assert_eq!(err.line(), Some(3));
    assert!(err.to_string().contains("(char=0x23 '#')"));
    assert!(err.to_string().ends_with("[Line 3]"));
}

// ============================================================================
// Byte streams
// ============================================================================

struct FailingReader;

impl std::io::Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk on fire"))
    }
}

#[test]
fn test_read_from_bytes() {
    let bytes = "ver:\"2.0\"\ntemp\n72°F\n".as_bytes();
    let grid = ZincReader::from_reader(bytes).unwrap().read_grid().unwrap();
    assert_eq!(
        grid.rows()[0].get("temp"),
        Some(&Value::Number(Number::with_unit(72.0, "°F").unwrap()))
    );
}

#[test]
fn test_invalid_utf8_reports_line() {
    let bytes: &[u8] = b"ver:\"2.0\"\ndis\n\"\xff\"\n";
    let err = Tokenizer::from_reader(bytes).err().unwrap();
    assert!(matches!(err, Error::Parse { line: 3, .. }));
    assert!(err.to_string().starts_with("Invalid UTF-8"));
}

#[test]
fn test_read_failure_is_parse_error() {
    let err = ZincReader::from_reader(FailingReader).err().unwrap();
    assert!(matches!(err, Error::Parse { line: 1, .. }));
    assert!(err.to_string().contains("disk on fire"));
}
