// tests/output_tests.rs

use pretty_assertions::assert_eq;
use serde_json::json;
use zinc_haystack::output::{dict_from_json, value_from_json, value_to_json};
use zinc_haystack::{
    Dict, Error, Grid, Number, Reference, Value, decode, grid_from_json, grid_to_json, to_json,
    to_json_pretty,
};

fn zinc(text: &str) -> Value {
    Value::parse_zinc(text).unwrap().unwrap()
}

#[test]
fn test_scalar_encoding() {
    let cases = [
        (Value::Marker, json!("m:")),
        (Value::Remove, json!("x:")),
        (Value::NA, json!("z:")),
        (Value::Boolean(false), json!(false)),
        (Value::from(42i64), json!(42)),
        (Value::from(-0.25), json!(-0.25)),
        (zinc("72.5°F"), json!("n:72.5 °F")),
        (Value::Number(Number::NEG_INF), json!("n:-INF")),
        (Value::Number(Number::NAN), json!("n:NaN")),
        (Value::from("hello"), json!("hello")),
        (Value::from("m:not a marker"), json!("s:m:not a marker")),
        (zinc("`http://a/b`"), json!("u:http://a/b")),
        (zinc("Bin(text/plain)"), json!("b:text/plain")),
        (zinc("@p1 \"Point 1\""), json!("r:p1 Point 1")),
        (zinc("@p1"), json!("r:p1")),
        (zinc("C(37.55,-77.45)"), json!("c:37.55,-77.45")),
        (zinc("2015-02-15"), json!("d:2015-02-15")),
        (zinc("08:30:00.5"), json!("h:08:30:00.5")),
        (zinc("2020-06-01T08:00:00-04:00 New_York"), json!("t:2020-06-01T08:00:00-04:00 New_York")),
    ];
    for (value, expected) in cases {
        assert_eq!(value_to_json(&value), expected, "{value}");
        assert_eq!(value_from_json(&expected).unwrap(), Some(value));
    }
}

#[test]
fn test_collections() {
    let value = Value::List(vec![
        Value::Marker,
        Value::Dict(Dict::new().with("n", 1i64)),
    ]);
    let encoded = value_to_json(&value);
    assert_eq!(encoded, json!(["m:", {"n": 1}]));
    assert_eq!(value_from_json(&encoded).unwrap(), Some(value));
}

#[test]
fn test_null_means_absent() {
    let dict = dict_from_json(&json!({"a": null, "b": "m:"})).unwrap();
    assert_eq!(dict, Dict::new().with_marker("b"));
    assert!(matches!(value_from_json(&json!([1, null])), Err(Error::Json(_))));
}

#[test]
fn test_unknown_code_is_plain_string() {
    assert_eq!(
        value_from_json(&json!("q:whatever")).unwrap(),
        Some(Value::from("q:whatever"))
    );
}

#[test]
fn test_coordinates_accept_parens() {
    assert_eq!(value_from_json(&json!("c:(1.5,2.5)")).unwrap(), Some(zinc("C(1.5,2.5)")));
}

#[test]
fn test_grid_json() {
    let grid = decode("ver:\"2.0\" watch\nid,dis,temp\n@a,\"Alpha\",70°F\n@b,,\n").unwrap();
    assert_eq!(
        grid_to_json(&grid),
        json!({
            "meta": {"watch": "m:"},
            "rows": [
                {"id": "r:a", "dis": "Alpha", "temp": "n:70 °F"},
                {"id": "r:b"}
            ]
        })
    );
    assert_eq!(grid_from_json(&to_json(&grid)).unwrap(), grid);
    assert_eq!(grid_from_json(&to_json_pretty(&grid)).unwrap(), grid);
    assert!(to_json_pretty(&grid).contains('\n'));
}

#[test]
fn test_grid_without_meta() {
    let grid = Grid::from_rows(vec![Dict::new().with("id", Reference::new("x").unwrap())]);
    assert_eq!(to_json(&grid), r#"{"rows":[{"id":"r:x"}]}"#);
}

#[test]
fn test_grid_json_errors() {
    assert!(matches!(grid_from_json("{"), Err(Error::Json(_))));
    assert!(matches!(grid_from_json("[]"), Err(Error::Json(_))));
    assert!(matches!(grid_from_json(r#"{"rows": 5}"#), Err(Error::Json(_))));
    assert!(grid_from_json(r#"{"rows": [{"d": "d:2015-13-01"}]}"#).is_err());
}
