//! Haystack JSON encoding of values and grids.
//!
//! Scalars that JSON cannot express natively become strings with a one
//! letter type code and a colon:
//!
//! | Kind | JSON |
//! |---|---|
//! | Marker / Remove / NA | `"m:"` / `"x:"` / `"z:"` |
//! | Boolean | `true` / `false` |
//! | Number | `72.5`, or `"n:72.5 °F"`, `"n:INF"`, `"n:NaN"` |
//! | String | `"text"`, or `"s:a:b"` when the text itself looks coded |
//! | Uri / Binary | `"u:http://..."` / `"b:text/plain"` |
//! | Reference | `"r:id"` or `"r:id dis"` |
//! | Coordinates | `"c:37.5,-77.4"` |
//! | Date / Time / DateTime | `"d:..."` / `"h:..."` / `"t:..."` in Zinc form |
//! | List / Dict | array / object |
//!
//! A grid is `{"meta": {...}, "rows": [...]}`, with `meta` left out when
//! empty. Object keys come out sorted.
//!
//! # Examples
//!
//! ```
//! use zinc_haystack::{Dict, Grid};
//! use zinc_haystack::output::{grid_from_json, to_json};
//!
//! let grid = Grid::from_rows(vec![Dict::new().with_marker("site").with("area", 100i64)]);
//! let json = to_json(&grid);
//! assert_eq!(json, r#"{"rows":[{"area":100,"site":"m:"}]}"#);
//! assert_eq!(grid_from_json(&json).unwrap(), grid);
//! ```

use std::fmt;

use serde_json::{Map, Value as Json};

use crate::error::{Error, Result};
use crate::value::{
    Binary, Coordinates, Date, DateTime, Dict, Grid, Number, Reference, Time, Uri, Value,
};

/// Compact JSON text for a grid.
pub fn to_json(grid: &Grid) -> String {
    grid_to_json(grid).to_string()
}

/// Indented JSON text for a grid.
pub fn to_json_pretty(grid: &Grid) -> String {
    format!("{:#}", grid_to_json(grid))
}

pub fn grid_to_json(grid: &Grid) -> Json {
    let mut obj = Map::new();
    if !grid.meta().is_empty() {
        obj.insert("meta".to_string(), dict_to_json(grid.meta()));
    }
    let rows = grid.rows().iter().map(dict_to_json).collect();
    obj.insert("rows".to_string(), Json::Array(rows));
    Json::Object(obj)
}

/// Parse grid JSON text.
pub fn grid_from_json(text: &str) -> Result<Grid> {
    let json: Json = serde_json::from_str(text).map_err(|e| Error::Json(e.to_string()))?;
    grid_from_json_value(&json)
}

pub fn grid_from_json_value(json: &Json) -> Result<Grid> {
    let Json::Object(obj) = json else {
        return Err(Error::Json("grid must be an object".to_string()));
    };
    let meta = match obj.get("meta") {
        Some(meta) => dict_from_json(meta)?,
        None => Dict::new(),
    };
    let rows = match obj.get("rows") {
        Some(Json::Array(rows)) => rows.iter().map(dict_from_json).collect::<Result<_>>()?,
        Some(_) => return Err(Error::Json("grid rows must be an array".to_string())),
        None => Vec::new(),
    };
    Ok(Grid::new(meta, rows))
}

pub fn dict_to_json(dict: &Dict) -> Json {
    let obj = dict
        .iter()
        .map(|(k, v)| (k.to_string(), value_to_json(v)))
        .collect::<Map<_, _>>();
    Json::Object(obj)
}

/// Decode an object. `null` members are left out.
pub fn dict_from_json(json: &Json) -> Result<Dict> {
    let Json::Object(obj) = json else {
        return Err(Error::Json(format!("expected object, found {json}")));
    };
    let mut dict = Dict::new();
    for (key, member) in obj {
        if let Some(value) = value_from_json(member)? {
            dict.insert(key.as_str(), value);
        }
    }
    Ok(dict)
}

pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Marker => Json::String("m:".to_string()),
        Value::Remove => Json::String("x:".to_string()),
        Value::NA => Json::String("z:".to_string()),
        Value::Boolean(b) => Json::Bool(*b),
        Value::Number(n) => number_to_json(n),
        Value::String(s) => {
            if s.chars().nth(1) == Some(':') {
                coded('s', s)
            } else {
                Json::String(s.clone())
            }
        }
        Value::Uri(u) => coded('u', u.as_str()),
        Value::Binary(b) => coded('b', b.mime()),
        Value::Coordinates(c) => Json::String(format!("c:{},{}", c.lat(), c.lng())),
        Value::Date(d) => coded('d', d),
        Value::Time(t) => coded('h', t),
        Value::DateTime(dt) => coded('t', dt),
        Value::Reference(r) => match r.dis() {
            Some(dis) => Json::String(format!("r:{} {dis}", r.id())),
            None => coded('r', r.id()),
        },
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Dict(dict) => dict_to_json(dict),
    }
}

fn coded(code: char, body: impl fmt::Display) -> Json {
    Json::String(format!("{code}:{body}"))
}

fn number_to_json(n: &Number) -> Json {
    let v = n.value();
    if n.unit().is_none() && v.is_finite() {
        // whole numbers stay integers; -0 has no integer form
        let neg_zero = v == 0.0 && v.is_sign_negative();
        if !neg_zero && v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
            return Json::from(v as i64);
        }
        if let Some(num) = serde_json::Number::from_f64(v) {
            return Json::Number(num);
        }
    }
    let plain = Number::new(v);
    match n.unit() {
        Some(unit) if v.is_finite() => Json::String(format!("n:{plain} {unit}")),
        _ => Json::String(format!("n:{plain}")),
    }
}

/// Decode one value. `null` decodes to `None`.
pub fn value_from_json(json: &Json) -> Result<Option<Value>> {
    let value = match json {
        Json::Null => return Ok(None),
        Json::Bool(b) => Value::Boolean(*b),
        Json::Number(n) => {
            let v = n
                .as_f64()
                .ok_or_else(|| Error::Json(format!("unrepresentable number: {n}")))?;
            Value::Number(Number::new(v))
        }
        Json::String(s) => string_from_json(s)?,
        Json::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                let value = value_from_json(item)?
                    .ok_or_else(|| Error::Json("null is not allowed in a list".to_string()))?;
                list.push(value);
            }
            Value::List(list)
        }
        Json::Object(_) => Value::Dict(dict_from_json(json)?),
    };
    Ok(Some(value))
}

fn string_from_json(s: &str) -> Result<Value> {
    let mut chars = s.chars();
    let (Some(code), Some(':')) = (chars.next(), chars.next()) else {
        return Ok(Value::String(s.to_string()));
    };
    let body = chars.as_str();
    let value = match code {
        'm' => Value::Marker,
        'x' => Value::Remove,
        'z' => Value::NA,
        's' => Value::String(body.to_string()),
        'n' => Value::Number(number_from_json(body)?),
        'u' => Value::Uri(Uri::new(body)?),
        'b' => Value::Binary(Binary::new(body)?),
        'r' => Value::Reference(match body.split_once(' ') {
            Some((id, dis)) => Reference::with_dis(id, dis)?,
            None => Reference::new(body)?,
        }),
        'c' => Value::Coordinates(coord_from_json(body)?),
        'd' => Value::Date(Date::parse(body)?),
        'h' => Value::Time(Time::parse(body)?),
        't' => Value::DateTime(DateTime::parse(body)?),
        _ => Value::String(s.to_string()),
    };
    Ok(value)
}

// `72.5 °F`, `72.5°F`, `INF`, `-INF` or `NaN`
fn number_from_json(body: &str) -> Result<Number> {
    let (num, unit) = match body.split_once(' ') {
        Some((num, unit)) => (num, Some(unit)),
        None => (body, None),
    };
    let parsed = match Value::parse_zinc(num)? {
        Some(Value::Number(n)) => n,
        _ => return Err(Error::Json(format!("invalid number: {body:?}"))),
    };
    match unit {
        Some(unit) => Number::with_unit(parsed.value(), unit),
        None => Ok(parsed),
    }
}

fn coord_from_json(body: &str) -> Result<Coordinates> {
    let inner = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .unwrap_or(body);
    Coordinates::parse(&format!("C({inner})"))
}
