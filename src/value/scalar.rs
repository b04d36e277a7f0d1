use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::zinc::writer::write_str_literal;

static REF_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_:.~-]+$").expect("ref id pattern is valid"));

/// Universal resource identifier. Control characters are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri(String);

impl Uri {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if let Some((i, c)) = value.char_indices().find(|(_, c)| (*c as u32) < 0x20) {
            return Err(Error::invalid_value(format!(
                "Invalid URI char at {i}: 0x{:x}",
                c as u32
            )));
        }
        Ok(Uri(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`")?;
        for c in self.0.chars() {
            if c == '`' {
                f.write_str("\\`")?;
            } else {
                write!(f, "{c}")?;
            }
        }
        f.write_str("`")
    }
}

/// Binary payload, modelled by its MIME type only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binary {
    mime: String,
}

impl Binary {
    pub fn new(mime: impl Into<String>) -> Result<Self> {
        let mime = mime.into();
        if mime.is_empty() || !mime.contains('/') {
            return Err(Error::invalid_value(format!("Invalid mime val: {mime:?}")));
        }
        if let Some(c) = mime.chars().find(|c| !c.is_ascii() || *c == ')') {
            return Err(Error::invalid_value(format!("Invalid mime, char='{c}'")));
        }
        Ok(Binary { mime })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bin({})", self.mime)
    }
}

/// Geographic position stored as integer micro-degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    ulat: i32,
    ulng: i32,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !Self::is_lat(lat) {
            return Err(Error::invalid_value(format!("Invalid lat {lat} > +/- 90")));
        }
        if !Self::is_lng(lng) {
            return Err(Error::invalid_value(format!("Invalid lng {lng} > +/- 180")));
        }
        Ok(Coordinates {
            ulat: (lat * 1_000_000.0).round() as i32,
            ulng: (lng * 1_000_000.0).round() as i32,
        })
    }

    pub fn is_lat(lat: f64) -> bool {
        (-90.0..=90.0).contains(&lat)
    }

    pub fn is_lng(lng: f64) -> bool {
        (-180.0..=180.0).contains(&lng)
    }

    pub fn lat(&self) -> f64 {
        f64::from(self.ulat) / 1_000_000.0
    }

    pub fn lng(&self) -> f64 {
        f64::from(self.ulng) / 1_000_000.0
    }

    /// Parse the Zinc form `C(lat,lng)`.
    pub fn parse(s: &str) -> Result<Self> {
        let inner = s
            .strip_prefix("C(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| Error::invalid_value(format!("Invalid coordinates: {s:?}")))?;
        let (lat, lng) = inner
            .split_once(',')
            .ok_or_else(|| Error::invalid_value(format!("Invalid coordinates: {s:?}")))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| Error::invalid_value(format!("Invalid coordinates: {s:?}")))
        };
        Coordinates::new(parse(lat)?, parse(lng)?)
    }
}

fn write_micro(f: &mut fmt::Formatter<'_>, micro: i32) -> fmt::Result {
    if micro < 0 {
        f.write_str("-")?;
    }
    let abs = micro.unsigned_abs();
    let frac = format!("{:06}", abs % 1_000_000);
    let frac = frac.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    write!(f, "{}.{}", abs / 1_000_000, frac)
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("C(")?;
        write_micro(f, self.ulat)?;
        f.write_str(",")?;
        write_micro(f, self.ulng)?;
        f.write_str(")")
    }
}

/// Reference to another record, with an optional display name.
///
/// Identity is the id alone; the display name is presentation data.
#[derive(Debug, Clone, Eq)]
pub struct Reference {
    id: String,
    dis: Option<String>,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        Self::build(id.into(), None)
    }

    pub fn with_dis(id: impl Into<String>, dis: impl Into<String>) -> Result<Self> {
        Self::build(id.into(), Some(dis.into()))
    }

    fn build(id: String, dis: Option<String>) -> Result<Self> {
        if !Self::is_id(&id) {
            return Err(Error::invalid_value(format!("Invalid id val: {id:?}")));
        }
        Ok(Reference { id, dis })
    }

    pub fn is_id(id: &str) -> bool {
        REF_ID.is_match(id)
    }

    pub fn is_id_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-' | '.' | '~')
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dis(&self) -> Option<&str> {
        self.dis.as_deref()
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.id)?;
        if let Some(dis) = &self.dis {
            f.write_str(" ")?;
            write_str_literal(f, dis)?;
        }
        Ok(())
    }
}
