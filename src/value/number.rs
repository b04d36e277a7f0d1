use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

// ASCII letters and `_ $ % /`; anything outside ASCII is accepted so units
// like `°F` or `m³` survive.
static UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z_$%/]|[^\x00-\x7F])+$").expect("unit pattern is valid")
});

/// Floating-point number with an optional unit.
///
/// Equality compares the bit pattern of the value (so `NaN == NaN`) and the
/// unit. Ordering compares the value only.
#[derive(Debug, Clone)]
pub struct Number {
    value: f64,
    unit: Option<String>,
}

impl Number {
    pub const ZERO: Number = Number { value: 0.0, unit: None };
    pub const POS_INF: Number = Number { value: f64::INFINITY, unit: None };
    pub const NEG_INF: Number = Number { value: f64::NEG_INFINITY, unit: None };
    pub const NAN: Number = Number { value: f64::NAN, unit: None };

    /// Unitless number.
    pub fn new(value: f64) -> Self {
        Number { value, unit: None }
    }

    /// Number with a unit; the unit must pass [`Number::is_unit_name`].
    pub fn with_unit(value: f64, unit: impl Into<String>) -> Result<Self> {
        let unit = unit.into();
        if !Self::is_unit_name(&unit) {
            return Err(Error::invalid_value(format!("Invalid unit name: {unit:?}")));
        }
        Ok(Number { value, unit: Some(unit) })
    }

    pub fn is_unit_name(unit: &str) -> bool {
        UNIT.is_match(unit)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn is_nan(&self) -> bool {
        self.value.is_nan()
    }

    pub fn is_infinite(&self) -> bool {
        self.value.is_infinite()
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.value.to_bits() == other.value.to_bits() && self.unit == other.unit
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.to_bits().hash(state);
        self.unit.hash(state);
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // -0 and 0 are the same point on the number line
        Some((self.value + 0.0).total_cmp(&(other.value + 0.0)))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::new(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::new(value as f64)
    }
}

/// Zinc form: `INF`, `-INF`, `NaN`, or the shortest decimal followed by
/// the unit. Very small or very large magnitudes use exponent notation.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.value;
        if v.is_nan() {
            return f.write_str("NaN");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "INF" } else { "-INF" });
        }
        let abs = v.abs();
        if abs == 0.0 || (1e-4..1e15).contains(&abs) {
            write!(f, "{v}")?;
        } else {
            write!(f, "{v:e}")?;
        }
        if let Some(unit) = &self.unit {
            f.write_str(unit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Number::new(3.14).to_string(), "3.14");
        assert_eq!(Number::new(5.0).to_string(), "5");
        assert_eq!(Number::new(-0.5).to_string(), "-0.5");
        assert_eq!(Number::new(1e-7).to_string(), "1e-7");
        assert_eq!(Number::with_unit(72.5, "°F").unwrap().to_string(), "72.5°F");
        assert_eq!(Number::POS_INF.to_string(), "INF");
        assert_eq!(Number::NEG_INF.to_string(), "-INF");
        assert_eq!(Number::NAN.to_string(), "NaN");
    }

    #[test]
    fn test_unit_names() {
        assert!(Number::is_unit_name("kW"));
        assert!(Number::is_unit_name("m/s"));
        assert!(Number::is_unit_name("%RH"));
        assert!(Number::is_unit_name("$"));
        assert!(Number::is_unit_name("°C"));
        assert!(!Number::is_unit_name(""));
        assert!(!Number::is_unit_name("kW h"));
        assert!(!Number::is_unit_name("m2"));
    }

    #[test]
    fn test_nan_equality() {
        assert_eq!(Number::NAN, Number::new(f64::NAN));
        assert_ne!(Number::new(1.0), Number::with_unit(1.0, "kW").unwrap());
    }

    #[test]
    fn test_signed_zero_ordering() {
        let neg = Number::new(-0.0);
        assert_eq!(neg.partial_cmp(&Number::ZERO), Some(Ordering::Equal));
        assert!(Number::new(-1.0) < neg);
        assert!(Number::NAN > Number::POS_INF);
    }
}
