//! The value grammar shared by Zinc cells, Zinc meta and filter literals.

use crate::error::Result;
use crate::lexer::{Dialect, Tokenizer, is_alpha, is_digit, is_tz, is_unit, is_upper};
use crate::tz::TimeZone;
use crate::value::{Binary, Coordinates, Date, DateTime, Number, Reference, Time, Uri, Value};

impl Tokenizer<'_> {
    /// Read one value starting at the current character.
    ///
    /// Returns `Ok(None)` for the Zinc null literal `N`.
    pub fn read_val(&mut self, dialect: Dialect) -> Result<Option<Value>> {
        match self.cur {
            c if is_digit(c) => self.read_num_val().map(Some),
            c if is_alpha(c) => self.read_word_val(dialect),
            Some('@') => self.read_ref_val().map(|r| Some(Value::Reference(r))),
            Some('"') => Ok(Some(Value::String(self.read_str_literal()?))),
            Some('`') => self.read_uri_val().map(|u| Some(Value::Uri(u))),
            Some('-') if self.peek == Some('I') => self.read_word_val(dialect),
            Some('-') if is_digit(self.peek) => self.read_num_val().map(Some),
            _ => Err(self.err_char("Unexpected char for start of value")),
        }
    }

    // Construction errors raised mid-parse carry the current line.
    fn construct<T>(&self, built: Result<T>) -> Result<T> {
        built.map_err(|e| e.at_line(self.line))
    }

    fn read_word_val(&mut self, dialect: Dialect) -> Result<Option<Value>> {
        let mut word = String::new();
        if let Some(c) = self.cur {
            word.push(c);
        }
        self.advance();
        while let Some(c) = self.cur {
            if !is_alpha(Some(c)) {
                break;
            }
            word.push(c);
            self.advance();
        }

        let value = match (dialect, word.as_str()) {
            (_, "NaN") => Value::Number(Number::NAN),
            (_, "INF") => Value::Number(Number::POS_INF),
            (_, "-INF") => Value::Number(Number::NEG_INF),
            (Dialect::Filter, "true") => Value::Boolean(true),
            (Dialect::Filter, "false") => Value::Boolean(false),
            (Dialect::Zinc, "N") => return Ok(None),
            (Dialect::Zinc, "M") => Value::Marker,
            (Dialect::Zinc, "R") => Value::Remove,
            (Dialect::Zinc, "T") => Value::Boolean(true),
            (Dialect::Zinc, "F") => Value::Boolean(false),
            (Dialect::Zinc, "NA") => Value::NA,
            (Dialect::Zinc, "Bin") => {
                let mime = self.read_paren_body("bin")?;
                Value::Binary(self.construct(Binary::new(mime))?)
            }
            (Dialect::Zinc, "C") => {
                let body = self.read_paren_body("coord")?;
                Value::Coordinates(self.construct(Coordinates::parse(&format!("C({body})")))?)
            }
            _ => return Err(self.err(format!("Unknown value identifier: {word}"))),
        };
        Ok(Some(value))
    }

    fn read_paren_body(&mut self, what: &str) -> Result<String> {
        if self.cur != Some('(') {
            return Err(self.err_char(&format!("Expected '(' for {what} literal")));
        }
        self.advance();
        let mut body = String::new();
        loop {
            match self.cur {
                Some(')') => break,
                None => return Err(self.err(format!("Unexpected end of {what} literal"))),
                Some('\n' | '\r') => {
                    return Err(self.err(format!("Unexpected newline in {what} literal")));
                }
                Some(c) => {
                    body.push(c);
                    self.advance();
                }
            }
        }
        self.advance();
        Ok(body)
    }

    /// Number, Date, Time or DateTime; all start with a digit (or `-`).
    fn read_num_val(&mut self) -> Result<Value> {
        let mut text = String::new();
        if let Some(c) = self.cur {
            text.push(c);
        }
        self.advance();
        loop {
            match self.cur {
                Some(c) if c.is_ascii_digit() || c == '.' => {
                    text.push(c);
                    self.advance();
                }
                Some('_') => self.advance(),
                Some(e @ ('e' | 'E')) if matches!(self.peek, Some('-' | '+')) || is_digit(self.peek) => {
                    text.push(e);
                    self.advance();
                    if let Some(c) = self.cur {
                        text.push(c);
                        self.advance();
                    }
                }
                _ => break,
            }
        }

        // YYYY-MM-DD, optionally continuing into Thh:mm:ss
        let mut date = None;
        let mut hour = None;
        if self.cur == Some('-') {
            let year: i32 = text
                .parse()
                .map_err(|_| self.err(format!("Invalid year for date value: {text}")))?;
            self.advance();
            let month = self.read_two_digits("Invalid digit for month in date value")?;
            if self.cur != Some('-') {
                return Err(self.err_char("Expected '-' for date value"));
            }
            self.advance();
            let day = self.read_two_digits("Invalid digit for day in date value")?;
            let d = self.construct(Date::new(year, month, day))?;
            if self.cur != Some('T') {
                return Ok(Value::Date(d));
            }
            self.advance();
            hour = Some(self.read_two_digits("Invalid digit for hour in date time value")?);
            if self.cur != Some(':') {
                return Err(self.err_char("Expected ':' for time value"));
            }
            date = Some(d);
        }

        if self.cur == Some(':') {
            let hour = match hour {
                Some(h) => h,
                None => {
                    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(self.err(format!("Hour must be two digits for time value: {text}")));
                    }
                    text.parse()
                        .map_err(|_| self.err(format!("Invalid hour for time value: {text}")))?
                }
            };
            self.advance();
            let minute = self.read_two_digits("Invalid digit for minute in time value")?;
            if self.cur != Some(':') {
                return Err(self.err_char("Expected ':' for time value"));
            }
            self.advance();
            let second = self.read_two_digits("Invalid digit for seconds in time value")?;
            let millis = if self.cur == Some('.') {
                self.advance();
                self.read_millis()?
            } else {
                0
            };
            let time = self.construct(Time::new(hour, minute, second, millis))?;
            return match date {
                Some(date) => self.read_zone_suffix(date, time).map(Value::DateTime),
                None => Ok(Value::Time(time)),
            };
        }

        let value: f64 = text
            .parse()
            .map_err(|_| self.err(format!("Invalid number literal: {text}")))?;
        if !is_unit(self.cur) {
            return Ok(Value::Number(Number::new(value)));
        }
        let mut unit = String::new();
        while let Some(c) = self.cur {
            if !is_unit(Some(c)) {
                break;
            }
            unit.push(c);
            self.advance();
        }
        Ok(Value::Number(self.construct(Number::with_unit(value, unit))?))
    }

    // 1-3 fractional digits scaled to milliseconds
    fn read_millis(&mut self) -> Result<u32> {
        let mut millis = 0;
        let mut places = 0;
        while let Some(d) = self.cur.and_then(|c| c.to_digit(10)) {
            places += 1;
            if places > 3 {
                return Err(self.err("Too many digits for milliseconds in time value"));
            }
            millis = millis * 10 + d;
            self.advance();
        }
        match places {
            1 => Ok(millis * 100),
            2 => Ok(millis * 10),
            3 => Ok(millis),
            _ => Err(self.err_char("Expected digits for milliseconds in time value")),
        }
    }

    /// `Z` or `±hh:mm`, then an optional space and zone name.
    fn read_zone_suffix(&mut self, date: Date, time: Time) -> Result<DateTime> {
        let offset = if self.cur == Some('Z') {
            self.advance();
            0
        } else {
            let sign = match self.cur {
                Some('-') => -1,
                Some('+') => 1,
                _ => return Err(self.err_char("Expected -/+ for timezone offset")),
            };
            self.advance();
            let hours = self.read_two_digits("Invalid digit for timezone offset")?;
            if self.cur != Some(':') {
                return Err(self.err_char("Expected colon for timezone offset"));
            }
            self.advance();
            let minutes = self.read_two_digits("Invalid digit for timezone offset")?;
            sign * (hours * 3600 + minutes * 60) as i32
        };

        // zone names start uppercase, which keeps a following lowercase tag
        // name from being read as a zone
        if self.cur == Some(' ') && is_upper(self.peek) {
            self.advance();
            let mut name = String::new();
            while let Some(c) = self.cur {
                if !is_tz(Some(c)) {
                    break;
                }
                name.push(c);
                self.advance();
            }
            let tz = self
                .zones()
                .find(&name)
                .ok_or_else(|| self.err(format!("Unknown timezone: {name}")))?;
            return self.construct(DateTime::new(date, time, tz, offset));
        }
        if offset != 0 {
            return Err(self.err_char("Expected space between timezone offset and name"));
        }
        self.construct(DateTime::new(date, time, TimeZone::utc(), 0))
    }

    fn read_two_digits(&mut self, message: &str) -> Result<u32> {
        let mut value = 0;
        for _ in 0..2 {
            let digit = self
                .cur
                .and_then(|c| c.to_digit(10))
                .ok_or_else(|| self.err_char(message))?;
            value = value * 10 + digit;
            self.advance();
        }
        Ok(value)
    }

    fn read_ref_val(&mut self) -> Result<Reference> {
        self.advance();
        let mut id = String::new();
        while let Some(c) = self.cur {
            if !Reference::is_id_char(c) {
                break;
            }
            id.push(c);
            self.advance();
        }
        self.skip_space();
        if self.cur == Some('"') {
            let dis = self.read_str_literal()?;
            self.construct(Reference::with_dis(id, dis))
        } else {
            self.construct(Reference::new(id))
        }
    }

    /// Read a double-quoted string literal, resolving escapes.
    pub fn read_str_literal(&mut self) -> Result<String> {
        self.advance();
        let mut s = String::new();
        loop {
            match self.cur {
                Some('"') => break,
                None => return Err(self.err("Unexpected end of str literal")),
                Some('\n' | '\r') => return Err(self.err("Unexpected newline in str literal")),
                Some('\\') => s.push(self.read_esc_char()?),
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
            }
        }
        self.advance();
        Ok(s)
    }

    fn read_esc_char(&mut self) -> Result<char> {
        self.advance();
        let c = match self.cur {
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('"') => '"',
            Some('$') => '$',
            Some('\\') => '\\',
            Some('u') => {
                self.advance();
                return self.read_unicode_esc();
            }
            Some(c) => return Err(self.err(format!("Invalid escape sequence: \\{c}"))),
            None => return Err(self.err("Unexpected end of str literal")),
        };
        self.advance();
        Ok(c)
    }

    // \uXXXX, joining a surrogate pair written as two escapes
    fn read_unicode_esc(&mut self) -> Result<char> {
        let mut code = self.read_hex4()?;
        if (0xD800..0xDC00).contains(&code) && self.cur == Some('\\') && self.peek == Some('u') {
            self.advance();
            self.advance();
            let low = self.read_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.err(format!("Invalid low surrogate: \\u{low:04x}")));
            }
            code = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
        }
        char::from_u32(code).ok_or_else(|| self.err(format!("Invalid unicode escape: \\u{code:04x}")))
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let nibble = self
                .cur
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.err_char("Invalid hex char"))?;
            code = (code << 4) | nibble;
            self.advance();
        }
        Ok(code)
    }

    fn read_uri_val(&mut self) -> Result<Uri> {
        self.advance();
        let mut s = String::new();
        loop {
            match self.cur {
                None => return Err(self.err("Unexpected end of uri literal")),
                Some('\n' | '\r') => return Err(self.err("Unexpected newline in uri literal")),
                Some('`') => break,
                Some('\\') => match self.peek {
                    Some(c @ (':' | '/' | '?' | '#' | '[' | ']' | '@' | '\\' | '&' | '=' | ';')) => {
                        s.push('\\');
                        s.push(c);
                        self.advance();
                        self.advance();
                    }
                    Some('`') => {
                        s.push('`');
                        self.advance();
                        self.advance();
                    }
                    Some('u') => s.push(self.read_esc_char()?),
                    Some(c) => return Err(self.err(format!("Invalid URI escape sequence \\{c}"))),
                    None => return Err(self.err("Unexpected end of uri literal")),
                },
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
            }
        }
        self.advance();
        self.construct(Uri::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zinc(s: &str) -> Option<Value> {
        Tokenizer::new(s).read_val(Dialect::Zinc).unwrap()
    }

    #[test]
    fn test_exponent() {
        assert_eq!(zinc("5e3"), Some(Value::Number(Number::new(5000.0))));
        assert_eq!(zinc("1.5E-2"), Some(Value::Number(Number::new(0.015))));
        assert_eq!(zinc("1_000"), Some(Value::Number(Number::new(1000.0))));
    }

    #[test]
    fn test_millis_scaling() {
        assert_eq!(zinc("10:20:30.5"), Some(Value::Time(Time::new(10, 20, 30, 500).unwrap())));
        assert_eq!(zinc("10:20:30.05"), Some(Value::Time(Time::new(10, 20, 30, 50).unwrap())));
        assert!(Tokenizer::new("10:20:30.1234").read_val(Dialect::Zinc).is_err());
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(zinc(r#""\uD83D\uDE00""#), Some(Value::String("😀".to_string())));
    }

    #[test]
    fn test_filter_words() {
        let mut t = Tokenizer::new("true");
        assert_eq!(t.read_val(Dialect::Filter).unwrap(), Some(Value::Boolean(true)));
        let mut t = Tokenizer::new("M");
        assert!(t.read_val(Dialect::Filter).is_err());
    }
}
