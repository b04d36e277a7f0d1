//! Character-level tokenizer shared by the Zinc reader and the filter parser.
//!
//! The tokenizer keeps exactly two characters of lookahead (`cur` and
//! `peek`) and a 1-based line counter. Character classes come from a
//! 128-entry table; anything outside ASCII only ever counts as a unit
//! character.

mod scalar;

use std::io::Read;

use crate::error::{Error, Result};
use crate::tz::{ZoneDb, ZoneTable};

const DIGIT: u8 = 0x01;
const ALPHA_LO: u8 = 0x02;
const ALPHA_UP: u8 = 0x04;
const ALPHA: u8 = ALPHA_LO | ALPHA_UP;
const UNIT: u8 = 0x08;
const TZ: u8 = 0x10;
const ID_START: u8 = 0x20;
const ID: u8 = 0x40;

static CHAR_CLASSES: [u8; 128] = char_classes();

const fn char_classes() -> [u8; 128] {
    let mut table = [0u8; 128];
    let mut c = b'0';
    while c <= b'9' {
        table[c as usize] = DIGIT | TZ | ID;
        c += 1;
    }
    c = b'a';
    while c <= b'z' {
        table[c as usize] = ALPHA_LO | UNIT | TZ | ID_START | ID;
        c += 1;
    }
    c = b'A';
    while c <= b'Z' {
        table[c as usize] = ALPHA_UP | UNIT | TZ | ID;
        c += 1;
    }
    table[b'%' as usize] = UNIT;
    table[b'_' as usize] = UNIT | TZ | ID;
    table[b'/' as usize] = UNIT;
    table[b'$' as usize] = UNIT;
    table[b'-' as usize] = TZ;
    table[b'+' as usize] = TZ;
    table
}

fn class(c: Option<char>) -> u8 {
    match c {
        Some(c) if c.is_ascii() => CHAR_CLASSES[c as usize],
        _ => 0,
    }
}

pub fn is_digit(c: Option<char>) -> bool {
    class(c) & DIGIT != 0
}

pub fn is_alpha(c: Option<char>) -> bool {
    class(c) & ALPHA != 0
}

pub fn is_upper(c: Option<char>) -> bool {
    class(c) & ALPHA_UP != 0
}

/// Unit characters: letters, `% _ / $`, and any non-ASCII character.
pub fn is_unit(c: Option<char>) -> bool {
    match c {
        Some(c) if !c.is_ascii() => true,
        _ => class(c) & UNIT != 0,
    }
}

/// Timezone name characters: letters, digits, `_ - +`.
pub fn is_tz(c: Option<char>) -> bool {
    class(c) & TZ != 0
}

/// Tag names start with a lowercase ASCII letter.
pub fn is_id_start(c: Option<char>) -> bool {
    class(c) & ID_START != 0
}

pub fn is_id(c: Option<char>) -> bool {
    class(c) & ID != 0
}

/// Which grammar the shared value reader accepts.
///
/// Zinc allows the bare-word literals `N M R T F NA Bin(..) C(..)`;
/// filters use `true`/`false` instead. `NaN`, `INF` and `-INF` are valid
/// in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Zinc,
    Filter,
}

/// Two-character lookahead over a character source.
///
/// One tokenizer serves one parse; it holds cursor state and is never
/// shared between readers.
pub struct Tokenizer<'a> {
    source: Box<dyn Iterator<Item = char> + 'a>,
    cur: Option<char>,
    peek: Option<char>,
    line: usize,
    zones: &'a dyn ZoneDb,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::from_chars(input.chars())
    }

    /// Tokenize any character source, pulled one character at a time.
    pub fn from_chars(chars: impl Iterator<Item = char> + 'a) -> Self {
        let mut tokenizer = Tokenizer {
            source: Box::new(chars),
            cur: None,
            peek: None,
            line: 1,
            zones: ZoneTable::builtin(),
        };
        tokenizer.peek = tokenizer.source.next();
        tokenizer.advance();
        tokenizer
    }

    /// Tokenize UTF-8 text read from a byte stream.
    ///
    /// Read failures and invalid UTF-8 are reported as [`Error::Parse`];
    /// for bad UTF-8 the line is the one holding the first invalid byte.
    pub fn from_reader(mut reader: impl Read) -> Result<Tokenizer<'static>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|e| Error::Parse {
            message: format!("I/O error: {e}"),
            line: 1,
        })?;
        let text = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            Error::Parse {
                message: format!("Invalid UTF-8: {}", e.utf8_error()),
                line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            }
        })?;
        let chars: Vec<char> = text.chars().collect();
        Ok(Tokenizer::from_chars(chars.into_iter()))
    }

    /// Resolve timezone names against `zones` instead of the built-in table.
    pub fn with_zones(mut self, zones: &'a dyn ZoneDb) -> Self {
        self.zones = zones;
        self
    }

    pub fn cur(&self) -> Option<char> {
        self.cur
    }

    pub fn peek(&self) -> Option<char> {
        self.peek
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn at_end(&self) -> bool {
        self.cur.is_none()
    }

    pub(crate) fn zones(&self) -> &'a dyn ZoneDb {
        self.zones
    }

    /// Shift `peek` into `cur` and pull the next character.
    pub fn advance(&mut self) {
        if self.cur == Some('\n') {
            self.line += 1;
        }
        self.cur = self.peek;
        self.peek = self.source.next();
    }

    /// Skip spaces and tabs; never newlines.
    pub fn skip_space(&mut self) {
        while matches!(self.cur, Some(' ' | '\t')) {
            self.advance();
        }
    }

    pub fn consume_newline(&mut self) -> Result<()> {
        if self.cur != Some('\n') {
            return Err(self.err_char("Expecting newline"));
        }
        self.advance();
        Ok(())
    }

    /// Read a tag name: a lowercase letter followed by letters, digits or `_`.
    pub fn read_id(&mut self) -> Result<String> {
        if !is_id_start(self.cur) {
            return Err(self.err_char("Invalid name start char"));
        }
        let mut id = String::new();
        while let Some(c) = self.cur {
            if !is_id(Some(c)) {
                break;
            }
            id.push(c);
            self.advance();
        }
        Ok(id)
    }

    /// Fail unless the input is exhausted.
    pub fn expect_end(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.err_char("Expected end of stream"))
        }
    }

    /// Parse error at the current line.
    pub fn err(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            message: message.into(),
            line: self.line,
        }
    }

    /// Parse error naming the current character.
    pub fn err_char(&self, message: &str) -> Error {
        let message = match self.cur {
            None => format!("{message} (end of stream)"),
            Some(c) if c >= ' ' => format!("{message} (char=0x{:x} '{c}')", c as u32),
            Some(c) => format!("{message} (char=0x{:x})", c as u32),
        };
        self.err(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_classes() {
        assert!(is_digit(Some('7')));
        assert!(!is_digit(Some('a')));
        assert!(is_id_start(Some('a')));
        assert!(!is_id_start(Some('A')));
        assert!(!is_id_start(Some('_')));
        assert!(is_id(Some('_')));
        assert!(is_unit(Some('%')));
        assert!(is_unit(Some('°')));
        assert!(!is_unit(Some('1')));
        assert!(is_tz(Some('+')));
        assert!(!is_tz(Some(' ')));
        assert!(!is_alpha(None));
    }

    #[test]
    fn test_line_counting() {
        let mut t = Tokenizer::new("a\nb\n");
        assert_eq!(t.line(), 1);
        t.advance();
        t.consume_newline().unwrap();
        assert_eq!(t.cur(), Some('b'));
        assert_eq!(t.line(), 2);
        t.advance();
        t.consume_newline().unwrap();
        assert!(t.at_end());
        assert_eq!(t.line(), 3);
    }

    #[test]
    fn test_err_char() {
        let t = Tokenizer::new("#");
        assert_eq!(
            t.err_char("Bad").to_string(),
            "Bad (char=0x23 '#') [Line 1]"
        );
        let t = Tokenizer::new("");
        assert_eq!(t.err_char("Bad").to_string(), "Bad (end of stream) [Line 1]");
    }
}
