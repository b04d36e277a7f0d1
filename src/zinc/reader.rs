use crate::error::Result;
use crate::lexer::{Dialect, Tokenizer, is_id_start};
use crate::tz::ZoneDb;
use crate::value::{Dict, Grid, Value};

/// Reads grids, dicts and scalars from Zinc text.
///
/// A reader owns its [`Tokenizer`]; build one reader per input.
pub struct ZincReader<'a> {
    tokens: Tokenizer<'a>,
}

impl<'a> ZincReader<'a> {
    pub fn new(input: &'a str) -> Self {
        ZincReader {
            tokens: Tokenizer::new(input),
        }
    }

    pub fn from_tokenizer(tokens: Tokenizer<'a>) -> Self {
        ZincReader { tokens }
    }

    /// Reader over a UTF-8 byte stream; see [`Tokenizer::from_reader`].
    pub fn from_reader(reader: impl std::io::Read) -> Result<ZincReader<'static>> {
        Ok(ZincReader::from_tokenizer(Tokenizer::from_reader(reader)?))
    }

    /// Resolve timezone names against `zones`.
    pub fn with_zones(self, zones: &'a dyn ZoneDb) -> Self {
        ZincReader {
            tokens: self.tokens.with_zones(zones),
        }
    }

    /// Read one grid, including the blank line that may terminate it.
    pub fn read_grid(&mut self) -> Result<Grid> {
        self.read_ver()?;
        let meta = self.read_meta()?;
        self.tokens.consume_newline()?;

        let columns = self.read_columns()?;
        self.tokens.consume_newline()?;

        let mut rows = Vec::new();
        while !matches!(self.tokens.cur(), Some('\n') | None) {
            rows.push(self.read_row(&columns)?);
        }
        if self.tokens.cur() == Some('\n') {
            self.tokens.advance();
        }

        Ok(Grid::new(meta, rows))
    }

    /// Read grids until the input is exhausted.
    pub fn read_grids(&mut self) -> Result<Vec<Grid>> {
        let mut grids = Vec::new();
        while !self.tokens.at_end() {
            grids.push(self.read_grid()?);
        }
        Ok(grids)
    }

    /// Read exactly one value. `N` reads as `None`.
    pub fn read_scalar(&mut self) -> Result<Option<Value>> {
        let value = self.tokens.read_val(Dialect::Zinc)?;
        self.tokens.expect_end()?;
        Ok(value)
    }

    /// Read space separated `name` / `name:val` tags.
    pub fn read_dict(&mut self) -> Result<Dict> {
        self.tokens.skip_space();
        let dict = self.read_meta()?;
        self.tokens.expect_end()?;
        Ok(dict)
    }

    /// Read comma separated `name` / `name:val` tags, keeping `R` values as
    /// tombstones for [`Dict::merge`].
    pub fn read_diff(&mut self) -> Result<Dict> {
        let t = &mut self.tokens;
        let mut diff = Dict::new();
        t.skip_space();
        while is_id_start(t.cur()) {
            let name = t.read_id()?;
            let mut value = Some(Value::Marker);
            if t.cur() == Some(':') {
                t.advance();
                value = t.read_val(Dialect::Zinc)?;
            }
            if let Some(value) = value {
                diff.insert(name, value);
            }
            t.skip_space();
            if t.cur() == Some(',') {
                t.advance();
                t.skip_space();
            }
        }
        t.expect_end()?;
        Ok(diff)
    }

    fn read_ver(&mut self) -> Result<()> {
        let t = &mut self.tokens;
        let id = t.read_id()?;
        if id != "ver" {
            return Err(t.err(format!("Expecting zinc header 'ver:\"2.0\"', not '{id}'")));
        }
        if t.cur() != Some(':') {
            return Err(t.err_char("Expecting ':' colon"));
        }
        t.advance();
        if t.cur() != Some('"') {
            return Err(t.err_char("Expecting quoted version"));
        }
        let ver = t.read_str_literal()?;
        if ver != "2.0" {
            return Err(t.err(format!("Unsupported zinc version: {ver}")));
        }
        t.skip_space();
        Ok(())
    }

    fn read_meta(&mut self) -> Result<Dict> {
        let t = &mut self.tokens;
        let mut meta = Dict::new();
        while is_id_start(t.cur()) {
            let name = t.read_id()?;
            let mut value = Some(Value::Marker);
            t.skip_space();
            if t.cur() == Some(':') {
                t.advance();
                t.skip_space();
                value = t.read_val(Dialect::Zinc)?;
                t.skip_space();
            }
            if let Some(value) = value {
                meta.insert(name, value);
            }
        }
        Ok(meta)
    }

    fn read_columns(&mut self) -> Result<Vec<String>> {
        let mut columns: Vec<String> = Vec::new();
        loop {
            let name = self.tokens.read_id()?;
            if columns.contains(&name) {
                return Err(self.tokens.err(format!("Duplicate column name: {name}")));
            }
            self.tokens.skip_space();
            // column meta has no place in the row model
            self.read_meta()?;
            columns.push(name);
            if self.tokens.cur() != Some(',') {
                break;
            }
            self.tokens.advance();
            self.tokens.skip_space();
        }
        Ok(columns)
    }

    fn read_row(&mut self, columns: &[String]) -> Result<Dict> {
        let t = &mut self.tokens;
        let mut row = Dict::new();
        for (i, name) in columns.iter().enumerate() {
            t.skip_space();
            if !matches!(t.cur(), Some(',' | '\n') | None) {
                if let Some(value) = t.read_val(Dialect::Zinc)? {
                    row.insert(name.clone(), value);
                }
            }
            t.skip_space();
            if i + 1 < columns.len() {
                if t.cur() != Some(',') {
                    return Err(t.err_char("Expecting comma in row"));
                }
                t.advance();
            }
        }
        // the last row may end at end of input
        if !t.at_end() {
            t.consume_newline()?;
        }
        Ok(row)
    }
}
