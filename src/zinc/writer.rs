use std::fmt::{self, Write};

use crate::lexer::Dialect;
use crate::value::{Dict, Grid, Value};

/// Writes grids as Zinc text into any [`fmt::Write`] sink.
///
/// Columns are the union of all row keys in first-seen order. A grid with
/// no keys at all gets a single `empty` column so the column line is never
/// blank.
pub struct ZincWriter<W: Write> {
    out: W,
}

impl<W: Write> ZincWriter<W> {
    pub fn new(out: W) -> Self {
        ZincWriter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_grid(&mut self, grid: &Grid) -> fmt::Result {
        self.out.write_str("ver:\"2.0\"")?;
        self.write_meta(grid.meta())?;
        self.out.write_char('\n')?;

        let columns = column_names(grid.rows());
        for (i, name) in columns.iter().enumerate() {
            if i > 0 {
                self.out.write_char(',')?;
            }
            self.out.write_str(name)?;
        }
        self.out.write_char('\n')?;

        for row in grid.rows() {
            self.write_row(&columns, row)?;
            self.out.write_char('\n')?;
        }
        Ok(())
    }

    fn write_meta(&mut self, meta: &Dict) -> fmt::Result {
        for (name, value) in meta.iter() {
            write!(self.out, " {name}")?;
            if *value != Value::Marker {
                self.out.write_char(':')?;
                write_value(&mut self.out, value, Dialect::Zinc)?;
            }
        }
        Ok(())
    }

    fn write_row(&mut self, columns: &[&str], row: &Dict) -> fmt::Result {
        for (i, name) in columns.iter().enumerate() {
            if i > 0 {
                self.out.write_char(',')?;
            }
            match row.get(name) {
                Some(value) => write_value(&mut self.out, value, Dialect::Zinc)?,
                // a leading empty cell would read as a blank line
                None if i == 0 => self.out.write_char('N')?,
                None => {}
            }
        }
        Ok(())
    }
}

fn column_names(rows: &[Dict]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }
    if columns.is_empty() {
        columns.push("empty");
    }
    columns
}

/// Render one value. Lists and nested dicts are written as quoted strings
/// and do not read back as the same kind.
pub(crate) fn write_value(out: &mut impl Write, value: &Value, dialect: Dialect) -> fmt::Result {
    match value {
        Value::Marker => out.write_char('M'),
        Value::Remove => out.write_char('R'),
        Value::NA => out.write_str("NA"),
        Value::Boolean(b) => match dialect {
            Dialect::Zinc => out.write_char(if *b { 'T' } else { 'F' }),
            Dialect::Filter => write!(out, "{b}"),
        },
        Value::Number(n) => write!(out, "{n}"),
        Value::String(s) => write_str_literal(out, s),
        Value::Uri(u) => write!(out, "{u}"),
        Value::Binary(b) => write!(out, "{b}"),
        Value::Coordinates(c) => write!(out, "{c}"),
        Value::Date(d) => write!(out, "{d}"),
        Value::Time(t) => write!(out, "{t}"),
        Value::DateTime(dt) => write!(out, "{dt}"),
        Value::Reference(r) => match dialect {
            Dialect::Zinc => write!(out, "{r}"),
            Dialect::Filter => write!(out, "@{}", r.id()),
        },
        Value::List(items) => {
            let joined = items
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(",");
            write_str_literal(out, &joined)
        }
        Value::Dict(dict) => write_str_literal(out, &dict.to_string()),
    }
}

/// Quote `s`, escaping `"` and `\`, and writing control characters as
/// `\n \r \t` or `\u00XX`.
pub(crate) fn write_str_literal(out: &mut impl Write, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            c if c < ' ' => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_literal() {
        let mut out = String::new();
        write_str_literal(&mut out, "a\"b\\c\nd\u{1}$").unwrap();
        assert_eq!(out, r#""a\"b\\c\nd\u0001$""#);
    }

    #[test]
    fn test_leading_null_cell() {
        let grid = Grid::from_rows(vec![
            Dict::new().with("a", 1i64).with("b", 2i64),
            Dict::new().with("b", 3i64),
        ]);
        let mut out = String::new();
        ZincWriter::new(&mut out).write_grid(&grid).unwrap();
        assert_eq!(out, "ver:\"2.0\"\na,b\n1,2\nN,3\n");
    }
}
