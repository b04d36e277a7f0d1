use crate::value::{Dict, Value};

/// A table: grid-level meta plus ordered rows.
///
/// Column structure only exists on the wire; in memory each row is a
/// [`Dict`] and absent cells are absent keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    meta: Dict,
    rows: Vec<Dict>,
}

impl Grid {
    pub fn new(meta: Dict, rows: Vec<Dict>) -> Self {
        Grid { meta, rows }
    }

    pub fn from_rows(rows: Vec<Dict>) -> Self {
        Self::new(Dict::new(), rows)
    }

    /// Error grid: meta carries `err`, `dis` (short message) and
    /// `errTrace` (full diagnostic text); no rows.
    pub fn from_error(message: impl Into<String>, trace: impl Into<String>) -> Self {
        let meta = Dict::new()
            .with_marker("err")
            .with("dis", message.into())
            .with("errTrace", trace.into());
        Self::new(meta, Vec::new())
    }

    /// Error grid built from any error, using its `Display` for `dis` and
    /// its `Debug` form plus source chain for `errTrace`.
    pub fn from_std_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut trace = format!("{err:?}");
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push_str("\ncaused by: ");
            trace.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::from_error(err.to_string(), trace)
    }

    pub fn meta(&self) -> &Dict {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Dict {
        &mut self.meta
    }

    pub fn rows(&self) -> &[Dict] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Dict> {
        &mut self.rows
    }

    pub fn into_rows(self) -> Vec<Dict> {
        self.rows
    }

    pub fn is_err(&self) -> bool {
        self.meta.has("err")
    }

    /// The `dis` message of an error grid.
    pub fn err_dis(&self) -> Option<&str> {
        if !self.is_err() {
            return None;
        }
        match self.meta.get("dis") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
