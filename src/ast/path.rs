use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::lexer::{is_id, is_id_start};

/// A tag name, or a chain of names joined by `->` that follows references.
///
/// `siteRef->geoCity` reads `siteRef` from the record, resolves the
/// reference, then reads `geoCity` from the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    names: Vec<String>,
}

impl Path {
    pub fn parse(s: &str) -> Result<Path> {
        let names: Vec<String> = s.split("->").map(str::to_string).collect();
        if let Some(bad) = names.iter().find(|name| !is_tag_name(name)) {
            return Err(Error::invalid_filter(format!(
                "Invalid path {s:?}: bad segment {bad:?}"
            )));
        }
        Ok(Path { names })
    }

    /// Names already validated by the parser.
    pub(crate) fn from_names(names: Vec<String>) -> Path {
        Path { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The tag read from the record itself.
    pub fn first(&self) -> &str {
        &self.names[0]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; a path has at least one name.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| is_id_start(Some(c))) && chars.all(|c| is_id(Some(c)))
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join("->"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let path = Path::parse("siteRef->geoCity").unwrap();
        assert_eq!(path.names(), ["siteRef", "geoCity"]);
        assert_eq!(path.first(), "siteRef");
        assert_eq!(path.to_string(), "siteRef->geoCity");
    }

    #[test]
    fn test_invalid() {
        assert!(Path::parse("").is_err());
        assert!(Path::parse("a->").is_err());
        assert!(Path::parse("a-b").is_err());
        assert!(Path::parse("Site").is_err());
    }
}
