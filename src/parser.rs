use tracing::debug;

use crate::{
    ast::{CmpOp, Filter, FilterKind, Path},
    error::Result,
    lexer::{Dialect, Tokenizer},
};

/// Recursive-descent filter parser over a [`Tokenizer`].
pub struct Parser<'a> {
    tokens: Tokenizer<'a>,
}

/// Comparison read after a path.
enum Operator {
    Cmp(CmpOp),
    Like { case_insensitive: bool },
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            tokens: Tokenizer::new(input),
        }
    }

    pub fn from_tokenizer(tokens: Tokenizer<'a>) -> Self {
        Parser { tokens }
    }

    /// Parse the whole input as one filter.
    pub fn parse(&mut self) -> Result<Filter> {
        self.tokens.skip_space();
        let filter = self.parse_or()?;
        self.tokens.skip_space();
        self.tokens.expect_end()?;
        Ok(filter)
    }

    fn parse_or(&mut self) -> Result<Filter> {
        let mut left = self.parse_and()?;

        while self.at_keyword('o')? {
            let right = self.parse_and()?;
            left = left.or(right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Filter> {
        let mut left = self.parse_atomic()?;

        while self.at_keyword('a')? {
            let right = self.parse_atomic()?;
            left = left.and(right);
        }
        Ok(left)
    }

    /// Consume `and` / `or` if the next word starts with `first`. Any other
    /// word with that first letter is an error.
    fn at_keyword(&mut self, first: char) -> Result<bool> {
        self.tokens.skip_space();
        if self.tokens.cur() != Some(first) {
            return Ok(false);
        }
        let keyword = if first == 'a' { "and" } else { "or" };
        let word = self.tokens.read_id()?;
        if word != keyword {
            return Err(self.tokens.err(format!("Expecting '{keyword}' keyword")));
        }
        self.tokens.skip_space();
        Ok(true)
    }

    fn parse_atomic(&mut self) -> Result<Filter> {
        self.tokens.skip_space();
        match (self.tokens.cur(), self.tokens.peek()) {
            (Some('('), _) => self.parse_parens(),
            (Some('*'), _) => {
                self.tokens.advance();
                Ok(Filter::all())
            }
            (Some('!'), next) if next != Some('=') => {
                self.tokens.advance();
                Ok(self.parse_atomic()?.negate())
            }
            _ => self.parse_predicate(),
        }
    }

    fn parse_parens(&mut self) -> Result<Filter> {
        self.tokens.advance();
        self.tokens.skip_space();
        let filter = self.parse_or()?;
        self.tokens.skip_space();
        if self.tokens.cur() != Some(')') {
            return Err(self.tokens.err_char("Expecting ')'"));
        }
        self.tokens.advance();
        Ok(filter)
    }

    fn parse_predicate(&mut self) -> Result<Filter> {
        let path = self.parse_path()?;
        self.tokens.skip_space();

        if path.len() == 1 && path.first() == "not" {
            return Ok(Filter::new(FilterKind::Missing(self.parse_path()?)));
        }

        let Some(op) = self.parse_operator() else {
            return Ok(Filter::new(FilterKind::Has(path)));
        };
        let line = self.tokens.line();
        let value = self
            .tokens
            .read_val(Dialect::Filter)?
            .ok_or_else(|| self.tokens.err("Expected value after operator"))?;

        match op {
            Operator::Cmp(op) => Ok(Filter::cmp(path, op, value)),
            Operator::Like { case_insensitive } => {
                Filter::like_path(path, value, case_insensitive).map_err(|e| e.at_line(line))
            }
        }
    }

    fn parse_operator(&mut self) -> Option<Operator> {
        let (op, width) = match (self.tokens.cur()?, self.tokens.peek()) {
            ('=', Some('=')) => (Operator::Cmp(CmpOp::Eq), 2),
            ('!', Some('=')) => (Operator::Cmp(CmpOp::Ne), 2),
            ('<', Some('=')) => (Operator::Cmp(CmpOp::Le), 2),
            ('>', Some('=')) => (Operator::Cmp(CmpOp::Ge), 2),
            ('<', _) => (Operator::Cmp(CmpOp::Lt), 1),
            ('>', _) => (Operator::Cmp(CmpOp::Gt), 1),
            ('~', Some('~')) => (Operator::Like { case_insensitive: true }, 2),
            ('~', _) => (Operator::Like { case_insensitive: false }, 1),
            _ => return None,
        };
        for _ in 0..width {
            self.tokens.advance();
        }
        self.tokens.skip_space();
        Some(op)
    }

    fn parse_path(&mut self) -> Result<Path> {
        let mut names = vec![self.tokens.read_id()?];
        while self.tokens.cur() == Some('-') && self.tokens.peek() == Some('>') {
            self.tokens.advance();
            self.tokens.advance();
            names.push(self.tokens.read_id()?);
        }
        Ok(Path::from_names(names))
    }
}

/// Parse filter text.
///
/// # Examples
///
/// ```
/// use zinc_haystack::parse_filter;
///
/// let filter = parse_filter("a and b or c and d").unwrap();
/// assert_eq!(filter.to_string(), "(a and b) or (c and d)");
/// ```
pub fn parse_filter(text: &str) -> Result<Filter> {
    let filter = Parser::new(text).parse()?;
    debug!(filter = %filter, "parsed filter");
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_associative_or() {
        let f = parse_filter("a or b or c").unwrap();
        assert_eq!(f.to_string(), "(a or b) or c");
    }

    #[test]
    fn test_negation_binds_to_atomic() {
        let f = parse_filter("!a and b").unwrap();
        assert_eq!(f.to_string(), "!(a) and b");
    }

    #[test]
    fn test_keyword_typo() {
        let err = parse_filter("a anx b").unwrap_err();
        assert!(err.to_string().contains("Expecting 'and' keyword"));
    }
}
