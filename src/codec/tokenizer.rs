//! SimpleMRS tokenization.
//!
//! Three token classes are recognised:
//!
//! ```text
//! "the dog \"barks\""     double-quoted string, escapes kept verbatim
//! _dog_n_1_rel  x4  qeq   bare run of non-space, non-reserved characters
//! : # @ [ ] < >           reserved single characters
//! ```
//!
//! Whitespace only separates tokens. Characters that fit none of the classes
//! (an unterminated quote) are skipped.

use crate::{Error, Result};

/// Split `input` into SimpleMRS tokens.
pub fn tokenize(input: &str) -> Vec<&str> {
    regex!(r#""[^"\\]*(?:\\.[^"\\]*)*"|[^\s:#@\[\]<>"]+|[:#@\[\]<>]"#).find_iter(input).map(|m| m.as_str()).collect()
}

/// A cursor over the tokens of one input, consumed strictly left to right.
///
/// Running out of tokens is reported as [`Error::Syntax`] at the position where
/// another token was expected.
#[derive(Debug)]
pub(crate) struct TokenStream<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> TokenStream<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        TokenStream { tokens: tokenize(input), pos: 0 }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Index of the next token.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn peek(&self) -> Result<&'a str> {
        self.tokens.get(self.pos).copied().ok_or_else(|| Error::syntax(self.pos, "unexpected termination"))
    }

    pub(crate) fn pop(&mut self) -> Result<&'a str> {
        let token = self.peek()?;
        self.pos += 1;
        Ok(token)
    }

    /// Consume `expected` or fail.
    pub(crate) fn expect(&mut self, expected: &str) -> Result<()> {
        let position = self.pos;
        let token = self.pop()?;
        if token == expected {
            Ok(())
        } else {
            Err(Error::syntax(position, format!("expected `{expected}`, found `{token}`")))
        }
    }

    /// Consume the next token if it is `candidate`.
    pub(crate) fn accept(&mut self, candidate: &str) -> bool {
        if self.tokens.get(self.pos) == Some(&candidate) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_reserved_characters() {
        assert_eq!(tokenize("[ LTOP: h1 ]"), vec!["[", "LTOP", ":", "h1", "]"]);
        assert_eq!(tokenize("_dog_n_1_rel<0:3>"), vec!["_dog_n_1_rel", "<", "0", ":", "3", ">"]);
        assert_eq!(tokenize("#@"), vec!["#", "@"]);
    }

    #[test]
    fn quoted_strings_keep_escapes() {
        let toks = tokenize(r#"[ "say \"hi\": now" CARG: "Kim" ]"#);
        assert_eq!(toks, vec!["[", r#""say \"hi\": now""#, "CARG", ":", r#""Kim""#, "]"]);
    }

    #[test]
    fn whitespace_is_only_a_separator() {
        assert_eq!(tokenize("  h1\n\tqeq   h3 "), vec!["h1", "qeq", "h3"]);
        assert!(tokenize(" \n ").is_empty());
    }

    #[test]
    fn stream_reports_exhaustion_as_syntax_error() {
        let mut stream = TokenStream::new("[ TOP");
        stream.expect("[").unwrap();
        assert!(stream.accept("TOP"));
        assert!(stream.is_exhausted());
        match stream.expect(":") {
            Err(Error::Syntax { position, .. }) => assert_eq!(position, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn stream_reports_wrong_token() {
        let mut stream = TokenStream::new("INDEX e2");
        stream.expect("INDEX").unwrap();
        assert_eq!(stream.position(), 1);
        assert!(matches!(stream.expect(":"), Err(Error::Syntax { position: 1, .. })));
    }
}
