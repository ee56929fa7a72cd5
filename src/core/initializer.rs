use crate::core::lexer::{strip_comments, tokenize, Token, TokenKind};
use crate::domain::model::InitValue;
use crate::utils::error::{DestructorError, Result};

const SOURCE: &str = "initializer";

/// Parses a brace initializer such as `{1, 2.0f, {3, -4}}` into an
/// [`InitValue`] tree. Scalar elements keep their exact source text.
pub fn parse_initializer(text: &str) -> Result<InitValue> {
    let stripped = strip_comments(text);
    let tokens = tokenize(&stripped);
    if tokens.is_empty() {
        return Err(DestructorError::parse(SOURCE, "empty initializer"));
    }

    let mut parser = Parser {
        text: &stripped,
        tokens: &tokens,
        pos: 0,
    };
    let value = parser.element()?.ok_or_else(|| {
        DestructorError::parse(SOURCE, "initializer has no value")
    })?;

    if parser.pos < tokens.len() {
        return Err(DestructorError::parse(
            SOURCE,
            format!("unexpected '{}' after initializer", tokens[parser.pos].text),
        ));
    }
    Ok(value)
}

struct Parser<'t, 'a> {
    text: &'a str,
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl Parser<'_, '_> {
    fn peek(&self) -> Option<&Token<'_>> {
        self.tokens.get(self.pos)
    }

    /// One list element; `None` for an empty slot such as a trailing comma.
    fn element(&mut self) -> Result<Option<InitValue>> {
        match self.peek() {
            Some(t) if t.is(TokenKind::LBrace) => self.list().map(Some),
            Some(t) if t.is(TokenKind::Dot) || t.is(TokenKind::LBracket) => {
                Err(DestructorError::UnsupportedInitializerError {
                    message: format!("designated initializer near '{}'", self.rest_of_element()),
                })
            }
            _ => self.scalar(),
        }
    }

    fn list(&mut self) -> Result<InitValue> {
        self.pos += 1;
        let mut items = Vec::new();

        loop {
            match self.peek() {
                None => return Err(DestructorError::parse(SOURCE, "unbalanced braces")),
                Some(t) if t.is(TokenKind::RBrace) => {
                    self.pos += 1;
                    return Ok(InitValue::List(items));
                }
                Some(t) if t.is(TokenKind::Comma) => {
                    self.pos += 1;
                }
                Some(_) => {
                    if let Some(item) = self.element()? {
                        items.push(item);
                    }
                    match self.peek() {
                        Some(t) if t.is(TokenKind::Comma) || t.is(TokenKind::RBrace) => {}
                        Some(t) => {
                            return Err(DestructorError::parse(
                                SOURCE,
                                format!("expected ',' or '}}' but found '{}'", t.text),
                            ))
                        }
                        None => return Err(DestructorError::parse(SOURCE, "unbalanced braces")),
                    }
                }
            }
        }
    }

    fn scalar(&mut self) -> Result<Option<InitValue>> {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(t) = self.peek() {
            match t.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::Comma | TokenKind::RBrace if depth == 0 => break,
                TokenKind::Assign if depth == 0 => {
                    return Err(DestructorError::UnsupportedInitializerError {
                        message: format!("assignment inside initializer near '{}'", t.text),
                    })
                }
                TokenKind::LBrace => {
                    return Err(DestructorError::parse(
                        SOURCE,
                        "unexpected '{' inside a scalar value",
                    ))
                }
                _ => {}
            }
            self.pos += 1;
        }

        if self.pos == start {
            return Ok(None);
        }
        let first = &self.tokens[start];
        let last = &self.tokens[self.pos - 1];
        Ok(Some(InitValue::scalar(&self.text[first.start..last.end])))
    }

    fn rest_of_element(&self) -> String {
        self.tokens[self.pos..]
            .iter()
            .take_while(|t| !t.is(TokenKind::Comma) && !t.is(TokenKind::RBrace))
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join("")
    }
}
