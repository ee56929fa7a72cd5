use crate::core::lexer::{strip_comments, tokenize, Token, TokenKind};
use crate::domain::model::{Field, StructDef, StructSet};
use crate::utils::error::{DestructorError, Result};

/// Parses every `typedef struct [tag] { ... } Name;` in `text`.
/// `source_name` only labels errors.
pub fn parse_typedef_structs(source_name: &str, text: &str) -> Result<StructSet> {
    let stripped = strip_comments(text);
    let tokens = tokenize(&stripped);
    let mut structs = StructSet::new();
    let mut pos = 0;

    while pos < tokens.len() {
        if !(tokens[pos].is_ident("typedef")
            && tokens.get(pos + 1).is_some_and(|t| t.is_ident("struct")))
        {
            pos += 1;
            continue;
        }
        pos += 2;

        // 可選的 struct tag
        if tokens.get(pos).is_some_and(|t| t.is(TokenKind::Ident)) {
            pos += 1;
        }
        if !tokens.get(pos).is_some_and(|t| t.is(TokenKind::LBrace)) {
            continue;
        }
        pos += 1;

        let mut fields = Vec::new();
        while pos < tokens.len() && !tokens[pos].is(TokenKind::RBrace) {
            let start = pos;
            while pos < tokens.len()
                && !tokens[pos].is(TokenKind::Semicolon)
                && !tokens[pos].is(TokenKind::RBrace)
            {
                pos += 1;
            }
            let field_tokens = &tokens[start..pos];
            if tokens.get(pos).is_some_and(|t| t.is(TokenKind::Semicolon)) {
                pos += 1;
            }
            if field_tokens.is_empty() {
                continue;
            }
            fields.push(parse_field(source_name, field_tokens)?);
        }

        if pos >= tokens.len() {
            return Err(DestructorError::parse(source_name, "unterminated struct body"));
        }
        pos += 1;

        match tokens.get(pos) {
            Some(t) if t.is(TokenKind::Ident) => {
                let name = t.text.to_string();
                pos += 1;
                if tokens.get(pos).is_some_and(|t| t.is(TokenKind::Semicolon)) {
                    pos += 1;
                }
                tracing::debug!("Parsed struct '{}' with {} fields", name, fields.len());
                structs.insert(StructDef { name, fields });
            }
            _ => {
                return Err(DestructorError::parse(
                    source_name,
                    "expected a typedef name after '}'",
                ))
            }
        }
    }

    Ok(structs)
}

fn parse_field(source_name: &str, tokens: &[Token<'_>]) -> Result<Field> {
    let mut tokens = tokens;
    let mut dims = Vec::new();

    while tokens.len() >= 3 && tokens[tokens.len() - 1].is(TokenKind::RBracket) {
        let n = tokens.len();
        if !tokens[n - 3].is(TokenKind::LBracket) {
            return Err(DestructorError::parse(
                source_name,
                format!("unsupported array dimension in field '{}'", join(tokens)),
            ));
        }
        let dim = tokens[n - 2].text.parse::<usize>().map_err(|_| {
            DestructorError::parse(
                source_name,
                format!("array dimension '{}' is not an integer literal", tokens[n - 2].text),
            )
        })?;
        dims.insert(0, dim);
        tokens = &tokens[..n - 3];
    }

    match tokens.split_last() {
        Some((name, ty)) if name.is(TokenKind::Ident) && !ty.is_empty() => Ok(Field {
            name: name.text.to_string(),
            ty: join(ty),
            dims,
        }),
        _ => Err(DestructorError::parse(
            source_name,
            format!("cannot read field declaration '{}'", join(tokens)),
        )),
    }
}

fn join(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.text).collect::<Vec<_>>().join(" ")
}
