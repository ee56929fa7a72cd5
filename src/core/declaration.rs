use crate::core::lexer::{strip_comments, tokenize, TokenKind};
use crate::domain::model::{ArraySize, Declaration, RenderedDeclaration};
use crate::utils::error::{DestructorError, Result};
use regex::Regex;

/// Finds every `[specifiers] <type_name> <var>[<n>] [attributes] = { ... };`
/// in `text`. Commented-out declarations are ignored.
pub fn find_declarations(text: &str, type_name: &str) -> Result<Vec<Declaration>> {
    scan(text, &regex::escape(type_name), r"[A-Za-z_]\w*")
}

/// Declarations of `var_name`, whatever their type.
pub fn find_declarations_of_var(text: &str, var_name: &str) -> Result<Vec<Declaration>> {
    scan(text, r"[A-Za-z_]\w*", &regex::escape(var_name))
}

fn declaration_regex(type_pattern: &str, var_pattern: &str) -> Regex {
    let pattern = format!(
        r"(?m)^[ \t]*(?P<decl>(?P<spec>(?:[A-Za-z_]\w*[ \t]+)*?)(?P<ty>{ty})[ \t]+(?P<var>{var})\s*(?P<bracket>\[\s*(?P<size>\w*)\s*\])?(?P<attrs>(?:\s+[A-Za-z_]\w*)*)\s*=\s*)\{{",
        ty = type_pattern,
        var = var_pattern,
    );
    // 兩個 pattern 都是跳脫過的識別字或固定字元類別
    Regex::new(&pattern).expect("valid declaration regex")
}

fn scan(text: &str, type_pattern: &str, var_pattern: &str) -> Result<Vec<Declaration>> {
    let stripped = strip_comments(text);
    let re = declaration_regex(type_pattern, var_pattern);
    let mut declarations = Vec::new();
    let mut search_from = 0;

    while let Some(caps) = re.captures_at(&stripped, search_from) {
        let decl = caps.name("decl").expect("decl group always participates");
        let whole = caps.get(0).expect("match");
        let brace_start = whole.end() - 1;

        let Some((block_end, statement_end)) = match_initializer(&stripped, brace_start)? else {
            // 沒有結尾的 `;`，不是宣告
            search_from = whole.end();
            continue;
        };

        let words = |name: &str| -> Vec<String> {
            caps.name(name)
                .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        };

        let array_size = caps.name("bracket").map(|_| {
            match caps.name("size").map(|m| m.as_str()).unwrap_or("") {
                "" => ArraySize::Unsized,
                n => ArraySize::Sized(n.to_string()),
            }
        });

        declarations.push(Declaration {
            specifiers: words("spec"),
            type_name: caps["ty"].to_string(),
            var_name: caps["var"].to_string(),
            array_size,
            attributes: words("attrs"),
            init_block: text[brace_start..block_end].to_string(),
            span: (decl.start(), statement_end),
        });
        search_from = statement_end;
    }

    Ok(declarations)
}

/// From the `{` at `start`, returns the end of the balanced block and the end
/// of the statement (just past `;`), or `None` when no `;` follows.
fn match_initializer(text: &str, start: usize) -> Result<Option<(usize, usize)>> {
    let tokens = tokenize(&text[start..]);
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => {
                depth -= 1;
                if depth == 0 {
                    let block_end = start + token.end;
                    return Ok(tokens
                        .get(i + 1)
                        .filter(|t| t.is(TokenKind::Semicolon))
                        .map(|t| (block_end, start + t.end)));
                }
            }
            _ => {}
        }
    }
    Err(DestructorError::parse(
        "init file",
        format!("unbalanced braces in initializer starting at byte {}", start),
    ))
}

/// `<specifiers> <type> <var>[<n>] <postfix> = <init>;`, empty parts omitted.
pub fn render_declaration(
    specifiers: &[String],
    type_name: &str,
    var_name: &str,
    array_size: Option<&ArraySize>,
    postfix: &[String],
    init: &str,
) -> String {
    let mut parts: Vec<String> = specifiers.to_vec();
    parts.push(type_name.to_string());
    match array_size {
        Some(size) => parts.push(format!("{}{}", var_name, size)),
        None => parts.push(var_name.to_string()),
    }
    parts.extend(postfix.iter().cloned());
    format!("{} = {};", parts.join(" "), init)
}

/// Adds `const` to the specifier list unless already present.
pub fn ensure_const(specifiers: &[String]) -> Vec<String> {
    let mut out = specifiers.to_vec();
    if !out.iter().any(|s| s == "const") {
        out.push("const".to_string());
    }
    out
}

/// Replaces existing declarations of the same variable in `content`, or
/// appends new ones at the end.
pub fn update_output(content: &str, declarations: &[RenderedDeclaration]) -> Result<String> {
    let mut content = content.to_string();

    for decl in declarations {
        let existing = find_declarations_of_var(&content, &decl.var_name)?;
        match existing.first() {
            Some(old) => {
                tracing::debug!("Replacing existing declaration of '{}'", decl.var_name);
                content.replace_range(old.span.0..old.span.1, &decl.text);
            }
            None => {
                tracing::debug!("Appending declaration of '{}'", decl.var_name);
                content.push('\n');
                content.push_str(&decl.text);
                content.push('\n');
            }
        }
    }

    Ok(content)
}
