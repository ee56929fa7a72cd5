use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    String,
    Char,
    Number,
    Ident,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    LParen,
    RParen,
    Assign,
    Dot,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_ident(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == word
    }
}

const GROUPS: &[(&str, TokenKind)] = &[
    ("string", TokenKind::String),
    ("char", TokenKind::Char),
    ("number", TokenKind::Number),
    ("ident", TokenKind::Ident),
    ("lbrace", TokenKind::LBrace),
    ("rbrace", TokenKind::RBrace),
    ("lbracket", TokenKind::LBracket),
    ("rbracket", TokenKind::RBracket),
    ("semicolon", TokenKind::Semicolon),
    ("comma", TokenKind::Comma),
    ("lparen", TokenKind::LParen),
    ("rparen", TokenKind::RParen),
    ("assign", TokenKind::Assign),
    ("dot", TokenKind::Dot),
    ("other", TokenKind::Other),
];

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r#"(?P<ws>\s+)"#,
            r#"|(?P<string>"(?:\\.|[^"\\])*")"#,
            r#"|(?P<char>'(?:\\.|[^'\\])*')"#,
            r#"|(?P<number>(?:0[xX][0-9A-Fa-f]+|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)[fFuUlL]*)"#,
            r#"|(?P<ident>[A-Za-z_]\w*)"#,
            r#"|(?P<lbrace>\{)|(?P<rbrace>\})"#,
            r#"|(?P<lbracket>\[)|(?P<rbracket>\])"#,
            r#"|(?P<semicolon>;)|(?P<comma>,)"#,
            r#"|(?P<lparen>\()|(?P<rparen>\))"#,
            r#"|(?P<assign>=)|(?P<dot>\.)"#,
            r#"|(?P<other>.)"#,
        ))
        .expect("valid token regex")
    })
}

/// Splits C source into tokens. Whitespace is dropped; everything else,
/// including operators such as `-` or `*`, is kept with its byte span.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for caps in token_regex().captures_iter(text) {
        if caps.name("ws").is_some() {
            continue;
        }
        for (group, kind) in GROUPS {
            if let Some(m) = caps.name(group) {
                tokens.push(Token {
                    kind: *kind,
                    text: m.as_str(),
                    start: m.start(),
                    end: m.end(),
                });
                break;
            }
        }
    }
    tokens
}

/// Blanks out `//` and `/* */` comments with spaces of the same byte length,
/// keeping newlines, so offsets into the result are valid in the input.
pub fn strip_comments(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str(char),
        Line,
        Block,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    let blank = |out: &mut String, c: char| {
        if c == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat(' ').take(c.len_utf8()));
        }
    };

    while let Some(c) = chars.next() {
        match state {
            State::Code => match (c, chars.peek()) {
                ('/', Some('/')) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Line;
                }
                ('/', Some('*')) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Block;
                }
                ('"', _) | ('\'', _) => {
                    out.push(c);
                    state = State::Str(c);
                }
                _ => out.push(c),
            },
            State::Str(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || c == '\n' {
                    state = State::Code;
                }
            }
            State::Line => {
                blank(&mut out, c);
                if c == '\n' {
                    state = State::Code;
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }
    out
}
