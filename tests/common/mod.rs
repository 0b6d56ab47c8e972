#![allow(dead_code)]

use rubylex_rs::{Token, TokenKind, tokenize};

/// Shorthand for an expected token.
pub fn tok(kind: TokenKind, offset: usize, line: usize, column: usize, text: &str) -> Token {
    Token::new(kind, text, offset, line, column)
}

pub fn lex(input: &str) -> Vec<Token> {
    tokenize(input, None).unwrap_or_else(|e| panic!("tokenize failed: {e}\n--- input ---\n{input}"))
}

pub fn kinds(input: &str) -> Vec<TokenKind> {
    lex(input).into_iter().map(|t| t.kind).collect()
}

/// Kind and text of every non-whitespace token.
pub fn significant(input: &str) -> Vec<(TokenKind, String)> {
    lex(input)
        .into_iter()
        .filter(|t| !matches!(t.kind, TokenKind::Space | TokenKind::Newline))
        .map(|t| (t.kind, t.text))
        .collect()
}

/// First token of `input`.
pub fn first(input: &str) -> Token {
    lex(input)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no tokens for {input:?}"))
}

/// Concatenated token texts.
pub fn rebuild(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}
