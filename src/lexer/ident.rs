//! Words, variables and symbols.

use super::scanner::Scanner;
use super::state::LexState;
use super::{Literal, Unterminated};
use crate::token::{Keyword, TokenKind};

/// Operator method names usable as `:sym`, longest first.
const SYMBOL_OPERATORS: &[&str] = &[
    "[]=", "[]", "<=>", "===", "==", "=~", "!=", "!~", "**", "+@", "-@", "!@", "~@", "<<", ">>",
    "<=", ">=", "+", "-", "*", "/", "%", "<", ">", "!", "~", "&", "|", "^", "`",
];

/// Single-character special globals (`$!`, `$;`, ...).
const SPECIAL_GLOBALS: &str = "~*$?!@/\\;,.=:<>\"";

pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Length of a method-name suffix at the start of `rest`: `?` or `!`,
/// and `=` for setters, but never the first half of `!=`, `==`, `=~`
/// or `=>`.
fn suffix_len(rest: &str, setter: bool) -> usize {
    let bytes = rest.as_bytes();
    let assigns = |at: usize| {
        bytes.get(at) == Some(&b'=') && !matches!(bytes.get(at + 1), Some(b'=' | b'~' | b'>'))
    };
    match bytes.first() {
        Some(b'?' | b'!') if !assigns(1) => 1,
        Some(b'=') if setter && assigns(0) => 1,
        _ => 0,
    }
}

fn name_kind(word: &str, suffixed: bool) -> TokenKind {
    if suffixed {
        TokenKind::MethodIdentifier
    } else if word.starts_with(char::is_uppercase) {
        TokenKind::Constant
    } else {
        TokenKind::Identifier
    }
}

impl Scanner<'_> {
    /// An identifier, constant or keyword, plus the state to force after
    /// it when the word is a method name.
    pub(crate) fn scan_word(&mut self) -> (TokenKind, Option<LexState>) {
        let start = self.st.pos;
        self.eat_while(is_ident_char);
        let suffixed = suffix_len(self.rest(), false) > 0;
        if suffixed {
            self.bump();
        }
        let word = &self.src[start..self.st.pos];

        if self.st.state == LexState::MethodDef {
            // `def self.name`, `def Foo.name`
            if self.peek() == Some('.') && self.peek_nth(1) != Some('.') {
                let kind = Keyword::from_word(word)
                    .map_or_else(|| name_kind(word, suffixed), TokenKind::Keyword);
                return (kind, Some(LexState::MethodDef));
            }
            if !suffixed && suffix_len(self.rest(), true) > 0 {
                self.bump();
                return (TokenKind::Identifier, Some(LexState::End));
            }
            return (name_kind(word, suffixed), Some(LexState::End));
        }

        let label = self.peek() == Some(':') && self.peek_nth(1) != Some(':');
        if label || self.st.state == LexState::MethodCall {
            return (name_kind(word, suffixed), None);
        }

        match Keyword::from_word(word) {
            Some(keyword) if self.st.state.is_begin() => (TokenKind::Keyword(keyword), None),
            Some(keyword) => (TokenKind::Keyword(keyword.modifier()), None),
            None => (name_kind(word, suffixed), None),
        }
    }

    /// Everything starting with `:`.
    pub(crate) fn scan_colon(&mut self) -> Result<TokenKind, Unterminated> {
        let start = self.st.pos;
        let rest = self.rest();
        if rest.starts_with("::") {
            self.st.pos += 2;
            return Ok(if self.st.state.starts_argument(self.st.space_seen) {
                TokenKind::Colon3
            } else {
                TokenKind::Colon2
            });
        }

        match self.peek_nth(1) {
            Some(quote @ ('"' | '\'')) => {
                self.st.pos += 2;
                let interpolated =
                    self.scan_delimited(start, quote, quote, quote == '"', Literal::Symbol)?;
                return Ok(if interpolated {
                    TokenKind::InterpolatedSymbol
                } else {
                    TokenKind::Symbol
                });
            }
            Some('@' | '$') => {
                self.bump();
                if self.scan_variable() != TokenKind::Unknown {
                    return Ok(TokenKind::Symbol);
                }
                self.st.pos = start;
            }
            Some(c) if is_ident_start(c) => {
                self.bump();
                self.eat_while(is_ident_char);
                self.st.pos += suffix_len(self.rest(), true);
                return Ok(TokenKind::Symbol);
            }
            _ => {
                if let Some(op) = SYMBOL_OPERATORS.iter().find(|op| rest[1..].starts_with(**op)) {
                    self.st.pos += 1 + op.len();
                    return Ok(TokenKind::Symbol);
                }
            }
        }

        self.bump();
        Ok(TokenKind::Colon)
    }

    /// `@ivar`, `@@cvar`, `$global` and the special globals.
    pub(crate) fn scan_variable(&mut self) -> TokenKind {
        if self.peek() == Some('@') {
            let class = self.peek_nth(1) == Some('@');
            let sigils = 1 + usize::from(class);
            if !self.peek_nth(sigils).is_some_and(is_ident_start) {
                self.bump();
                return TokenKind::Unknown;
            }
            self.st.pos += sigils;
            self.eat_while(is_ident_char);
            return if class {
                TokenKind::ClassVariable
            } else {
                TokenKind::InstanceVariable
            };
        }

        self.bump();
        match self.peek() {
            Some('1'..='9') => {
                self.eat_while(|c| c.is_ascii_digit());
                TokenKind::NthRef
            }
            Some('&' | '`' | '\'' | '+') => {
                self.bump();
                TokenKind::BackRef
            }
            Some('-') if self.peek_nth(1).is_some_and(is_ident_char) => {
                self.bump();
                self.bump();
                TokenKind::GlobalVariable
            }
            Some(c) if c == '0' || SPECIAL_GLOBALS.contains(c) => {
                self.bump();
                TokenKind::GlobalVariable
            }
            Some(c) if is_ident_start(c) => {
                self.eat_while(is_ident_char);
                TokenKind::GlobalVariable
            }
            _ => TokenKind::Unknown,
        }
    }
}
