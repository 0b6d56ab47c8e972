//! Delimited literals: strings, commands, regexps and `%` literals.

use super::ident::is_ident_start;
use super::scanner::{Lexeme, Scanner};
use super::state::LexerState;
use super::{Literal, Unterminated};
use crate::token::TokenKind;

const REGEXP_OPTIONS: &[char] = &['i', 'm', 'x', 'o', 'u', 'e', 's', 'n'];

/// A `%` literal header: optional type letter and opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PercentHeader {
    letter: Option<char>,
    open: char,
}

impl PercentHeader {
    /// Length of `%`, the letter and the delimiter.
    fn len(self) -> usize {
        1 + self.letter.map_or(0, char::len_utf8) + self.open.len_utf8()
    }
}

const fn closing(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

impl Scanner<'_> {
    /// A quoted literal starting at the current position.
    pub(crate) fn scan_string(
        &mut self,
        quote: char,
        interpolate: bool,
        plain: TokenKind,
        interpolated: TokenKind,
    ) -> Result<TokenKind, Unterminated> {
        let start = self.st.pos;
        self.bump();
        let literal = if quote == '`' {
            Literal::Command
        } else {
            Literal::String
        };
        let found = self.scan_delimited(start, quote, quote, interpolate, literal)?;
        Ok(if found { interpolated } else { plain })
    }

    /// `/.../` followed by option letters.
    pub(crate) fn scan_regexp(&mut self) -> Result<TokenKind, Unterminated> {
        let start = self.st.pos;
        self.bump();
        let found = self.scan_delimited(start, '/', '/', true, Literal::Regexp)?;
        self.eat_while(|c| REGEXP_OPTIONS.contains(&c));
        Ok(if found {
            TokenKind::InterpolatedRegexp
        } else {
            TokenKind::Regexp
        })
    }

    pub(crate) fn percent_literal_ahead(&self) -> Option<PercentHeader> {
        let mut chars = self.rest().chars();
        if chars.next() != Some('%') {
            return None;
        }
        let first = chars.next()?;
        let (letter, open) = if matches!(first, 'q' | 'Q' | 'w' | 'W' | 'i' | 'I' | 'r' | 'x' | 's')
        {
            (Some(first), chars.next()?)
        } else {
            (None, first)
        };
        open.is_ascii_punctuation()
            .then_some(PercentHeader { letter, open })
    }

    /// `%q(...)`, `%w[...]`, `%r{...}` and friends.
    pub(crate) fn scan_percent(&mut self) -> Result<TokenKind, Unterminated> {
        let start = self.st.pos;
        let Some(header) = self.percent_literal_ahead() else {
            return Ok(self.scan_operator());
        };
        self.st.pos += header.len();
        let open = header.open;
        let close = closing(open);

        let kind = match header.letter {
            Some('q') => {
                self.scan_delimited(start, open, close, false, Literal::String)?;
                TokenKind::String
            }
            Some('w' | 'i') => {
                self.scan_delimited(start, open, close, false, Literal::String)?;
                TokenKind::InterpolatedString
            }
            Some('W' | 'I') => {
                self.scan_delimited(start, open, close, true, Literal::String)?;
                TokenKind::InterpolatedString
            }
            Some('s') => {
                self.scan_delimited(start, open, close, false, Literal::Symbol)?;
                TokenKind::Symbol
            }
            Some('r') => {
                let found = self.scan_delimited(start, open, close, true, Literal::Regexp)?;
                self.eat_while(|c| REGEXP_OPTIONS.contains(&c));
                if found {
                    TokenKind::InterpolatedRegexp
                } else {
                    TokenKind::Regexp
                }
            }
            Some('x') => {
                if self.scan_delimited(start, open, close, true, Literal::Command)? {
                    TokenKind::InterpolatedCommand
                } else {
                    TokenKind::Command
                }
            }
            _ => {
                if self.scan_delimited(start, open, close, true, Literal::String)? {
                    TokenKind::InterpolatedString
                } else {
                    TokenKind::String
                }
            }
        };
        Ok(kind)
    }

    /// Consume up to and including the closing delimiter.
    ///
    /// The opening delimiter has already been consumed. Nested pairs
    /// (`%w(a (b) c)`) are balanced. Returns whether an interpolation was
    /// seen.
    pub(crate) fn scan_delimited(
        &mut self,
        start: usize,
        open: char,
        close: char,
        interpolate: bool,
        literal: Literal,
    ) -> Result<bool, Unterminated> {
        let mut depth = 0usize;
        let mut interpolated = false;
        loop {
            let Some(c) = self.bump() else {
                return Err(Unterminated::new(close.to_string(), literal, start));
            };
            match c {
                '\\' => {
                    self.bump();
                }
                c if c == close && depth == 0 => return Ok(interpolated),
                c if c == close => depth -= 1,
                c if c == open => depth += 1,
                '#' if interpolate => match self.peek() {
                    Some('{') => {
                        self.bump();
                        self.skip_interpolation(start, close, literal)?;
                        interpolated = true;
                    }
                    Some('@') => {
                        interpolated |= self
                            .peek_nth(1)
                            .is_some_and(|c| c == '@' || is_ident_start(c));
                    }
                    Some('$') => {
                        interpolated |= self.peek_nth(1).is_some_and(is_ident_start);
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }

    /// Skip the code inside `#{...}`; the `#{` is consumed.
    fn skip_interpolation(
        &mut self,
        start: usize,
        close: char,
        literal: Literal,
    ) -> Result<(), Unterminated> {
        let unterminated = || Unterminated::new(close.to_string(), literal, start);
        let mut inner = LexerState::interpolation(self.st.pos);
        {
            let mut nested = Scanner::new(self.src, &mut inner);
            while let Some(lexeme) = nested.next_lexeme().map_err(|_| unterminated())? {
                // bodies are read by the outer lexer at the end of the line
                if let Lexeme::Heredoc(header) = lexeme {
                    nested.st.heredocs.push(header);
                }
            }
        }
        if self.src[inner.pos..].starts_with('}') {
            self.st.pos = inner.pos + 1;
            self.st.heredocs.append(&mut inner.heredocs);
            Ok(())
        } else {
            Err(unterminated())
        }
    }
}
