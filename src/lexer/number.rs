//! Numeric literals.

use super::ident::is_ident_char;
use super::scanner::Scanner;
use crate::token::TokenKind;

impl Scanner<'_> {
    /// Numeric literal. A leading sign, if any, is already consumed.
    pub(crate) fn scan_number(&mut self) -> TokenKind {
        if self.peek() == Some('0') {
            let radix = match self.peek_nth(1) {
                Some('x' | 'X') => Some(16),
                Some('b' | 'B') => Some(2),
                Some('o' | 'O') => Some(8),
                Some('d' | 'D') => Some(10),
                _ => None,
            };
            if let Some(radix) =
                radix.filter(|&radix| self.peek_nth(2).is_some_and(|c| c.is_digit(radix)))
            {
                self.st.pos += 2;
                self.eat_while(|c| c.is_digit(radix) || c == '_');
                return self.number_suffix(TokenKind::Integer, true);
            }
        }

        let mut kind = TokenKind::Integer;
        self.eat_while(|c| c.is_ascii_digit() || c == '_');

        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
            kind = TokenKind::Float;
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let digits_at = usize::from(matches!(self.peek_nth(1), Some('+' | '-'))) + 1;
            if self.peek_nth(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                self.st.pos += digits_at;
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
                // `1e3r` is not a rational
                return self.number_suffix(TokenKind::Float, false);
            }
        }

        self.number_suffix(kind, true)
    }

    /// `r`, `i` and `ri` suffixes, unless they start a longer word.
    fn number_suffix(&mut self, kind: TokenKind, rational: bool) -> TokenKind {
        let rest = self.rest();
        let (len, suffixed) = if rational && rest.starts_with("ri") {
            (2, TokenKind::Imaginary)
        } else if rational && rest.starts_with('r') {
            (1, TokenKind::Rational)
        } else if rest.starts_with('i') {
            (1, TokenKind::Imaginary)
        } else {
            return kind;
        };
        if rest[len..].chars().next().is_some_and(is_ident_char) {
            return kind;
        }
        self.st.pos += len;
        suffixed
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::scanner::{Lexeme, Scanner};
    use crate::lexer::state::LexerState;
    use crate::token::TokenKind;

    fn number(src: &str) -> (TokenKind, &str) {
        let mut st = LexerState::default();
        match Scanner::new(src, &mut st).next_lexeme() {
            Ok(Some(Lexeme::Token { kind, start, end })) => (kind, &src[start..end]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn integers() {
        assert_eq!(number("42"), (TokenKind::Integer, "42"));
        assert_eq!(number("1_000_000"), (TokenKind::Integer, "1_000_000"));
        assert_eq!(number("0755"), (TokenKind::Integer, "0755"));
    }

    #[test]
    fn prefixed_integers() {
        assert_eq!(number("0xff"), (TokenKind::Integer, "0xff"));
        assert_eq!(number("0b1010"), (TokenKind::Integer, "0b1010"));
        assert_eq!(number("0o17"), (TokenKind::Integer, "0o17"));
        assert_eq!(number("0d99"), (TokenKind::Integer, "0d99"));
        // no digit after the prefix
        assert_eq!(number("0xg"), (TokenKind::Integer, "0"));
    }

    #[test]
    fn floats() {
        assert_eq!(number("1.5"), (TokenKind::Float, "1.5"));
        assert_eq!(number("1e10"), (TokenKind::Float, "1e10"));
        assert_eq!(number("2.5E-3"), (TokenKind::Float, "2.5E-3"));
    }

    #[test]
    fn method_call_on_integer() {
        assert_eq!(number("1.times"), (TokenKind::Integer, "1"));
        assert_eq!(number("1..2"), (TokenKind::Integer, "1"));
    }

    #[test]
    fn suffixes() {
        assert_eq!(number("3r"), (TokenKind::Rational, "3r"));
        assert_eq!(number("1.5ri"), (TokenKind::Imaginary, "1.5ri"));
        assert_eq!(number("2i"), (TokenKind::Imaginary, "2i"));
        assert_eq!(number("1e3i"), (TokenKind::Imaginary, "1e3i"));
        assert_eq!(number("1e3r"), (TokenKind::Float, "1e3"));
        assert_eq!(number("1if"), (TokenKind::Integer, "1"));
    }

    #[test]
    fn signed() {
        assert_eq!(number("-1"), (TokenKind::Integer, "-1"));
        assert_eq!(number("+2.5"), (TokenKind::Float, "+2.5"));
    }
}
