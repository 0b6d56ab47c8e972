//! Core scan loop: classifies the next lexical unit.

use super::heredoc::{self, PendingHeredoc};
use super::ident::{is_ident_char, is_ident_start};
use super::state::LexerState;
use super::{Literal, Unterminated};
use crate::token::TokenKind;

/// One unit read from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lexeme {
    /// A token covering `start..end` of the source.
    Token {
        kind: TokenKind,
        start: usize,
        end: usize,
    },
    /// A `<<TAG` marker whose body is read at the end of the line.
    Heredoc(PendingHeredoc),
}

/// Longest match first.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("**=", TokenKind::OpAssign),
    ("<=>", TokenKind::Cmp),
    ("<<=", TokenKind::OpAssign),
    (">>=", TokenKind::OpAssign),
    ("===", TokenKind::Eqq),
    ("...", TokenKind::Dot3),
    ("&&=", TokenKind::OpAssign),
    ("||=", TokenKind::OpAssign),
    ("**", TokenKind::Pow),
    ("*=", TokenKind::OpAssign),
    ("+=", TokenKind::OpAssign),
    ("-=", TokenKind::OpAssign),
    ("/=", TokenKind::OpAssign),
    ("%=", TokenKind::OpAssign),
    ("&=", TokenKind::OpAssign),
    ("|=", TokenKind::OpAssign),
    ("^=", TokenKind::OpAssign),
    ("->", TokenKind::Lambda),
    ("<<", TokenKind::Lshift),
    (">>", TokenKind::Rshift),
    ("<=", TokenKind::Leq),
    (">=", TokenKind::Geq),
    ("==", TokenKind::Eq),
    ("=~", TokenKind::Match),
    ("=>", TokenKind::HashRocket),
    ("!=", TokenKind::Neq),
    ("!~", TokenKind::NotMatch),
    ("&&", TokenKind::AndOp),
    ("||", TokenKind::OrOp),
    ("&.", TokenKind::SafeNav),
    ("..", TokenKind::Dot2),
    ("*", TokenKind::Star),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("/", TokenKind::Div),
    ("%", TokenKind::Mod),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("=", TokenKind::Assign),
    ("!", TokenKind::Not),
    ("~", TokenKind::Tilde),
    ("&", TokenKind::Amper),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    (".", TokenKind::Dot),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    ("?", TokenKind::Question),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
];

/// A scan over `src` driven by a borrowed [`LexerState`].
pub(crate) struct Scanner<'a> {
    pub(crate) src: &'a str,
    pub(crate) st: &'a mut LexerState,
}

impl<'a> Scanner<'a> {
    pub(crate) const fn new(src: &'a str, st: &'a mut LexerState) -> Self {
        Self { src, st }
    }

    /// Read the next lexeme, or `None` at end of input (or at the
    /// closing brace of an interpolation span).
    pub(crate) fn next_lexeme(&mut self) -> Result<Option<Lexeme>, Unterminated> {
        if self.st.halted {
            return Ok(None);
        }
        let start = self.st.pos;
        let Some(c) = self.peek() else {
            return Ok(None);
        };
        if self.st.interpolation && c == '}' && self.st.brackets.is_empty() {
            return Ok(None);
        }

        let mut state = None;
        let kind = match c {
            '=' if self.at_line_start() && line_is_directive(self.current_line(), "=begin") => {
                self.scan_embedded_doc()?
            }
            '_' if self.at_line_start() && self.at_end_marker() => {
                self.st.pos += "__END__".len();
                self.st.ending = true;
                TokenKind::EndOfScript
            }
            ' ' | '\t' | '\r' | '\x0b' | '\x0c' => self.scan_space(),
            '\u{feff}' if start == 0 => {
                self.bump();
                TokenKind::Space
            }
            '\\' if self.rest().starts_with("\\\n") || self.rest().starts_with("\\\r\n") => {
                self.bump();
                self.eat('\r');
                self.bump();
                TokenKind::Space
            }
            '\n' => {
                self.bump();
                TokenKind::Newline
            }
            '#' => {
                self.eat_while(|c| c != '\n');
                TokenKind::Comment
            }
            '"' => self.scan_string('"', true, TokenKind::String, TokenKind::InterpolatedString)?,
            '\'' => self.scan_string('\'', false, TokenKind::String, TokenKind::String)?,
            '`' if self.st.state.wants_method_name() => {
                self.bump();
                TokenKind::Identifier
            }
            '`' => self.scan_string(
                '`',
                true,
                TokenKind::Command,
                TokenKind::InterpolatedCommand,
            )?,
            '/' if self.st.state.is_begin() => self.scan_regexp()?,
            '%' if self.st.state.is_begin() && self.percent_literal_ahead().is_some() => {
                self.scan_percent()?
            }
            '<' if self.st.state.allows_heredoc(self.st.space_seen) => {
                if let Some(pending) = heredoc::parse_header(self.src, start) {
                    self.st.pos = pending.end;
                    self.st.record(TokenKind::Heredoc, None);
                    return Ok(Some(Lexeme::Heredoc(pending)));
                }
                self.scan_operator()
            }
            '0'..='9' => self.scan_number(),
            '+' | '-' => self.scan_sign(),
            '?' => self.scan_question(),
            ':' => self.scan_colon()?,
            '@' | '$' => self.scan_variable(),
            '[' if self.st.state.wants_method_name() && self.rest().starts_with("[]") => {
                self.st.pos += 2;
                if self.eat('=') {
                    TokenKind::Aset
                } else {
                    TokenKind::Aref
                }
            }
            '!' | '~' if self.st.state.wants_method_name() && self.peek_nth(1) == Some('@') => {
                self.st.pos += 2;
                if c == '!' {
                    TokenKind::Not
                } else {
                    TokenKind::Tilde
                }
            }
            c if is_ident_start(c) => {
                let (kind, next) = self.scan_word();
                state = next;
                kind
            }
            _ => self.scan_operator(),
        };

        self.st.record(kind, state);
        Ok(Some(Lexeme::Token {
            kind,
            start,
            end: self.st.pos,
        }))
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.src[self.st.pos..]
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.st.pos += c.len_utf8();
        Some(c)
    }

    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.st.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        let rest = self.rest();
        let len = rest.find(|c| !pred(c)).unwrap_or(rest.len());
        self.st.pos += len;
    }

    fn at_line_start(&self) -> bool {
        self.st.pos == 0 || self.src.as_bytes()[self.st.pos - 1] == b'\n'
    }

    /// The rest of the current line, without its line break.
    fn current_line(&self) -> &'a str {
        let rest = self.rest();
        let end = memchr::memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len());
        let line = &rest[..end];
        line.strip_suffix('\r').unwrap_or(line)
    }

    fn at_end_marker(&self) -> bool {
        self.current_line() == "__END__"
    }

    fn scan_space(&mut self) -> TokenKind {
        self.eat_while(|c| matches!(c, ' ' | '\t' | '\r' | '\x0b' | '\x0c'));
        TokenKind::Space
    }

    /// `=begin` through the matching `=end` line.
    fn scan_embedded_doc(&mut self) -> Result<TokenKind, Unterminated> {
        let start = self.st.pos;
        let bytes = self.src.as_bytes();
        let mut line_start = start;
        loop {
            let line_end = memchr::memchr(b'\n', &bytes[line_start..])
                .map_or(self.src.len(), |i| line_start + i);
            let line = &self.src[line_start..line_end];
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line_start != start && line_is_directive(line, "=end") {
                self.st.pos = line_start + line.len();
                return Ok(TokenKind::EmbeddedDoc);
            }
            if line_end >= self.src.len() {
                return Err(Unterminated::new("=end", Literal::EmbeddedDoc, start));
            }
            line_start = line_end + 1;
        }
    }

    /// `+`/`-`: a sign fused into a number, a unary operator, or binary.
    fn scan_sign(&mut self) -> TokenKind {
        let c = self.peek();
        let next = self.peek_nth(1);
        if c == Some('-') && next == Some('>') {
            return self.scan_operator();
        }
        if self.st.state.wants_method_name() && next == Some('@') {
            self.st.pos += 2;
            return unary(c);
        }
        if self.st.state.is_begin() {
            if next.is_some_and(|d| d.is_ascii_digit()) {
                self.bump();
                return self.scan_number();
            }
            if next != Some('=') {
                self.bump();
                return unary(c);
            }
        }
        self.scan_operator()
    }

    /// `?`: a character literal where an expression may start, else the
    /// ternary operator.
    fn scan_question(&mut self) -> TokenKind {
        let literal_allowed = self.st.state.starts_argument(self.st.space_seen);
        match self.peek_nth(1) {
            Some('\\') if literal_allowed => {
                self.st.pos += 2;
                self.skip_escape();
                TokenKind::Character
            }
            Some(next) if literal_allowed && !next.is_whitespace() => {
                let word_follows = is_ident_char(next) && self.peek_nth(2).is_some_and(is_ident_char);
                self.bump();
                if word_follows {
                    TokenKind::Question
                } else {
                    self.bump();
                    TokenKind::Character
                }
            }
            _ => {
                self.bump();
                TokenKind::Question
            }
        }
    }

    /// Skip the body of a backslash escape; the backslash is consumed.
    pub(crate) fn skip_escape(&mut self) {
        loop {
            let rest = self.rest();
            let prefix = if rest.starts_with("C-") || rest.starts_with("M-") {
                2
            } else if rest.starts_with('c') {
                1
            } else {
                break;
            };
            self.st.pos += prefix;
            if !self.eat('\\') {
                if self.peek().is_some_and(|c| c != '\n') {
                    self.bump();
                }
                return;
            }
        }

        match self.peek() {
            None | Some('\n') => {}
            Some('u') => {
                self.bump();
                if self.eat('{') {
                    self.eat_while(|c| c != '}' && c != '\n');
                    self.eat('}');
                } else {
                    self.eat_limited(4, |c| c.is_ascii_hexdigit());
                }
            }
            Some('x') => {
                self.bump();
                self.eat_limited(2, |c| c.is_ascii_hexdigit());
            }
            Some('0'..='7') => self.eat_limited(3, |c| matches!(c, '0'..='7')),
            Some(_) => {
                self.bump();
            }
        }
    }

    fn eat_limited(&mut self, max: usize, pred: impl Fn(char) -> bool) {
        for _ in 0..max {
            match self.peek() {
                Some(c) if pred(c) => {
                    self.bump();
                }
                _ => break,
            }
        }
    }

    pub(crate) fn scan_operator(&mut self) -> TokenKind {
        let rest = self.rest();
        for (op, kind) in OPERATORS {
            if rest.starts_with(op) {
                self.st.pos += op.len();
                return *kind;
            }
        }
        self.bump();
        TokenKind::Unknown
    }
}

const fn unary(sign: Option<char>) -> TokenKind {
    match sign {
        Some('+') => TokenKind::UPlus,
        _ => TokenKind::UMinus,
    }
}

/// `line` starts with `word` followed by whitespace or nothing.
fn line_is_directive(line: &str, word: &str) -> bool {
    line.strip_prefix(word)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}
