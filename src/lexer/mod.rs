//! Context-sensitive Ruby tokenizer.
//!
//! [`Lexer`] produces tokens one at a time. Tokens on a line that opens
//! here-documents are held back until the line ends, then emitted with
//! the heredoc bodies spliced in, so offsets stay monotone even though
//! the bodies sit on later source lines.

mod heredoc;
mod ident;
mod literal;
mod number;
mod scanner;
mod state;

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;

use crate::position::LineIndex;
use crate::token::{Span, Token, TokenKind};

use heredoc::PendingHeredoc;
use scanner::{Lexeme, Scanner};
use state::LexerState;

/// The kind of literal an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literal {
    /// Quoted and percent strings, word lists and here-documents.
    String,
    Regexp,
    Symbol,
    Command,
    /// `=begin` ... `=end`
    EmbeddedDoc,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Regexp => "regexp",
            Self::Symbol => "symbol",
            Self::Command => "command",
            Self::EmbeddedDoc => "embedded document",
        })
    }
}

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A literal ran to end of input without its terminator.
    UnterminatedLiteral {
        /// Expected closing delimiter or heredoc tag.
        tag: String,
        literal: Literal,
    },
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedLiteral { tag, literal } => {
                write!(f, "Missing terminating {tag} for {literal}")
            }
        }
    }
}

/// Error produced during lexing. Lexing stops at the first error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Label passed to [`Lexer::new`], usually a file name.
    pub origin: Option<String>,
    /// Where the unterminated literal starts.
    pub span: Span,
}

impl LexError {
    /// The expected terminator.
    #[must_use]
    pub fn tag(&self) -> &str {
        match &self.kind {
            LexErrorKind::UnterminatedLiteral { tag, .. } => tag,
        }
    }

    /// The error prefixed with `origin:line:column:`.
    #[must_use]
    pub fn report(&self) -> String {
        format!(
            "{}:{}:{}: {self}",
            self.origin.as_deref().unwrap_or("-"),
            self.span.line,
            self.span.column
        )
    }
}

/// An unterminated literal found by the scanner, before positions are
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unterminated {
    pub(crate) tag: String,
    pub(crate) literal: Literal,
    pub(crate) start: usize,
}

impl Unterminated {
    pub(crate) fn new(tag: impl Into<String>, literal: Literal, start: usize) -> Self {
        Self {
            tag: tag.into(),
            literal,
            start,
        }
    }
}

/// An item waiting for the heredoc bodies of its line.
#[derive(Debug, Clone, Copy)]
enum Held {
    Token {
        kind: TokenKind,
        start: usize,
        end: usize,
    },
    /// Index into the pending heredoc queue.
    Heredoc(usize),
    /// Body of a pending heredoc whose header is inside the previous
    /// token (`"#{<<A}"`).
    Body(usize),
}

/// Tokenize a whole source.
///
/// `origin` labels errors (usually the file name).
///
/// # Errors
///
/// Returns `LexError` when a string, regexp, symbol, command, heredoc or
/// embedded document is not terminated.
pub fn tokenize(source: &str, origin: Option<&str>) -> Result<Vec<Token>, LexError> {
    Lexer::new(source, origin).collect()
}

/// A pull-based tokenizer over one source.
///
/// ```
/// use rubylex_rs::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("a[-2]", None);
/// lexer.next_token().unwrap();
/// lexer.next_token().unwrap();
/// let token = lexer.next_token().unwrap().unwrap();
/// assert_eq!(token.kind, TokenKind::Integer);
/// assert_eq!(token.text, "-2");
/// ```
#[derive(Debug)]
pub struct Lexer<'a> {
    source: Cow<'a, str>,
    origin: Option<String>,
    lines: LineIndex,
    scan: LexerState,
    pending: Vec<PendingHeredoc>,
    held: Vec<Held>,
    ready: VecDeque<Token>,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// A lexer over `source`. A non-empty source without a trailing
    /// newline is read as if it had one.
    #[must_use]
    pub fn new(source: &'a str, origin: Option<&str>) -> Self {
        let source = if source.is_empty() || source.ends_with('\n') {
            Cow::Borrowed(source)
        } else {
            Cow::Owned(format!("{source}\n"))
        };
        let lines = LineIndex::new(&source);
        Self {
            source,
            origin: origin.map(str::to_owned),
            lines,
            scan: LexerState::default(),
            pending: Vec::new(),
            held: Vec::new(),
            ready: VecDeque::new(),
            done: false,
        }
    }

    /// The source being scanned, including any appended newline.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The next token, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `LexError` on an unterminated literal. Every later call
    /// returns `Ok(None)`.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            if let Some(token) = self.ready.pop_front() {
                return Ok(Some(token));
            }
            if self.done {
                return Ok(None);
            }

            let scanned = Scanner::new(&self.source, &mut self.scan).next_lexeme();
            let lexeme = match scanned {
                Ok(lexeme) => lexeme,
                Err(err) => return Err(self.fail(err.tag, err.literal, err.start)),
            };

            match lexeme {
                None => {
                    self.done = true;
                    if let Some(header) = self.pending.first() {
                        let (tag, start) = (header.tag.clone(), header.start);
                        return Err(self.fail(tag, Literal::String, start));
                    }
                }
                Some(Lexeme::Heredoc(header)) => {
                    self.held.push(Held::Heredoc(self.pending.len()));
                    self.pending.push(header);
                }
                Some(Lexeme::Token { kind, start, end }) => {
                    let nested = std::mem::take(&mut self.scan.heredocs);
                    if self.pending.is_empty() && nested.is_empty() {
                        let text = self.source[start..end].to_owned();
                        let token = self.make_token(kind, text, start);
                        self.ready.push_back(token);
                        continue;
                    }
                    self.held.push(Held::Token { kind, start, end });
                    for header in nested {
                        self.held.push(Held::Body(self.pending.len()));
                        self.pending.push(header);
                    }
                    if kind == TokenKind::Newline {
                        self.resolve_heredocs(end)?;
                    }
                }
            }
        }
    }

    /// Read the bodies of every pending heredoc, starting at `body_start`,
    /// and emit the held line with offsets counted through the bodies.
    fn resolve_heredocs(&mut self, body_start: usize) -> Result<(), LexError> {
        let pending = std::mem::take(&mut self.pending);
        let held = std::mem::take(&mut self.held);

        let mut bodies = Vec::with_capacity(pending.len());
        let mut from = body_start;
        for header in &pending {
            let Some(body) = heredoc::read_body(&self.source, from, header) else {
                return Err(self.fail(header.tag.clone(), Literal::String, header.start));
            };
            from = body.end + 1;
            bodies.push(body);
        }
        log::debug!(
            "resolved {} heredoc(s), resuming at offset {from}",
            pending.len()
        );

        let mut cursor = match held.first() {
            Some(Held::Token { start, .. }) => *start,
            Some(Held::Heredoc(index) | Held::Body(index)) => pending[*index].start,
            None => body_start,
        };
        let mut items = held.iter().peekable();
        while let Some(item) = items.next() {
            match *item {
                Held::Token { kind, start, end } => {
                    let text = self.source[start..end].to_owned();
                    let token = self.make_token(kind, text, cursor);
                    self.ready.push_back(token);
                    cursor += end - start;
                }
                Held::Heredoc(index) => {
                    let (header, body) = (&pending[index], &bodies[index]);
                    let called = matches!(
                        items.peek(),
                        Some(Held::Token {
                            kind: TokenKind::Dot | TokenKind::SafeNav,
                            start,
                            ..
                        }) if *start == header.end
                    );
                    let token = if called && body.is_plain(header) {
                        log::debug!("folding heredoc {} into a string", header.tag);
                        self.make_token(TokenKind::String, body.folded(header.indent), cursor)
                    } else {
                        let text = body.verbatim(header.marker(&self.source));
                        self.make_token(TokenKind::Heredoc, text, cursor)
                    };
                    self.ready.push_back(token);
                    cursor += body.consumed(header);
                }
                Held::Body(index) => {
                    let body = &bodies[index];
                    let token = self.make_token(TokenKind::Heredoc, body.verbatim(""), cursor);
                    self.ready.push_back(token);
                    cursor += body.moved_len();
                }
            }
        }

        self.scan.pos = from.min(self.source.len());
        Ok(())
    }

    fn make_token(&self, kind: TokenKind, text: String, offset: usize) -> Token {
        let span = self.lines.span(offset);
        log::trace!("{kind:?} {text:?} at {}:{}", span.line, span.column);
        Token {
            kind,
            text,
            span,
        }
    }

    fn fail(&mut self, tag: String, literal: Literal, offset: usize) -> LexError {
        self.done = true;
        let err = LexError {
            kind: LexErrorKind::UnterminatedLiteral { tag, literal },
            origin: self.origin.clone(),
            span: self.lines.span(offset),
        };
        log::debug!("{}", err.report());
        err
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(src: &str) -> Vec<(TokenKind, String, usize)> {
        tokenize(src, None)
            .expect("should tokenize")
            .into_iter()
            .map(|t| (t.kind, t.text, t.span.offset))
            .collect()
    }

    #[test]
    fn empty_source() {
        assert!(tokenize("", None).expect("should tokenize").is_empty());
    }

    #[test]
    fn trailing_newline_is_added_once() {
        assert_eq!(lex("x").len(), 2);
        assert_eq!(lex("x\n").len(), 2);
    }

    #[test]
    fn heredoc_line_is_held() {
        assert_eq!(
            lex("f <<A, 1\nbody\nA\nx\n"),
            vec![
                (TokenKind::Identifier, "f".into(), 0),
                (TokenKind::Space, " ".into(), 1),
                (TokenKind::Heredoc, "<<A\nbody\nA".into(), 2),
                (TokenKind::Comma, ",".into(), 12),
                (TokenKind::Space, " ".into(), 13),
                (TokenKind::Integer, "1".into(), 14),
                (TokenKind::Newline, "\n".into(), 15),
                (TokenKind::Identifier, "x".into(), 16),
                (TokenKind::Newline, "\n".into(), 17),
            ]
        );
    }

    #[test]
    fn heredoc_body_follows_the_interpolating_token() {
        assert_eq!(
            lex("x = \"#{<<A}\"\nbody\nA\ny\n"),
            vec![
                (TokenKind::Identifier, "x".into(), 0),
                (TokenKind::Space, " ".into(), 1),
                (TokenKind::Assign, "=".into(), 2),
                (TokenKind::Space, " ".into(), 3),
                (TokenKind::InterpolatedString, "\"#{<<A}\"".into(), 4),
                (TokenKind::Heredoc, "\nbody\nA".into(), 12),
                (TokenKind::Newline, "\n".into(), 19),
                (TokenKind::Identifier, "y".into(), 20),
                (TokenKind::Newline, "\n".into(), 21),
            ]
        );
    }

    #[test]
    fn errors_stop_the_lexer() {
        let mut lexer = Lexer::new("x = \"open", Some("a.rb"));
        let mut tokens = 0;
        let err = loop {
            match lexer.next_token() {
                Ok(Some(_)) => tokens += 1,
                Ok(None) => panic!("expected an error"),
                Err(err) => break err,
            }
        };
        assert_eq!(tokens, 4);
        assert_eq!(err.to_string(), "Missing terminating \" for string");
        assert_eq!(err.report(), "a.rb:1:4: Missing terminating \" for string");
        assert_eq!(lexer.next_token(), Ok(None));
    }

    #[test]
    fn error_tag() {
        let err = tokenize("<<-TXT\nno end\n", None).unwrap_err();
        assert_eq!(err.tag(), "TXT");
        assert_eq!(err.span.offset, 0);
    }
}
