//! Disambiguation state threaded through the scan loop.

use super::heredoc::PendingHeredoc;
use crate::token::{Keyword, TokenKind};

/// What the previous significant token allows next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum LexState {
    /// An expression may start here: start of input, after an operator,
    /// keyword, opening bracket, comma, assignment or newline.
    #[default]
    Begin,
    /// After `class`: like [`LexState::Begin`], except that `<<` is an
    /// operator (`class <<self`).
    ClassName,
    /// After a complete value: literal, constant, closing bracket.
    End,
    /// After an identifier. Reads like [`LexState::End`], except that a
    /// whitespace-separated `<<TAG`, `?c` or `::Name` starts a command
    /// argument.
    Argument,
    /// After `def`, `alias` or `undef`: operators and setters are names.
    MethodDef,
    /// After `.`, `&.` or `::`: keywords are plain method names.
    MethodCall,
}

impl LexState {
    /// The expression-begin flag.
    pub(crate) const fn is_begin(self) -> bool {
        matches!(self, Self::Begin | Self::ClassName)
    }

    pub(crate) const fn wants_method_name(self) -> bool {
        matches!(self, Self::MethodDef | Self::MethodCall)
    }

    /// Whether an expression may start after whitespace, as the first
    /// argument of a command call (`puts <<EOS`).
    pub(crate) const fn starts_argument(self, space_seen: bool) -> bool {
        match self {
            Self::Begin | Self::ClassName => true,
            Self::Argument => space_seen,
            Self::End | Self::MethodDef | Self::MethodCall => false,
        }
    }

    /// Whether `<<` may open a here-document.
    pub(crate) const fn allows_heredoc(self, space_seen: bool) -> bool {
        !matches!(self, Self::ClassName) && self.starts_argument(space_seen)
    }

    /// State after emitting a token of `kind`.
    pub(crate) const fn after(self, kind: TokenKind) -> Self {
        use TokenKind as K;

        if kind.is_trivia() {
            return self;
        }
        if matches!(self, Self::MethodDef) {
            // `def self.name`, `def +(other)`
            return match kind {
                K::Dot | K::SafeNav => Self::MethodDef,
                K::Newline | K::Semicolon => Self::Begin,
                _ => Self::End,
            };
        }
        match kind {
            K::Keyword(keyword) => after_keyword(keyword),
            K::Identifier | K::MethodIdentifier => Self::Argument,
            K::Dot | K::SafeNav | K::Colon2 => Self::MethodCall,
            K::Constant
            | K::InstanceVariable
            | K::ClassVariable
            | K::GlobalVariable
            | K::NthRef
            | K::BackRef
            | K::Integer
            | K::Float
            | K::Rational
            | K::Imaginary
            | K::Character
            | K::String
            | K::InterpolatedString
            | K::Command
            | K::InterpolatedCommand
            | K::Regexp
            | K::InterpolatedRegexp
            | K::Symbol
            | K::InterpolatedSymbol
            | K::Heredoc
            | K::Aref
            | K::Aset
            | K::RParen
            | K::RBracket
            | K::RBrace
            | K::Unknown => Self::End,
            _ => Self::Begin,
        }
    }
}

const fn after_keyword(keyword: Keyword) -> LexState {
    match keyword {
        Keyword::Def | Keyword::Alias | Keyword::Undef => LexState::MethodDef,
        Keyword::Class => LexState::ClassName,
        Keyword::End
        | Keyword::SelfValue
        | Keyword::Nil
        | Keyword::True
        | Keyword::False
        | Keyword::Redo
        | Keyword::Retry
        | Keyword::File
        | Keyword::Line
        | Keyword::Encoding => LexState::End,
        Keyword::Defined | Keyword::Super | Keyword::Yield => LexState::Argument,
        _ => LexState::Begin,
    }
}

/// Kind of an open bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bracket {
    Paren,
    Square,
    Brace,
}

impl Bracket {
    pub(crate) const fn opened_by(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::LParen => Some(Self::Paren),
            TokenKind::LBracket => Some(Self::Square),
            TokenKind::LBrace => Some(Self::Brace),
            _ => None,
        }
    }

    pub(crate) const fn closed_by(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::RParen => Some(Self::Paren),
            TokenKind::RBracket => Some(Self::Square),
            TokenKind::RBrace => Some(Self::Brace),
            _ => None,
        }
    }
}

/// Scanner state owned by one scan.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default)]
pub(crate) struct LexerState {
    /// Byte position of the next unread character.
    pub(crate) pos: usize,
    pub(crate) state: LexState,
    /// Whitespace or a comment came after the last significant token.
    pub(crate) space_seen: bool,
    pub(crate) brackets: Vec<Bracket>,
    /// Scanning the inside of a `#{...}` span; an unmatched `}` ends it.
    pub(crate) interpolation: bool,
    /// Heredoc headers found inside interpolations of the last token.
    pub(crate) heredocs: Vec<PendingHeredoc>,
    /// `__END__` was seen; stop after its newline.
    pub(crate) ending: bool,
    pub(crate) halted: bool,
}

impl LexerState {
    pub(crate) fn interpolation(pos: usize) -> Self {
        Self {
            pos,
            interpolation: true,
            ..Self::default()
        }
    }

    /// Update the flags after a token of `kind`.
    pub(crate) fn record(&mut self, kind: TokenKind, state: Option<LexState>) {
        if kind.is_trivia() {
            self.space_seen = true;
            return;
        }
        self.space_seen = false;
        self.state = state.unwrap_or_else(|| self.state.after(kind));

        if let Some(bracket) = Bracket::opened_by(kind) {
            self.brackets.push(bracket);
        } else if let Some(bracket) = Bracket::closed_by(kind) {
            if self.brackets.last() == Some(&bracket) {
                self.brackets.pop();
            }
        }

        if self.ending && kind == TokenKind::Newline {
            self.halted = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_begin_expressions() {
        assert_eq!(LexState::End.after(TokenKind::Plus), LexState::Begin);
        assert_eq!(LexState::End.after(TokenKind::LBracket), LexState::Begin);
        assert_eq!(LexState::End.after(TokenKind::Comma), LexState::Begin);
        assert_eq!(LexState::End.after(TokenKind::Dot2), LexState::Begin);
    }

    #[test]
    fn values_end_expressions() {
        assert_eq!(LexState::Begin.after(TokenKind::Integer), LexState::End);
        assert_eq!(LexState::Begin.after(TokenKind::RBracket), LexState::End);
        assert_eq!(
            LexState::Begin.after(TokenKind::Identifier),
            LexState::Argument
        );
    }

    #[test]
    fn trivia_keeps_state() {
        assert_eq!(LexState::End.after(TokenKind::Space), LexState::End);
        assert_eq!(LexState::Begin.after(TokenKind::Comment), LexState::Begin);
    }

    #[test]
    fn def_expects_a_method_name() {
        let state = LexState::Begin.after(TokenKind::Keyword(Keyword::Def));
        assert_eq!(state, LexState::MethodDef);
        assert_eq!(state.after(TokenKind::Dot), LexState::MethodDef);
        assert_eq!(state.after(TokenKind::Plus), LexState::End);
    }

    #[test]
    fn value_keywords_end_expressions() {
        assert_eq!(
            LexState::Begin.after(TokenKind::Keyword(Keyword::Nil)),
            LexState::End
        );
        assert_eq!(
            LexState::End.after(TokenKind::Keyword(Keyword::IfModifier)),
            LexState::Begin
        );
    }

    #[test]
    fn class_keyword_suppresses_heredocs() {
        let state = LexState::Begin.after(TokenKind::Keyword(Keyword::Class));
        assert_eq!(state, LexState::ClassName);
        assert!(state.is_begin());
        assert!(!state.allows_heredoc(true));
        assert!(LexState::Begin.allows_heredoc(false));
        assert!(LexState::Argument.allows_heredoc(true));
    }

    #[test]
    fn brackets_are_tracked() {
        let mut st = LexerState::default();
        st.record(TokenKind::LBrace, None);
        st.record(TokenKind::LParen, None);
        assert_eq!(st.brackets, vec![Bracket::Brace, Bracket::Paren]);
        st.record(TokenKind::RParen, None);
        st.record(TokenKind::RBrace, None);
        assert!(st.brackets.is_empty());
        assert_eq!(st.state, LexState::End);
    }

    #[test]
    fn end_of_script_halts_after_newline() {
        let mut st = LexerState::default();
        st.ending = true;
        st.record(TokenKind::EndOfScript, None);
        assert!(!st.halted);
        st.record(TokenKind::Newline, None);
        assert!(st.halted);
    }
}
