/// Source location of a token.
///
/// `line` and `column` are derived from `offset`; see
/// [`LineIndex`](crate::position::LineIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset into the source.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 0-based byte column on that line.
    pub column: usize,
}

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `BEGIN`
    UpperBegin,
    /// `END`
    UpperEnd,
    Alias,
    And,
    Begin,
    Break,
    Case,
    Class,
    Def,
    /// `defined?`
    Defined,
    Do,
    Else,
    Elsif,
    End,
    Ensure,
    False,
    For,
    If,
    /// `if` after a complete expression (`x if y`).
    IfModifier,
    In,
    Module,
    Next,
    Nil,
    Not,
    Or,
    Redo,
    Rescue,
    /// `rescue` after a complete expression.
    RescueModifier,
    Retry,
    Return,
    SelfValue,
    Super,
    Then,
    True,
    Undef,
    Unless,
    /// `unless` after a complete expression.
    UnlessModifier,
    Until,
    /// `until` after a complete expression.
    UntilModifier,
    When,
    While,
    /// `while` after a complete expression.
    WhileModifier,
    Yield,
    /// `__FILE__`
    File,
    /// `__LINE__`
    Line,
    /// `__ENCODING__`
    Encoding,
}

impl Keyword {
    /// Look up a keyword by its source spelling.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "BEGIN" => Self::UpperBegin,
            "END" => Self::UpperEnd,
            "alias" => Self::Alias,
            "and" => Self::And,
            "begin" => Self::Begin,
            "break" => Self::Break,
            "case" => Self::Case,
            "class" => Self::Class,
            "def" => Self::Def,
            "defined?" => Self::Defined,
            "do" => Self::Do,
            "else" => Self::Else,
            "elsif" => Self::Elsif,
            "end" => Self::End,
            "ensure" => Self::Ensure,
            "false" => Self::False,
            "for" => Self::For,
            "if" => Self::If,
            "in" => Self::In,
            "module" => Self::Module,
            "next" => Self::Next,
            "nil" => Self::Nil,
            "not" => Self::Not,
            "or" => Self::Or,
            "redo" => Self::Redo,
            "rescue" => Self::Rescue,
            "retry" => Self::Retry,
            "return" => Self::Return,
            "self" => Self::SelfValue,
            "super" => Self::Super,
            "then" => Self::Then,
            "true" => Self::True,
            "undef" => Self::Undef,
            "unless" => Self::Unless,
            "until" => Self::Until,
            "when" => Self::When,
            "while" => Self::While,
            "yield" => Self::Yield,
            "__FILE__" => Self::File,
            "__LINE__" => Self::Line,
            "__ENCODING__" => Self::Encoding,
            _ => return None,
        };
        Some(keyword)
    }

    /// The modifier form of `if`, `unless`, `while`, `until` and
    /// `rescue`; every other keyword is returned unchanged.
    #[must_use]
    pub const fn modifier(self) -> Self {
        match self {
            Self::If => Self::IfModifier,
            Self::Unless => Self::UnlessModifier,
            Self::While => Self::WhileModifier,
            Self::Until => Self::UntilModifier,
            Self::Rescue => Self::RescueModifier,
            other => other,
        }
    }

    /// Source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpperBegin => "BEGIN",
            Self::UpperEnd => "END",
            Self::Alias => "alias",
            Self::And => "and",
            Self::Begin => "begin",
            Self::Break => "break",
            Self::Case => "case",
            Self::Class => "class",
            Self::Def => "def",
            Self::Defined => "defined?",
            Self::Do => "do",
            Self::Else => "else",
            Self::Elsif => "elsif",
            Self::End => "end",
            Self::Ensure => "ensure",
            Self::False => "false",
            Self::For => "for",
            Self::If | Self::IfModifier => "if",
            Self::In => "in",
            Self::Module => "module",
            Self::Next => "next",
            Self::Nil => "nil",
            Self::Not => "not",
            Self::Or => "or",
            Self::Redo => "redo",
            Self::Rescue | Self::RescueModifier => "rescue",
            Self::Retry => "retry",
            Self::Return => "return",
            Self::SelfValue => "self",
            Self::Super => "super",
            Self::Then => "then",
            Self::True => "true",
            Self::Undef => "undef",
            Self::Unless | Self::UnlessModifier => "unless",
            Self::Until | Self::UntilModifier => "until",
            Self::When => "when",
            Self::While | Self::WhileModifier => "while",
            Self::Yield => "yield",
            Self::File => "__FILE__",
            Self::Line => "__LINE__",
            Self::Encoding => "__ENCODING__",
        }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved word.
    Keyword(Keyword),

    /// Local name or method call (`foo`).
    Identifier,
    /// Method name ending in `?` or `!`.
    MethodIdentifier,
    /// Name starting with an uppercase letter.
    Constant,
    /// `@name`
    InstanceVariable,
    /// `@@name`
    ClassVariable,
    /// `$name` and special globals like `$!`.
    GlobalVariable,
    /// `$1`, `$2`, ...
    NthRef,
    /// `$&`, `` $` ``, `$'`, `$+`
    BackRef,

    Integer,
    Float,
    /// Numeric literal with an `r` suffix.
    Rational,
    /// Numeric literal with an `i` or `ri` suffix.
    Imaginary,
    /// Character literal (`?a`).
    Character,

    /// String without interpolation (`'a'`, `"a"`, `%q(a)`).
    String,
    /// String containing `#{...}`, and word lists (`%w[a b]`).
    InterpolatedString,
    /// Backtick command (`` `ls` ``, `%x(ls)`).
    Command,
    InterpolatedCommand,
    Regexp,
    InterpolatedRegexp,
    /// `:name`, `:"name"`, `:+`
    Symbol,
    InterpolatedSymbol,
    /// Here-document, header through terminator.
    Heredoc,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// Unary `+` (also the `+@` method name).
    UPlus,
    /// Unary `-` (also the `-@` method name).
    UMinus,
    /// `*`
    Star,
    /// `**`
    Pow,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Leq,
    /// `>=`
    Geq,
    /// `<=>`
    Cmp,
    /// `==`
    Eq,
    /// `===`
    Eqq,
    /// `!=`
    Neq,
    /// `=~`
    Match,
    /// `!~`
    NotMatch,
    /// `!`
    Not,
    /// `~`
    Tilde,
    /// `&&`
    AndOp,
    /// `||`
    OrOp,
    /// `&`
    Amper,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `<<`
    Lshift,
    /// `>>`
    Rshift,
    /// `=`
    Assign,
    /// Compound assignment (`+=`, `||=`, ...).
    OpAssign,
    /// `=>`
    HashRocket,
    /// `->`
    Lambda,
    /// `[]` as a method name.
    Aref,
    /// `[]=` as a method name.
    Aset,
    /// `.`
    Dot,
    /// `&.`
    SafeNav,
    /// `..`
    Dot2,
    /// `...`
    Dot3,
    /// `:`
    Colon,
    /// `::` after an expression (`Foo::Bar`).
    Colon2,
    /// `::` starting an expression (`::Foo`).
    Colon3,
    /// `?`
    Question,
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    /// Horizontal whitespace, including a `\r` before a newline.
    Space,
    Newline,
    /// `# ...` up to the end of the line.
    Comment,
    /// `=begin` ... `=end` block.
    EmbeddedDoc,
    /// `__END__` on a line of its own.
    EndOfScript,
    /// A character that cannot start any token.
    Unknown,
}

impl TokenKind {
    /// Tokens that never change how the next token is read.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Space | Self::Comment | Self::EmbeddedDoc)
    }

    #[must_use]
    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Minus
                | Self::UPlus
                | Self::UMinus
                | Self::Star
                | Self::Pow
                | Self::Div
                | Self::Mod
                | Self::Lt
                | Self::Gt
                | Self::Leq
                | Self::Geq
                | Self::Cmp
                | Self::Eq
                | Self::Eqq
                | Self::Neq
                | Self::Match
                | Self::NotMatch
                | Self::Not
                | Self::Tilde
                | Self::AndOp
                | Self::OrOp
                | Self::Amper
                | Self::Pipe
                | Self::Caret
                | Self::Lshift
                | Self::Rshift
                | Self::Assign
                | Self::OpAssign
                | Self::HashRocket
                | Self::Lambda
                | Self::Dot
                | Self::SafeNav
                | Self::Dot2
                | Self::Dot3
                | Self::Colon
                | Self::Colon2
                | Self::Colon3
                | Self::Question
        )
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        offset: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span: Span {
                offset,
                line,
                column,
            },
        }
    }
}
