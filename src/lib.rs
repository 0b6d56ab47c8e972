//! Position-exact Ruby lexer.
//!
//! Splits Ruby source into tokens that carry their exact text, byte
//! offset, line and column, for tools that re-render or cross-reference
//! source code, such as documentation generators.
//!
//! # Quick start
//!
//! ## Tokenize a source string
//!
//! ```
//! use rubylex_rs::{tokenize, Keyword, TokenKind};
//!
//! let tokens = tokenize("def x() end", None).unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Def));
//! assert_eq!(tokens[2].text, "x");
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::Newline);
//! ```
//!
//! ## Here-documents
//!
//! The heredoc body is part of the marker token, and the rest of the
//! header line follows it with offsets counted past the body.
//!
//! ```
//! use rubylex_rs::{tokenize, TokenKind};
//!
//! let tokens = tokenize("x = <<EOS\nhello\nEOS\n", None).unwrap();
//! let heredoc = &tokens[4];
//! assert_eq!(heredoc.kind, TokenKind::Heredoc);
//! assert_eq!(heredoc.text, "<<EOS\nhello\nEOS");
//! assert_eq!(tokens[5].span.offset, 19);
//! ```
//!
//! ## Errors
//!
//! ```
//! use rubylex_rs::tokenize;
//!
//! let err = tokenize("puts 'oops", Some("demo.rb")).unwrap_err();
//! assert_eq!(err.to_string(), "Missing terminating ' for string");
//! assert_eq!(err.report(), "demo.rb:1:5: Missing terminating ' for string");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod lexer;
pub mod position;
pub mod token;

pub use lexer::{LexError, LexErrorKind, Lexer, Literal, tokenize};
pub use position::LineIndex;
pub use token::{Keyword, Span, Token, TokenKind};
