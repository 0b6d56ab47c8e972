//! Property-based tests with proptest.
//!
//! Generate random expression lines, tokenize them, and check that the
//! token stream reassembles the source, re-lexes to the same stream and
//! carries positions consistent with the source.

mod common;

use common::rebuild;
use proptest::prelude::*;
use rubylex_rs::{Keyword, LineIndex, Lexer, tokenize};

// -- Leaf strategies --

/// Lowercase name that is not a keyword.
fn name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,8}".prop_filter("keyword", |s| Keyword::from_word(s).is_none())
}

fn number() -> impl Strategy<Value = String> {
    prop_oneof![
        "[1-9][0-9]{0,6}",
        "[0-9]{1,3}\\.[0-9]{1,3}",
        "0x[0-9a-f]{1,4}",
        "[1-9][0-9]{0,2}r",
    ]
}

fn string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,10}".prop_map(|s| format!("'{s}'")),
        "[a-z ]{0,10}".prop_map(|s| format!("\"{s}\"")),
        ("[a-z]{0,5}", name()).prop_map(|(s, n)| format!("\"{s}#{{{n}}}\"")),
    ]
}

/// Something that completes an expression.
fn operand() -> impl Strategy<Value = String> {
    prop_oneof![
        name(),
        number(),
        string(),
        name().prop_map(|n| format!(":{n}")),
        name().prop_map(|n| format!("@{n}")),
        "[A-Z][a-z]{0,6}",
        name().prop_map(|n| format!("[{n}]")),
        (name(), name()).prop_map(|(a, b)| format!("{a}.{b}")),
    ]
}

fn binary_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        " + ", " - ", " * ", " / ", " % ", " ** ", " == ", " != ", " <=> ", " && ", " || ", " < ",
        " >= ", " =~ ", " << ",
    ])
}

fn expression() -> impl Strategy<Value = String> {
    (operand(), prop::collection::vec((binary_op(), operand()), 0..5)).prop_map(|(head, tail)| {
        let mut out = head;
        for (op, rhs) in tail {
            out.push_str(op);
            out.push_str(&rhs);
        }
        out
    })
}

/// A few lines of assignments and comments.
fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            (name(), expression()).prop_map(|(n, e)| format!("{n} = {e}\n")),
            expression().prop_map(|e| format!("{e} # note\n")),
            expression().prop_map(|e| format!("  {e}\n")),
        ],
        1..6,
    )
    .prop_map(|lines| lines.concat())
}

// -- Property tests --

proptest! {
    /// Concatenating the token texts reproduces the source.
    #[test]
    fn tokens_reassemble_source(src in program()) {
        let tokens = tokenize(&src, None)
            .map_err(|e| TestCaseError::fail(std::format!("lex error: {e}\n--- input ---\n{src}")))?;
        prop_assert_eq!(rebuild(&tokens), src);
    }

    /// Lexing the reassembled source gives the same stream.
    #[test]
    fn relex_is_stable(src in program()) {
        let first = tokenize(&src, None)
            .map_err(|e| TestCaseError::fail(std::format!("lex error: {e}")))?;
        let second = tokenize(&rebuild(&first), None)
            .map_err(|e| TestCaseError::fail(std::format!("re-lex error: {e}")))?;
        prop_assert_eq!(first, second);
    }

    /// Offsets are contiguous and line/column agree with the offset.
    #[test]
    fn positions_match_offsets(src in program()) {
        let tokens = tokenize(&src, None)
            .map_err(|e| TestCaseError::fail(std::format!("lex error: {e}")))?;
        let index = LineIndex::new(&src);
        let mut expected = 0;
        for token in &tokens {
            prop_assert_eq!(token.span.offset, expected);
            prop_assert_eq!(token.span, index.span(token.span.offset));
            prop_assert!(src[token.span.offset..].starts_with(token.text.as_str()));
            expected += token.text.len();
        }
    }

    /// Arbitrary input never panics, and errors end the stream.
    #[test]
    fn arbitrary_input_never_panics(src in "\\PC{0,64}") {
        let mut lexer = Lexer::new(&src, None);
        let mut last_offset = 0;
        while let Some(result) = lexer.next() {
            match result {
                Ok(token) => {
                    prop_assert!(token.span.offset >= last_offset);
                    last_offset = token.span.offset;
                }
                Err(_) => {
                    prop_assert!(lexer.next().is_none());
                    break;
                }
            }
        }
    }
}
