//! CLI tool to dump and check Ruby token streams.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use rubylex_rs::{Lexer, Token, TokenKind, tokenize};

#[derive(Debug, Parser)]
#[command(name = "rubylex", version, about = "Position-exact Ruby lexer")]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every token with its position
    Tokens {
        /// Leave out whitespace tokens
        #[arg(long)]
        no_space: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check that files lex cleanly and reassemble from their tokens
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let files = match &cli.command {
        Command::Tokens { files, .. } | Command::Check { files } => files,
    };

    let mut had_error = false;

    for path in files {
        let origin = path.display().to_string();
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{origin}: {e}");
                had_error = true;
                continue;
            }
        };

        let ok = match cli.command {
            Command::Tokens { no_space, .. } => print_tokens(&content, &origin, no_space),
            Command::Check { .. } => check(&content, &origin),
        };
        had_error |= !ok;
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_tokens(content: &str, origin: &str, no_space: bool) -> bool {
    for token in Lexer::new(content, Some(origin)) {
        match token {
            Ok(token) if no_space && token.kind == TokenKind::Space => {}
            Ok(token) => println!(
                "{origin}:{}:{}\t{}\t{:?}\t{:?}",
                token.span.line, token.span.column, token.span.offset, token.kind, token.text
            ),
            Err(e) => {
                eprintln!("{}", e.report());
                return false;
            }
        }
    }
    true
}

fn check(content: &str, origin: &str) -> bool {
    let tokens = match tokenize(content, Some(origin)) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", e.report());
            return false;
        }
    };

    if let Some(pair) = tokens.windows(2).find(|w| w[1].span.offset < w[0].span.offset) {
        eprintln!(
            "{origin}: offsets go backwards at {}:{}",
            pair[1].span.line, pair[1].span.column
        );
        return false;
    }

    let lexer = Lexer::new(content, None);
    let source = lexer.source();
    let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();

    if !spliced(source, &tokens) {
        if rebuilt != source {
            eprintln!("{origin}: tokens do not reassemble the source");
            return false;
        }
        eprintln!("{origin}: ok ({} tokens)", tokens.len());
        return true;
    }

    // Heredoc bodies are moved and may be folded; the rebuilt text must
    // still lex.
    match tokenize(&rebuilt, Some(origin)) {
        Ok(relexed) => {
            log::info!("{origin}: {} tokens after re-lexing", relexed.len());
            eprintln!("{origin}: ok ({} tokens, heredocs)", tokens.len());
            true
        }
        Err(e) => {
            eprintln!("{origin}: reassembled source does not lex: {e}");
            false
        }
    }
}

/// Whether any token's text differs from the source at its offset.
fn spliced(source: &str, tokens: &[Token]) -> bool {
    tokens.iter().any(|t| {
        t.kind == TokenKind::Heredoc
            || !source
                .get(t.span.offset..)
                .is_some_and(|rest| rest.starts_with(t.text.as_str()))
    })
}
