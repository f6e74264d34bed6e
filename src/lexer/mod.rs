//! Lexical analysis module.
//!
//! Two interchangeable tokenizers turn source text into a token stream:
//!
//! - `lexer` - walks an ordered table of anchored regex patterns
//! - `scanner` - classifies characters by hand
//!
//! Both normalise alternate keyword spellings to one token kind per construct,
//! skip whitespace and comments, record line/column spans and end the stream
//! with an `EOF` token.

pub mod lexer;
pub mod scanner;
pub mod tokens;


use crate::errors::errors::LexError;

use self::tokens::Token;

/// Selects which tokenizer produces the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexerKind {
    Regex,
    #[default]
    Scanner,
}

pub fn tokenize(source: &str, kind: LexerKind) -> Result<Vec<Token>, LexError> {
    match kind {
        LexerKind::Regex => lexer::tokenize(source),
        LexerKind::Scanner => scanner::scan(source),
    }
}
