//! Type annotation parsing.
//!
//! Every type in the language is a single keyword, so a type annotation is
//! one token.

use crate::{ast::types::Type, errors::errors::ParseError, lexer::tokens::TokenKind};

use super::parser::Parser;

/// Parses a type keyword (`int`, `float`, `bool`, `string` or `void`).
pub fn parse_type(parser: &mut Parser) -> Result<Type, ParseError> {
    let token = parser.current_token();
    if let Some(ty) = token.kind.as_type() {
        parser.advance();
        return Ok(ty);
    }

    match token.kind {
        TokenKind::EOF => Err(ParseError::UnexpectedEndOfInput {
            position: token.span.start,
        }),
        found => Err(ParseError::ExpectedTypeToken {
            found,
            position: token.span.start,
        }),
    }
}

/// True when the cursor sits on `<type> <identifier> (`, the start of a
/// function declaration written without the `function` keyword.
pub fn at_function_signature(parser: &Parser) -> bool {
    parser.current_token_kind().is_type()
        && parser.peek_kind(1) == TokenKind::Identifier
        && parser.peek_kind(2) == TokenKind::OpenParen
}
