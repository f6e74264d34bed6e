//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a regex lexer handler for a fixed lexeme
//!
//! These macros reduce boilerplate in the lexer implementations.

/// Creates a Token instance.
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::IntLit, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a regex lexer handler for a fixed lexeme.
///
/// The generated handler pushes a token of the given kind and advances the
/// lexer past the lexeme.
///
/// # Example
///
/// ```ignore
/// pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer<'_>, _matched: &str| -> Result<(), LexError> {
            lexer.push($kind, String::from($value), $value);
            Ok(())
        }
    };
}
