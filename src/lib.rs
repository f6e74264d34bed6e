#![allow(clippy::module_inception)]

use std::fmt::Display;

use tracing::{debug, info_span};

use crate::{
    ast::ast::Program,
    errors::errors::{CompileError, ErrorTip, Report},
    lexer::{tokens::Token, LexerKind},
    resolver::Resolution,
    type_checker::TypeTable,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;
pub mod type_checker;

extern crate regex;

/// 1-based line and column of a character in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    pub fn null() -> Self {
        Position { line: 0, column: 0 }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half open source range: `end` is the position just past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub lexer: LexerKind,
}

/// Everything the front end produced for one source text.
#[derive(Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub resolution: Resolution,
    pub types: TypeTable,
}

/// Runs the whole front end: tokenize, parse, resolve, type check.
///
/// Stops at the first stage that fails. Scope errors are reported all at
/// once; every other stage reports its first error only.
pub fn compile(source: &str, options: &CompileOptions) -> Result<Compilation, CompileError> {
    let tokens = {
        let _span = info_span!("lex", lexer = ?options.lexer).entered();
        let tokens = lexer::tokenize(source, options.lexer)?;
        debug!(count = tokens.len(), "tokenized source");
        tokens
    };

    let program = {
        let _span = info_span!("parse").entered();
        let program = parser::parse(tokens.clone())?;
        debug!(items = program.items.len(), "parsed program");
        program
    };

    let resolution = {
        let _span = info_span!("resolve").entered();
        let resolution = resolver::resolve(&program)?;
        debug!(
            references = resolution.references.len(),
            frames = resolution.scopes.frame_count(),
            "resolved names"
        );
        resolution
    };

    let types = {
        let _span = info_span!("type_check").entered();
        let types = type_checker::type_check(&program, &resolution)?;
        debug!(typed = types.len(), "type checked program");
        types
    };

    Ok(Compilation {
        tokens,
        program,
        resolution,
        types,
    })
}

/// Returns the 1-based line `line` of `source` without its line break.
pub fn get_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source
        .split('\n')
        .nth(line as usize - 1)
        .map(|text| text.strip_suffix('\r').unwrap_or(text))
}

/// Renders a diagnostic with the offending line and a caret under its column.
///
/// ```text
/// Error: UndeclaredVariableAccessed (Variable `y` not declared)
/// -> main.tl:2:9
///   |
/// 2 | x = y + 1.
///   | ----^
/// ```
pub fn render_diagnostic(source: &str, file: &str, report: &dyn Report) -> String {
    let position = report.get_position();

    let mut out = if let ErrorTip::None = report.get_tip() {
        format!("Error: {}\n", report.get_error_name())
    } else {
        format!("Error: {} ({})\n", report.get_error_name(), report.get_tip())
    };
    out.push_str(&format!("-> {}:{}\n", file, position));

    let Some(line_text) = get_line(source, position.line) else {
        return out;
    };

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = (position.column as usize).saturating_sub(removed_whitespace).max(1);
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start_matches([' ', '\t']);
    (trimmed, string.len() - trimmed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::errors::ScopeError;

    #[test]
    fn test_get_line() {
        let source = "Hello, world!\nsecond\r\n\nTesting { }\n";
        assert_eq!(get_line(source, 1), Some("Hello, world!"));
        assert_eq!(get_line(source, 2), Some("second"));
        assert_eq!(get_line(source, 3), Some(""));
        assert_eq!(get_line(source, 4), Some("Testing { }"));
        assert_eq!(get_line(source, 0), None);
        assert_eq!(get_line(source, 9), None);
    }

    #[test]
    fn test_render_diagnostic_points_at_column() {
        let source = "int x = 1.\n    x = y + 1.\n";
        let error = ScopeError::UndeclaredVariableAccessed {
            name: "y".to_string(),
            position: Position::new(2, 9),
        };

        let rendered = render_diagnostic(source, "main.tl", &error);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Error: UndeclaredVariableAccessed (Variable `y` not declared)");
        assert_eq!(lines[1], "-> main.tl:2:9");
        assert_eq!(lines[3], "2 | x = y + 1.");
        // Four leading spaces were stripped, so the caret sits under `y`.
        assert_eq!(lines[4], "  | ----^");
        assert_eq!(lines.len(), 5);
        assert!(rendered.ends_with("^\n"));
    }

    #[test]
    fn test_render_diagnostic_without_source_line() {
        let error = ScopeError::UndeclaredVariableAccessed {
            name: "y".to_string(),
            position: Position::null(),
        };

        let rendered = render_diagnostic("", "main.tl", &error);
        assert_eq!(rendered.lines().count(), 2);
    }
}
