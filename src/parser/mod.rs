//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`crate::ast::ast::Program`]. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Top level items (functions, global variables, free statements)
//! - Statement parsing (declarations, return, if/else, for, break, blocks)
//! - Expression parsing (assignment, binary ops, prefix ops, calls, literals)
//! - Type keywords for declarations and signatures
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling. It is
//! fail-fast: the first syntax error aborts the parse.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

pub use parser::parse;

#[cfg(test)]
mod tests;
