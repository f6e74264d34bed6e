//! Scope resolution.
//!
//! Walks a parsed [`crate::ast::ast::Program`], builds the tree of nested
//! binding frames and checks that every identifier and callee refers to a
//! visible declaration. Unlike parsing and type checking, resolution keeps
//! going after an error and reports every violation at the end.

pub mod resolver;
pub mod scope;

pub use resolver::{resolve, Resolution};
