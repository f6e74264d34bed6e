//! Type checking.
//!
//! Second walk over a resolved program. Every expression gets a nominal type,
//! looked up through the bindings the resolver recorded, and every statement
//! is validated against the rules of the language. Types match by name only:
//! `int` and `float` never convert into each other. The first violation stops
//! the check.

pub mod type_checker;

pub use type_checker::{type_check, TypeTable};

#[cfg(test)]
mod tests;
