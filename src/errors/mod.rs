//! Error types and error handling for the front end.
//!
//! Each stage owns one error enum:
//!
//! - [`errors::LexError`] and [`errors::ParseError`] stop at the first failure
//! - [`errors::ScopeErrors`] collects every binding error of a resolver pass
//! - [`errors::TypeError`] stops at the first failure and carries context
//!
//! All of them implement [`errors::Report`] so the driver can render them the
//! same way.

pub mod errors;
