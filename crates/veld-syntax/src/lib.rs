//! Veld Language Syntax Tree
//!
//! Immutable syntax tree definitions for the Veld programming language.
//! Trees are produced by the upstream parser and consumed read-only by
//! the analysis and backend phases; every node carries a [`Span`] for
//! precise source location tracking.

pub mod ast;
pub mod span;

pub use span::Span;
