//! Abstract Syntax Tree (AST) for the Veld programming language.
//!
//! This module defines the syntax tree the backend phases traverse:
//! - Source file structure (package header, declarations)
//! - Declarations (classes, objects, enum entries, functions, properties)
//! - Expressions (literals, calls, lambdas, object literals, references,
//!   operators, match expressions)
//!
//! Every AST node includes a `Span` for precise source location tracking.
//! The tree is immutable once built; analysis results live in side tables
//! keyed by node spans, never on the nodes themselves.

use crate::span::Span;

// Re-export submodules
pub mod declaration;
pub mod expression;

pub use declaration::*;
pub use expression::*;

/// Root node: a Veld source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// File name (e.g. `"main.veld"`), used for facade naming
    pub name: String,

    /// Dotted package path (`"com.acme"`), `None` for the root package
    pub package: Option<String>,

    /// Top-level declarations
    pub declarations: Vec<Declaration>,

    /// Span covering the entire file
    pub span: Span,
}

impl SourceFile {
    /// Create a new source file node
    pub fn new(
        name: impl Into<String>,
        package: Option<String>,
        declarations: Vec<Declaration>,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            package,
            declarations,
            span,
        }
    }

    /// The package path in internal (slash-separated) form, empty for the
    /// root package.
    pub fn package_internal_name(&self) -> String {
        self.package
            .as_deref()
            .map(|p| p.replace('.', "/"))
            .unwrap_or_default()
    }

    /// Check if the file has no declarations
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Identifier
///
/// Represents a name for a class, function, property, parameter, etc.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}
