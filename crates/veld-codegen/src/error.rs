//! Annotation pass errors
//!
//! Missing upstream information (an unresolved node) is never an error:
//! the pass skips the node and moves on. The variants here are structural
//! contract violations coming out of the resolved-call and match tables;
//! they abort the pass because the downstream emitter cannot detect a
//! wrong table after the fact.

use thiserror::Error;
use veld_syntax::Span;

pub type AnnotateResult<T> = Result<T, AnnotateError>;

/// Structural contract violations that abort the annotation pass
#[derive(Debug, Error, Clone)]
pub enum AnnotateError {
    /// Adapted parameter resolved to a non-expression argument
    #[error("argument for adapted parameter {index} is not an expression")]
    NonExpressionArgument {
        /// Parameter index in the original (pre-adaptation) signature
        index: usize,
        /// Location of the call
        span: Span,
    },

    /// Adapted parameter has no resolved argument slot
    #[error("call has no argument for adapted parameter {index}")]
    MissingArgument {
        /// Parameter index in the original (pre-adaptation) signature
        index: usize,
        /// Location of the call
        span: Span,
    },

    /// Adapter constructor whose return type is not a single-method interface
    #[error("adapter constructor '{name}' does not return a single-method interface")]
    MalformedAdapterConstructor {
        /// Constructor name
        name: String,
        /// Location of the construction call
        span: Span,
    },

    /// Indexed operator parameter without a matching index expression
    #[error("indexed access has no index expression for parameter {index}")]
    MissingIndexExpression {
        /// Parameter index in the original (pre-adaptation) signature
        index: usize,
        /// Location of the indexed access
        span: Span,
    },

    /// Match subject lost its recorded type between eligibility and build
    #[error("match subject has no recorded type")]
    MissingSubjectType {
        /// Location of the match subject
        span: Span,
    },

    /// Match subject type is not an enum class
    #[error("match subject type is not an enum class")]
    NotAnEnumSubject {
        /// Location of the match subject
        span: Span,
    },

    /// Branch condition constant is neither an enum entry nor null
    #[error("match branch constant is not an enum entry")]
    MalformedBranchConstant {
        /// Location of the branch condition
        span: Span,
    },

    /// Output class on the context stack has no recorded closure
    #[error("class '{name}' has no recorded qualified name")]
    MissingClosureRecord {
        /// Class simple name
        name: String,
        /// Location of the expression that needed the name
        span: Span,
    },
}

impl AnnotateError {
    /// Get the primary span associated with this error
    pub fn span(&self) -> Span {
        match self {
            AnnotateError::NonExpressionArgument { span, .. } => *span,
            AnnotateError::MissingArgument { span, .. } => *span,
            AnnotateError::MalformedAdapterConstructor { span, .. } => *span,
            AnnotateError::MissingIndexExpression { span, .. } => *span,
            AnnotateError::MissingSubjectType { span } => *span,
            AnnotateError::NotAnEnumSubject { span } => *span,
            AnnotateError::MalformedBranchConstant { span } => *span,
            AnnotateError::MissingClosureRecord { span, .. } => *span,
        }
    }
}
