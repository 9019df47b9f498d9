//! Diagnostic rendering for annotation errors
//!
//! Structural violations reported by the pass are rendered with source
//! context through codespan. Hosts embedding the pass usually map the
//! error into their own diagnostic stream instead.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use veld_syntax::Span;

use crate::error::AnnotateError;

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// Get the error code for an annotation error
pub fn error_code(error: &AnnotateError) -> ErrorCode {
    use AnnotateError::*;

    match error {
        NonExpressionArgument { .. } => ErrorCode("E4001"),
        MissingArgument { .. } => ErrorCode("E4002"),
        MalformedAdapterConstructor { .. } => ErrorCode("E4003"),
        MissingIndexExpression { .. } => ErrorCode("E4004"),
        MissingSubjectType { .. } => ErrorCode("E4005"),
        NotAnEnumSubject { .. } => ErrorCode("E4006"),
        MalformedBranchConstant { .. } => ErrorCode("E4007"),
        MissingClosureRecord { .. } => ErrorCode("E4008"),
    }
}

/// A diagnostic message with source code context
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(Severity::Error).with_message(message),
            code: None,
        }
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Add the primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner = self.inner.with_labels(vec![label]);
        self
    }

    /// Create a diagnostic from an annotation error
    pub fn from_annotate_error(error: &AnnotateError, file_id: usize) -> Self {
        let label = match error {
            AnnotateError::NonExpressionArgument { .. } => "argument is not an expression",
            AnnotateError::MissingArgument { .. } => "argument missing here",
            AnnotateError::MalformedAdapterConstructor { .. } => "not an interface constructor",
            AnnotateError::MissingIndexExpression { .. } => "index expression missing",
            AnnotateError::MissingSubjectType { .. } => "subject has no type",
            AnnotateError::NotAnEnumSubject { .. } => "not an enum",
            AnnotateError::MalformedBranchConstant { .. } => "not an enum entry",
            AnnotateError::MissingClosureRecord { .. } => "class name unavailable here",
        };
        Diagnostic::error(error.to_string())
            .with_code(error_code(error))
            .with_primary_label(file_id, error.span(), label)
    }

    /// Emit the diagnostic to stderr with colors
    pub fn emit(&self, files: &SimpleFiles<String, String>) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        let config = term::Config::default();
        term::emit(&mut writer, &config, files, &self.inner)
    }

    /// The underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }
}

/// Helper to create a SimpleFiles instance from one source file
pub fn create_files(name: impl Into<String>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(name.into(), source.into());
    files
}
