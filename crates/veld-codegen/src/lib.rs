//! Veld Backend Annotation Pass
//!
//! The naming-and-annotation pass of the Veld compiler backend: one
//! depth-first walk over a type-checked syntax tree that
//! - assigns stable qualified names to every class-like entity,
//!   including the implicit ones (lambdas, object literals,
//!   callable/property references, property delegates), and records
//!   their closure relations;
//! - marks call arguments that must be wrapped into single-method
//!   interfaces to satisfy adapted signatures;
//! - builds dense dispatch tables for matches over enum subjects.
//!
//! The pass reads the semantic model produced upstream and appends to an
//! annotation store consumed by the bytecode emitter downstream; it never
//! mutates the tree. One [`Annotator`] handles one source file;
//! independent files can be annotated concurrently with independent
//! stores.

pub mod adapters;
pub mod annotations;
pub mod annotator;
pub mod bindings;
pub mod descriptors;
pub mod diagnostic;
pub mod enum_dispatch;
pub mod error;
pub mod services;
pub mod types;

// Re-export main types
pub use adapters::AdapterType;
pub use annotations::{
    AnnotationDump, AnnotationStore, ClassEntity, ClosureRecord, MatchTableRef, SyntheticClass,
    SyntheticClassId,
};
pub use annotator::Annotator;
pub use bindings::{BindingMap, ConstantValue, NodeId, ResolvedArgument, ResolvedCall, SemanticModel};
pub use descriptors::{ClassKind, DeclTable, DeclarationId, Descriptor, FunctionKind, ValueParameter};
pub use diagnostic::{create_files, error_code, Diagnostic, ErrorCode};
pub use enum_dispatch::EnumDispatchTable;
pub use error::{AnnotateError, AnnotateResult};
pub use services::{
    ClassFilter, ClassLike, ClosureShapes, DefaultFacadeNames, FacadeNames, GenerateAll,
    RuntimeShapes,
};
pub use types::{PrimitiveType, Type, TypeId, TypeTable};
