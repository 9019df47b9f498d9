//! Semantic binding tables
//!
//! The read-only per-node side tables produced by upstream analysis:
//! node → descriptor, node → resolved call, node → type, and node →
//! compile-time constant. Nodes are identified by their spans, which are
//! unique per source position and hashable.
//!
//! Lookups return `Option`: partial or shallow analysis can legitimately
//! leave nodes unresolved, and the annotation pass treats an absent
//! entry as "nothing to annotate here".

use rustc_hash::FxHashMap;
use veld_syntax::Span;

use crate::descriptors::{DeclTable, DeclarationId};
use crate::types::{TypeId, TypeTable};

/// Identity of a syntax node (its span)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub Span);

/// Compile-time constant value of a branch condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantValue {
    /// An enum entry, by its resolved descriptor
    EnumEntry(DeclarationId),
    Null,
    Int(i64),
    Bool(bool),
}

/// One resolved value argument, by declared parameter position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedArgument {
    /// Bound to an argument expression in source
    Expression(NodeId),
    /// Filled from the parameter's default value
    Default,
    /// No argument resolved for this slot
    Missing,
}

/// A resolved call: target descriptor plus arguments by parameter index
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    pub target: DeclarationId,
    pub args: Vec<ResolvedArgument>,
}

impl ResolvedCall {
    pub fn new(target: DeclarationId, args: Vec<ResolvedArgument>) -> Self {
        Self { target, args }
    }
}

/// Per-node binding tables
#[derive(Debug, Default)]
pub struct BindingMap {
    declarations: FxHashMap<NodeId, DeclarationId>,
    reference_targets: FxHashMap<NodeId, DeclarationId>,
    resolved_calls: FxHashMap<NodeId, ResolvedCall>,
    expr_types: FxHashMap<NodeId, TypeId>,
    constants: FxHashMap<NodeId, ConstantValue>,
}

impl BindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the resolved descriptor for a declaration node (classes,
    /// functions, properties, lambdas, references)
    pub fn record_declaration(&mut self, node: Span, descriptor: DeclarationId) {
        self.declarations.insert(NodeId(node), descriptor);
    }

    /// Attach the resolved callable behind an operator or reference node
    pub fn record_reference_target(&mut self, node: Span, target: DeclarationId) {
        self.reference_targets.insert(NodeId(node), target);
    }

    /// Attach the resolved call for a call-shaped node
    pub fn record_resolved_call(&mut self, node: Span, call: ResolvedCall) {
        self.resolved_calls.insert(NodeId(node), call);
    }

    /// Attach the resolved type of an expression node
    pub fn record_expr_type(&mut self, node: Span, ty: TypeId) {
        self.expr_types.insert(NodeId(node), ty);
    }

    /// Attach the compile-time constant of a branch condition node
    pub fn record_constant(&mut self, node: Span, value: ConstantValue) {
        self.constants.insert(NodeId(node), value);
    }

    pub fn declaration(&self, node: Span) -> Option<DeclarationId> {
        self.declarations.get(&NodeId(node)).copied()
    }

    pub fn reference_target(&self, node: Span) -> Option<DeclarationId> {
        self.reference_targets.get(&NodeId(node)).copied()
    }

    pub fn resolved_call(&self, node: Span) -> Option<&ResolvedCall> {
        self.resolved_calls.get(&NodeId(node))
    }

    pub fn expr_type(&self, node: Span) -> Option<TypeId> {
        self.expr_types.get(&NodeId(node)).copied()
    }

    pub fn constant(&self, node: Span) -> Option<ConstantValue> {
        self.constants.get(&NodeId(node)).copied()
    }
}

/// The full read-only semantic input of the annotation pass
#[derive(Debug, Default)]
pub struct SemanticModel {
    pub decls: DeclTable,
    pub types: TypeTable,
    pub bindings: BindingMap,
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }
}
