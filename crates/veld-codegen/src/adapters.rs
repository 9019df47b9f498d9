//! Adapter-argument recording
//!
//! When overload resolution binds a call to an adapter signature — one
//! whose original declaration takes single-method-interface parameters
//! that were lowered to plain function-value parameters — the function
//! values passed at those positions must be wrapped into the interface
//! by the emitter. This module derives the interface ("adapter") type
//! from a declared parameter and records the argument expressions that
//! need wrapping, for ordinary calls, super-constructor call entries,
//! operators and indexed access.

use veld_syntax::ast::{
    AssignmentExpression, BinaryExpression, BinaryOp, Expression, IndexExpression,
};
use veld_syntax::Span;

use crate::annotations::AnnotationStore;
use crate::bindings::{NodeId, ResolvedArgument, ResolvedCall, SemanticModel};
use crate::descriptors::{ClassKind, FunctionKind};
use crate::error::{AnnotateError, AnnotateResult};
use crate::types::TypeId;

/// A single-method interface type a function value must be wrapped into.
///
/// Two adapter types derived from the same declared type compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdapterType {
    ty: TypeId,
}

impl AdapterType {
    /// Derive an adapter type from a declared type: the type must be a
    /// (possibly nullable) class type of a single-method interface.
    pub fn for_type(ty: TypeId, model: &SemanticModel) -> Option<AdapterType> {
        let class = model.types.class_of(ty)?;
        match model.decls.class_kind(class) {
            Some(ClassKind::Interface { fun_interface: true }) => Some(AdapterType { ty }),
            _ => None,
        }
    }

    /// The declared interface type
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// The interface class descriptor behind this adapter type
    pub fn interface(&self, model: &SemanticModel) -> Option<crate::descriptors::DeclarationId> {
        model.types.class_of(self.ty)
    }
}

/// Inspect a resolved call-shaped node (call expression or
/// super-constructor call entry) and record adapter arguments.
pub(crate) fn check_adapter_call(
    call: Span,
    model: &SemanticModel,
    store: &mut AnnotationStore,
) -> AnnotateResult<()> {
    let Some(resolved) = model.bindings.resolved_call(call) else {
        return Ok(());
    };
    if !model.decls.is_function(resolved.target) {
        return Ok(());
    }

    record_adapter_construction(call, resolved, model, store)?;

    let Some(original) = model.decls.adapter_original(resolved.target) else {
        return Ok(());
    };
    for (index, param) in model.decls.params(original).iter().enumerate() {
        let Some(adapter) = AdapterType::for_type(param.ty, model) else {
            continue;
        };
        let argument = resolved
            .args
            .get(index)
            .ok_or(AnnotateError::MissingArgument { index, span: call })?;
        let ResolvedArgument::Expression(node) = argument else {
            return Err(AnnotateError::NonExpressionArgument { index, span: call });
        };
        store.record_adapter_arg(*node, adapter);
    }
    Ok(())
}

/// Record the explicit-construction form `InterfaceType(f)`: a call to a
/// constructor-style adapter taking exactly one expression argument. Any
/// other shape is silently skipped.
fn record_adapter_construction(
    call: Span,
    resolved: &ResolvedCall,
    model: &SemanticModel,
    store: &mut AnnotationStore,
) -> AnnotateResult<()> {
    if !matches!(
        model.decls.function_kind(resolved.target),
        Some(FunctionKind::AdapterConstructor)
    ) {
        return Ok(());
    }
    if resolved.args.len() != 1 {
        return Ok(());
    }
    let ResolvedArgument::Expression(argument) = resolved.args[0] else {
        return Ok(());
    };

    store.record_adapter_construction(NodeId(call), argument);

    let adapter = model
        .decls
        .return_ty(resolved.target)
        .and_then(|ret| AdapterType::for_type(ret, model))
        .ok_or_else(|| AnnotateError::MalformedAdapterConstructor {
            name: model.decls.name(resolved.target).to_string(),
            span: call,
        })?;
    store.record_adapter_arg(argument, adapter);
    Ok(())
}

/// The adapter type of the first declared parameter of the original
/// behind an operator's resolved target, if any.
fn operator_adapter(node: Span, model: &SemanticModel) -> Option<AdapterType> {
    let target = model.bindings.reference_target(node)?;
    if !model.decls.is_function(target) {
        return None;
    }
    let original = model.decls.adapter_original(target)?;
    let first = model.decls.params(original).first()?;
    AdapterType::for_type(first.ty, model)
}

/// Record the adapter argument of a binary operator expression: the
/// right operand for arithmetic/range/comparison operators, the left
/// operand for membership operators. Equality and logical operators
/// never dispatch through adapters.
pub(crate) fn check_binary_adapter(
    expr: &BinaryExpression,
    model: &SemanticModel,
    store: &mut AnnotationStore,
) {
    let Some(adapter) = operator_adapter(expr.span, model) else {
        return;
    };
    match expr.op {
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Rem
        | BinaryOp::Range
        | BinaryOp::Lt
        | BinaryOp::Gt
        | BinaryOp::Le
        | BinaryOp::Ge => {
            store.record_adapter_arg(NodeId(*expr.right.span()), adapter);
        }
        BinaryOp::In | BinaryOp::NotIn => {
            store.record_adapter_arg(NodeId(*expr.left.span()), adapter);
        }
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => {}
    }
}

/// Record the adapter argument of an augmented assignment (`a += f`).
/// Plain assignment has no operator function of its own.
pub(crate) fn check_assignment_adapter(
    expr: &AssignmentExpression,
    model: &SemanticModel,
    store: &mut AnnotationStore,
) {
    if expr.op.is_plain() {
        return;
    }
    let Some(adapter) = operator_adapter(expr.span, model) else {
        return;
    };
    store.record_adapter_arg(NodeId(*expr.value.span()), adapter);
}

/// Record adapter arguments of an indexed access. Index expressions are
/// marked against their parameter positions; for an indexed write, the
/// stored-value slot (the setter's last parameter) is marked against the
/// right-hand side only when the index expression is the direct target
/// of a plain assignment — `assigned_value` carries that right-hand side.
pub(crate) fn check_index_adapter(
    expr: &IndexExpression,
    assigned_value: Option<&Expression>,
    model: &SemanticModel,
    store: &mut AnnotationStore,
) -> AnnotateResult<()> {
    let Some(target) = model.bindings.reference_target(expr.span) else {
        return Ok(());
    };
    if !model.decls.is_function(target) {
        return Ok(());
    }
    let is_setter = model.decls.name(target) == "set";
    let Some(original) = model.decls.adapter_original(target) else {
        return Ok(());
    };

    let params = model.decls.params(original);
    for (index, param) in params.iter().enumerate() {
        let Some(adapter) = AdapterType::for_type(param.ty, model) else {
            continue;
        };
        if is_setter && index == params.len() - 1 {
            if let Some(value) = assigned_value {
                store.record_adapter_arg(NodeId(*value.span()), adapter);
            }
        } else {
            let index_expr =
                expr.indexes
                    .get(index)
                    .ok_or(AnnotateError::MissingIndexExpression {
                        index,
                        span: expr.span,
                    })?;
            store.record_adapter_arg(NodeId(*index_expr.span()), adapter);
        }
    }
    Ok(())
}
