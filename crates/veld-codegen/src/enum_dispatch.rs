//! Enum match dispatch tables
//!
//! A match over an enum subject whose branch conditions are all
//! enum-entry (or null) constants can be dispatched through a dense
//! integer table instead of a chain of equality tests. This module holds
//! the eligibility test and the table itself: entry → code, codes
//! assigned 1-based in first-seen branch order, one table per qualifying
//! match, owned by the nearest enclosing output class.

use rustc_hash::FxHashMap;
use veld_syntax::ast::MatchExpression;

use crate::bindings::{ConstantValue, SemanticModel};
use crate::descriptors::{ClassKind, DeclarationId};
use crate::error::{AnnotateError, AnnotateResult};

/// Dispatch table for one enum match expression
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDispatchTable {
    /// The enum class being dispatched over
    pub enum_class: DeclarationId,

    /// Qualified name of the output class owning the table
    pub class_name: String,

    /// Position of this table in the owning class's table list
    pub field_index: usize,

    /// Entries in first-seen order
    entries: Vec<DeclarationId>,

    /// Entry → dense 1-based code
    codes: FxHashMap<DeclarationId, u32>,
}

impl EnumDispatchTable {
    pub fn new(enum_class: DeclarationId, class_name: String, field_index: usize) -> Self {
        Self {
            enum_class,
            class_name,
            field_index,
            entries: Vec::new(),
            codes: FxHashMap::default(),
        }
    }

    /// Assign the next dense code to `entry` unless it already has one;
    /// returns the entry's code either way.
    pub fn put_first_time(&mut self, entry: DeclarationId) -> u32 {
        if let Some(&code) = self.codes.get(&entry) {
            return code;
        }
        let code = self.entries.len() as u32 + 1;
        self.entries.push(entry);
        self.codes.insert(entry, code);
        code
    }

    pub fn code_for(&self, entry: DeclarationId) -> Option<u32> {
        self.codes.get(&entry).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with their codes, in first-seen order
    pub fn entries(&self) -> impl Iterator<Item = (DeclarationId, u32)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, &entry)| (entry, i as u32 + 1))
    }
}

/// Check whether a match expression qualifies for table dispatch: the
/// subject's resolved type is an enum class, and every branch condition
/// has a compile-time constant that is an enum entry or null. Anything
/// else falls back to ordinary equality dispatch downstream.
pub(crate) fn is_enum_match(expr: &MatchExpression, model: &SemanticModel) -> bool {
    let Some(subject) = &expr.subject else {
        return false;
    };
    let Some(subject_ty) = model.bindings.expr_type(*subject.span()) else {
        return false;
    };
    let is_enum = model
        .types
        .class_of(subject_ty)
        .and_then(|class| model.decls.class_kind(class))
        .is_some_and(|kind| matches!(kind, ClassKind::Enum));
    if !is_enum {
        return false;
    }

    expr.arms.iter().all(|arm| {
        arm.conditions.iter().all(|condition| {
            matches!(
                model.bindings.constant(*condition.span()),
                Some(ConstantValue::EnumEntry(_)) | Some(ConstantValue::Null)
            )
        })
    })
}

/// Build the dispatch table for a qualifying match expression. Null
/// constants are skipped; repeated entries keep their first code.
pub(crate) fn build_table(
    expr: &MatchExpression,
    model: &SemanticModel,
    class_name: String,
    field_index: usize,
) -> AnnotateResult<EnumDispatchTable> {
    let subject = expr
        .subject
        .as_deref()
        .ok_or(AnnotateError::MissingSubjectType { span: expr.span })?;
    let subject_ty = model
        .bindings
        .expr_type(*subject.span())
        .ok_or(AnnotateError::MissingSubjectType {
            span: *subject.span(),
        })?;
    let enum_class = model
        .types
        .class_of(subject_ty)
        .filter(|class| matches!(model.decls.class_kind(*class), Some(ClassKind::Enum)))
        .ok_or(AnnotateError::NotAnEnumSubject {
            span: *subject.span(),
        })?;

    let mut table = EnumDispatchTable::new(enum_class, class_name, field_index);
    for arm in &expr.arms {
        for condition in &arm.conditions {
            match model.bindings.constant(*condition.span()) {
                Some(ConstantValue::Null) => continue,
                Some(ConstantValue::EnumEntry(entry)) => {
                    table.put_first_time(entry);
                }
                _ => {
                    return Err(AnnotateError::MalformedBranchConstant {
                        span: *condition.span(),
                    });
                }
            }
        }
    }
    Ok(table)
}
