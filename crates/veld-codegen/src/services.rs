//! Collaborator seams of the annotation pass
//!
//! The pass does not decide what gets emitted, how file facades are
//! named, or which runtime types a synthesized class implements — those
//! decisions come from the surrounding pipeline. Each one is a trait
//! here, with the default implementation the standalone compiler uses.

use veld_syntax::ast::{ClassDecl, ObjectDecl, SourceFile};

use crate::bindings::SemanticModel;
use crate::descriptors::{ClassKind, DeclarationId};
use crate::types::TypeId;

/// A named class-like declaration the generation filter can veto
#[derive(Debug, Clone, Copy)]
pub enum ClassLike<'a> {
    Class(&'a ClassDecl),
    Object(&'a ObjectDecl),
}

/// Decides whether this compilation unit is responsible for emitting a
/// declared class. Rejected declarations are skipped entirely by the
/// annotation pass, body included.
pub trait ClassFilter {
    fn should_annotate(&self, declaration: ClassLike<'_>) -> bool;
}

/// Default filter: everything is emitted here.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateAll;

impl ClassFilter for GenerateAll {
    fn should_annotate(&self, _declaration: ClassLike<'_>) -> bool {
        true
    }
}

/// Names the facade class that carries a file's package-level members.
pub trait FacadeNames {
    fn facade_name(&self, file: &SourceFile) -> String;
}

/// Default facade naming: package internal name joined with the
/// PascalCase file stem plus a `Vd` suffix (`util.veld` in `com.acme`
/// becomes `com/acme/UtilVd`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFacadeNames;

impl FacadeNames for DefaultFacadeNames {
    fn facade_name(&self, file: &SourceFile) -> String {
        let stem = file
            .name
            .rsplit('/')
            .next()
            .unwrap_or(&file.name)
            .split('.')
            .next()
            .unwrap_or("");
        let mut chars = stem.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
        let package = file.package_internal_name();
        if package.is_empty() {
            format!("{capitalized}Vd")
        } else {
            format!("{package}/{capitalized}Vd")
        }
    }
}

/// Supplies the supertypes a class synthesized for a callable must
/// implement, based on the callable's functional shape.
pub trait ClosureShapes {
    /// Supertypes for a lambda (or local function) closure class
    fn closure_supertypes(&self, function: DeclarationId, model: &SemanticModel) -> Vec<TypeId>;

    /// Supertypes for a callable-reference class
    fn function_ref_supertypes(&self, target: DeclarationId, model: &SemanticModel) -> Vec<TypeId>;

    /// The single supertype for a property-reference (or delegate) class
    fn property_ref_supertype(&self, target: DeclarationId, model: &SemanticModel) -> TypeId;
}

/// Default shapes: the Veld runtime marker classes. Installing the shapes
/// registers the runtime package and its marker interfaces in the
/// semantic model once, ahead of the pass.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeShapes {
    closure: TypeId,
    fun_ref: TypeId,
    prop_ref: TypeId,
}

impl RuntimeShapes {
    pub fn install(model: &mut SemanticModel) -> Self {
        let runtime = model.decls.package("veld.runtime");
        let closure = model.decls.class("Closure", ClassKind::Class, runtime);
        let fun_ref = model.decls.class("FunRef", ClassKind::Class, runtime);
        let prop_ref = model.decls.class("PropRef", ClassKind::Class, runtime);
        Self {
            closure: model.types.class_type(closure),
            fun_ref: model.types.class_type(fun_ref),
            prop_ref: model.types.class_type(prop_ref),
        }
    }
}

impl ClosureShapes for RuntimeShapes {
    fn closure_supertypes(&self, _function: DeclarationId, _model: &SemanticModel) -> Vec<TypeId> {
        vec![self.closure]
    }

    fn function_ref_supertypes(&self, _target: DeclarationId, _model: &SemanticModel) -> Vec<TypeId> {
        vec![self.fun_ref]
    }

    fn property_ref_supertype(&self, _target: DeclarationId, _model: &SemanticModel) -> TypeId {
        self.prop_ref
    }
}
