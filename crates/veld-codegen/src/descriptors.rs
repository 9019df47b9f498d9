//! Resolved declaration descriptors
//!
//! The descriptor table is the pass's read-only view of what upstream
//! analysis resolved each declaration to: packages, classes, functions
//! (including constructors and adapter functions), and properties.
//! Containment chains run through classes and functions and end at a
//! package descriptor.

use std::fmt;

use crate::types::TypeId;

/// Unique identifier for a resolved declaration descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclarationId(pub(crate) u32);

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclarationId({})", self.0)
    }
}

/// Kind of a class-like descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    /// Interface; `fun_interface` marks a single-method interface whose
    /// values can be produced by wrapping a function value
    Interface {
        fun_interface: bool,
    },
    Enum,
    /// The class generated for one enum entry
    EnumEntry,
    /// Named object (singleton)
    Object,
    /// The class of an object-literal expression
    AnonymousObject,
}

/// Kind of a function descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Ordinary declared function (or lambda/reference callable)
    Declared,
    /// Class constructor
    Constructor,
    /// Constructor-style adapter for a single-method interface:
    /// `InterfaceType(f)` wraps `f` into the interface
    AdapterConstructor,
    /// Adapter signature lowered from `original`, whose declared
    /// parameter list still carries the interface-typed parameters
    Adapter { original: DeclarationId },
}

/// A declared value parameter of a function
#[derive(Debug, Clone, PartialEq)]
pub struct ValueParameter {
    pub name: String,
    pub ty: TypeId,
}

/// A resolved declaration descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Package {
        /// Dotted package path, empty for the root package
        path: String,
    },
    Class {
        name: String,
        kind: ClassKind,
        container: DeclarationId,
    },
    Function {
        name: String,
        kind: FunctionKind,
        container: DeclarationId,
        params: Vec<ValueParameter>,
        return_ty: TypeId,
    },
    Property {
        name: String,
        container: DeclarationId,
        ty: TypeId,
    },
}

/// Arena of resolved declaration descriptors
#[derive(Debug, Default)]
pub struct DeclTable {
    decls: Vec<Descriptor>,
}

impl DeclTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, descriptor: Descriptor) -> DeclarationId {
        let id = DeclarationId(self.decls.len() as u32);
        self.decls.push(descriptor);
        id
    }

    /// Register a package descriptor
    pub fn package(&mut self, path: &str) -> DeclarationId {
        self.add(Descriptor::Package {
            path: path.to_string(),
        })
    }

    /// Register a class-like descriptor
    pub fn class(&mut self, name: &str, kind: ClassKind, container: DeclarationId) -> DeclarationId {
        self.add(Descriptor::Class {
            name: name.to_string(),
            kind,
            container,
        })
    }

    /// Register a function descriptor
    pub fn function(
        &mut self,
        name: &str,
        kind: FunctionKind,
        container: DeclarationId,
        params: Vec<ValueParameter>,
        return_ty: TypeId,
    ) -> DeclarationId {
        self.add(Descriptor::Function {
            name: name.to_string(),
            kind,
            container,
            params,
            return_ty,
        })
    }

    /// Register a constructor descriptor for `class`
    pub fn constructor(&mut self, class: DeclarationId, return_ty: TypeId) -> DeclarationId {
        self.add(Descriptor::Function {
            name: "<init>".to_string(),
            kind: FunctionKind::Constructor,
            container: class,
            params: Vec::new(),
            return_ty,
        })
    }

    /// Register a property descriptor
    pub fn property(&mut self, name: &str, container: DeclarationId, ty: TypeId) -> DeclarationId {
        self.add(Descriptor::Property {
            name: name.to_string(),
            container,
            ty,
        })
    }

    pub fn get(&self, id: DeclarationId) -> &Descriptor {
        &self.decls[id.0 as usize]
    }

    /// Simple name of the descriptor; packages report their dotted path
    pub fn name(&self, id: DeclarationId) -> &str {
        match self.get(id) {
            Descriptor::Package { path } => path,
            Descriptor::Class { name, .. } => name,
            Descriptor::Function { name, .. } => name,
            Descriptor::Property { name, .. } => name,
        }
    }

    /// Immediate container, `None` for packages
    pub fn container(&self, id: DeclarationId) -> Option<DeclarationId> {
        match self.get(id) {
            Descriptor::Package { .. } => None,
            Descriptor::Class { container, .. } => Some(*container),
            Descriptor::Function { container, .. } => Some(*container),
            Descriptor::Property { container, .. } => Some(*container),
        }
    }

    pub fn is_package(&self, id: DeclarationId) -> bool {
        matches!(self.get(id), Descriptor::Package { .. })
    }

    pub fn is_class_like(&self, id: DeclarationId) -> bool {
        matches!(self.get(id), Descriptor::Class { .. })
    }

    pub fn is_function(&self, id: DeclarationId) -> bool {
        matches!(self.get(id), Descriptor::Function { .. })
    }

    pub fn is_property(&self, id: DeclarationId) -> bool {
        matches!(self.get(id), Descriptor::Property { .. })
    }

    pub fn class_kind(&self, id: DeclarationId) -> Option<ClassKind> {
        match self.get(id) {
            Descriptor::Class { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn function_kind(&self, id: DeclarationId) -> Option<FunctionKind> {
        match self.get(id) {
            Descriptor::Function { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_anonymous_object(&self, id: DeclarationId) -> bool {
        matches!(self.class_kind(id), Some(ClassKind::AnonymousObject))
    }

    /// Check if the descriptor is declared directly in a package scope
    pub fn is_top_level(&self, id: DeclarationId) -> bool {
        self.container(id).is_some_and(|c| self.is_package(c))
    }

    /// Check if a class is a final output class: top-level, or nested in
    /// classes all the way up to a package. Anonymous objects, local
    /// classes and synthesized closure classes never qualify.
    pub fn is_top_level_or_nested_class(&self, id: DeclarationId) -> bool {
        let Descriptor::Class { kind, container, .. } = self.get(id) else {
            return false;
        };
        if matches!(kind, ClassKind::AnonymousObject) {
            return false;
        }
        match self.get(*container) {
            Descriptor::Package { .. } => true,
            Descriptor::Class { .. } => self.is_top_level_or_nested_class(*container),
            _ => false,
        }
    }

    /// Declared value parameters of a function descriptor
    pub fn params(&self, id: DeclarationId) -> &[ValueParameter] {
        match self.get(id) {
            Descriptor::Function { params, .. } => params,
            _ => &[],
        }
    }

    /// Return type of a function descriptor
    pub fn return_ty(&self, id: DeclarationId) -> Option<TypeId> {
        match self.get(id) {
            Descriptor::Function { return_ty, .. } => Some(*return_ty),
            _ => None,
        }
    }

    /// If `id` is an adapter signature, the original function it was
    /// lowered from; `None` otherwise.
    pub fn adapter_original(&self, id: DeclarationId) -> Option<DeclarationId> {
        match self.function_kind(id) {
            Some(FunctionKind::Adapter { original }) => Some(original),
            _ => None,
        }
    }
}
