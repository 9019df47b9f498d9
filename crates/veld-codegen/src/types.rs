//! Resolved type table
//!
//! A small interning table for the resolved types the annotation pass
//! inspects: class types (enums and interfaces included), function types,
//! nullable wrappers and primitives. Types are deduplicated so equal
//! types share one `TypeId`.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::descriptors::DeclarationId;

/// Unique identifier for a resolved type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Bool,
    Str,
    Unit,
}

/// A resolved type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Instance type of a class-like descriptor
    Class(DeclarationId),

    /// Function type: (params) -> ret
    Function { params: Vec<TypeId>, ret: TypeId },

    /// Nullable wrapper: T?
    Nullable(TypeId),

    Primitive(PrimitiveType),

    /// Placeholder for failed upstream resolution
    Error,
}

/// Interning table of resolved types
#[derive(Debug, Default)]
pub struct TypeTable {
    types: Vec<Type>,
    dedup: FxHashMap<Type, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.dedup.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.dedup.insert(ty, id);
        id
    }

    pub fn class_type(&mut self, class: DeclarationId) -> TypeId {
        self.intern(Type::Class(class))
    }

    pub fn function_type(&mut self, params: Vec<TypeId>, ret: TypeId) -> TypeId {
        self.intern(Type::Function { params, ret })
    }

    pub fn nullable(&mut self, inner: TypeId) -> TypeId {
        self.intern(Type::Nullable(inner))
    }

    pub fn primitive(&mut self, prim: PrimitiveType) -> TypeId {
        self.intern(Type::Primitive(prim))
    }

    pub fn int_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::Int)
    }

    pub fn bool_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::Bool)
    }

    pub fn str_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::Str)
    }

    pub fn unit_type(&mut self) -> TypeId {
        self.primitive(PrimitiveType::Unit)
    }

    pub fn error_type(&mut self) -> TypeId {
        self.intern(Type::Error)
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    /// Unwrap nullable layers down to the underlying type
    pub fn strip_nullable(&self, id: TypeId) -> TypeId {
        let mut current = id;
        while let Type::Nullable(inner) = self.get(current) {
            current = *inner;
        }
        current
    }

    /// The class descriptor behind a (possibly nullable) class type
    pub fn class_of(&self, id: TypeId) -> Option<DeclarationId> {
        match self.get(self.strip_nullable(id)) {
            Type::Class(class) => Some(*class),
            _ => None,
        }
    }
}
