//! Declaration AST nodes
//!
//! This module defines all declaration forms in the Veld language:
//! - Class, interface and enum declarations (with enum entries)
//! - Named object (singleton) declarations
//! - Functions, constructors and properties (with optional delegates)
//! - Statements and blocks, which may nest further declarations

use super::*;
use crate::span::Span;

/// A declaration, at file level or nested inside a class body, object
/// body, or function body (local declarations).
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// Class, interface or enum declaration
    Class(ClassDecl),

    /// Named object (singleton) declaration
    Object(ObjectDecl),

    /// Function declaration
    Function(FunctionDecl),

    /// Property declaration
    Property(PropertyDecl),

    /// Explicit constructor declaration (class member)
    Constructor(ConstructorDecl),

    /// Enum entry (member of an enum class)
    EnumEntry(EnumEntry),
}

impl Declaration {
    /// Get the span of this declaration
    pub fn span(&self) -> &Span {
        match self {
            Declaration::Class(d) => &d.span,
            Declaration::Object(d) => &d.span,
            Declaration::Function(d) => &d.span,
            Declaration::Property(d) => &d.span,
            Declaration::Constructor(d) => &d.span,
            Declaration::EnumEntry(d) => &d.span,
        }
    }

    /// Check if this declaration introduces a class-like entity
    pub fn is_class_like(&self) -> bool {
        matches!(self, Declaration::Class(_) | Declaration::Object(_))
    }
}

// ============================================================================
// Class-like Declarations
// ============================================================================

/// Class declaration
///
/// # Example
/// ```text
/// class Circle : Shape(radius) {
///     fun area() { ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Identifier,

    /// Class, interface or enum
    pub kind: ClassDeclKind,

    /// Supertype list (plain types and super-constructor calls)
    pub supertypes: Vec<SuperTypeEntry>,

    /// Body members; for enums this also holds the `EnumEntry` members
    pub members: Vec<Declaration>,

    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassDeclKind {
    Class,
    Interface,
    Enum,
}

/// Object declaration
///
/// A named object is a singleton declaration; an unnamed one only occurs
/// as the payload of an object-literal expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDecl {
    /// `None` for the anonymous object of an object literal
    pub name: Option<Identifier>,

    pub supertypes: Vec<SuperTypeEntry>,
    pub members: Vec<Declaration>,
    pub span: Span,
}

/// One entry in a supertype list
#[derive(Debug, Clone, PartialEq)]
pub enum SuperTypeEntry {
    /// Super-constructor call: `Shape(radius)`
    Call(SuperTypeCall),

    /// Plain supertype reference: `Comparable`
    Plain(SuperTypeRef),
}

impl SuperTypeEntry {
    pub fn span(&self) -> &Span {
        match self {
            SuperTypeEntry::Call(c) => &c.span,
            SuperTypeEntry::Plain(p) => &p.span,
        }
    }
}

/// Super-constructor call entry. This is a call site: its arguments are
/// resolved against the supertype's constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperTypeCall {
    pub ty: TypeRef,
    pub args: Vec<Expression>,
    pub span: Span,
}

/// Plain supertype entry without a constructor call.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperTypeRef {
    pub ty: TypeRef,
    pub span: Span,
}

/// Reference to a named type in source
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: Identifier,
    pub span: Span,
}

/// Enum entry
///
/// # Example
/// ```text
/// enum class Mode {
///     FAST,
///     SAFE { fun check() { ... } },
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EnumEntry {
    pub name: Identifier,

    /// Arguments to the enum class constructor
    pub supertype_args: Vec<Expression>,

    /// Body members; `Some` means the entry carries an anonymous subclass
    pub body: Option<Vec<Declaration>>,

    pub span: Span,
}

impl EnumEntry {
    /// Check if this entry declares an anonymous subclass body
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

// ============================================================================
// Callable and Property Declarations
// ============================================================================

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<Parameter>,

    /// `None` for abstract members
    pub body: Option<Block>,

    pub span: Span,
}

/// Explicit constructor declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub params: Vec<Parameter>,
    pub body: Block,
    pub span: Span,
}

/// Function, constructor or lambda parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Identifier,
    pub ty: Option<TypeRef>,
    pub span: Span,
}

/// Property declaration
///
/// # Example
/// ```text
/// val cache by lazyMap { build() }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: Identifier,
    pub ty: Option<TypeRef>,
    pub initializer: Option<Expression>,

    /// Delegate expression (`by ...`); its evaluation is compiled as a call
    pub delegate: Option<Expression>,

    pub span: Span,
}

// ============================================================================
// Statements
// ============================================================================

/// A sequence of statements wrapped in braces
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// Statement inside a block
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Local declaration (class, object, function, property)
    Declaration(Declaration),

    /// Expression statement
    Expression(Expression),

    /// Return statement
    Return(ReturnStatement),
}

/// Return statement
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub span: Span,
}
