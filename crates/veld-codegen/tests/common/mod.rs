//! Shared fixture for annotation pass integration tests
//!
//! Builds syntax trees and the matching semantic bindings by hand, the
//! way the upstream pipeline would, then runs the pass over them.

#![allow(dead_code)]

use veld_codegen::{
    AnnotateError, AnnotationStore, Annotator, ClassFilter, ConstantValue, DeclarationId,
    DefaultFacadeNames, GenerateAll, RuntimeShapes, SemanticModel, TypeId,
};
use veld_syntax::ast::*;
use veld_syntax::Span;

pub struct Fixture {
    pub model: SemanticModel,
    pub shapes: RuntimeShapes,
    next: usize,
}

impl Fixture {
    pub fn new() -> Self {
        let mut model = SemanticModel::new();
        let shapes = RuntimeShapes::install(&mut model);
        Self {
            model,
            shapes,
            next: 100,
        }
    }

    /// A fresh span; every call is a distinct source position.
    pub fn span(&mut self) -> Span {
        self.next += 10;
        Span::new(self.next, self.next + 5, 1, 1)
    }

    pub fn ident(&mut self, name: &str) -> Identifier {
        let span = self.span();
        Identifier::new(name, span)
    }

    pub fn name_expr(&mut self, name: &str) -> Expression {
        Expression::Name(self.ident(name))
    }

    pub fn block(&mut self, statements: Vec<Statement>) -> Block {
        let span = self.span();
        Block { statements, span }
    }

    pub fn expr_stmt(expr: Expression) -> Statement {
        Statement::Expression(expr)
    }

    // ── Expressions ─────────────────────────────────────────────────────

    /// Lambda expression resolved to `callable`.
    pub fn lambda(&mut self, callable: DeclarationId, statements: Vec<Statement>) -> Expression {
        let span = self.span();
        let body = self.block(statements);
        self.model.bindings.record_declaration(span, callable);
        Expression::Lambda(LambdaExpression {
            params: vec![],
            body,
            span,
        })
    }

    /// Object literal whose anonymous object resolves to `class`.
    pub fn object_literal(
        &mut self,
        class: DeclarationId,
        supertypes: Vec<SuperTypeEntry>,
        members: Vec<Declaration>,
    ) -> Expression {
        let object_span = self.span();
        let span = self.span();
        self.model.bindings.record_declaration(object_span, class);
        Expression::ObjectLiteral(ObjectLiteralExpression {
            object: ObjectDecl {
                name: None,
                supertypes,
                members,
                span: object_span,
            },
            span,
        })
    }

    /// Callable reference resolved to `target`, with its own synthesized
    /// callable descriptor.
    pub fn callable_ref(&mut self, callable: DeclarationId, target: DeclarationId) -> Expression {
        let name = self.ident("ref");
        let span = self.span();
        self.model.bindings.record_declaration(span, callable);
        self.model.bindings.record_reference_target(span, target);
        Expression::CallableRef(CallableRefExpression {
            receiver: None,
            name,
            span,
        })
    }

    /// Call expression; resolution is recorded separately by the test.
    pub fn call(&mut self, callee: &str, args: Vec<Expression>) -> Expression {
        let callee = Box::new(self.name_expr(callee));
        let span = self.span();
        Expression::Call(CallExpression { callee, args, span })
    }

    /// Super-constructor call entry; resolution is recorded separately.
    pub fn super_call(&mut self, ty_name: &str, args: Vec<Expression>) -> SuperTypeEntry {
        let name = self.ident(ty_name);
        let ty_span = self.span();
        let span = self.span();
        SuperTypeEntry::Call(SuperTypeCall {
            ty: TypeRef { name, span: ty_span },
            args,
            span,
        })
    }

    pub fn arm(&mut self, conditions: Vec<Expression>) -> MatchArm {
        let body = Box::new(self.name_expr("side"));
        let span = self.span();
        MatchArm {
            conditions,
            body,
            span,
        }
    }

    pub fn match_expr(&mut self, subject: Option<Expression>, arms: Vec<MatchArm>) -> Expression {
        let span = self.span();
        Expression::Match(MatchExpression {
            subject: subject.map(Box::new),
            arms,
            span,
        })
    }

    /// Match over a subject of `subject_ty` with one condition per arm:
    /// `Some(entry)` is an enum-entry constant, `None` a null constant.
    pub fn enum_match(
        &mut self,
        subject_ty: TypeId,
        constants: Vec<Option<DeclarationId>>,
    ) -> Expression {
        let subject = self.name_expr("mode");
        self.model.bindings.record_expr_type(*subject.span(), subject_ty);
        let arms = constants
            .into_iter()
            .map(|constant| {
                let condition = self.name_expr("case");
                let value = match constant {
                    Some(entry) => ConstantValue::EnumEntry(entry),
                    None => ConstantValue::Null,
                };
                self.model.bindings.record_constant(*condition.span(), value);
                self.arm(vec![condition])
            })
            .collect();
        self.match_expr(Some(subject), arms)
    }

    // ── Declarations ────────────────────────────────────────────────────

    pub fn class_decl(
        &mut self,
        name: &str,
        descriptor: Option<DeclarationId>,
        kind: ClassDeclKind,
        supertypes: Vec<SuperTypeEntry>,
        members: Vec<Declaration>,
    ) -> Declaration {
        let ident = self.ident(name);
        let span = self.span();
        if let Some(descriptor) = descriptor {
            self.model.bindings.record_declaration(span, descriptor);
        }
        Declaration::Class(ClassDecl {
            name: ident,
            kind,
            supertypes,
            members,
            span,
        })
    }

    pub fn object_decl(
        &mut self,
        name: &str,
        descriptor: Option<DeclarationId>,
        members: Vec<Declaration>,
    ) -> Declaration {
        let ident = self.ident(name);
        let span = self.span();
        if let Some(descriptor) = descriptor {
            self.model.bindings.record_declaration(span, descriptor);
        }
        Declaration::Object(ObjectDecl {
            name: Some(ident),
            supertypes: vec![],
            members,
            span,
        })
    }

    pub fn function_decl(
        &mut self,
        name: &str,
        descriptor: Option<DeclarationId>,
        statements: Vec<Statement>,
    ) -> Declaration {
        let ident = self.ident(name);
        let body = self.block(statements);
        let span = self.span();
        if let Some(descriptor) = descriptor {
            self.model.bindings.record_declaration(span, descriptor);
        }
        Declaration::Function(FunctionDecl {
            name: ident,
            params: vec![],
            body: Some(body),
            span,
        })
    }

    pub fn property_decl(
        &mut self,
        name: &str,
        descriptor: Option<DeclarationId>,
        initializer: Option<Expression>,
        delegate: Option<Expression>,
    ) -> Declaration {
        let ident = self.ident(name);
        let span = self.span();
        if let Some(descriptor) = descriptor {
            self.model.bindings.record_declaration(span, descriptor);
        }
        Declaration::Property(PropertyDecl {
            name: ident,
            ty: None,
            initializer,
            delegate,
            span,
        })
    }

    pub fn constructor_decl(
        &mut self,
        descriptor: DeclarationId,
        statements: Vec<Statement>,
    ) -> Declaration {
        let body = self.block(statements);
        let span = self.span();
        self.model.bindings.record_declaration(span, descriptor);
        Declaration::Constructor(ConstructorDecl {
            params: vec![],
            body,
            span,
        })
    }

    pub fn enum_entry_decl(
        &mut self,
        name: &str,
        descriptor: Option<DeclarationId>,
        supertype_args: Vec<Expression>,
        body: Option<Vec<Declaration>>,
    ) -> Declaration {
        let ident = self.ident(name);
        let span = self.span();
        if let Some(descriptor) = descriptor {
            self.model.bindings.record_declaration(span, descriptor);
        }
        Declaration::EnumEntry(EnumEntry {
            name: ident,
            supertype_args,
            body,
            span,
        })
    }

    /// A source file named `foo.veld` (facade `FooVd`).
    pub fn file(&mut self, package: Option<&str>, declarations: Vec<Declaration>) -> SourceFile {
        let span = self.span();
        SourceFile::new("foo.veld", package.map(str::to_string), declarations, span)
    }

    // ── Running the pass ────────────────────────────────────────────────

    pub fn annotate(&self, file: &SourceFile) -> Result<AnnotationStore, AnnotateError> {
        self.annotate_with_filter(file, &GenerateAll)
    }

    pub fn annotate_with_filter(
        &self,
        file: &SourceFile,
        filter: &dyn ClassFilter,
    ) -> Result<AnnotationStore, AnnotateError> {
        let mut store = AnnotationStore::new();
        let mut annotator = Annotator::new(
            &self.model,
            filter,
            &DefaultFacadeNames,
            &self.shapes,
            &mut store,
        );
        annotator.annotate_file(file)?;
        Ok(store)
    }

    /// Qualified name assigned to the class synthesized for `callable`.
    pub fn synthetic_name(
        &self,
        store: &AnnotationStore,
        callable: DeclarationId,
    ) -> Option<String> {
        store
            .class_for_callable(callable)
            .map(|id| store.synthetic(id).name.clone())
    }

    /// Corrected container recorded for the class synthesized for
    /// `callable`.
    pub fn synthetic_container(
        &self,
        store: &AnnotationStore,
        callable: DeclarationId,
    ) -> Option<DeclarationId> {
        store
            .class_for_callable(callable)
            .map(|id| store.synthetic(id).container)
    }
}
