//! Naming and closure annotation walker
//!
//! A single pre-order walk over one source file that assigns qualified
//! names to every class-like entity — including the implicit ones
//! (lambdas, object literals, callable/property references, property
//! delegates) — records their closure relations, and drives the
//! adapter-argument recorder and the enum-dispatch table builder at the
//! relevant expression sites.
//!
//! Context is two parallel stacks (enclosing class entities and
//! enclosing qualified names) plus a counter map for anonymous entities,
//! pushed before descending into a construct's body and popped on
//! return. A third stack mirrors the syntactic ancestor chain; it exists
//! only for the lambda-container correction, which needs to look upward
//! through the tree the way the upstream resolver did.

use rustc_hash::FxHashMap;
use veld_syntax::ast::{
    AssignmentExpression, Block, CallableRefExpression, ClassDecl, ConstructorDecl, Declaration,
    EnumEntry, Expression, FunctionDecl, IndexExpression, LambdaExpression, MatchExpression,
    ObjectLiteralExpression, PropertyDecl, SourceFile, Statement, SuperTypeEntry,
};
use veld_syntax::Span;

use crate::adapters;
use crate::annotations::{AnnotationStore, ClassEntity, SyntheticClass, SyntheticClassId};
use crate::bindings::{NodeId, SemanticModel};
use crate::descriptors::{DeclarationId, Descriptor, FunctionKind};
use crate::enum_dispatch;
use crate::error::{AnnotateError, AnnotateResult};
use crate::services::{ClassFilter, ClassLike, ClosureShapes, FacadeNames};
use crate::types::TypeId;

/// One entry of the syntactic ancestor stack
#[derive(Debug, Clone, Copy)]
struct PathEntry {
    node: NodeId,
    kind: PathKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathKind {
    /// Any declaration node with a resolvable descriptor
    Declaration,
    /// The object declaration of an object-literal expression
    ObjectLiteralDecl,
    /// The supertype list of an object-literal object
    SuperTypeList,
}

impl PathEntry {
    fn declaration(span: Span) -> Self {
        Self {
            node: NodeId(span),
            kind: PathKind::Declaration,
        }
    }
}

/// The naming/closure walker. One instance annotates one source file
/// into an [`AnnotationStore`]; independent invocations share nothing
/// mutable and may run on separate threads.
pub struct Annotator<'a> {
    model: &'a SemanticModel,
    filter: &'a dyn ClassFilter,
    facades: &'a dyn FacadeNames,
    shapes: &'a dyn ClosureShapes,
    store: &'a mut AnnotationStore,

    class_stack: Vec<ClassEntity>,
    name_stack: Vec<String>,
    anon_count: FxHashMap<String, u32>,
    path: Vec<PathEntry>,
    facade: String,
}

impl<'a> Annotator<'a> {
    pub fn new(
        model: &'a SemanticModel,
        filter: &'a dyn ClassFilter,
        facades: &'a dyn FacadeNames,
        shapes: &'a dyn ClosureShapes,
        store: &'a mut AnnotationStore,
    ) -> Self {
        Self {
            model,
            filter,
            facades,
            shapes,
            store,
            class_stack: Vec::new(),
            name_stack: Vec::new(),
            anon_count: FxHashMap::default(),
            path: Vec::new(),
            facade: String::new(),
        }
    }

    /// Annotate one source file (entry point)
    pub fn annotate_file(&mut self, file: &SourceFile) -> AnnotateResult<()> {
        self.facade = self.facades.facade_name(file);
        self.name_stack.push(file.package_internal_name());
        for declaration in &file.declarations {
            self.visit_declaration(declaration)?;
        }
        self.name_stack.pop();
        Ok(())
    }

    // ── Context helpers ─────────────────────────────────────────────────

    fn peek_name(&self) -> &str {
        self.name_stack.last().map(String::as_str).unwrap_or("")
    }

    fn peek_class(&self) -> Option<ClassEntity> {
        self.class_stack.last().copied()
    }

    /// Invent the next anonymous name under the current enclosing name.
    /// Counters are keyed by the enclosing name, so a deeper anonymous
    /// scope numbers its own children independently.
    fn invent_anonymous_name(&mut self) -> String {
        let top = self.peek_name().to_string();
        let count = self.anon_count.entry(top.clone()).or_insert(0);
        *count += 1;
        format!("{}${}", top, count)
    }

    fn record_closure(&mut self, entity: ClassEntity, name: &str) {
        let enclosing = self.peek_class();
        self.store.record_closure(entity, enclosing, name.to_string());
    }

    /// Qualified name of a named class or object: package members join
    /// with `/`, nested members with `$`.
    fn class_or_object_name(&self, descriptor: DeclarationId) -> String {
        let base = self.peek_name();
        let simple = self.model.decls.name(descriptor);
        if self.model.decls.is_top_level(descriptor) {
            if base.is_empty() {
                simple.to_string()
            } else {
                format!("{}/{}", base, simple)
            }
        } else {
            format!("{}${}", base, simple)
        }
    }

    /// Name pushed for a named member: `enclosing$member` when contained
    /// in a class, `facade$member` when contained in a package scope,
    /// `None` for local declarations.
    fn class_or_package_member_name(&self, descriptor: DeclarationId) -> Option<String> {
        let container = self.model.decls.container(descriptor)?;
        let name = self.model.decls.name(descriptor);
        if self.model.decls.is_class_like(container) {
            Some(format!("{}${}", self.peek_name(), name))
        } else if self.model.decls.is_package(container) {
            Some(format!("{}${}", self.facade, name))
        } else {
            None
        }
    }

    /// Synthesize the class entity for a callable construct, using the
    /// corrected container, and link it to the callable.
    fn synthesize_callable_class(
        &mut self,
        element: Span,
        callable: DeclarationId,
        supertypes: Vec<TypeId>,
        name: &str,
    ) -> SyntheticClassId {
        let container = self.corrected_container(callable);
        self.store.record_synthetic_class(SyntheticClass {
            name: name.to_string(),
            container,
            supertypes,
            source: NodeId(element),
            callable,
        })
    }

    /// The effective enclosing declaration of a callable.
    ///
    /// The resolved container is almost always correct. The one
    /// exception is a lambda declared in the super call of an object
    /// literal: the upstream resolver attributes it to the object's
    /// constructor even though it is constructed in the outer code. For
    /// that pattern — and only that pattern — the container is
    /// re-pointed two containment levels up each time the ancestor walk
    /// crosses an object-literal supertype list, unless it first reaches
    /// the declaration of the container itself.
    fn corrected_container(&self, callable: DeclarationId) -> DeclarationId {
        let decls = &self.model.decls;
        let mut container = match decls.container(callable) {
            Some(container) => container,
            None => return callable,
        };

        let ctor_owner = match decls.get(container) {
            Descriptor::Function {
                kind: FunctionKind::Constructor,
                container: owner,
                ..
            } => *owner,
            _ => return container,
        };
        if !decls.is_anonymous_object(ctor_owner) {
            return container;
        }

        for i in (0..self.path.len()).rev() {
            let element = &self.path[i];
            if self.model.bindings.declaration(element.node.0) == Some(container) {
                return container;
            }
            let crosses_supertype_list = element.kind == PathKind::ObjectLiteralDecl
                && self
                    .path
                    .get(i + 1)
                    .is_some_and(|child| child.kind == PathKind::SuperTypeList);
            if crosses_supertype_list {
                match decls.container(container).and_then(|c| decls.container(c)) {
                    Some(outer) => container = outer,
                    None => return container,
                }
            }
        }
        container
    }

    // ── Declarations ────────────────────────────────────────────────────

    fn visit_declaration(&mut self, declaration: &Declaration) -> AnnotateResult<()> {
        match declaration {
            Declaration::Class(class) => self.visit_class(class),
            Declaration::Object(object) => {
                self.visit_class_like(
                    ClassLike::Object(object),
                    object.span,
                    &object.supertypes,
                    &object.members,
                )
            }
            Declaration::Function(function) => self.visit_function(function),
            Declaration::Property(property) => self.visit_property(property),
            Declaration::Constructor(ctor) => self.visit_constructor(ctor),
            Declaration::EnumEntry(entry) => self.visit_enum_entry(entry),
        }
    }

    fn visit_class(&mut self, class: &ClassDecl) -> AnnotateResult<()> {
        self.visit_class_like(
            ClassLike::Class(class),
            class.span,
            &class.supertypes,
            &class.members,
        )
    }

    fn visit_class_like(
        &mut self,
        declaration: ClassLike<'_>,
        node: Span,
        supertypes: &[SuperTypeEntry],
        members: &[Declaration],
    ) -> AnnotateResult<()> {
        if !self.filter.should_annotate(declaration) {
            return Ok(());
        }
        // working around shallow analysis: no descriptor, nothing to do
        let Some(descriptor) = self.model.bindings.declaration(node) else {
            return Ok(());
        };

        let name = self.class_or_object_name(descriptor);
        self.record_closure(ClassEntity::Declared(descriptor), &name);

        self.class_stack.push(ClassEntity::Declared(descriptor));
        self.name_stack.push(name);
        self.path.push(PathEntry::declaration(node));
        for entry in supertypes {
            self.visit_supertype_entry(entry)?;
        }
        for member in members {
            self.visit_declaration(member)?;
        }
        self.path.pop();
        self.name_stack.pop();
        self.class_stack.pop();
        Ok(())
    }

    fn visit_enum_entry(&mut self, entry: &EnumEntry) -> AnnotateResult<()> {
        let Some(body) = &entry.body else {
            // entry without a body: only its super-call arguments matter
            for arg in &entry.supertype_args {
                self.visit_expression(arg)?;
            }
            return adapters::check_adapter_call(entry.span, self.model, self.store);
        };

        let Some(descriptor) = self.model.bindings.declaration(entry.span) else {
            return Ok(());
        };
        self.store.mark_enum_entry_subclass(descriptor);

        self.path.push(PathEntry::declaration(entry.span));
        for arg in &entry.supertype_args {
            self.visit_expression(arg)?;
        }
        adapters::check_adapter_call(entry.span, self.model, self.store)?;
        for member in body {
            self.visit_declaration(member)?;
        }
        self.path.pop();
        Ok(())
    }

    fn visit_function(&mut self, function: &FunctionDecl) -> AnnotateResult<()> {
        let Some(descriptor) = self.model.bindings.declaration(function.span) else {
            return Ok(());
        };

        if let Some(name) = self.class_or_package_member_name(descriptor) {
            self.name_stack.push(name);
            self.path.push(PathEntry::declaration(function.span));
            if let Some(body) = &function.body {
                self.visit_block(body)?;
            }
            self.path.pop();
            self.name_stack.pop();
        } else {
            // a local function closes over its scope like a lambda does
            let name = self.invent_anonymous_name();
            let supertypes = self.shapes.closure_supertypes(descriptor, self.model);
            let class = self.synthesize_callable_class(function.span, descriptor, supertypes, &name);
            self.record_closure(ClassEntity::Synthetic(class), &name);

            self.class_stack.push(ClassEntity::Synthetic(class));
            self.name_stack.push(name);
            self.path.push(PathEntry::declaration(function.span));
            if let Some(body) = &function.body {
                self.visit_block(body)?;
            }
            self.path.pop();
            self.name_stack.pop();
            self.class_stack.pop();
        }
        Ok(())
    }

    fn visit_property(&mut self, property: &PropertyDecl) -> AnnotateResult<()> {
        let Some(descriptor) = self.model.bindings.declaration(property.span) else {
            return Ok(());
        };

        let pushed = self
            .class_or_package_member_name(descriptor)
            .unwrap_or_else(|| format!("{}${}", self.peek_name(), property.name.name));
        self.name_stack.push(pushed);
        self.path.push(PathEntry::declaration(property.span));

        // the delegate is evaluated through a synthesized accessor class,
        // numbered under the property's own name but not pushed for it
        if let Some(delegate) = &property.delegate {
            if self.model.decls.is_property(descriptor) {
                let name = self.invent_anonymous_name();
                let supertype = self.shapes.property_ref_supertype(descriptor, self.model);
                let class = self.synthesize_callable_class(
                    *delegate.span(),
                    descriptor,
                    vec![supertype],
                    &name,
                );
                self.record_closure(ClassEntity::Synthetic(class), &name);
            }
        }

        if let Some(initializer) = &property.initializer {
            self.visit_expression(initializer)?;
        }
        if let Some(delegate) = &property.delegate {
            self.visit_expression(delegate)?;
        }
        self.path.pop();
        self.name_stack.pop();
        Ok(())
    }

    fn visit_constructor(&mut self, ctor: &ConstructorDecl) -> AnnotateResult<()> {
        self.path.push(PathEntry::declaration(ctor.span));
        self.visit_block(&ctor.body)?;
        self.path.pop();
        Ok(())
    }

    fn visit_supertype_entry(&mut self, entry: &SuperTypeEntry) -> AnnotateResult<()> {
        match entry {
            SuperTypeEntry::Plain(_) => Ok(()),
            SuperTypeEntry::Call(call) => {
                for arg in &call.args {
                    self.visit_expression(arg)?;
                }
                adapters::check_adapter_call(call.span, self.model, self.store)
            }
        }
    }

    // ── Statements and expressions ──────────────────────────────────────

    fn visit_block(&mut self, block: &Block) -> AnnotateResult<()> {
        for statement in &block.statements {
            self.visit_statement(statement)?;
        }
        Ok(())
    }

    fn visit_statement(&mut self, statement: &Statement) -> AnnotateResult<()> {
        match statement {
            Statement::Declaration(declaration) => self.visit_declaration(declaration),
            Statement::Expression(expression) => self.visit_expression(expression),
            Statement::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.visit_expression(value)?;
                }
                Ok(())
            }
        }
    }

    fn visit_expression(&mut self, expression: &Expression) -> AnnotateResult<()> {
        match expression {
            Expression::Int(_)
            | Expression::Bool(_)
            | Expression::Str(_)
            | Expression::Null(_)
            | Expression::Name(_) => Ok(()),
            Expression::Member(member) => self.visit_expression(&member.receiver),
            Expression::Call(call) => {
                self.visit_expression(&call.callee)?;
                for arg in &call.args {
                    self.visit_expression(arg)?;
                }
                adapters::check_adapter_call(call.span, self.model, self.store)
            }
            Expression::Lambda(lambda) => self.visit_lambda(lambda),
            Expression::ObjectLiteral(literal) => self.visit_object_literal(literal),
            Expression::CallableRef(reference) => self.visit_callable_ref(reference),
            Expression::Binary(binary) => {
                self.visit_expression(&binary.left)?;
                self.visit_expression(&binary.right)?;
                adapters::check_binary_adapter(binary, self.model, self.store);
                Ok(())
            }
            Expression::Assignment(assignment) => self.visit_assignment(assignment),
            Expression::Index(index) => self.visit_index(index, None),
            Expression::Match(matching) => self.visit_match(matching),
            Expression::If(cond) => {
                self.visit_expression(&cond.condition)?;
                self.visit_block(&cond.then_body)?;
                if let Some(else_body) = &cond.else_body {
                    self.visit_block(else_body)?;
                }
                Ok(())
            }
            Expression::Paren(paren) => self.visit_expression(&paren.expression),
        }
    }

    fn visit_lambda(&mut self, lambda: &LambdaExpression) -> AnnotateResult<()> {
        // working around shallow analysis
        let Some(descriptor) = self.model.bindings.declaration(lambda.span) else {
            return Ok(());
        };

        let name = self.invent_anonymous_name();
        let supertypes = self.shapes.closure_supertypes(descriptor, self.model);
        let class = self.synthesize_callable_class(lambda.span, descriptor, supertypes, &name);
        self.record_closure(ClassEntity::Synthetic(class), &name);

        self.class_stack.push(ClassEntity::Synthetic(class));
        self.name_stack.push(name);
        self.path.push(PathEntry::declaration(lambda.span));
        self.visit_block(&lambda.body)?;
        self.path.pop();
        self.name_stack.pop();
        self.class_stack.pop();
        Ok(())
    }

    fn visit_object_literal(&mut self, literal: &ObjectLiteralExpression) -> AnnotateResult<()> {
        let object = &literal.object;
        let Some(descriptor) = self.model.bindings.declaration(object.span) else {
            return Ok(());
        };

        let name = self.invent_anonymous_name();
        self.record_closure(ClassEntity::Declared(descriptor), &name);

        // the supertype list runs in the enclosing context: anything
        // anonymous in there belongs to the outer scope, not the object
        self.path.push(PathEntry {
            node: NodeId(object.span),
            kind: PathKind::ObjectLiteralDecl,
        });
        self.path.push(PathEntry {
            node: NodeId(object.span),
            kind: PathKind::SuperTypeList,
        });
        for entry in &object.supertypes {
            self.visit_supertype_entry(entry)?;
        }
        self.path.pop();

        self.class_stack.push(ClassEntity::Declared(descriptor));
        self.name_stack.push(name);
        for member in &object.members {
            self.visit_declaration(member)?;
        }
        self.name_stack.pop();
        self.class_stack.pop();
        self.path.pop();
        Ok(())
    }

    fn visit_callable_ref(&mut self, reference: &CallableRefExpression) -> AnnotateResult<()> {
        let Some(target) = self.model.bindings.reference_target(reference.span) else {
            return Ok(());
        };
        let Some(callable) = self.model.bindings.declaration(reference.span) else {
            return Ok(());
        };
        let supertypes = match self.model.decls.get(target) {
            Descriptor::Function { .. } => self.shapes.function_ref_supertypes(target, self.model),
            Descriptor::Property { .. } => {
                vec![self.shapes.property_ref_supertype(target, self.model)]
            }
            _ => return Ok(()),
        };

        let name = self.invent_anonymous_name();
        let class = self.synthesize_callable_class(reference.span, callable, supertypes, &name);
        self.record_closure(ClassEntity::Synthetic(class), &name);

        self.class_stack.push(ClassEntity::Synthetic(class));
        self.name_stack.push(name);
        self.path.push(PathEntry::declaration(reference.span));
        if let Some(receiver) = &reference.receiver {
            self.visit_expression(receiver)?;
        }
        self.path.pop();
        self.name_stack.pop();
        self.class_stack.pop();
        Ok(())
    }

    fn visit_assignment(&mut self, assignment: &AssignmentExpression) -> AnnotateResult<()> {
        if let Expression::Index(index) = assignment.target.as_ref() {
            // only a plain `=` makes the right-hand side the stored value
            let assigned_value = assignment.op.is_plain().then(|| assignment.value.as_ref());
            self.visit_index(index, assigned_value)?;
        } else {
            self.visit_expression(&assignment.target)?;
        }
        self.visit_expression(&assignment.value)?;
        adapters::check_assignment_adapter(assignment, self.model, self.store);
        Ok(())
    }

    fn visit_index(
        &mut self,
        index: &IndexExpression,
        assigned_value: Option<&Expression>,
    ) -> AnnotateResult<()> {
        self.visit_expression(&index.object)?;
        for index_expr in &index.indexes {
            self.visit_expression(index_expr)?;
        }
        adapters::check_index_adapter(index, assigned_value, self.model, self.store)
    }

    fn visit_match(&mut self, matching: &MatchExpression) -> AnnotateResult<()> {
        if let Some(subject) = &matching.subject {
            self.visit_expression(subject)?;
        }
        for arm in &matching.arms {
            for condition in &arm.conditions {
                self.visit_expression(condition)?;
            }
            self.visit_expression(&arm.body)?;
        }

        if !enum_dispatch::is_enum_match(matching, self.model) {
            return Ok(());
        }
        let class_name = self.current_output_class_name(matching.span)?;
        let field_index = self.store.dispatch_table_count(&class_name);
        let table = enum_dispatch::build_table(matching, self.model, class_name, field_index)?;
        self.store.record_dispatch_table(table, NodeId(matching.span));
        Ok(())
    }

    /// Qualified name of the nearest enclosing final output class:
    /// searches the class stack outward for the first declared top-level
    /// or nested class, falling back to the file facade.
    fn current_output_class_name(&self, at: Span) -> AnnotateResult<String> {
        for entity in self.class_stack.iter().rev() {
            let ClassEntity::Declared(descriptor) = entity else {
                continue;
            };
            if self.model.decls.is_top_level_or_nested_class(*descriptor) {
                let record = self.store.closure(*entity).ok_or_else(|| {
                    AnnotateError::MissingClosureRecord {
                        name: self.model.decls.name(*descriptor).to_string(),
                        span: at,
                    }
                })?;
                return Ok(record.qualified_name.clone());
            }
        }
        Ok(self.facade.clone())
    }
}
