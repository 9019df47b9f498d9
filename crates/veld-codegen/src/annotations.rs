//! Annotation store
//!
//! The write-only output of the annotation pass. Entries are append-only
//! per key: the pass never overwrites what an earlier visit (or another
//! pass) recorded, and the downstream emitter reads the store in full
//! after the pass completes. One store per compilation; all mutable
//! state is private to the owning pass invocation.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use veld_syntax::Span;

use crate::adapters::AdapterType;
use crate::bindings::{NodeId, SemanticModel};
use crate::descriptors::DeclarationId;
use crate::enum_dispatch::EnumDispatchTable;
use crate::types::TypeId;

/// Unique identifier for a class synthesized by the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntheticClassId(u32);

impl fmt::Display for SyntheticClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SyntheticClassId({})", self.0)
    }
}

/// A class-like output entity: either a source declaration's class or a
/// class synthesized for a callable (lambda, reference, delegate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassEntity {
    Declared(DeclarationId),
    Synthetic(SyntheticClassId),
}

/// A class synthesized by the pass for a callable construct
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticClass {
    /// Assigned qualified name
    pub name: String,

    /// Effective enclosing declaration (after container correction)
    pub container: DeclarationId,

    /// Interface/base types the generated class must implement
    pub supertypes: Vec<TypeId>,

    /// The syntax node the class was synthesized for
    pub source: NodeId,

    /// The callable descriptor the class implements
    pub callable: DeclarationId,
}

/// Closure record: an output entity's enclosing class and qualified name
#[derive(Debug, Clone, PartialEq)]
pub struct ClosureRecord {
    /// Immediately enclosing class on the walker's class stack, `None`
    /// at top level
    pub enclosing: Option<ClassEntity>,

    /// Assigned slash/dollar-delimited qualified name
    pub qualified_name: String,
}

/// Reference from a match expression to its dispatch table
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTableRef {
    pub class_name: String,
    pub field_index: usize,
}

/// The pass's write-only output tables
#[derive(Debug, Default)]
pub struct AnnotationStore {
    synthetic_classes: Vec<SyntheticClass>,
    class_for_callable: FxHashMap<DeclarationId, SyntheticClassId>,
    closures: FxHashMap<ClassEntity, ClosureRecord>,
    needs_subclass: FxHashSet<DeclarationId>,
    adapter_args: FxHashMap<NodeId, AdapterType>,
    adapter_constructions: FxHashMap<NodeId, NodeId>,
    dispatch_tables: FxHashMap<String, Vec<EnumDispatchTable>>,
    match_tables: FxHashMap<NodeId, MatchTableRef>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synthesized class and link it to its callable.
    pub fn record_synthetic_class(&mut self, class: SyntheticClass) -> SyntheticClassId {
        let id = SyntheticClassId(self.synthetic_classes.len() as u32);
        let previous = self.class_for_callable.insert(class.callable, id);
        debug_assert!(previous.is_none(), "callable already has a class");
        self.synthetic_classes.push(class);
        id
    }

    /// Record the closure relation of an output entity.
    pub fn record_closure(
        &mut self,
        entity: ClassEntity,
        enclosing: Option<ClassEntity>,
        qualified_name: String,
    ) {
        let previous = self.closures.insert(
            entity,
            ClosureRecord {
                enclosing,
                qualified_name,
            },
        );
        debug_assert!(previous.is_none(), "entity already has a closure record");
    }

    /// Mark an enum entry as requiring a generated subclass.
    pub fn mark_enum_entry_subclass(&mut self, entry: DeclarationId) {
        self.needs_subclass.insert(entry);
    }

    /// Record that an argument expression must be wrapped into `adapter`.
    pub fn record_adapter_arg(&mut self, node: NodeId, adapter: AdapterType) {
        self.adapter_args.insert(node, adapter);
    }

    /// Record an explicit adapter construction call and its argument.
    pub fn record_adapter_construction(&mut self, call: NodeId, argument: NodeId) {
        let previous = self.adapter_constructions.insert(call, argument);
        debug_assert!(previous.is_none(), "construction already recorded");
    }

    /// Number of dispatch tables already owned by `class_name`; the next
    /// table's field index.
    pub fn dispatch_table_count(&self, class_name: &str) -> usize {
        self.dispatch_tables
            .get(class_name)
            .map_or(0, |tables| tables.len())
    }

    /// Append a finished dispatch table to its owner class's list and
    /// link the originating match expression to it.
    pub fn record_dispatch_table(&mut self, table: EnumDispatchTable, match_node: NodeId) {
        let tables = self
            .dispatch_tables
            .entry(table.class_name.clone())
            .or_default();
        debug_assert_eq!(table.field_index, tables.len(), "field index out of order");
        self.match_tables.insert(
            match_node,
            MatchTableRef {
                class_name: table.class_name.clone(),
                field_index: table.field_index,
            },
        );
        tables.push(table);
    }

    // ── Read side (downstream emitter and tests) ────────────────────────

    pub fn synthetic(&self, id: SyntheticClassId) -> &SyntheticClass {
        &self.synthetic_classes[id.0 as usize]
    }

    pub fn synthetic_classes(&self) -> &[SyntheticClass] {
        &self.synthetic_classes
    }

    pub fn class_for_callable(&self, callable: DeclarationId) -> Option<SyntheticClassId> {
        self.class_for_callable.get(&callable).copied()
    }

    pub fn closure(&self, entity: ClassEntity) -> Option<&ClosureRecord> {
        self.closures.get(&entity)
    }

    pub fn closure_count(&self) -> usize {
        self.closures.len()
    }

    pub fn needs_generated_subclass(&self, entry: DeclarationId) -> bool {
        self.needs_subclass.contains(&entry)
    }

    pub fn adapter_arg(&self, node: NodeId) -> Option<AdapterType> {
        self.adapter_args.get(&node).copied()
    }

    pub fn adapter_arg_count(&self) -> usize {
        self.adapter_args.len()
    }

    pub fn adapter_construction(&self, call: NodeId) -> Option<NodeId> {
        self.adapter_constructions.get(&call).copied()
    }

    pub fn dispatch_tables(&self, class_name: &str) -> &[EnumDispatchTable] {
        self.dispatch_tables
            .get(class_name)
            .map_or(&[], |tables| tables.as_slice())
    }

    pub fn match_table(&self, match_node: NodeId) -> Option<&MatchTableRef> {
        self.match_tables.get(&match_node)
    }

    /// Build a deterministic, serializable dump of the store for tooling
    /// and golden-file inspection.
    pub fn export(&self, model: &SemanticModel) -> AnnotationDump {
        let mut closures: Vec<ClosureDump> = self
            .closures
            .iter()
            .map(|(entity, record)| ClosureDump {
                qualified_name: record.qualified_name.clone(),
                enclosing: record
                    .enclosing
                    .and_then(|e| self.closures.get(&e))
                    .map(|r| r.qualified_name.clone()),
                synthetic: matches!(entity, ClassEntity::Synthetic(_)),
            })
            .collect();
        closures.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

        let mut adapter_args: Vec<AdapterArgDump> = self
            .adapter_args
            .iter()
            .map(|(node, adapter)| AdapterArgDump {
                span: node.0,
                interface: adapter
                    .interface(model)
                    .map(|class| model.decls.name(class).to_string())
                    .unwrap_or_default(),
            })
            .collect();
        adapter_args.sort_by_key(|arg| (arg.span.start, arg.span.end));

        let mut dispatch_tables: Vec<DispatchTableDump> = self
            .dispatch_tables
            .values()
            .flatten()
            .map(|table| DispatchTableDump {
                class_name: table.class_name.clone(),
                field_index: table.field_index,
                enum_class: model.decls.name(table.enum_class).to_string(),
                entries: table
                    .entries()
                    .map(|(entry, code)| DispatchEntryDump {
                        entry: model.decls.name(entry).to_string(),
                        code,
                    })
                    .collect(),
            })
            .collect();
        dispatch_tables.sort_by(|a, b| {
            (a.class_name.as_str(), a.field_index).cmp(&(b.class_name.as_str(), b.field_index))
        });

        AnnotationDump {
            closures,
            adapter_args,
            dispatch_tables,
        }
    }
}

// ============================================================================
// Serializable dump
// ============================================================================

/// Serializable snapshot of the annotation store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDump {
    pub closures: Vec<ClosureDump>,
    pub adapter_args: Vec<AdapterArgDump>,
    pub dispatch_tables: Vec<DispatchTableDump>,
}

impl AnnotationDump {
    /// Pretty-printed JSON form
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One closure record in the dump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureDump {
    pub qualified_name: String,
    pub enclosing: Option<String>,
    pub synthetic: bool,
}

/// One adapter-argument marking in the dump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterArgDump {
    pub span: Span,
    pub interface: String,
}

/// One dispatch table in the dump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchTableDump {
    pub class_name: String,
    pub field_index: usize,
    pub enum_class: String,
    pub entries: Vec<DispatchEntryDump>,
}

/// One entry → code pair in a dispatch table dump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchEntryDump {
    pub entry: String,
    pub code: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::ClassKind;
    use veld_syntax::Span;

    fn sp(n: usize) -> Span {
        Span::new(n, n + 1, 1, n as u32)
    }

    #[test]
    fn test_closure_records() {
        let mut model = SemanticModel::new();
        let pkg = model.decls.package("pkg");
        let class = model.decls.class("Foo", ClassKind::Class, pkg);

        let mut store = AnnotationStore::new();
        store.record_closure(
            ClassEntity::Declared(class),
            None,
            "pkg/Foo".to_string(),
        );

        let record = store.closure(ClassEntity::Declared(class)).unwrap();
        assert_eq!(record.qualified_name, "pkg/Foo");
        assert_eq!(record.enclosing, None);
    }

    #[test]
    fn test_dispatch_table_field_indices() {
        let mut model = SemanticModel::new();
        let pkg = model.decls.package("pkg");
        let enum_class = model.decls.class("Mode", ClassKind::Enum, pkg);

        let mut store = AnnotationStore::new();
        assert_eq!(store.dispatch_table_count("pkg/Foo"), 0);

        let first = EnumDispatchTable::new(enum_class, "pkg/Foo".to_string(), 0);
        store.record_dispatch_table(first, NodeId(sp(1)));
        assert_eq!(store.dispatch_table_count("pkg/Foo"), 1);

        let second = EnumDispatchTable::new(enum_class, "pkg/Foo".to_string(), 1);
        store.record_dispatch_table(second, NodeId(sp(2)));

        let tables = store.dispatch_tables("pkg/Foo");
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].field_index, 0);
        assert_eq!(tables[1].field_index, 1);

        let table_ref = store.match_table(NodeId(sp(2))).unwrap();
        assert_eq!(table_ref.field_index, 1);
        assert_eq!(table_ref.class_name, "pkg/Foo");
    }

    #[test]
    fn test_export_is_sorted_and_serializable() {
        let mut model = SemanticModel::new();
        let pkg = model.decls.package("pkg");
        let b = model.decls.class("B", ClassKind::Class, pkg);
        let a = model.decls.class("A", ClassKind::Class, pkg);

        let mut store = AnnotationStore::new();
        store.record_closure(ClassEntity::Declared(b), None, "pkg/B".to_string());
        store.record_closure(ClassEntity::Declared(a), None, "pkg/A".to_string());

        let dump = store.export(&model);
        assert_eq!(dump.closures[0].qualified_name, "pkg/A");
        assert_eq!(dump.closures[1].qualified_name, "pkg/B");

        let json = dump.to_json().unwrap();
        assert!(json.contains("\"qualified_name\""));
        let parsed: AnnotationDump = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dump);
    }
}
