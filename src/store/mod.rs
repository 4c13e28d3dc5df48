//! State store - reactive cells and the custom-view cache.
//!
//! The store owns the live document. Every named component is backed by a
//! reactive cell ([`spark_signals::Signal`]) holding its current value, keyed
//! by name for O(1) lookup and update - mutating one component republishes one
//! cell, not the whole tree. Writes are whole-value replacement, so a reader
//! never observes a half-applied update.
//!
//! # Cell registration
//!
//! Structural nodes are registered eagerly at construction through the
//! fail-loud path: a duplicate name in the document is a bug in the document
//! and panics immediately rather than silently breaking reactive identity
//! for a live subtree. Custom-view clone nodes join the *same* cell map when
//! their instance is created - their `_<index>` suffixed names are unique by
//! construction, and sharing the map lets `change_component` target a
//! clone's sub-component just like a structural one.
//!
//! # Custom views
//!
//! [`Store::instantiate_custom_view`] is idempotent per `(template, index)`:
//! the first call deep-clones the template, attaches the data item, and
//! suffixes every node name; later calls return the reference-identical
//! cached clone so nested components keep their reactive identity and never
//! re-fire init hooks.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use spark_signals::{Signal, signal};
use tracing::{error, warn};

use crate::document::{App, Component, FunctionDescription, InstanceHandle, Properties};

/// Reactive cell map plus custom-view instantiation cache.
///
/// Single-threaded by design: interpretation passes and hook invocations run
/// on one cooperative loop, so interior mutability is `RefCell`, not locks.
pub struct Store {
    root: Component,
    custom_views: HashMap<String, Component>,
    functions: HashMap<String, FunctionDescription>,
    cells: RefCell<HashMap<String, Signal<Component>>>,
    view_cache: RefCell<HashMap<(String, usize), Rc<Component>>>,
}

impl Store {
    /// Build a store from a parsed document and register a cell for every
    /// structural node.
    ///
    /// # Panics
    ///
    /// Panics if two structural nodes share a name - a malformed document is
    /// a development-time error and must not reach interpretation.
    pub fn new(app: App) -> Rc<Self> {
        let App {
            root,
            custom_views,
            functions,
        } = app;

        let store = Rc::new(Self {
            root,
            custom_views,
            functions,
            cells: RefCell::new(HashMap::new()),
            view_cache: RefCell::new(HashMap::new()),
        });
        store.register_structural(&store.root);
        store
    }

    /// The document's root component as authored.
    ///
    /// Live values (post-mutation) come from the cells, not from here.
    pub fn root(&self) -> &Component {
        &self.root
    }

    fn register_structural(&self, node: &Component) {
        self.set_component_cell(node.clone());
        for child in &node.children {
            self.register_structural(child);
        }
        for item in &node.items {
            self.register_structural(item);
        }
    }

    // -------------------------------------------------------------------------
    // Cells
    // -------------------------------------------------------------------------

    /// Latest value of the named cell, or `None` if no cell exists yet.
    pub fn get_component(&self, name: &str) -> Option<Component> {
        self.cell(name).map(|cell| cell.get())
    }

    /// Register a new reactive cell seeded with `component`.
    ///
    /// # Panics
    ///
    /// Panics if a cell already exists under `component.name`. Silent
    /// overwrite would detach an existing live subtree from its identity,
    /// so double registration fails loudly.
    pub fn set_component_cell(&self, component: Component) -> Signal<Component> {
        let name = component.name.clone();
        let mut cells = self.cells.borrow_mut();
        if cells.contains_key(&name) {
            panic!(
                "duplicate component cell {name:?}: every structural node in a document needs a unique name"
            );
        }
        let cell = signal(component);
        cells.insert(name, cell.clone());
        cell
    }

    /// Shallow-merge `patch` into the named cell's properties and publish.
    ///
    /// Returns false (with a diagnostic) if the name is unknown; no cell is
    /// touched in that case.
    pub fn change_component(&self, name: &str, patch: Properties) -> bool {
        let Some(cell) = self.cell(name) else {
            error!(component = name, "changeComponent: no cell under that name");
            return false;
        };
        let mut value = cell.get();
        for (key, patch_value) in patch {
            value.properties.insert(key, patch_value);
        }
        cell.set(value);
        true
    }

    /// Record the painted instance behind the named cell.
    ///
    /// The handle is weak: the paint routine keeps ownership and the handle
    /// simply goes dead when the instance is dropped.
    pub fn attach_instance(&self, name: &str, handle: InstanceHandle) -> bool {
        let Some(cell) = self.cell(name) else {
            warn!(component = name, "attach_instance: no cell under that name");
            return false;
        };
        let mut value = cell.get();
        value.current = Some(handle);
        cell.set(value);
        true
    }

    /// The named cell, if one has been created.
    pub fn cell(&self, name: &str) -> Option<Signal<Component>> {
        self.cells.borrow().get(name).cloned()
    }

    /// Get the cell for `node`, creating one seeded with `node` on first
    /// sight. First-seen wins; an existing cell's value is never replaced.
    pub(crate) fn cell_or_register(&self, node: &Component) -> Signal<Component> {
        if let Some(cell) = self.cell(&node.name) {
            return cell;
        }
        let cell = signal(node.clone());
        self.cells
            .borrow_mut()
            .insert(node.name.clone(), cell.clone());
        cell
    }

    // -------------------------------------------------------------------------
    // Custom Views
    // -------------------------------------------------------------------------

    /// The named template subtree, unmodified. Never cloned by this call.
    pub fn get_custom_view(&self, name: &str) -> Option<&Component> {
        self.custom_views.get(name)
    }

    /// Instantiate a custom view for one data item.
    ///
    /// Cached by `(template, index)`: the first call clones the template,
    /// merges `dataItem`/`dataIndex` into the clone's root properties,
    /// appends `_<index>` to every node name, and registers a cell for every
    /// clone node - the clone root's init hook may patch its children by
    /// suffixed name before they have been interpreted. Every later call
    /// with the same key returns the identical cached clone. Unknown
    /// template names log and return `None`.
    pub fn instantiate_custom_view(
        &self,
        template: &str,
        data_item: &Value,
        index: usize,
    ) -> Option<Rc<Component>> {
        let key = (template.to_string(), index);
        if let Some(clone) = self.view_cache.borrow().get(&key) {
            return Some(clone.clone());
        }

        let Some(template_node) = self.custom_views.get(template) else {
            warn!(view = template, "custom view not found");
            return None;
        };

        let mut clone = template_node.clone();
        clone
            .properties
            .insert("dataItem".into(), data_item.clone());
        clone.properties.insert("dataIndex".into(), index.into());
        append_index_to_names(&mut clone, index);
        self.register_clone_cells(&clone);

        let clone = Rc::new(clone);
        self.view_cache.borrow_mut().insert(key, clone.clone());
        Some(clone)
    }

    /// Register cells for every node of a fresh clone, suffixed names and
    /// all. First-seen wins, so a re-interpretation racing through here can
    /// never replace live values.
    fn register_clone_cells(&self, node: &Component) {
        self.cell_or_register(node);
        for child in &node.children {
            self.register_clone_cells(child);
        }
        for item in &node.items {
            self.register_clone_cells(item);
        }
    }

    // -------------------------------------------------------------------------
    // Function Documentation
    // -------------------------------------------------------------------------

    /// Human-readable description of a hook name, from the document's
    /// `functions` map.
    pub fn describe_function(&self, name: &str) -> Option<&str> {
        self.functions
            .get(name)
            .map(|entry| entry.description.as_str())
    }
}

/// Append `_<index>` to every node name in the clone, recursively.
///
/// Keeps clone identities disjoint between instances of the same template
/// and from the structural tree.
fn append_index_to_names(node: &mut Component, index: usize) {
    if !node.name.is_empty() {
        node.name = format!("{}_{index}", node.name);
    }
    for child in &mut node.children {
        append_index_to_names(child, index);
    }
    for item in &mut node.items {
        append_index_to_names(item, index);
    }
}

// =============================================================================
// Tests
// =============================================================================
