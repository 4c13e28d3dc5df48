//! Paint boundary - the dispatch table from type tag to paint routine.
//!
//! The visual layer owns what "visual output" means; the interpreter only
//! dispatches on a node's type tag and hands the routine the node's current
//! value, its already-interpreted children/items, and the wired [`Events`].
//! The output type `R` is fully opaque to the core.
//!
//! Tags registered with [`PaintTable::register_collection`] mark components
//! that present one custom-view instance per data item: for those, the
//! interpreter replaces direct `items` interpretation with per-datum template
//! instantiation (see [`Interpreter`](super::Interpreter)).

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::Value;

use crate::document::{Component, Properties};

/// Paint routine: turns one node plus interpreted children into output.
pub type PaintFn<R> = Rc<dyn Fn(PaintCtx<R>) -> R>;

// =============================================================================
// Paint Context
// =============================================================================

/// Everything a paint routine receives for one node.
pub struct PaintCtx<R> {
    /// The node's current cell value at dispatch time.
    pub component: Component,
    /// Interpreted `children`, in declaration order.
    pub children: Vec<R>,
    /// Interpreted `items` - for collection tags, one entry per data item.
    pub items: Vec<R>,
    /// Hook-firing closures for interactive node types.
    pub events: Events,
}

/// Event closures handed to paint routines.
///
/// Each closure resolves its hook name from the component's *current* cell
/// value at fire time - a hook that patches its own component observes the
/// patched value on the next event - and then invokes the hook with the
/// store and the node. Unresolved names degrade to logged no-ops.
#[derive(Clone)]
pub struct Events {
    /// Commit a search query (`onSearch`).
    pub search: Rc<dyn Fn(&str)>,
    /// Submit a form with collected field values (`onSubmit`).
    pub submit: Rc<dyn Fn(&Properties)>,
    /// Report a changed form field by name (the field's `onChange`).
    pub field_change: Rc<dyn Fn(&str)>,
    /// Activate a table row (`properties.onRow.click`).
    pub row_click: Rc<dyn Fn(&Value, usize)>,
    /// Change a table's selection set (`properties.rowSelection.onChange`).
    pub row_selection: Rc<dyn Fn(&[Value], &[Value], &Value)>,
}

// =============================================================================
// Paint Table
// =============================================================================

/// Type-tag -> paint-routine dispatch table, produced by the visual layer.
pub struct PaintTable<R> {
    routines: HashMap<String, PaintFn<R>>,
    collections: HashSet<String>,
}

impl<R> Default for PaintTable<R> {
    fn default() -> Self {
        Self {
            routines: HashMap::new(),
            collections: HashSet::new(),
        }
    }
}

impl<R> PaintTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the paint routine for a type tag.
    pub fn register(&mut self, tag: impl Into<String>, f: impl Fn(PaintCtx<R>) -> R + 'static) {
        self.routines.insert(tag.into(), Rc::new(f));
    }

    /// Register a tag whose `items` are custom-view instances, one per entry
    /// of the node's `dataSource` property.
    pub fn register_collection(
        &mut self,
        tag: impl Into<String>,
        f: impl Fn(PaintCtx<R>) -> R + 'static,
    ) {
        let tag = tag.into();
        self.collections.insert(tag.clone());
        self.routines.insert(tag, Rc::new(f));
    }

    pub(crate) fn routine(&self, tag: &str) -> Option<PaintFn<R>> {
        self.routines.get(tag).cloned()
    }

    pub(crate) fn is_collection(&self, tag: &str) -> bool {
        self.collections.contains(tag)
    }
}
