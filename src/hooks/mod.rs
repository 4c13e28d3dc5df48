//! Hook registries - string-named behavior callbacks.
//!
//! Documents reference behavior by name only; the registry maps those names to
//! callbacks, partitioned by event category. Registries are plain values
//! injected into the interpreter, never ambient globals, so tests can build
//! isolated instances without cross-test leakage.
//!
//! # Resolution policy
//!
//! Hook names are free-form strings supplied by the document. A name missing
//! from its registry is non-fatal: `fire_*` logs at warn level and returns.
//! Rendering must survive typos in a document.
//!
//! # Example
//!
//! ```ignore
//! use dynui::HookRegistry;
//!
//! let mut hooks = HookRegistry::new();
//! hooks.on_init("loadItems", |store, component| {
//!     // called once per component, on first interpretation
//! });
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::warn;

use crate::document::{Component, Properties};
use crate::store::Store;

// =============================================================================
// Callback Types
// =============================================================================

/// Init hook: invoked once per component when first interpreted.
pub type InitFn = Rc<dyn Fn(&Store, &Component)>;

/// Search hook: invoked with the committed query string.
pub type SearchFn = Rc<dyn Fn(&str, &Store, &Component)>;

/// Form submit hook: invoked with the collected field values.
pub type FormSubmitFn = Rc<dyn Fn(&Properties, &Store, &Component)>;

/// Form field change hook: invoked with (form, store, changed field).
pub type FormFieldChangeFn = Rc<dyn Fn(&Component, &Store, &Component)>;

/// Row click hook: invoked with (record, row index, store, component).
pub type RowClickFn = Rc<dyn Fn(&Value, usize, &Store, &Component)>;

/// Row selection hook: invoked with (selected keys, selected rows, info,
/// store, component).
pub type RowSelectionFn = Rc<dyn Fn(&[Value], &[Value], &Value, &Store, &Component)>;

// =============================================================================
// Registry
// =============================================================================

/// Six name->callback maps, one per event category.
#[derive(Default, Clone)]
pub struct HookRegistry {
    init: HashMap<String, InitFn>,
    search: HashMap<String, SearchFn>,
    form_submit: HashMap<String, FormSubmitFn>,
    form_field_change: HashMap<String, FormFieldChangeFn>,
    row_click: HashMap<String, RowClickFn>,
    row_selection: HashMap<String, RowSelectionFn>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    pub fn on_init(&mut self, name: impl Into<String>, f: impl Fn(&Store, &Component) + 'static) {
        self.init.insert(name.into(), Rc::new(f));
    }

    pub fn on_search(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&str, &Store, &Component) + 'static,
    ) {
        self.search.insert(name.into(), Rc::new(f));
    }

    pub fn on_form_submit(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Properties, &Store, &Component) + 'static,
    ) {
        self.form_submit.insert(name.into(), Rc::new(f));
    }

    pub fn on_form_field_change(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Component, &Store, &Component) + 'static,
    ) {
        self.form_field_change.insert(name.into(), Rc::new(f));
    }

    pub fn on_row_click(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Value, usize, &Store, &Component) + 'static,
    ) {
        self.row_click.insert(name.into(), Rc::new(f));
    }

    pub fn on_row_selection(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&[Value], &[Value], &Value, &Store, &Component) + 'static,
    ) {
        self.row_selection.insert(name.into(), Rc::new(f));
    }

    // -------------------------------------------------------------------------
    // Firing
    // -------------------------------------------------------------------------

    /// Fire an init hook. Missing names log and no-op.
    pub fn fire_init(&self, name: &str, store: &Store, component: &Component) {
        match self.init.get(name) {
            Some(hook) => hook(store, component),
            None => warn!(hook = name, component = %component.name, "init hook not registered"),
        }
    }

    /// Fire a search hook with the committed query.
    pub fn fire_search(&self, name: &str, query: &str, store: &Store, component: &Component) {
        match self.search.get(name) {
            Some(hook) => hook(query, store, component),
            None => warn!(hook = name, component = %component.name, "search hook not registered"),
        }
    }

    /// Fire a form submit hook with the collected values.
    pub fn fire_form_submit(
        &self,
        name: &str,
        values: &Properties,
        store: &Store,
        component: &Component,
    ) {
        match self.form_submit.get(name) {
            Some(hook) => hook(values, store, component),
            None => {
                warn!(hook = name, component = %component.name, "form submit hook not registered")
            }
        }
    }

    /// Fire a field change hook with the enclosing form and the changed field.
    pub fn fire_form_field_change(
        &self,
        name: &str,
        form: &Component,
        store: &Store,
        field: &Component,
    ) {
        match self.form_field_change.get(name) {
            Some(hook) => hook(form, store, field),
            None => warn!(hook = name, field = %field.name, "field change hook not registered"),
        }
    }

    /// Fire a row click hook with the activated record.
    pub fn fire_row_click(
        &self,
        name: &str,
        record: &Value,
        row_index: usize,
        store: &Store,
        component: &Component,
    ) {
        match self.row_click.get(name) {
            Some(hook) => hook(record, row_index, store, component),
            None => {
                warn!(hook = name, component = %component.name, "row click hook not registered")
            }
        }
    }

    /// Fire a row selection change hook.
    pub fn fire_row_selection(
        &self,
        name: &str,
        selected_keys: &[Value],
        selected_rows: &[Value],
        info: &Value,
        store: &Store,
        component: &Component,
    ) {
        match self.row_selection.get(name) {
            Some(hook) => hook(selected_keys, selected_rows, info, store, component),
            None => {
                warn!(hook = name, component = %component.name, "row selection hook not registered")
            }
        }
    }

    /// Whether an init hook is registered under `name`.
    pub fn has_init(&self, name: &str) -> bool {
        self.init.contains_key(name)
    }
}

// =============================================================================
// Tests
// =============================================================================
