//! Tree interpreter - recursive-descent walk of the live document.
//!
//! One interpretation pass turns the component tree into visual output by
//! running, per node:
//!
//! 1. **Identity** - look up the node's reactive cell by name, creating one
//!    seeded with the node on first sight (first-seen wins).
//! 2. **Init gate** - if the node declares an init hook and has not been
//!    initialized, flip the flag *first*, then fire the hook. The ordering
//!    makes the gate re-entrancy safe: a hook that synchronously triggers
//!    another pass cannot fire itself again.
//! 3. **Recursion** - interpret `children` in declaration order; interpret
//!    `items` directly, or, for collection-tagged nodes, instantiate the item
//!    template once per `dataSource` entry and interpret the cached clones.
//! 4. **Dispatch** - resolve the type tag in the paint table and invoke the
//!    routine with the current value, interpreted children/items and wired
//!    [`Events`]. Unknown tags paint an empty placeholder.
//!
//! A failure in one subtree (missing hook, unknown tag, unknown view) never
//! aborts interpretation of siblings; everything non-fatal is logged and
//! degrades to "nothing happened".

mod paint;

pub use paint::{Events, PaintCtx, PaintFn, PaintTable};

use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::document::Component;
use crate::hooks::HookRegistry;
use crate::store::Store;

/// Type tag interpreted by the core itself: indirection to a named template.
const CUSTOM_VIEW_TAG: &str = "CustomView";

// =============================================================================
// Interpreter
// =============================================================================

/// Recursive-descent walker over the store's live document.
///
/// Generic over the visual output `R`; `R::default()` is the empty
/// placeholder painted for unknown type tags. Store, hook registries and
/// paint table are all injected, so multiple interpreters can coexist in
/// tests without shared state.
pub struct Interpreter<R> {
    store: Rc<Store>,
    hooks: Rc<HookRegistry>,
    paints: Rc<PaintTable<R>>,
}

impl<R: Default> Interpreter<R> {
    pub fn new(store: Rc<Store>, hooks: Rc<HookRegistry>, paints: Rc<PaintTable<R>>) -> Self {
        Self {
            store,
            hooks,
            paints,
        }
    }

    /// Interpret the whole document from the root.
    pub fn render(&self) -> R {
        let root = self.store.root().clone();
        self.interpret(&root)
    }

    /// Interpret one node and its subtree.
    pub fn interpret(&self, node: &Component) -> R {
        // Anonymous nodes have no identity: paint them as given, no cell,
        // no init gate.
        let mut current = if node.name.is_empty() {
            node.clone()
        } else {
            let cell = self.store.cell_or_register(node);
            let mut current = cell.get();

            if let Some(hook) = current.on_init.clone()
                && !current.initialized
            {
                // Flag flips before the hook runs.
                current.initialized = true;
                cell.set(current.clone());
                self.hooks.fire_init(&hook, &self.store, &current);
                // The hook may have patched its own properties.
                current = cell.get();
            }
            current
        };

        // CustomView is pure indirection: interpret the named template
        // in place, uninstantiated.
        if current.kind == CUSTOM_VIEW_TAG {
            let Some(view_name) = current.property_str("viewName").map(str::to_string) else {
                warn!(component = %current.name, "CustomView without a viewName property");
                return R::default();
            };
            let Some(template) = self.store.get_custom_view(&view_name).cloned() else {
                warn!(view = %view_name, "custom view not found");
                return R::default();
            };
            return self.interpret(&template);
        }

        let children: Vec<R> = current
            .children
            .iter()
            .map(|child| self.interpret(child))
            .collect();

        let items: Vec<R> = if self.paints.is_collection(&current.kind) {
            self.interpret_collection(&current)
        } else {
            current.items.iter().map(|item| self.interpret(item)).collect()
        };

        match self.paints.routine(&current.kind) {
            Some(routine) => {
                let events = self.wire_events(&current.name);
                // Dispatch sees the freshest value; an init hook above or a
                // child's hook may have republished this cell.
                if !current.name.is_empty()
                    && let Some(latest) = self.store.get_component(&current.name)
                {
                    current = latest;
                }
                routine(PaintCtx {
                    component: current,
                    children,
                    items,
                    events,
                })
            }
            None => {
                warn!(tag = %current.kind, component = %current.name, "no paint routine for type tag");
                R::default()
            }
        }
    }

    /// Interpret a collection node: one cached custom-view clone per entry
    /// of `properties.dataSource`, in index order.
    fn interpret_collection(&self, node: &Component) -> Vec<R> {
        let Some(view_name) = render_item_view(node) else {
            if node.property("dataSource").is_some() {
                warn!(component = %node.name, "collection node without a renderItem view");
            }
            return node.items.iter().map(|item| self.interpret(item)).collect();
        };

        let data: Vec<Value> = node
            .property("dataSource")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        data.iter()
            .enumerate()
            .filter_map(|(index, datum)| {
                self.store.instantiate_custom_view(&view_name, datum, index)
            })
            .map(|clone| self.interpret(&clone))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Event Wiring
    // -------------------------------------------------------------------------

    /// Build the hook-firing closures handed to the paint routine.
    ///
    /// Every closure re-reads the component from the store when triggered,
    /// so hooks always observe the latest cell value.
    fn wire_events(&self, name: &str) -> Events {
        let search = {
            let (store, hooks, name) = self.event_capture(name);
            Rc::new(move |query: &str| {
                let Some(node) = store.get_component(&name) else {
                    return;
                };
                match node.on_search.as_deref() {
                    Some(hook) => hooks.fire_search(hook, query, &store, &node),
                    None => debug!(component = %name, "search commit on a node without onSearch"),
                }
            }) as Rc<dyn Fn(&str)>
        };

        let submit = {
            let (store, hooks, name) = self.event_capture(name);
            Rc::new(move |values: &crate::document::Properties| {
                let Some(node) = store.get_component(&name) else {
                    return;
                };
                match node.on_submit.as_deref() {
                    Some(hook) => hooks.fire_form_submit(hook, values, &store, &node),
                    None => debug!(component = %name, "submit on a node without onSubmit"),
                }
            }) as Rc<dyn Fn(&crate::document::Properties)>
        };

        let field_change = {
            let (store, hooks, name) = self.event_capture(name);
            Rc::new(move |field_name: &str| {
                let Some(form) = store.get_component(&name) else {
                    return;
                };
                let Some(field) = form.items.iter().find(|item| item.name == field_name) else {
                    debug!(form = %name, field = field_name, "changed field is not a form item");
                    return;
                };
                if let Some(hook) = field.on_change.clone() {
                    hooks.fire_form_field_change(&hook, &form, &store, field);
                }
            }) as Rc<dyn Fn(&str)>
        };

        let row_click = {
            let (store, hooks, name) = self.event_capture(name);
            Rc::new(move |record: &Value, row_index: usize| {
                let Some(node) = store.get_component(&name) else {
                    return;
                };
                match node
                    .property_path(&["onRow", "click"])
                    .and_then(Value::as_str)
                {
                    Some(hook) => hooks.fire_row_click(hook, record, row_index, &store, &node),
                    None => debug!(component = %name, "row click on a node without onRow.click"),
                }
            }) as Rc<dyn Fn(&Value, usize)>
        };

        let row_selection = {
            let (store, hooks, name) = self.event_capture(name);
            Rc::new(
                move |selected_keys: &[Value], selected_rows: &[Value], info: &Value| {
                    let Some(node) = store.get_component(&name) else {
                        return;
                    };
                    match node
                        .property_path(&["rowSelection", "onChange"])
                        .and_then(Value::as_str)
                    {
                        Some(hook) => hooks.fire_row_selection(
                            hook,
                            selected_keys,
                            selected_rows,
                            info,
                            &store,
                            &node,
                        ),
                        None => {
                            debug!(component = %name, "selection change without rowSelection.onChange")
                        }
                    }
                },
            ) as Rc<dyn Fn(&[Value], &[Value], &Value)>
        };

        Events {
            search,
            submit,
            field_change,
            row_click,
            row_selection,
        }
    }

    fn event_capture(&self, name: &str) -> (Rc<Store>, Rc<HookRegistry>, String) {
        (self.store.clone(), self.hooks.clone(), name.to_string())
    }
}

/// Resolve the custom-view name a collection node renders its items with.
///
/// `renderItem` is accepted as a plain string, as `{ "viewName": ... }`, or
/// as a full CustomView node (`{ "properties": { "viewName": ... } }`).
fn render_item_view(node: &Component) -> Option<String> {
    let render_item = node.property("renderItem")?;
    match render_item {
        Value::String(name) => Some(name.clone()),
        Value::Object(spec) => spec
            .get("viewName")
            .or_else(|| spec.get("properties")?.get("viewName"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
