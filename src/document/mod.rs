//! Document model - the declarative App/Component schema.
//!
//! An admin UI is described by a serializable [`App`] document: one root
//! [`Component`] tree, a set of named custom-view templates, and human-readable
//! descriptions of the hook names the document refers to.
//!
//! Components carry two distinct child collections:
//! - `children` - structural nesting (layout containers, page sections)
//! - `items` - a second child-like collection with its own meaning per type
//!   (menu entries, table columns, form fields)
//!
//! Behavior is referenced by name only: `onInit`, `onSearch`, `onChange` and
//! `onSubmit` hold free-form strings resolved against a
//! [`HookRegistry`](crate::hooks::HookRegistry) at interpretation time. A typo
//! in a document degrades to a logged no-op, never a crash.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Open key/value configuration map carried by every component.
///
/// Mutations go through the store and are shallow merges: a patch replaces
/// only the keys it names, sibling keys stay untouched.
pub type Properties = serde_json::Map<String, Value>;

/// Error produced while loading an [`App`] document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to parse app document: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// Instance Handle
// =============================================================================

/// Weak handle to the painted instance backing a component.
///
/// The paint routine that created the instance owns it; the document only
/// records "a paint routine produced this" for imperative access (focus,
/// form instances). The handle never drives lifetime decisions, and equality
/// is pointer identity so components holding one can live in reactive cells.
#[derive(Clone)]
pub struct InstanceHandle(Weak<dyn Any>);

impl InstanceHandle {
    /// Create a handle from the paint routine's owned instance.
    pub fn new<T: Any>(instance: &Rc<T>) -> Self {
        let weak = Rc::downgrade(instance);
        let weak: Weak<dyn Any> = weak;
        Self(weak)
    }

    /// Borrow the instance if the paint layer still owns it.
    pub fn upgrade(&self) -> Option<Rc<dyn Any>> {
        self.0.upgrade()
    }
}

impl PartialEq for InstanceHandle {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHandle").finish_non_exhaustive()
    }
}

// =============================================================================
// Component
// =============================================================================

/// One node of the declarative UI tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Component {
    /// Type tag selecting a paint routine.
    #[serde(rename = "type")]
    pub kind: String,
    /// Identifier, unique among structural nodes of a live document.
    pub name: String,
    /// Open configuration map; the mutable part of the node.
    #[serde(skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    /// Structural nesting, interpreted in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Component>,
    /// Second child collection (menu entries, table columns, form fields).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Component>,
    /// Hook fired at most once, on first interpretation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_init: Option<String>,
    /// Hook fired on a search-style input commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_search: Option<String>,
    /// Hook fired when this node (a form field) changes value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_change: Option<String>,
    /// Hook fired when this node (a form) is submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_submit: Option<String>,
    /// CRUD resource name consumed by default hooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    /// Name of the form component paired with this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_form_name: Option<String>,
    /// Lifecycle flag: false until the init gate passes, then true forever.
    #[serde(skip)]
    pub initialized: bool,
    /// Weak handle to the painted instance, owned by the paint layer.
    #[serde(skip)]
    pub current: Option<InstanceHandle>,
}

impl Component {
    /// Create a bare component with a type tag and name.
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Read one property value.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Read one property as a string.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(Value::as_str)
    }

    /// Follow a path of object keys through `properties`.
    ///
    /// Used for nested hook references like `onRow.click`.
    pub fn property_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut value = self.property(first)?;
        for key in rest {
            value = value.as_object()?.get(*key)?;
        }
        Some(value)
    }
}

// =============================================================================
// App
// =============================================================================

/// Documentation entry for one hook name. Never executed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionDescription {
    pub description: String,
}

/// The document root: a component tree plus its reusable templates.
///
/// On disk an `App` looks like its root component with two extra keys,
/// `customViews` and `functions` - the root's own fields sit at the top
/// level (serde flatten).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct App {
    #[serde(flatten)]
    pub root: Component,
    /// Named template subtrees, instantiated per data item by the store.
    pub custom_views: HashMap<String, Component>,
    /// Hook-name documentation for tooling.
    pub functions: HashMap<String, FunctionDescription>,
}

impl App {
    /// Parse an app document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse an app document from an already-loaded JSON value.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(value)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
