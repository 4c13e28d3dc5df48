//! # dynui
//!
//! Document-driven admin UI interpreter.
//!
//! Instead of hand-coding one screen per resource, an app is described by a
//! serializable document of typed component nodes; this crate interprets that
//! document at runtime. Behavior is referenced by name and resolved against
//! injected hook registries, so the same interpreter serves any document.
//!
//! ## Architecture
//!
//! ```text
//! App document → Store (name → reactive cell) → Interpreter → PaintTable
//!                     ↑                              |
//!                     └──── hooks (changeComponent) ←┘
//! ```
//!
//! Every named component is backed by a reactive cell
//! ([`spark_signals::Signal`]); a hook mutating one component republishes one
//! cell in O(1), not the whole tree. Custom-view templates are instantiated
//! once per data item with stable `_<index>` identity across re-renders, so
//! init hooks fire exactly once per instance.
//!
//! ## Modules
//!
//! - [`document`] - the declarative App/Component schema (serde)
//! - [`hooks`] - string-named behavior registries, one map per event category
//! - [`store`] - reactive cells, mutation API, custom-view cache
//! - [`interpret`] - the recursive-descent walker and paint boundary
//! - [`crud`] - the object-service collaborator trait
//! - [`functions`] - default hook implementations over that trait

pub mod crud;
pub mod document;
pub mod functions;
pub mod hooks;
pub mod interpret;
pub mod store;

pub use crud::{CrudError, MemoryObjectService, ObjectService};
pub use document::{
    App, Component, DocumentError, FunctionDescription, InstanceHandle, Properties,
};
pub use functions::register_defaults;
pub use hooks::HookRegistry;
pub use interpret::{Events, Interpreter, PaintCtx, PaintFn, PaintTable};
pub use store::Store;
