//! Default app functions - the stock hooks most admin documents use.
//!
//! These are the behavior names a document can reference without the host
//! registering anything itself: loading a resource into a component's
//! `dataSource`, submitting a form to create or update a record, and pushing
//! a clicked row into its paired form. All persistence goes through the
//! injected [`ObjectService`]; collaborator failures are logged and leave
//! the store untouched.

use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, error};

use crate::crud::ObjectService;
use crate::document::{Component, Properties};
use crate::hooks::HookRegistry;
use crate::store::Store;

/// Register the default hook implementations against `service`.
///
/// Names match what documents reference: `loadObjectData` (init),
/// `submitObject` (form submit), `populateObjectFormOnSelection` (row click).
pub fn register_defaults(registry: &mut HookRegistry, service: Rc<dyn ObjectService>) {
    {
        let service = service.clone();
        registry.on_init("loadObjectData", move |store, component| {
            load_object_data(service.as_ref(), store, component);
        });
    }
    registry.on_form_submit("submitObject", move |values, store, component| {
        submit_object(service.as_ref(), values, store, component);
    });
    registry.on_row_click(
        "populateObjectFormOnSelection",
        |record, row_index, store, component| {
            populate_object_form_on_selection(record, row_index, store, component);
        },
    );
}

/// Load every record of the component's `objectType` into its `dataSource`.
pub fn load_object_data(service: &dyn ObjectService, store: &Store, component: &Component) {
    let Some(object_type) = component.object_type.as_deref() else {
        debug!(component = %component.name, "loadObjectData on a node without objectType");
        return;
    };
    match service.list(object_type) {
        Ok(objects) => {
            let mut patch = Properties::new();
            patch.insert("dataSource".into(), Value::Array(objects));
            store.change_component(&component.name, patch);
        }
        Err(err) => {
            error!(object_type, error = %err, "failed to load object data");
        }
    }
}

/// Create or update a record from submitted form values, then reload.
///
/// Values carrying a non-null `id` update the existing record; everything
/// else creates a new one. On success the component's `dataSource` is
/// reloaded so the UI reflects the write.
pub fn submit_object(
    service: &dyn ObjectService,
    values: &Properties,
    store: &Store,
    component: &Component,
) {
    let Some(object_type) = component.object_type.as_deref() else {
        debug!(component = %component.name, "submitObject on a node without objectType");
        return;
    };

    let result = match values.get("id").filter(|id| !id.is_null()) {
        Some(id) => service.update(object_type, id, Value::Object(values.clone())),
        None => service.create(object_type, Value::Object(values.clone())),
    };

    match result {
        Ok(_) => load_object_data(service, store, component),
        Err(err) => {
            error!(object_type, error = %err, "failed to submit object");
        }
    }
}

/// Push a clicked record into the form named by `objectFormName`.
///
/// The record lands as the form's `values` property; the form's paint
/// routine decides how to map it onto fields.
pub fn populate_object_form_on_selection(
    record: &Value,
    _row_index: usize,
    store: &Store,
    component: &Component,
) {
    let Some(form_name) = component.object_form_name.as_deref() else {
        debug!(component = %component.name, "row click on a node without objectFormName");
        return;
    };
    let mut patch = Properties::new();
    patch.insert("values".into(), record.clone());
    if !store.change_component(form_name, patch) {
        error!(form = form_name, "object form not found");
    }
}

// =============================================================================
// Tests
// =============================================================================
