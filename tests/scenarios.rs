//! End-to-end scenarios: a document, a hook registry, a paint table, and the
//! behavior an author observes across interpretation passes.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};

use dynui::{
    App, Component, Events, HookRegistry, Interpreter, MemoryObjectService, ObjectService,
    PaintCtx, PaintTable, Properties, Store, register_defaults,
};

fn properties(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

/// Paint routines that render a bracketed text tree, enough to assert
/// structure without a real widget library.
fn text_paints(tags: &[&str], collections: &[&str]) -> PaintTable<String> {
    fn paint(ctx: PaintCtx<String>) -> String {
        let mut out = format!("{}:{}", ctx.component.kind, ctx.component.name);
        if !ctx.children.is_empty() {
            out.push_str(&format!("[{}]", ctx.children.join(",")));
        }
        if !ctx.items.is_empty() {
            out.push_str(&format!("{{{}}}", ctx.items.join(",")));
        }
        out
    }

    let mut paints = PaintTable::new();
    for tag in tags {
        paints.register(*tag, paint);
    }
    for tag in collections {
        paints.register_collection(*tag, paint);
    }
    paints
}

#[test]
fn scenario_load_items_fires_once() {
    let app = App::from_json(
        r#"{
            "type": "Layout",
            "name": "root",
            "children": [
                { "type": "List", "name": "list", "onInit": "loadItems" }
            ]
        }"#,
    )
    .unwrap();

    let fires = Rc::new(RefCell::new(0));
    let mut hooks = HookRegistry::new();
    {
        let fires = fires.clone();
        hooks.on_init("loadItems", move |store, component| {
            *fires.borrow_mut() += 1;
            store.change_component(
                &component.name,
                properties(json!({ "dataSource": [{ "id": 1 }] })),
            );
        });
    }

    let store = Store::new(app);
    let interpreter = Interpreter::new(
        store.clone(),
        Rc::new(hooks),
        Rc::new(text_paints(&["Layout", "List"], &[])),
    );

    interpreter.render();
    assert_eq!(
        store.get_component("list").unwrap().property("dataSource"),
        Some(&json!([{ "id": 1 }]))
    );

    interpreter.render();
    assert_eq!(*fires.borrow(), 1);
}

#[test]
fn scenario_collection_clones_are_cached() {
    let app = App::from_json(
        r#"{
            "type": "List",
            "name": "messageList",
            "properties": {
                "dataSource": ["a", "b"],
                "renderItem": { "viewName": "RowView" }
            },
            "customViews": {
                "RowView": { "type": "Card", "name": "row" }
            }
        }"#,
    )
    .unwrap();

    let store = Store::new(app);
    let interpreter = Interpreter::new(
        store.clone(),
        Rc::new(HookRegistry::new()),
        Rc::new(text_paints(&["Card"], &["List"])),
    );

    assert_eq!(
        interpreter.render(),
        "List:messageList{Card:row_0,Card:row_1}"
    );

    // Re-interpreting the same two-element array reuses the cached clones.
    let first_pass_0 = store.instantiate_custom_view("RowView", &json!("a"), 0).unwrap();
    interpreter.render();
    let second_pass_0 = store.instantiate_custom_view("RowView", &json!("a"), 0).unwrap();
    assert!(Rc::ptr_eq(&first_pass_0, &second_pass_0));
}

#[test]
fn scenario_patching_a_missing_name_changes_nothing() {
    let app = App::from_json(
        r#"{
            "type": "Layout",
            "name": "root",
            "children": [{ "type": "Text", "name": "title" }]
        }"#,
    )
    .unwrap();
    let store = Store::new(app);

    assert!(!store.change_component("missingName", properties(json!({ "x": 1 }))));
    assert!(store.get_component("root").unwrap().properties.is_empty());
    assert!(store.get_component("title").unwrap().properties.is_empty());
}

#[test]
fn scenario_unknown_init_hook_still_paints() {
    let app = App::from_json(
        r#"{
            "type": "Layout",
            "name": "root",
            "children": [
                { "type": "Text", "name": "title", "onInit": "doesNotExist" }
            ]
        }"#,
    )
    .unwrap();

    let interpreter = Interpreter::new(
        Store::new(app),
        Rc::new(HookRegistry::new()),
        Rc::new(text_paints(&["Layout", "Text"], &[])),
    );

    // Absence of behavior, not absence of rendering.
    assert_eq!(interpreter.render(), "Layout:root[Text:title]");
}

#[test]
fn scenario_default_hooks_drive_a_crud_screen() {
    let app = App::from_json(
        r#"{
            "type": "Layout",
            "name": "root",
            "children": [
                {
                    "type": "Table",
                    "name": "bookTable",
                    "onInit": "loadObjectData",
                    "objectType": "books",
                    "objectFormName": "bookForm",
                    "properties": {
                        "onRow": { "click": "populateObjectFormOnSelection" }
                    }
                },
                {
                    "type": "Form",
                    "name": "bookForm",
                    "onSubmit": "submitObject",
                    "objectType": "books",
                    "items": [
                        { "type": "Input", "name": "title" }
                    ]
                }
            ],
            "functions": {
                "loadObjectData": { "description": "Loads all records of a resource" },
                "submitObject": { "description": "Creates or updates a record" }
            }
        }"#,
    )
    .unwrap();

    let service = Rc::new(MemoryObjectService::new());
    service.seed("books", vec![json!({ "id": 1, "title": "Dune" })]);

    let mut hooks = HookRegistry::new();
    register_defaults(&mut hooks, service.clone());

    let table_events: Rc<RefCell<Option<Events>>> = Rc::new(RefCell::new(None));
    let form_events: Rc<RefCell<Option<Events>>> = Rc::new(RefCell::new(None));

    let mut paints = text_paints(&["Layout", "Input"], &[]);
    {
        let table_events = table_events.clone();
        paints.register("Table", move |ctx: PaintCtx<String>| {
            *table_events.borrow_mut() = Some(ctx.events.clone());
            String::new()
        });
    }
    {
        let form_events = form_events.clone();
        paints.register("Form", move |ctx: PaintCtx<String>| {
            *form_events.borrow_mut() = Some(ctx.events.clone());
            String::new()
        });
    }

    let store = Store::new(app);
    let interpreter = Interpreter::new(store.clone(), Rc::new(hooks), Rc::new(paints));
    interpreter.render();

    // Init loaded the seeded records into the table.
    let table = store.get_component("bookTable").unwrap();
    assert_eq!(
        table.property("dataSource"),
        Some(&json!([{ "id": 1, "title": "Dune" }]))
    );

    // Clicking a row pushes the record into the paired form.
    let events = table_events.borrow().clone().unwrap();
    (events.row_click)(&json!({ "id": 1, "title": "Dune" }), 0);
    assert_eq!(
        store.get_component("bookForm").unwrap().property("values"),
        Some(&json!({ "id": 1, "title": "Dune" }))
    );

    // Submitting with an id updates the record in the service.
    let events = form_events.borrow().clone().unwrap();
    (events.submit)(&properties(json!({ "id": 1, "title": "Dune Messiah" })));
    let books = service.list("books").unwrap();
    assert_eq!(books, vec![json!({ "id": 1, "title": "Dune Messiah" })]);

    // Documentation survives into the store for tooling.
    assert_eq!(
        store.describe_function("submitObject"),
        Some("Creates or updates a record")
    );
}

#[test]
fn scenario_document_round_trip() {
    let mut root = Component::new("Layout", "root");
    root.children.push({
        let mut table = Component::new("Table", "bookTable");
        table.on_init = Some("loadObjectData".into());
        table.object_type = Some("books".into());
        table
    });
    let app = App {
        root,
        ..App::default()
    };

    let text = serde_json::to_string(&app).unwrap();
    let parsed = App::from_json(&text).unwrap();
    assert_eq!(parsed, app);
}
