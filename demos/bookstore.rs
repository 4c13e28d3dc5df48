//! Bookstore admin demo: one document, default hooks, a text paint table.
//!
//! Run with `cargo run --example bookstore`. The "visual layer" here renders
//! an indented text tree to stdout - enough to watch the interpreter load
//! data on init, instantiate custom views per record, and react to a
//! simulated row click.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};

use dynui::{
    App, Events, HookRegistry, Interpreter, MemoryObjectService, ObjectService, PaintCtx,
    PaintTable, Store, register_defaults,
};

const DOCUMENT: &str = r#"{
    "type": "Layout",
    "name": "mainLayout",
    "children": [
        {
            "type": "Header",
            "name": "mainHeader",
            "children": [
                {
                    "type": "Menu",
                    "name": "mainMenu",
                    "items": [
                        { "type": "MenuItem", "name": "browseEntry",
                          "properties": { "text": "Browse Books" } },
                        { "type": "MenuItem", "name": "adminEntry",
                          "properties": { "text": "Admin Panel" } }
                    ]
                }
            ]
        },
        {
            "type": "Content",
            "name": "mainContent",
            "children": [
                {
                    "type": "List",
                    "name": "bookList",
                    "onInit": "loadObjectData",
                    "objectType": "books",
                    "properties": { "renderItem": { "viewName": "BookCard" } }
                },
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
                        { "type": "Input", "name": "title" },
                        { "type": "InputNumber", "name": "stock" }
                    ]
                }
            ]
        }
    ],
    "customViews": {
        "BookCard": {
            "type": "Card",
            "name": "bookCard",
            "onInit": "initBookCard",
            "children": [
                { "type": "Text", "name": "bookTitle" },
                { "type": "Text", "name": "bookStock" }
            ]
        }
    },
    "functions": {
        "loadObjectData": { "description": "Loads all records of a resource into dataSource" },
        "submitObject": { "description": "Creates or updates a record from form values" },
        "populateObjectFormOnSelection": { "description": "Pushes a clicked row into its form" },
        "initBookCard": { "description": "Copies the card's data item into its text children" }
    }
}"#;

/// Render one node as an indented line plus its children/items.
fn paint(ctx: PaintCtx<String>) -> String {
    let mut line = format!("{} \"{}\"", ctx.component.kind, ctx.component.name);
    if let Some(text) = ctx.component.property("text").and_then(Value::as_str) {
        line.push_str(&format!(" - {text}"));
    }
    if let Some(values) = ctx.component.property("values") {
        line.push_str(&format!(" values={values}"));
    }
    let nested: Vec<String> = ctx.children.into_iter().chain(ctx.items).collect();
    for block in nested {
        for child_line in block.lines() {
            line.push_str(&format!("\n  {child_line}"));
        }
    }
    line
}

fn main() {
    tracing_subscriber::fmt().compact().init();

    let service = Rc::new(MemoryObjectService::new());
    service.seed(
        "books",
        vec![
            json!({ "id": 1, "title": "Dune", "stock": 3 }),
            json!({ "id": 2, "title": "Hyperion", "stock": 1 }),
        ],
    );

    let mut hooks = HookRegistry::new();
    register_defaults(&mut hooks, service.clone());
    hooks.on_init("initBookCard", |store, component| {
        // The store attached dataItem/dataIndex when it instantiated the
        // card; fan the record out to the suffixed text children.
        let Some(item) = component.property("dataItem").cloned() else {
            return;
        };
        let Some(index) = component.property("dataIndex").and_then(Value::as_u64) else {
            return;
        };
        let mut title = dynui::Properties::new();
        title.insert("text".into(), item["title"].clone());
        store.change_component(&format!("bookTitle_{index}"), title);

        let mut stock = dynui::Properties::new();
        stock.insert("text".into(), json!(format!("{} in stock", item["stock"])));
        store.change_component(&format!("bookStock_{index}"), stock);
    });

    let table_events: Rc<RefCell<Option<Events>>> = Rc::new(RefCell::new(None));
    let mut paints = PaintTable::new();
    for tag in [
        "Layout",
        "Header",
        "Content",
        "Menu",
        "MenuItem",
        "Card",
        "Text",
        "Form",
        "Input",
        "InputNumber",
    ] {
        paints.register(tag, paint);
    }
    paints.register_collection("List", paint);
    {
        let table_events = table_events.clone();
        paints.register("Table", move |ctx: PaintCtx<String>| {
            *table_events.borrow_mut() = Some(ctx.events.clone());
            paint(ctx)
        });
    }

    let app = App::from_json(DOCUMENT).expect("demo document is well-formed");
    let store = Store::new(app);
    let interpreter = Interpreter::new(store.clone(), Rc::new(hooks), Rc::new(paints));

    println!("=== first pass (init hooks load data) ===");
    println!("{}", interpreter.render());

    // Simulate the user activating the second table row.
    let record = service.list("books").expect("seeded")[1].clone();
    let events = table_events.borrow().clone().expect("table painted");
    (events.row_click)(&record, 1);

    println!();
    println!("=== after row click (form populated, one cell republished) ===");
    println!("{}", interpreter.render());
}
