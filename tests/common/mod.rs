#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use listcrate::{ListConfig, ListOptions, ListState, MemoryStore, list_router};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const STATUSES: [&str; 3] = ["active", "pending", "banned"];

/// 25 users `u01`..`u25`.
///
/// User `i` has `age = 20 + i`, `createdAt = i`, status
/// `STATUSES[i % 3]` (8 active, 9 pending, 8 banned), role `admin` for
/// `i <= 2`, and lives in London when `i` is even, Paris otherwise.
pub fn users_store() -> MemoryStore {
    let store = MemoryStore::new();
    for i in 1..=25u64 {
        store.insert(
            "users",
            json!({
                "_id": format!("u{i:02}"),
                "name": format!("User {i:02}"),
                "status": STATUSES[(i % 3) as usize],
                "role": if i <= 2 { "admin" } else { "member" },
                "age": 20 + i,
                "createdAt": i,
                "address": {"city": if i % 2 == 0 { "London" } else { "Paris" }},
            }),
        );
    }
    store
}

/// Four named people, three orders with line items, and two posts whose
/// `author` references the `people` collection
pub fn catalog_store() -> MemoryStore {
    let store = MemoryStore::new();
    for (id, name, email, created) in [
        ("p1", "Ada Lovelace", "ada@example.com", 1),
        ("p2", "Alan Turing", "alan@example.com", 2),
        ("p3", "Grace Hopper", "grace@example.com", 3),
        ("p4", "Adam (Smith)", "adam@example.org", 4),
    ] {
        store.insert(
            "people",
            json!({"_id": id, "name": name, "email": email, "createdAt": created}),
        );
    }

    store.insert(
        "orders",
        json!({"_id": "o1", "items": [{"sku": "A1", "qty": 1}, {"sku": "B2", "qty": 3}]}),
    );
    store.insert("orders", json!({"_id": "o2", "items": [{"sku": "B2", "qty": 1}]}));
    store.insert("orders", json!({"_id": "o3", "items": [{"sku": "C3", "qty": 2}]}));

    store.insert("posts", json!({"_id": "x1", "title": "Engines", "author": "p1", "createdAt": 2}));
    store.insert("posts", json!({"_id": "x2", "title": "Machines", "author": "p2", "createdAt": 1}));
    store.relate("posts", "author", "people");

    store
}

/// Route library logs to the test output; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn setup_app(store: &MemoryStore, collection: &str, options: ListOptions) -> Router {
    init_tracing();
    let state = ListState::new(store.collection(collection), options, ListConfig::default());
    list_router(state)
}

/// Encode query pairs, bracket keys and JSON values included
pub fn query(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                url_escape::encode_component(key),
                url_escape::encode_component(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Issue `GET /?<pairs>` and return the status and JSON body
pub async fn get_list(app: &Router, pairs: &[(&str, &str)]) -> (StatusCode, Value) {
    let uri = if pairs.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", query(pairs))
    };
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

pub fn ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["_id"].as_str().unwrap().to_string())
        .collect()
}
