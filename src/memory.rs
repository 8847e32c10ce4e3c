//! In-process document store.
//!
//! [`MemoryStore`] keeps named collections of JSON documents in memory and
//! evaluates [`FilterExpression`]s directly against them. It backs the test
//! suite and the benchmark, and is a usable reference backend for small
//! data sets.
//!
//! ```rust
//! use listcrate::MemoryStore;
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.insert("authors", json!({"_id": "a1", "name": "Ada"}));
//! store.insert("posts", json!({"title": "Notes", "author": "a1"}));
//! store.relate("posts", "author", "authors");
//!
//! let posts = store.collection("posts");
//! assert_eq!(posts.len(), 1);
//! ```

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use uuid::Uuid;

use crate::filtering::eval::{lookup, sort_order};
use crate::filtering::{FilterExpression, SortDirection, SortSpec};
use crate::store::{DocumentStore, FindRequest, StoreError};

const ID_FIELD: &str = "_id";

#[derive(Debug, Default)]
struct Collections {
    documents: HashMap<String, Vec<Value>>,
    /// collection -> field -> target collection
    relations: HashMap<String, HashMap<String, String>>,
}

#[derive(Debug, Default)]
struct Shared {
    data: RwLock<Collections>,
    failure: Option<String>,
    operations: AtomicU64,
}

/// Named collections of JSON documents behind a shared lock.
///
/// Cloning is cheap; clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every count and find fails with `message`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                failure: Some(message.into()),
                ..Shared::default()
            }),
        }
    }

    /// Add a document to `collection`, assigning a UUID `_id` when it has
    /// none. Returns the document's id.
    ///
    /// Non-object values are stored inside `{"value": ...}`.
    pub fn insert(&self, collection: &str, document: Value) -> String {
        let mut document = match document {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        let id = match document.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        self.shared
            .data
            .write()
            .documents
            .entry(collection.to_string())
            .or_default()
            .push(Value::Object(document));
        id
    }

    /// Declare that `field` in `collection` holds ids of documents in
    /// `target`, so it can be expanded.
    pub fn relate(&self, collection: &str, field: &str, target: &str) {
        self.shared
            .data
            .write()
            .relations
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string(), target.to_string());
    }

    /// Handle on one collection, usable as a [`DocumentStore`]
    #[must_use]
    pub fn collection(&self, name: impl Into<String>) -> MemoryCollection {
        MemoryCollection {
            store: self.clone(),
            name: name.into(),
        }
    }

    /// Number of count and find calls served so far, failed ones included
    #[must_use]
    pub fn operations(&self) -> u64 {
        self.shared.operations.load(AtomicOrdering::Relaxed)
    }

    fn begin_operation(&self) -> Result<(), StoreError> {
        self.shared.operations.fetch_add(1, AtomicOrdering::Relaxed);
        match &self.shared.failure {
            Some(message) => Err(StoreError::new(message.clone())),
            None => Ok(()),
        }
    }
}

/// One collection of a [`MemoryStore`]
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    store: MemoryStore,
    name: String,
}

impl MemoryCollection {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of documents in the collection
    #[must_use]
    pub fn len(&self) -> usize {
        self.store
            .shared
            .data
            .read()
            .documents
            .get(&self.name)
            .map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a document to this collection; see [`MemoryStore::insert`]
    pub fn insert(&self, document: Value) -> String {
        self.store.insert(&self.name, document)
    }
}

#[async_trait]
impl DocumentStore for MemoryCollection {
    async fn count(&self, filter: &FilterExpression) -> Result<u64, StoreError> {
        self.store.begin_operation()?;

        let data = self.store.shared.data.read();
        let count = data
            .documents
            .get(&self.name)
            .map_or(0, |docs| docs.iter().filter(|d| filter.matches(d)).count());
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn find(&self, request: &FindRequest<'_>) -> Result<Vec<Value>, StoreError> {
        self.store.begin_operation()?;

        let data = self.store.shared.data.read();
        let Some(documents) = data.documents.get(&self.name) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<&Value> = documents
            .iter()
            .filter(|d| request.filter.matches(d))
            .collect();
        matched.sort_by(|a, b| compare_documents(a, b, request.sort));

        let skip = usize::try_from(request.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);

        let relations = data.relations.get(&self.name);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| {
                let mut doc = project(doc, request.projection);
                if let Some(relations) = relations {
                    expand(&mut doc, request.expansions, relations, &data.documents);
                }
                doc
            })
            .collect())
    }
}

fn compare_documents(a: &Value, b: &Value, sort: &SortSpec) -> Ordering {
    for key in &sort.keys {
        let ord = sort_order(lookup(a, &key.field), lookup(b, &key.field));
        let ord = match key.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Copy only the requested fields, plus `_id`. Dotted fields keep their
/// nesting.
fn project(doc: &Value, fields: &[String]) -> Value {
    if fields.is_empty() {
        return doc.clone();
    }

    let mut out = Map::new();
    if let Some(id) = doc.get(ID_FIELD) {
        out.insert(ID_FIELD.to_string(), id.clone());
    }
    for field in fields {
        if let Some(value) = lookup(doc, field) {
            insert_path(&mut out, field, value.clone());
        }
    }
    Value::Object(out)
}

fn insert_path(out: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            out.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = out
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

/// Replace id references with the documents they point to.
///
/// A single id that resolves to nothing becomes `null`; unresolved ids in
/// an array are dropped. Fields without a declared relation are left alone.
fn expand(
    doc: &mut Value,
    expansions: &[String],
    relations: &HashMap<String, String>,
    documents: &HashMap<String, Vec<Value>>,
) {
    let Value::Object(map) = doc else {
        return;
    };

    for field in expansions {
        let Some(target) = relations.get(field) else {
            tracing::debug!(field, "No relation registered for expansion");
            continue;
        };
        let Some(current) = map.get_mut(field) else {
            continue;
        };
        let targets = documents.get(target).map_or(&[][..], Vec::as_slice);
        let resolve = |id: &Value| {
            targets
                .iter()
                .find(|candidate| candidate.get(ID_FIELD) == Some(id))
                .cloned()
        };

        *current = match &*current {
            Value::Array(ids) => Value::Array(ids.iter().filter_map(resolve).collect()),
            Value::Null => Value::Null,
            id => resolve(id).unwrap_or(Value::Null),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::SortKey;
    use serde_json::json;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert("users", json!({"_id": "u1", "name": "Ada", "age": 36, "createdAt": 3}));
        store.insert("users", json!({"_id": "u2", "name": "Alan", "age": 41, "createdAt": 1}));
        store.insert("users", json!({"_id": "u3", "name": "Grace", "createdAt": 2}));
        store
    }

    fn sort(field: &str, direction: SortDirection) -> SortSpec {
        SortSpec {
            keys: vec![SortKey {
                field: field.into(),
                direction,
            }],
        }
    }

    async fn find_all(
        collection: &MemoryCollection,
        sort: &SortSpec,
        projection: &[String],
        expansions: &[String],
    ) -> Vec<Value> {
        let filter = FilterExpression::match_all();
        let request = FindRequest {
            filter: &filter,
            sort,
            skip: 0,
            limit: 100,
            projection,
            expansions,
        };
        collection.find(&request).await.unwrap()
    }

    #[test]
    fn test_insert_assigns_id() {
        let store = MemoryStore::new();
        let id = store.insert("things", json!({"name": "x"}));
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(store.collection("things").len(), 1);
    }

    #[test]
    fn test_insert_keeps_existing_id() {
        let store = MemoryStore::new();
        assert_eq!(store.insert("things", json!({"_id": "fixed"})), "fixed");
    }

    #[tokio::test]
    async fn test_count_applies_filter() {
        let users = seeded().collection("users");
        let filter = FilterExpression::equals("name", "Ada");
        assert_eq!(users.count(&filter).await.unwrap(), 1);
        assert_eq!(users.count(&FilterExpression::match_all()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let missing = seeded().collection("nope");
        assert_eq!(missing.count(&FilterExpression::match_all()).await.unwrap(), 0);
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_sort_missing_values_first() {
        let users = seeded().collection("users");
        let docs = find_all(&users, &sort("age", SortDirection::Asc), &[], &[]).await;
        let ids: Vec<&str> = docs.iter().map(|d| d["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["u3", "u1", "u2"]);
    }

    #[tokio::test]
    async fn test_sort_descending() {
        let users = seeded().collection("users");
        let docs = find_all(&users, &sort("createdAt", SortDirection::Desc), &[], &[]).await;
        assert_eq!(docs[0]["_id"], "u1");
        assert_eq!(docs[2]["_id"], "u2");
    }

    #[tokio::test]
    async fn test_skip_and_limit() {
        let users = seeded().collection("users");
        let filter = FilterExpression::match_all();
        let spec = sort("createdAt", SortDirection::Asc);
        let request = FindRequest {
            filter: &filter,
            sort: &spec,
            skip: 1,
            limit: 1,
            projection: &[],
            expansions: &[],
        };
        let docs = users.find(&request).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["_id"], "u3");
    }

    #[tokio::test]
    async fn test_projection_keeps_id() {
        let users = seeded().collection("users");
        let docs = find_all(&users, &SortSpec::default(), &["name".to_string()], &[]).await;
        assert_eq!(docs[0], json!({"_id": "u1", "name": "Ada"}));
    }

    #[tokio::test]
    async fn test_projection_of_nested_field() {
        let store = MemoryStore::new();
        store.insert("places", json!({"_id": "p", "address": {"city": "London", "zip": "N1"}}));
        let docs = find_all(
            &store.collection("places"),
            &SortSpec::default(),
            &["address.city".to_string()],
            &[],
        )
        .await;
        assert_eq!(docs[0], json!({"_id": "p", "address": {"city": "London"}}));
    }

    #[tokio::test]
    async fn test_expansion_resolves_ids() {
        let store = MemoryStore::new();
        store.insert("authors", json!({"_id": "a1", "name": "Ada"}));
        store.insert("posts", json!({"_id": "p1", "author": "a1", "editors": ["a1", "zz"]}));
        store.insert("posts", json!({"_id": "p2", "author": "missing"}));
        store.relate("posts", "author", "authors");
        store.relate("posts", "editors", "authors");

        let docs = find_all(
            &store.collection("posts"),
            &SortSpec::default(),
            &[],
            &["author".to_string(), "editors".to_string()],
        )
        .await;
        assert_eq!(docs[0]["author"]["name"], "Ada");
        assert_eq!(docs[0]["editors"], json!([{"_id": "a1", "name": "Ada"}]));
        assert_eq!(docs[1]["author"], Value::Null);
    }

    #[tokio::test]
    async fn test_expansion_without_relation_is_noop() {
        let store = MemoryStore::new();
        store.insert("posts", json!({"_id": "p1", "author": "a1"}));
        let docs = find_all(
            &store.collection("posts"),
            &SortSpec::default(),
            &[],
            &["author".to_string()],
        )
        .await;
        assert_eq!(docs[0]["author"], "a1");
    }

    #[tokio::test]
    async fn test_failing_store_reports_error() {
        let store = MemoryStore::failing("connection refused");
        let err = store
            .collection("users")
            .count(&FilterExpression::match_all())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "connection refused");
        assert_eq!(store.operations(), 1);
    }
}
