use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use std::sync::Arc;

use crate::config::{ListConfig, ListOptions};
use crate::errors::ListError;
use crate::models::ListResponse;
use crate::operations::list_documents;
use crate::store::DocumentStore;

/// Shared state of one list endpoint
pub struct ListState<S> {
    pub store: Arc<S>,
    pub options: Arc<ListOptions>,
    pub config: Arc<ListConfig>,
}

impl<S> ListState<S> {
    #[must_use]
    pub fn new(store: S, options: ListOptions, config: ListConfig) -> Self {
        Self {
            store: Arc::new(store),
            options: Arc::new(options),
            config: Arc::new(config),
        }
    }
}

// Manual impl: `S` itself does not need to be `Clone`.
impl<S> Clone for ListState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            options: Arc::clone(&self.options),
            config: Arc::clone(&self.config),
        }
    }
}

/// List documents with filtering, search, sorting and pagination.
///
/// The raw query pairs are read in order so repeated keys and bracketed
/// group keys (`inList[status]=a,b`) reach the parser untouched.
///
/// Responds 200 with `{status, data, pageInfo}`, or 500 with `{error}`.
pub async fn get_all<S>(
    State(state): State<ListState<S>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListResponse>, ListError>
where
    S: DocumentStore + 'static,
{
    let response =
        list_documents(state.store.as_ref(), &pairs, &state.options, &state.config).await?;
    Ok(Json(response))
}

/// Router serving [`get_all`] at `/`; nest it under the resource path.
///
/// ```rust,no_run
/// use axum::Router;
/// use listcrate::{ListConfig, ListOptions, ListState, MemoryStore, list_router};
///
/// let store = MemoryStore::new();
/// let state = ListState::new(
///     store.collection("users"),
///     ListOptions::default().with_search_fields(["name", "email"]),
///     ListConfig::default(),
/// );
/// let app: Router = Router::new().nest("/users", list_router(state));
/// ```
pub fn list_router<S>(state: ListState<S>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new().route("/", get(get_all::<S>)).with_state(state)
}
