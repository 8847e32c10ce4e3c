//! # listcrate
//!
//! Paginated, filterable list endpoints over document stores for Axum.
//!
//! A request's query string is parsed into typed parameters, compiled into a
//! single [`FilterExpression`] and executed as one count plus one bounded
//! fetch against a [`DocumentStore`]. The response carries the page of
//! documents and the page metadata:
//!
//! ```json
//! {
//!   "status": "success",
//!   "data": [ ... ],
//!   "pageInfo": {
//!     "currentPage": 2, "perPage": 10, "pageCount": 3, "skipCount": 10,
//!     "itemCount": 25, "hasNextPage": true, "hasPreviousPage": true
//!   }
//! }
//! ```
//!
//! See [`filtering`] for the supported query parameters.

pub mod config;
pub mod errors;
pub mod filtering;
pub mod memory;
pub mod models;
pub mod operations;
pub mod pagination;
pub mod query_parser;
pub mod routes;
pub mod store;

pub use config::{ListConfig, ListOptions};
pub use errors::ListError;
pub use filtering::{FilterExpression, SortSpec};
pub use memory::{MemoryCollection, MemoryStore};
pub use models::{ListParams, ListResponse};
pub use operations::{build_filter, list_documents};
pub use pagination::{PageInfo, PaginationSpec};
pub use query_parser::{ParsedListQuery, parse_list_query};
pub use routes::{ListState, get_all, list_router};
pub use store::{DocumentStore, FindRequest, StoreError};
