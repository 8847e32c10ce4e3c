//! Document store boundary.
//!
//! The list pipeline never talks to a database directly. Instead it issues
//! exactly two operations against a [`DocumentStore`]: a count and a bounded
//! fetch, both with the same composed [`FilterExpression`].

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::filtering::{FilterExpression, SortSpec};

/// Error raised by a store backend during count or fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StoreError {}

/// Everything a backend needs to run the page fetch
#[derive(Debug, Clone, Copy)]
pub struct FindRequest<'a> {
    pub filter: &'a FilterExpression,
    pub sort: &'a SortSpec,
    pub skip: u64,
    pub limit: u64,
    /// Fields to return; empty means every field
    pub projection: &'a [String],
    /// Relations to populate on each returned document, in order
    pub expansions: &'a [String],
}

/// A collection that can be counted and paged through.
///
/// Implementations receive the filter as a validated tree; adapters for
/// backends that speak the Mongo-style JSON syntax can pass
/// [`FilterExpression::to_document`] through unchanged.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Number of documents matching `filter`
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the backend fails.
    async fn count(&self, filter: &FilterExpression) -> Result<u64, StoreError>;

    /// Matching documents, sorted, skipped, limited, projected and expanded
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the backend fails.
    async fn find(&self, request: &FindRequest<'_>) -> Result<Vec<Value>, StoreError>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    async fn count(&self, filter: &FilterExpression) -> Result<u64, StoreError> {
        (**self).count(filter).await
    }

    async fn find(&self, request: &FindRequest<'_>) -> Result<Vec<Value>, StoreError> {
        (**self).find(request).await
    }
}
