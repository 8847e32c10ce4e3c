//! Configuration for list endpoints.
//!
//! [`ListConfig`] holds router-wide limits and defaults. [`ListOptions`]
//! describes one endpoint: extra filters it always applies, the relations it
//! expands and the fields `q` searches.

use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;
pub const DEFAULT_MAX_LIMIT: u64 = 1000;
pub const DEFAULT_SORT: &str = "-createdAt";
const DEFAULT_MAX_SEARCH_LENGTH: usize = 10_000;

/// Limits and defaults applied while parsing list parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    /// Page size when `limit` is missing or invalid
    pub default_limit: u64,
    /// Largest page size a caller may request
    pub max_limit: u64,
    /// Sort used when `sort` is missing or blank
    pub default_sort: String,
    /// Search terms longer than this many characters are truncated
    pub max_search_length: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            default_sort: DEFAULT_SORT.to_string(),
            max_search_length: DEFAULT_MAX_SEARCH_LENGTH,
        }
    }
}

impl ListConfig {
    #[must_use]
    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_max_limit(mut self, limit: u64) -> Self {
        self.max_limit = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_default_sort(mut self, sort: impl Into<String>) -> Self {
        self.default_sort = sort.into();
        self
    }

    #[must_use]
    pub fn with_max_search_length(mut self, length: usize) -> Self {
        self.max_search_length = length;
        self
    }
}

/// Per-endpoint behaviour
///
/// # Example
///
/// ```rust
/// use listcrate::ListOptions;
///
/// let options = ListOptions::default()
///     .with_base_filter("deleted", false)
///     .with_expansions(["author"])
///     .with_search_fields(["title", "body"]);
/// assert_eq!(options.search_fields, vec!["title", "body"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// Equality constraints applied to every request. They override query
    /// parameters with the same name.
    pub base_filter: BTreeMap<String, Value>,
    /// Relations populated on each returned document, in order
    pub expansions: Vec<String>,
    /// Fields matched by the `q` search term
    pub search_fields: Vec<String>,
}

impl ListOptions {
    #[must_use]
    pub fn with_base_filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base_filter.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_expansions<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expansions = relations.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}
