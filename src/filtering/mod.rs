//! # Query Filtering & Search
//!
//! Turns list query parameters into a [`FilterExpression`] that a document
//! store can execute. Nothing here touches the store.
//!
//! ## Query Parameter Examples
//!
//! ```text
//! // Equality on any non-reserved key
//! GET /users?status=active&address.city=London
//!
//! // Set membership and its negation
//! GET /users?inList[status]=active,pending
//! GET /users?notInList[role]=admin,root
//!
//! // Some element of an array of objects has a field in / not in a set
//! GET /orders?inListArrOfObj[items.sku]=A1,B2
//! GET /orders?notInListArrOfObj[items.sku]=Z9
//!
//! // Free-text search over the endpoint's search fields
//! GET /users?q=ada
//!
//! // Raw filter document, restricted to eq/ne/gt/gte/lt/lte/in/nin/and/or
//! GET /users?mongoQuery={"age":{"$gte":18}}
//!
//! // Sorting
//! GET /users?sort=-createdAt
//! ```
//!
//! ## Composition
//!
//! Fragments are merged by [`compose_filter`] in a fixed precedence where a
//! later category replaces an earlier one on the same field, and the search
//! disjunction is always an extra AND term.

pub mod compose;
pub mod conditions;
pub mod eval;
pub mod expression;
pub mod override_filter;
pub mod path;
pub mod search;
pub mod sort;

pub use compose::{FilterParts, compose_filter};
pub use conditions::{
    FilterGroup, build_array_element, build_equality, build_in_list, build_not_in_list,
    split_values,
};
pub use expression::{ComparisonOp, FilterExpression, Membership, escape_regex};
pub use override_filter::{Clause, parse_override};
pub use path::ArrayElementPath;
pub use search::build_search;
pub use sort::{SortDirection, SortKey, SortSpec};
