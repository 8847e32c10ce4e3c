//! Raw query pairs to a typed [`ParsedListQuery`].
//!
//! Reserved keys (`page`, `limit`, `skip`, `sort`, `q`, `mongoQuery`,
//! `fields`) are read into [`ListParams`]; bracketed group keys such as
//! `inList[status]` fill the four filter groups; every other key becomes an
//! equality filter. A plain key given twice keeps its last value.

use std::collections::BTreeMap;

use crate::config::ListConfig;
use crate::errors::ListError;
use crate::filtering::{Clause, FilterGroup, SortSpec, parse_override};
use crate::models::ListParams;
use crate::pagination::PaginationSpec;

/// Everything a list request asked for, before composition
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedListQuery {
    pub pagination: PaginationSpec,
    pub sort: SortSpec,
    /// Empty when `q` was absent or blank
    pub search_term: String,
    /// Clauses from `mongoQuery`, empty when it was not given
    pub raw_filter_override: Vec<Clause>,
    /// Fields to return, deduplicated; empty means all
    pub projection: Vec<String>,
    pub in_list: FilterGroup,
    pub not_in_list: FilterGroup,
    pub in_list_arr_of_obj: FilterGroup,
    pub not_in_list_arr_of_obj: FilterGroup,
    /// Non-reserved keys, matched by equality
    pub remaining_filters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    InList,
    NotInList,
    InListArrOfObj,
    NotInListArrOfObj,
}

impl Group {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "inList" => Some(Self::InList),
            "notInList" => Some(Self::NotInList),
            "inListArrOfObj" => Some(Self::InListArrOfObj),
            "notInListArrOfObj" => Some(Self::NotInListArrOfObj),
            _ => None,
        }
    }
}

/// Split `inList[status]` into its group and field path
fn split_group_key(key: &str) -> Option<(Group, &str)> {
    let (name, rest) = key.split_once('[')?;
    let field = rest.strip_suffix(']')?;
    if field.is_empty() || field.contains(['[', ']']) {
        return None;
    }
    Some((Group::from_name(name)?, field))
}

/// Filter keys name fields; a `$` segment would be read by the store as an
/// operator.
fn check_field_name(field: &str) -> Result<(), ListError> {
    if field.split('.').any(|segment| segment.starts_with('$')) {
        tracing::warn!(field, "Rejected operator used as a filter field");
        return Err(ListError::malformed_filter(format!(
            "'{field}' is not a field name; operators are only accepted in mongoQuery"
        )));
    }
    Ok(())
}

/// Parse the decoded query pairs of one list request.
///
/// Pagination, sort and projection never fail; invalid values fall back to
/// their defaults.
///
/// # Errors
///
/// Returns `ListError::MalformedFilter` if `mongoQuery` is not valid JSON or
/// uses an operator outside the supported set, or if a filter key or group
/// field has a segment starting with `$`.
pub fn parse_list_query(
    pairs: &[(String, String)],
    config: &ListConfig,
) -> Result<ParsedListQuery, ListError> {
    let mut params = ListParams::default();
    let mut groups: [FilterGroup; 4] = Default::default();
    let mut remaining_filters = BTreeMap::new();

    for (key, value) in pairs {
        if params.set(key, value) {
            continue;
        }
        if let Some((group, field)) = split_group_key(key) {
            check_field_name(field)?;
            groups[group as usize].insert(field.to_string(), value.clone());
        } else {
            check_field_name(key)?;
            remaining_filters.insert(key.clone(), value.clone());
        }
    }

    let raw_filter_override = match params.mongo_query.as_deref() {
        Some(raw) => parse_override(raw).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected mongoQuery");
        })?,
        None => Vec::new(),
    };

    let pagination = PaginationSpec::parse(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.skip.as_deref(),
        config,
    );
    let sort = SortSpec::parse_or(params.sort.as_deref(), &config.default_sort);
    let projection = params
        .fields
        .as_deref()
        .map(parse_projection)
        .unwrap_or_default();

    let [in_list, not_in_list, in_list_arr_of_obj, not_in_list_arr_of_obj] = groups;

    Ok(ParsedListQuery {
        pagination,
        sort,
        search_term: params.q.unwrap_or_default(),
        raw_filter_override,
        projection,
        in_list,
        not_in_list,
        in_list_arr_of_obj,
        not_in_list_arr_of_obj,
        remaining_filters,
    })
}

/// Split a `fields` list on commas, dropping blanks and repeats while keeping
/// first-seen order: `"name,,email,name"` gives `["name", "email"]`.
#[must_use]
pub fn parse_projection(fields: &str) -> Vec<String> {
    let mut projection: Vec<String> = Vec::new();
    for field in fields.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        if !projection.iter().any(|p| p == field) {
            projection.push(field.to_string());
        }
    }
    projection
}
