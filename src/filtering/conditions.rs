use serde_json::Value;
use std::collections::BTreeMap;

use super::expression::{FilterExpression, Membership};
use super::path::ArrayElementPath;
use crate::errors::ListError;

/// Field path -> comma-separated value list, as decoded from one of the
/// `inList`, `notInList`, `inListArrOfObj` or `notInListArrOfObj` groups
pub type FilterGroup = BTreeMap<String, String>;

/// Split a comma list into filter values.
///
/// Empty tokens are kept: `"a,,b"` yields `["a", "", "b"]`.
#[must_use]
pub fn split_values(list: &str) -> Vec<Value> {
    list.split(',').map(|v| Value::String(v.to_string())).collect()
}

/// One equality leaf per remaining query parameter
#[must_use]
pub fn build_equality(filters: &BTreeMap<String, String>) -> Vec<FilterExpression> {
    filters
        .iter()
        .map(|(field, value)| FilterExpression::equals(field.clone(), value.clone()))
        .collect()
}

/// `field -> "a,b"` becomes "field is one of {a, b}"
#[must_use]
pub fn build_in_list(group: &FilterGroup) -> Vec<FilterExpression> {
    build_membership(group, Membership::In)
}

/// `field -> "a,b"` becomes "field is none of {a, b}"
#[must_use]
pub fn build_not_in_list(group: &FilterGroup) -> Vec<FilterExpression> {
    build_membership(group, Membership::NotIn)
}

fn build_membership(group: &FilterGroup, membership: Membership) -> Vec<FilterExpression> {
    group
        .iter()
        .map(|(field, list)| FilterExpression::Membership {
            path: field.clone(),
            membership,
            values: split_values(list),
        })
        .collect()
}

/// `arrayField.subField -> "a,b"` becomes "some element of arrayField has
/// subField in (or not in) {a, b}"
///
/// # Errors
///
/// Returns `ListError::InvalidFieldPath` for any key that is not exactly
/// `arrayField.subField`.
pub fn build_array_element(
    group: &FilterGroup,
    membership: Membership,
) -> Result<Vec<FilterExpression>, ListError> {
    group
        .iter()
        .map(|(key, list)| {
            let path = ArrayElementPath::parse(key)?;
            Ok(FilterExpression::ElementMatch {
                path: path.array_field,
                sub_field: path.sub_field,
                membership,
                values: split_values(list),
            })
        })
        .collect()
}
