//! Parser for the `mongoQuery` escape hatch.
//!
//! Callers may pass a whole filter document in store syntax. Only a closed
//! set of predicates is accepted:
//!
//! - implicit equality: `{"status": "active"}`
//! - `$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte` with a scalar operand
//! - `$in`, `$nin` with an array of scalars
//! - `$and`, `$or` with a non-empty array of filter documents
//!
//! Everything else (`$where`, `$regex`, `$expr`, nested documents, unknown
//! operators) is rejected with `ListError::MalformedFilter` before the store
//! is touched.

use serde_json::{Map, Value};

use super::expression::{ComparisonOp, FilterExpression, Membership};
use crate::errors::ListError;

const MAX_NESTING_DEPTH: usize = 8;

/// A top-level filter entry: the key it occupies and the predicate it holds
pub type Clause = (String, FilterExpression);

/// Parse a serialized filter document into keyed clauses.
///
/// # Errors
///
/// Returns `ListError::MalformedFilter` if `raw` is not JSON, not an object,
/// or uses anything outside the supported predicate set.
pub fn parse_override(raw: &str) -> Result<Vec<Clause>, ListError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(map) = value else {
        return Err(ListError::malformed_filter("expected a JSON object"));
    };
    parse_document(&map, 0)
}

fn parse_document(map: &Map<String, Value>, depth: usize) -> Result<Vec<Clause>, ListError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ListError::malformed_filter("filter is nested too deeply"));
    }
    map.iter()
        .map(|(key, value)| {
            let expr = match key.as_str() {
                "$and" => FilterExpression::And(parse_branches(key, value, depth)?),
                "$or" => FilterExpression::Or(parse_branches(key, value, depth)?),
                "" => return Err(ListError::malformed_filter("empty field name")),
                op if op.starts_with('$') => {
                    return Err(ListError::malformed_filter(format!(
                        "unsupported operator '{op}'"
                    )));
                }
                field => parse_condition(field, value)?,
            };
            Ok((key.clone(), expr))
        })
        .collect()
}

fn parse_branches(
    operator: &str,
    value: &Value,
    depth: usize,
) -> Result<Vec<FilterExpression>, ListError> {
    let Some(branches) = value.as_array().filter(|b| !b.is_empty()) else {
        return Err(ListError::malformed_filter(format!(
            "'{operator}' expects a non-empty array"
        )));
    };
    branches
        .iter()
        .map(|branch| {
            let Value::Object(map) = branch else {
                return Err(ListError::malformed_filter(format!(
                    "'{operator}' entries must be objects"
                )));
            };
            let clauses = parse_document(map, depth + 1)?;
            Ok(conjunction(clauses))
        })
        .collect()
}

fn conjunction(clauses: Vec<Clause>) -> FilterExpression {
    let mut exprs: Vec<FilterExpression> = clauses.into_iter().map(|(_, e)| e).collect();
    if exprs.len() == 1 {
        exprs.remove(0)
    } else {
        FilterExpression::And(exprs)
    }
}

fn parse_condition(field: &str, value: &Value) -> Result<FilterExpression, ListError> {
    match value {
        Value::Object(ops) => {
            if ops.is_empty() || !ops.keys().all(|k| k.starts_with('$')) {
                return Err(ListError::malformed_filter(format!(
                    "condition on '{field}' must use operators; nested documents are not supported"
                )));
            }
            let mut leaves = ops
                .iter()
                .map(|(op, operand)| parse_operator(field, op, operand))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(if leaves.len() == 1 {
                leaves.remove(0)
            } else {
                FilterExpression::And(leaves)
            })
        }
        Value::Array(_) => Err(ListError::malformed_filter(format!(
            "array value for '{field}'; use $in"
        ))),
        scalar => Ok(FilterExpression::equals(field, scalar.clone())),
    }
}

fn parse_operator(field: &str, op: &str, operand: &Value) -> Result<FilterExpression, ListError> {
    match op {
        "$eq" => Ok(FilterExpression::equals(field, scalar(field, op, operand)?)),
        "$in" | "$nin" => {
            let Some(items) = operand.as_array() else {
                return Err(ListError::malformed_filter(format!(
                    "'{op}' on '{field}' expects an array"
                )));
            };
            let values = items
                .iter()
                .map(|v| scalar(field, op, v))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(FilterExpression::Membership {
                path: field.to_string(),
                membership: if op == "$in" {
                    Membership::In
                } else {
                    Membership::NotIn
                },
                values,
            })
        }
        _ => match ComparisonOp::from_operator(op) {
            Some(cmp) => Ok(FilterExpression::Compare {
                path: field.to_string(),
                op: cmp,
                value: scalar(field, op, operand)?,
            }),
            None => Err(ListError::malformed_filter(format!(
                "unsupported operator '{op}' on '{field}'"
            ))),
        },
    }
}

fn scalar(field: &str, op: &str, value: &Value) -> Result<Value, ListError> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(value.clone()),
        _ => Err(ListError::malformed_filter(format!(
            "'{op}' on '{field}' expects scalar values"
        ))),
    }
}
