//! In-process evaluation of a [`FilterExpression`] against JSON documents,
//! following document-store matching rules: dotted paths descend into
//! objects and through arrays, and a condition on an array field holds when
//! the array itself or any of its elements satisfies it.

use serde_json::Value;
use std::cmp::Ordering;

use super::expression::{ComparisonOp, FilterExpression, Membership};

const MAX_PATH_DEPTH: usize = 32;

impl FilterExpression {
    /// Whether `doc` satisfies this filter
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::And(children) => children.iter().all(|c| c.matches(doc)),
            Self::Or(children) => children.iter().any(|c| c.matches(doc)),
            Self::Equals { path, value } => {
                candidates(doc, path).iter().any(|v| loosely_equal(v, value))
            }
            Self::Compare { path, op, value } => {
                let found = candidates(doc, path);
                match op {
                    ComparisonOp::Ne => !found.iter().any(|v| loosely_equal(v, value)),
                    _ => found.iter().any(|v| {
                        compare_values(v, value).is_some_and(|ord| satisfies(*op, ord))
                    }),
                }
            }
            Self::Membership {
                path,
                membership,
                values,
            } => member_of(&candidates(doc, path), *membership, values),
            Self::ElementMatch {
                path,
                sub_field,
                membership,
                values,
            } => lookup(doc, path).is_some_and(|found| match found {
                Value::Array(elements) => elements
                    .iter()
                    .any(|e| member_of(&candidates(e, sub_field), *membership, values)),
                _ => false,
            }),
            Self::Contains { path, needle } => {
                let needle = needle.to_lowercase();
                candidates(doc, path).iter().any(|v| {
                    v.as_str()
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

fn satisfies(op: ComparisonOp, ord: Ordering) -> bool {
    match op {
        ComparisonOp::Gt => ord == Ordering::Greater,
        ComparisonOp::Gte => ord != Ordering::Less,
        ComparisonOp::Lt => ord == Ordering::Less,
        ComparisonOp::Lte => ord != Ordering::Greater,
        ComparisonOp::Ne => ord != Ordering::Equal,
    }
}

fn member_of(found: &[&Value], membership: Membership, values: &[Value]) -> bool {
    let hit = found
        .iter()
        .any(|v| values.iter().any(|candidate| loosely_equal(v, candidate)));
    match membership {
        Membership::In => hit,
        Membership::NotIn => !hit,
    }
}

/// Resolve a dotted path without flattening arrays
#[must_use]
pub(crate) fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = doc;
    for (depth, segment) in path.split('.').enumerate() {
        if depth >= MAX_PATH_DEPTH {
            return None;
        }
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Every value a condition on `path` is tested against.
///
/// Arrays met along the way fan out to their elements; an array at the end
/// contributes itself and each element. A missing field yields `null`, so
/// `$nin` and `$ne` hold for documents without the field.
fn candidates<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    static NULL: Value = Value::Null;

    let segments: Vec<&str> = path.split('.').take(MAX_PATH_DEPTH).collect();
    let mut out = Vec::new();
    collect(doc, &segments, &mut out);
    if out.is_empty() {
        out.push(&NULL);
    }
    out
}

fn collect<'a>(value: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(value);
        if let Value::Array(elements) = value {
            out.extend(elements.iter());
        }
        return;
    };
    match value {
        Value::Object(map) => {
            if let Some(next) = map.get(*head) {
                collect(next, rest, out);
            }
        }
        Value::Array(elements) => {
            for element in elements {
                collect(element, segments, out);
            }
        }
        _ => {}
    }
}

/// Equality with query-string leniency: a string filter value also matches a
/// number or boolean with the same textual form
#[must_use]
pub(crate) fn loosely_equal(doc_value: &Value, filter_value: &Value) -> bool {
    if doc_value == filter_value {
        return true;
    }
    match (doc_value, filter_value) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Number(a), Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .is_ok_and(|parsed| a.as_f64() == Some(parsed)),
        (Value::Bool(a), Value::String(s)) => s.parse::<bool>().is_ok_and(|b| *a == b),
        _ => false,
    }
}

/// Ordering between a document value and a filter value of compatible type
#[must_use]
pub(crate) fn compare_values(doc_value: &Value, filter_value: &Value) -> Option<Ordering> {
    match (doc_value, filter_value) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Number(a), Value::String(s)) => a.as_f64()?.partial_cmp(&s.trim().parse().ok()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Total order used for sorting: missing < null < numbers < strings <
/// objects < arrays < booleans
#[must_use]
pub(crate) fn sort_order(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => {
            let rank = type_rank(x).cmp(&type_rank(y));
            if rank != Ordering::Equal {
                return rank;
            }
            match (x, y) {
                (Value::Number(m), Value::Number(n)) => m
                    .as_f64()
                    .unwrap_or(f64::NAN)
                    .total_cmp(&n.as_f64().unwrap_or(f64::NAN)),
                (Value::String(m), Value::String(n)) => m.cmp(n),
                (Value::Bool(m), Value::Bool(n)) => m.cmp(n),
                _ => Ordering::Equal,
            }
        }
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}
