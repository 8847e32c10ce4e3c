//! The composed, store-ready filter tree.

use serde_json::{Map, Value, json};

/// Range and inequality operators, only reachable through `mongoQuery`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ComparisonOp {
    /// Parse a store operator name such as `$gte`
    #[must_use]
    pub fn from_operator(operator: &str) -> Option<Self> {
        match operator {
            "$ne" => Some(Self::Ne),
            "$gt" => Some(Self::Gt),
            "$gte" => Some(Self::Gte),
            "$lt" => Some(Self::Lt),
            "$lte" => Some(Self::Lte),
            _ => None,
        }
    }

    #[must_use]
    pub fn operator(self) -> &'static str {
        match self {
            Self::Ne => "$ne",
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
        }
    }
}

/// Whether a value must be inside or outside a set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    In,
    NotIn,
}

impl Membership {
    #[must_use]
    pub fn operator(self) -> &'static str {
        match self {
            Self::In => "$in",
            Self::NotIn => "$nin",
        }
    }
}

/// A filter over documents.
///
/// Leaves constrain one field path; `And` and `Or` combine. Field paths are
/// used exactly as the caller wrote them. Callers exposing this to untrusted
/// transports must vet field names themselves if that matters to them.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    /// Every child must match. An empty `And` matches every document.
    And(Vec<FilterExpression>),
    /// At least one child must match
    Or(Vec<FilterExpression>),
    /// `path` equals `value`
    Equals { path: String, value: Value },
    /// `path` compares to `value` with `op`
    Compare {
        path: String,
        op: ComparisonOp,
        value: Value,
    },
    /// `path` is one of / none of `values`
    Membership {
        path: String,
        membership: Membership,
        values: Vec<Value>,
    },
    /// Some element of the array at `path` has `sub_field` in / not in `values`
    ElementMatch {
        path: String,
        sub_field: String,
        membership: Membership,
        values: Vec<Value>,
    },
    /// `path` contains `needle`, ignoring case
    Contains { path: String, needle: String },
}

impl FilterExpression {
    /// The expression that matches every document
    #[must_use]
    pub fn match_all() -> Self {
        Self::And(Vec::new())
    }

    #[must_use]
    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::And(children) if children.is_empty())
    }

    #[must_use]
    pub fn equals(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals {
            path: path.into(),
            value: value.into(),
        }
    }

    /// The top-level key this expression occupies when written as a store
    /// filter document: the field path for leaves, `$and` / `$or` otherwise
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::And(_) => "$and",
            Self::Or(_) => "$or",
            Self::Equals { path, .. }
            | Self::Compare { path, .. }
            | Self::Membership { path, .. }
            | Self::ElementMatch { path, .. }
            | Self::Contains { path, .. } => path,
        }
    }

    /// Render in Mongo-style filter syntax.
    ///
    /// `And` children with distinct keys are flattened into one object;
    /// if two children share a key the whole conjunction is written as
    /// `$and` so no constraint is lost.
    #[must_use]
    pub fn to_document(&self) -> Value {
        match self {
            Self::And(children) => {
                let mut merged = Map::new();
                for child in children {
                    let Value::Object(rendered) = child.to_document() else {
                        continue;
                    };
                    for (key, value) in rendered {
                        if merged.contains_key(&key) {
                            return json!({
                                "$and": children.iter().map(Self::to_document).collect::<Vec<_>>()
                            });
                        }
                        merged.insert(key, value);
                    }
                }
                Value::Object(merged)
            }
            Self::Or(children) => {
                json!({ "$or": children.iter().map(Self::to_document).collect::<Vec<_>>() })
            }
            Self::Equals { path, value } => {
                let condition = if value.is_object() {
                    json!({ "$eq": value })
                } else {
                    value.clone()
                };
                single(path, condition)
            }
            Self::Compare { path, op, value } => single(path, json!({ op.operator(): value })),
            Self::Membership {
                path,
                membership,
                values,
            } => single(path, json!({ membership.operator(): values })),
            Self::ElementMatch {
                path,
                sub_field,
                membership,
                values,
            } => single(
                path,
                json!({ "$elemMatch": { sub_field.as_str(): { membership.operator(): values } } }),
            ),
            Self::Contains { path, needle } => single(
                path,
                json!({ "$regex": escape_regex(needle), "$options": "i" }),
            ),
        }
    }
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Escape regex metacharacters so a search term is matched literally
#[must_use]
pub fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
                | '-' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
