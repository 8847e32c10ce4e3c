use serde_json::{Map, Value};

/// Direction of a single sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One field to sort by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered sort keys; earlier keys take priority
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub keys: Vec<SortKey>,
}

impl SortSpec {
    /// Parse a sort string such as `-createdAt` or `"status -createdAt"`.
    ///
    /// Keys are separated by spaces or commas. A leading `-` sorts that key
    /// descending; `+` or no sign sorts ascending. Returns `None` if the
    /// string holds no field names.
    #[must_use]
    pub fn parse(sort: &str) -> Option<Self> {
        let keys: Vec<SortKey> = sort
            .split([' ', ','])
            .filter_map(|token| {
                let (field, direction) = match token.trim() {
                    t if t.starts_with('-') => (&t[1..], SortDirection::Desc),
                    t if t.starts_with('+') => (&t[1..], SortDirection::Asc),
                    t => (t, SortDirection::Asc),
                };
                (!field.is_empty()).then(|| SortKey {
                    field: field.to_string(),
                    direction,
                })
            })
            .collect();
        (!keys.is_empty()).then_some(Self { keys })
    }

    /// Parse `sort`, falling back to `default` when it names no fields
    #[must_use]
    pub fn parse_or(sort: Option<&str>, default: &str) -> Self {
        sort.and_then(Self::parse)
            .or_else(|| Self::parse(default))
            .unwrap_or_default()
    }

    /// Render as a store sort document, e.g. `{"createdAt": -1}`. Keys keep
    /// their priority order.
    #[must_use]
    pub fn to_document(&self) -> Value {
        let mut map = Map::new();
        for key in &self.keys {
            let order = match key.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            };
            map.insert(key.field.clone(), Value::from(order));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leading_minus_is_descending() {
        let spec = SortSpec::parse("-createdAt").unwrap();
        assert_eq!(
            spec.keys,
            vec![SortKey {
                field: "createdAt".into(),
                direction: SortDirection::Desc
            }]
        );
    }

    #[test]
    fn test_multiple_keys() {
        let spec = SortSpec::parse("status -createdAt,+name").unwrap();
        let directions: Vec<_> = spec.keys.iter().map(|k| k.direction).collect();
        assert_eq!(
            directions,
            vec![SortDirection::Asc, SortDirection::Desc, SortDirection::Asc]
        );
        assert_eq!(spec.keys[2].field, "name");
    }

    #[test]
    fn test_blank_sort_falls_back_to_default() {
        assert_eq!(SortSpec::parse("  "), None);
        assert_eq!(SortSpec::parse("-"), None);
        let spec = SortSpec::parse_or(Some(" "), "-createdAt");
        assert_eq!(spec.keys[0].field, "createdAt");
        assert_eq!(SortSpec::parse_or(None, "name").keys[0].field, "name");
    }

    #[test]
    fn test_to_document() {
        let spec = SortSpec::parse("name -age").unwrap();
        assert_eq!(spec.to_document(), json!({"name": 1, "age": -1}));
    }

    #[test]
    fn test_to_document_keeps_key_priority() {
        let rendered = SortSpec::parse("name -age createdAt").unwrap().to_document();
        assert_eq!(
            serde_json::to_string(&rendered).unwrap(),
            r#"{"name":1,"age":-1,"createdAt":1}"#
        );
        let keys: Vec<&String> = rendered.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "age", "createdAt"]);
    }
}
