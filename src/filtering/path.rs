//! Dot-notation paths for array-element filters.
//!
//! `inListArrOfObj[items.sku]=A1,B2` addresses the `sku` field of the
//! objects inside the `items` array. Only the two-segment shape is accepted.

use crate::errors::ListError;

/// A validated `arrayField.subField` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayElementPath {
    /// The array-valued field on the document (e.g. "items")
    pub array_field: String,
    /// The field on each array element (e.g. "sku")
    pub sub_field: String,
}

impl ArrayElementPath {
    /// Parse `arrayField.subField`.
    ///
    /// # Errors
    ///
    /// Returns `ListError::InvalidFieldPath` unless the path has exactly two
    /// non-empty segments.
    pub fn parse(path: &str) -> Result<Self, ListError> {
        let mut segments = path.split('.');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(array_field), Some(sub_field), None)
                if !array_field.is_empty() && !sub_field.is_empty() =>
            {
                Ok(Self {
                    array_field: array_field.to_string(),
                    sub_field: sub_field.to_string(),
                })
            }
            _ => {
                tracing::warn!(path, "Rejected array-element filter path");
                Err(ListError::invalid_field_path(path))
            }
        }
    }
}
