use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::pagination::PageInfo;

/// Reserved query parameters of a list endpoint.
///
/// Every other key is an equality filter on the field of the same name,
/// except the bracketed filter groups:
///
/// - `inList[field]=a,b`: field is one of the values
/// - `notInList[field]=a,b`: field is none of the values
/// - `inListArrOfObj[array.field]=a,b`: some element of `array` has `field`
///   in the values
/// - `notInListArrOfObj[array.field]=a,b`: some element of `array` has
///   `field` outside the values
#[derive(Debug, Clone, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number, 1-based. Invalid values fall back to 1.
    #[param(example = 1)]
    pub page: Option<String>,
    /// Page size. Invalid values fall back to the configured default (20).
    #[param(example = 20)]
    pub limit: Option<String>,
    /// Number of documents to skip. Defaults to `(page - 1) * limit`.
    #[param(example = 0)]
    pub skip: Option<String>,
    /// Sort keys separated by spaces or commas; prefix with `-` for descending.
    ///
    /// Example: `-createdAt`
    #[param(example = "-createdAt")]
    pub sort: Option<String>,
    /// Case-insensitive free-text search over the endpoint's search fields
    #[param(example = "ada")]
    pub q: Option<String>,
    /// JSON filter document using `$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`,
    /// `$in`, `$nin`, `$and` and `$or`
    #[param(rename = "mongoQuery", example = r#"{"age":{"$gte":18}}"#)]
    pub mongo_query: Option<String>,
    /// Comma-separated fields to return
    #[param(example = "name,email")]
    pub fields: Option<String>,
}

impl ListParams {
    /// Names of the scalar reserved parameters
    pub const RESERVED: [&'static str; 7] =
        ["page", "limit", "skip", "sort", "q", "mongoQuery", "fields"];

    /// Store `value` if `key` is a reserved parameter; returns whether it was.
    /// A repeated key keeps its last value.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "page" => &mut self.page,
            "limit" => &mut self.limit,
            "skip" => &mut self.skip,
            "sort" => &mut self.sort,
            "q" => &mut self.q,
            "mongoQuery" => &mut self.mongo_query,
            "fields" => &mut self.fields,
            _ => return false,
        };
        *slot = Some(value.to_string());
        true
    }
}

/// Successful list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    /// Always `"success"`
    pub status: String,
    pub data: Vec<Value>,
    pub page_info: PageInfo,
}

impl ListResponse {
    #[must_use]
    pub fn success(data: Vec<Value>, page_info: PageInfo) -> Self {
        Self {
            status: "success".to_string(),
            data,
            page_info,
        }
    }
}
