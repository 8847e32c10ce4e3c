//! # Error Handling for List Endpoints
//!
//! Every failure while listing documents is scoped to one request. Errors are
//! logged where they are turned into a response and always reach the client as
//!
//! ```json
//! {"error": "<message>"}
//! ```
//!
//! with `500 Internal Server Error`. Nothing is retried.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use listcrate::ListError;
//!
//! async fn my_handler() -> Result<Json<ListResponse>, ListError> {
//!     let response = list_documents(&store, &pairs, &options, &config).await?;
//!     Ok(Json(response))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::store::StoreError;

/// Failure while compiling or executing a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The `mongoQuery` override could not be parsed or used an operator
    /// outside the supported set, or a filter key named an operator
    MalformedFilter {
        /// Parser message, sent to the client
        message: String,
    },

    /// An array-element filter key is not of the form `arrayField.subField`
    InvalidFieldPath {
        /// The offending key, verbatim
        path: String,
    },

    /// The document store failed during count or fetch
    StoreOperation {
        /// Underlying store message
        message: String,
    },
}

impl ListError {
    /// Create a malformed filter error
    pub fn malformed_filter(message: impl Into<String>) -> Self {
        Self::MalformedFilter {
            message: message.into(),
        }
    }

    /// Create an invalid field path error
    pub fn invalid_field_path(path: impl Into<String>) -> Self {
        Self::InvalidFieldPath { path: path.into() }
    }

    /// Create a store operation error
    pub fn store_operation(message: impl Into<String>) -> Self {
        Self::StoreOperation {
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    ///
    /// The list contract has a single failure shape, so this is always 500.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Message placed in the `error` field of the response body
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedFilter { message } => format!("Malformed filter: {message}"),
            Self::InvalidFieldPath { path } => {
                format!("Invalid field path '{path}': expected 'arrayField.subField'")
            }
            Self::StoreOperation { message } => message.clone(),
        }
    }

    /// Short machine-readable name of the variant, used as a log field
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedFilter { .. } => "malformed_filter",
            Self::InvalidFieldPath { .. } => "invalid_field_path",
            Self::StoreOperation { .. } => "store_operation",
        }
    }

    fn log(&self) {
        tracing::error!(
            kind = self.kind(),
            error = %self.user_message(),
            "List request failed"
        );
    }
}

/// Failure body sent to clients
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        self.log();

        let body = ErrorResponse {
            error: self.user_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ListError {}

impl From<StoreError> for ListError {
    fn from(err: StoreError) -> Self {
        Self::StoreOperation {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ListError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedFilter {
            message: err.to_string(),
        }
    }
}
