//! # Error Handling
//!
//! Reads fail in exactly two ways:
//! - a filter value did not fit its field's declared type ([`ReadError::InvalidFilter`]),
//! - the database failed while counting or fetching ([`ReadError::Database`]).
//!
//! [`ApiError`] turns either into an HTTP response. Database details are
//! logged through `tracing` and never sent to the client.
//!
//! ```rust,ignore
//! async fn list(params: QueryParams, State(db): State<DatabaseConnection>)
//!     -> Result<Json<Paginated<Item>>, ApiError>
//! {
//!     let page = read_paginated(&params, SeaOrmQuery::new(&db, items::Entity::find()), &OPTIONS).await?;
//!     Ok(Json(page))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::filtering::FieldType;

/// One filter value that failed coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFilter {
    /// Field name from `filter[<field>]`
    pub field: String,
    /// The offending raw value (a single part of a comma list)
    pub value: String,
    /// Type the field is declared with, `None` when the field name itself was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl RejectedFilter {
    #[must_use]
    pub fn value(field: &str, value: &str, expected: FieldType) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            expected: Some(expected.to_string()),
        }
    }

    #[must_use]
    pub fn field_name(field: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            expected: None,
        }
    }
}

impl fmt::Display for RejectedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Some(expected) => write!(f, "filter[{}]: '{}' is not a valid {expected}", self.field, self.value),
            None => write!(f, "filter[{}]: invalid field name", self.field),
        }
    }
}

/// Error returned by [`read_paginated`](crate::read_paginated).
#[derive(Debug)]
pub enum ReadError {
    /// At least one filter value failed validation; nothing was queried.
    InvalidFilter {
        /// Every rejected value, in query order
        rejected: Vec<RejectedFilter>,
    },
    /// Count or fetch failed in the database layer. Passed through unchanged.
    Database(DbErr),
}

impl ReadError {
    #[must_use]
    pub fn is_invalid_filter(&self) -> bool {
        matches!(self, Self::InvalidFilter { .. })
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter { .. } => f.write_str("invalid filter value"),
            Self::Database(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidFilter { .. } => None,
            Self::Database(err) => Some(err),
        }
    }
}

impl From<DbErr> for ReadError {
    fn from(err: DbErr) -> Self {
        Self::Database(err)
    }
}

/// HTTP-facing error with sanitized messages.
#[derive(Debug)]
pub enum ApiError {
    /// 400, the request itself was unusable
    BadRequest {
        message: String,
        /// One line per rejected filter value, sent to the client
        details: Vec<String>,
    },

    /// 500, the client only ever sees `message`
    Database {
        message: String,
        /// Logged on response, never serialized
        internal: DbErr,
    },
}

impl ApiError {
    /// Wrap a database failure behind a generic message.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::Database { message, .. } => message,
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Paginated read failed in the database");
            }
            Self::BadRequest { message, details } => {
                tracing::debug!(reason = %message, ?details, "Rejected read request");
            }
        }
    }
}

/// JSON body of an error response.
#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [String]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let details = match &self {
            Self::BadRequest { details, .. } if !details.is_empty() => Some(details.as_slice()),
            _ => None,
        };
        let body = ErrorResponse {
            error: self.user_message(),
            details,
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<ReadError> for ApiError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::InvalidFilter { rejected } => Self::BadRequest {
                message: "invalid filter value".to_string(),
                details: rejected.iter().map(ToString::to_string).collect(),
            },
            ReadError::Database(internal) => Self::database(internal),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}
