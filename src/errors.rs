use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::models::ErrorBody;

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Caller input failed validation after it was deserialized.
    Validation(String),
    /// The request body could not be read as an `AnalysisRequest`.
    InvalidBody(JsonRejection),
    /// The completion API could not be reached or returned an unusable reply.
    UpstreamError(String),
    /// A sentinel marker was absent from the model output.
    MissingMarker(&'static str),
    /// The text between the markers was not a JSON object.
    InvalidStructuredData(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::InvalidBody(rejection) => write!(f, "{}", rejection.body_text()),
            AppError::UpstreamError(msg) => write!(f, "{}", msg),
            AppError::MissingMarker(marker) => {
                write!(f, "Model output is missing the {} marker", marker)
            }
            AppError::InvalidStructuredData(msg) => {
                write!(f, "Failed to parse structured data: {}", msg)
            }
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// HTTP status the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::UpstreamError(_)
            | AppError::MissingMarker(_)
            | AppError::InvalidStructuredData(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::WithContext { source, .. } => source.status(),
        }
    }

    /// Innermost error, skipping any context wrappers.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response with a `detail` body.
    ///
    /// Every failure after validation is reported as a 500; the variant only
    /// changes the message and the log line.
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) => tracing::warn!("Rejected request: {}", msg),
            AppError::InvalidBody(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection.body_text())
            }
            AppError::UpstreamError(msg) => tracing::error!("Completion API error: {}", msg),
            AppError::MissingMarker(marker) => {
                tracing::error!("Model output missing {} marker", marker)
            }
            AppError::InvalidStructuredData(msg) => {
                tracing::error!("Structured data parse error: {}", msg)
            }
            AppError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                // Log full context chain, report the underlying failure
                tracing::error!("Error with context: {} -> {}", context, source);
                let root = source.root();
                let body = Json(ErrorBody {
                    detail: root.to_string(),
                });
                return (root.status(), body).into_response();
            }
        }

        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        (self.status(), body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamError(format!("Completion request failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidStructuredData(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}
