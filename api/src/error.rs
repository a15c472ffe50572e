use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use webmail_types::Envelope;

use crate::store::StoreError;

/// Everything a handler can fail with. Only the display text reaches the
/// client; store errors are logged and replaced by a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Email not found")]
    NotFound,

    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn internal(message: &'static str, source: StoreError) -> Self {
        Self::Internal { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal { message, source } = &self {
            tracing::error!(error = %source, "{message}");
        }

        let body = Envelope::<()>::failure(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
