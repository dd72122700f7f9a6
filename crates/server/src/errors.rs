use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::auth::AuthError;
use service::errors::ServiceError;

/// Boundary error: every domain failure maps to a structured
/// `{"success": false, "message": ...}` body and a matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) => match e {
                AuthError::Validation(_) | AuthError::Conflict(_) => StatusCode::BAD_REQUEST,
                AuthError::Unauthorized | AuthError::Suspended | AuthError::TokenError(_) => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::HashError(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Service(e) => match e {
                ServiceError::Validation(_)
                | ServiceError::AlreadySuspended
                | ServiceError::CapacityExceeded => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Model(models::errors::ModelError::Validation(_)) => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::Hash(_) | ServiceError::Db(_) | ServiceError::Model(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Unexpected failures: generic message, detail under `error`
            error!(error = %self, "internal error");
            serde_json::json!({
                "success": false,
                "message": "internal server error",
                "error": self.to_string(),
            })
        } else {
            serde_json::json!({ "success": false, "message": self.to_string() })
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_the_taxonomy() {
        let conflict: ApiError = AuthError::Conflict("username already exists".into()).into();
        assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);

        let unauthorized: ApiError = AuthError::Unauthorized.into();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let suspended: ApiError = AuthError::Suspended.into();
        assert_eq!(suspended.status(), StatusCode::UNAUTHORIZED);

        let missing: ApiError = ServiceError::not_found("link").into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let full: ApiError = ServiceError::CapacityExceeded.into();
        assert_eq!(full.status(), StatusCode::BAD_REQUEST);

        let db: ApiError = ServiceError::Db("connection refused".into()).into();
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
