use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidSignature,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Admin access required")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Database error")]
    Db(#[from] mongodb::error::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::InvalidSignature
            | AppError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Db(err) => tracing::error!(error = %err, "database error"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
            _ => {}
        }

        let body = ErrorBody {
            error: self.to_string(),
        };

        (self.status(), axum::Json(body)).into_response()
    }
}

/// True when the driver reported a duplicate-key write (E11000), which the
/// unique email index turns into `DuplicateEmail` at the call site.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_err)) => write_err.code == 11000,
        _ => false,
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_their_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::InvalidSignature.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::EmptyCart.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn response_body_is_an_error_object() {
        let response = AppError::EmptyCart.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Cart is empty" }));
    }
}
