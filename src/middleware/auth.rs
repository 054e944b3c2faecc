use axum::{
    extract::{FromRef, FromRequestParts},
    http::header,
};
use bson::oid::ObjectId;
use jsonwebtoken::{Validation, decode, errors::ErrorKind};

use crate::{dto::auth::Claims, error::AppError, models::Role, state::AuthKeys};

/// Identity decoded from the bearer token. Every protected handler takes one
/// of these as an extractor argument.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub role: Role,
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if !user.role.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Decodes and validates a token, separating expiry from every other decode
/// failure so clients can tell a stale session from a bad one.
pub fn verify_token(keys: &AuthKeys, token: &str) -> Result<AuthUser, AppError> {
    let data =
        decode::<Claims>(token, &keys.decoding, &Validation::default()).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidSignature,
            }
        })?;

    let user_id = ObjectId::parse_str(&data.claims.sub).map_err(|_| AppError::InvalidSignature)?;

    Ok(AuthUser {
        user_id,
        role: data.claims.role,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::InvalidSignature)?;

        let header_str = header_value
            .to_str()
            .map_err(|_| AppError::InvalidSignature)?;

        let token = header_str
            .strip_prefix("Bearer ")
            .ok_or(AppError::InvalidSignature)?
            .trim();

        let keys = AuthKeys::from_ref(state);
        verify_token(&keys, token)
    }
}
