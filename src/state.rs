use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};
use mongodb::Database;

/// Signing and verification keys derived once from the configured secret.
/// Handlers reach them through `FromRef`, so nothing reads the environment
/// at request time.
#[derive(Clone)]
pub struct AuthKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl AuthKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthKeys,
}

impl AppState {
    pub fn new(db: Database, jwt_secret: &str) -> Self {
        Self {
            db,
            auth: AuthKeys::new(jwt_secret),
        }
    }
}

impl FromRef<AppState> for AuthKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
