use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use bson::{doc, oid::ObjectId};
use chrono::{Duration, Utc};
use jsonwebtoken::{Header, encode};
use password_hash::rand_core::OsRng;

use crate::{
    db,
    dto::auth::{AuthResponse, Claims, LoginRequest, ProfileResponse, RegisterRequest},
    error::{AppError, AppResult, is_duplicate_key},
    middleware::auth::AuthUser,
    models::{Role, User},
    state::{AppState, AuthKeys},
};

const TOKEN_TTL_HOURS: i64 = 24;

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<AuthResponse> {
    let RegisterRequest {
        name,
        email,
        password,
        phone,
        address,
    } = payload;

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "name, email and password are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("invalid email address".to_string()));
    }

    let users = db::users(&state.db);
    if users.find_one(doc! { "email": &email }).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(&password)?;

    let now = Utc::now();
    let user = User {
        id: ObjectId::new(),
        name,
        email,
        password_hash,
        role: Role::Customer,
        phone,
        address,
        created_at: now,
        updated_at: now,
    };

    // The unique email index settles the race two concurrent registrations
    // of the same address would otherwise win together.
    users.insert_one(&user).await.map_err(|err| {
        if is_duplicate_key(&err) {
            AppError::DuplicateEmail
        } else {
            AppError::Db(err)
        }
    })?;

    tracing::info!(user_id = %user.id, "user registered");

    let token = issue_token(&state.auth, user.id, user.role)?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<AuthResponse> {
    let LoginRequest { email, password } = payload;
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let user = db::users(&state.db)
        .find_one(doc! { "email": &email })
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::InvalidCredentials);
    }

    tracing::debug!(user_id = %user.id, "login succeeded");

    let token = issue_token(&state.auth, user.id, user.role)?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ProfileResponse> {
    let stored = db::users(&state.db)
        .find_one(doc! { "_id": user.user_id })
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    Ok(ProfileResponse {
        user: stored.into(),
    })
}

/// Signs a session token carrying the user id and role, expiring in 24h.
pub fn issue_token(keys: &AuthKeys, user_id: ObjectId, role: Role) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_hex(),
        role,
        exp: expiration.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}
