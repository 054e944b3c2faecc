use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::auth::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    services::auth_service::{get_profile, login_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let resp = register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token and user", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let resp = get_profile(&state, &user).await?;
    Ok(Json(resp))
}
