use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = HealthData),
    ),
        tag = "Health"
)]
pub async fn health_check() -> Json<HealthData> {
    Json(HealthData {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}
