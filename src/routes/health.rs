use axum::{Json, extract::State};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; database reachability is reported", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let database = match state
        .orm
        .execute_unprepared("SELECT 1")
        .await
    {
        Ok(_) => "ok".to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "database ping failed");
            "unavailable".to_string()
        }
    };

    let data = HealthData {
        status: "ok".to_string(),
        database,
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}
