use axum::{Json, Router, extract::State, routing::post};

use crate::{
    error::AppResult,
    middleware::auth::AdminUser,
    response::{ApiResponse, Meta},
    services::inventory_linker::{self, ReconcileReport},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/inventory/reconcile", post(reconcile_inventory))
}

#[utoipa::path(
    post,
    path = "/api/admin/inventory/reconcile",
    responses(
        (status = 200, description = "Room type links rebuilt", body = ApiResponse<ReconcileReport>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reconcile_inventory(
    State(state): State<AppState>,
    admin: AdminUser,
) -> AppResult<Json<ApiResponse<ReconcileReport>>> {
    let report = inventory_linker::reconcile(&state.orm).await?;
    tracing::info!(
        subject = %admin.subject,
        repaired = report.hotels_repaired,
        orphans = report.orphaned_room_types.len(),
        "inventory reconciled"
    );
    Ok(Json(ApiResponse::success(
        "Reconciled",
        report,
        Some(Meta::empty()),
    )))
}
