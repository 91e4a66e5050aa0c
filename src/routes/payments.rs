use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::payments::PaymentIntentResponse, error::AppResult, response::ApiResponse,
    services::payment_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/intent", post(create_payment_intent))
}

#[utoipa::path(
    post,
    path = "/api/payments/intent",
    responses(
        (status = 201, description = "Unconfirmed intent for the configured fixed amount", body = ApiResponse<PaymentIntentResponse>)
    ),
    tag = "Payments"
)]
pub async fn create_payment_intent(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ApiResponse<PaymentIntentResponse>>)> {
    let response = payment_service::create_payment_intent(&state).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
