use crate::{
    dto::payments::PaymentIntentResponse,
    error::AppResult,
    payment::CURRENCY,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Pre-authorize the configured fixed amount and hand the client secret back
/// to the caller. This is not the booking charge: the booking flow charges
/// the requested total itself.
pub async fn create_payment_intent(state: &AppState) -> AppResult<ApiResponse<PaymentIntentResponse>> {
    let amount = state.config.preauth_amount_minor;
    let intent = state.gateway.preauthorize(amount, CURRENCY).await?;
    tracing::info!(payment_intent_id = %intent.id, amount, "payment intent created");

    Ok(ApiResponse::success(
        "Payment intent created",
        PaymentIntentResponse {
            payment_intent_id: intent.id,
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency: intent.currency,
        },
        Some(Meta::empty()),
    ))
}
