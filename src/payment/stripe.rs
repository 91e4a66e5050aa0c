use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{ChargeRequest, GatewayError, PaymentGateway, PaymentIntent};
use crate::config::AppConfig;

/// Stripe PaymentIntents client.
#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    api_base: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

impl StripeGateway {
    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let secret_key = config
            .stripe_secret_key
            .clone()
            .ok_or(GatewayError::NotConfigured("STRIPE_SECRET_KEY is not set"))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.payment_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.stripe_api_base.trim_end_matches('/').to_string(),
            secret_key,
        })
    }

    async fn create_intent(&self, form: &[(&str, String)]) -> Result<PaymentIntent, GatewayError> {
        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<PaymentIntent>().await?);
        }

        let error = response.json::<StripeErrorBody>().await.ok().map(|b| b.error);
        let message = error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| status.to_string());
        let is_card_error = error
            .as_ref()
            .and_then(|e| e.kind.as_deref())
            .is_some_and(|kind| kind == "card_error");

        if status == StatusCode::PAYMENT_REQUIRED || is_card_error {
            tracing::info!(status = %status, message = %message, "payment declined by gateway");
            return Err(GatewayError::Declined(message));
        }

        Err(GatewayError::Unexpected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn authorize_and_capture(
        &self,
        charge: &ChargeRequest,
    ) -> Result<PaymentIntent, GatewayError> {
        let form = [
            ("amount", charge.amount_minor.to_string()),
            ("currency", charge.currency.clone()),
            ("payment_method", charge.payment_method_id.clone()),
            ("confirm", "true".to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            ("automatic_payment_methods[allow_redirects]", "never".to_string()),
        ];
        self.create_intent(&form).await
    }

    async fn preauthorize(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let form = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];
        self.create_intent(&form).await
    }
}
