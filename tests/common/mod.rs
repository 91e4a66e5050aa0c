#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use hotel_booking_api::{
    config::AppConfig,
    db::run_migrations,
    dto::{hotels::CreateHotelRequest, users::UserRequest},
    models::{Hotel, Location, User},
    payment::{ChargeRequest, GatewayError, PaymentGateway, PaymentIntent, PaymentStatus},
    services::{hotel_service, user_service},
    state::AppState,
};
use sea_orm::{ConnectOptions, Database};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed,
    Decline(&'static str),
    Status(PaymentStatus),
}

/// Gateway double that records every charge it is asked to make.
pub struct StubGateway {
    outcome: Outcome,
    calls: AtomicUsize,
    charges: Mutex<Vec<ChargeRequest>>,
}

impl StubGateway {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            charges: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn charges(&self) -> Vec<ChargeRequest> {
        self.charges.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn authorize_and_capture(
        &self,
        charge: &ChargeRequest,
    ) -> Result<PaymentIntent, GatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.charges.lock().unwrap().push(charge.clone());
        let status = match &self.outcome {
            Outcome::Succeed => PaymentStatus::Succeeded,
            Outcome::Decline(reason) => return Err(GatewayError::Declined(reason.to_string())),
            Outcome::Status(status) => *status,
        };
        Ok(PaymentIntent {
            id: format!("pi_test_{n}"),
            status,
            amount: charge.amount_minor,
            currency: charge.currency.clone(),
            client_secret: None,
        })
    }

    async fn preauthorize(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentIntent {
            id: "pi_preauth".into(),
            status: PaymentStatus::RequiresPaymentMethod,
            amount: amount_minor,
            currency: currency.to_string(),
            client_secret: Some("pi_preauth_secret".into()),
        })
    }
}

pub struct TestApp {
    pub state: AppState,
    pub gateway: Arc<StubGateway>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        upload_dir: std::env::temp_dir().join(format!("hotel-booking-test-{}", Uuid::new_v4())),
        stripe_secret_key: None,
        stripe_api_base: "http://127.0.0.1:9".into(),
        payment_timeout_secs: 1,
        preauth_amount_minor: 1000,
        jwt_secret: Some(JWT_SECRET.into()),
    }
}

/// Fresh in-memory database behind a single connection, so every query in
/// a test sees the same schema and rows.
pub async fn setup(outcome: Outcome) -> anyhow::Result<TestApp> {
    let config = test_config();
    std::fs::create_dir_all(&config.upload_dir)?;
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let orm = Database::connect(options).await?;
    run_migrations(&orm).await?;

    let gateway = Arc::new(StubGateway::new(outcome));
    let state = AppState {
        orm,
        gateway: gateway.clone(),
        config: Arc::new(config),
    };
    Ok(TestApp { state, gateway })
}

pub fn hotel_request(name: &str, base_price: f64, property_type: &str) -> CreateHotelRequest {
    CreateHotelRequest {
        name: name.into(),
        base_price,
        number_of_rooms: 12,
        location: Location {
            name: "Lisbon".into(),
            address: "Rua Augusta 1".into(),
            latitude: 38.71,
            longitude: -9.14,
        },
        ratings: Some(4.0),
        property_type: property_type.into(),
        images: vec!["/uploads/lobby.jpg".into()],
        email: "stay@harbour.com".into(),
        description: None,
        phone_number: "0123456789".into(),
    }
}

pub async fn create_hotel(state: &AppState, request: CreateHotelRequest) -> anyhow::Result<Hotel> {
    let response = hotel_service::create_hotel(state, request).await?;
    Ok(response.data.expect("hotel data"))
}

pub async fn create_user(state: &AppState, email: &str) -> anyhow::Result<User> {
    let response = user_service::create_user(
        state,
        UserRequest {
            first_name: "Ada".into(),
            last_name: "Guest".into(),
            email_address: email.into(),
            image_url: None,
        },
    )
    .await?;
    Ok(response.data.expect("user data"))
}
