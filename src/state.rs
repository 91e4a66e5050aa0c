use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, payment::PaymentGateway};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub gateway: Arc<dyn PaymentGateway>,
    pub config: Arc<AppConfig>,
}
