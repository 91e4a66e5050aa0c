use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    pub payment_timeout_secs: u64,
    /// Amount charged by the standalone pre-authorization endpoint, in cents.
    pub preauth_amount_minor: i64,
    pub jwt_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));
        let stripe_api_base = env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());
        let payment_timeout_secs = env::var("PAYMENT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(15);
        let preauth_amount_minor = env::var("PREAUTH_AMOUNT_MINOR")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(1000);
        Ok(Self {
            port,
            database_url,
            host,
            upload_dir,
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),
            stripe_api_base,
            payment_timeout_secs,
            preauth_amount_minor,
            jwt_secret: env::var("JWT_SECRET").ok(),
        })
    }
}
