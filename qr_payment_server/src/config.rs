use std::env;

use chrono::Duration;
use log::*;
use paypay_client::PayPayConfig;

const DEFAULT_QPG_HOST: &str = "127.0.0.1";
const DEFAULT_QPG_PORT: u16 = 8360;
const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 5;
const DEFAULT_PAYMENT_TIMEOUT_SECONDS: i64 = 300;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// How often the status poller runs a reconciliation pass.
    pub poll_interval: std::time::Duration,
    /// How long a payment may stay `PENDING` before it expires, when the provider does not supply its own deadline.
    pub payment_timeout: Duration,
    /// PayPay Open Payment API credentials and endpoint.
    pub paypay: PayPayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_QPG_HOST.to_string(),
            port: DEFAULT_QPG_PORT,
            database_url: String::default(),
            poll_interval: std::time::Duration::from_secs(DEFAULT_POLL_INTERVAL_SECONDS),
            payment_timeout: Duration::seconds(DEFAULT_PAYMENT_TIMEOUT_SECONDS),
            paypay: PayPayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("QPG_HOST").ok().unwrap_or_else(|| DEFAULT_QPG_HOST.into());
        let port = env::var("QPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for QPG_PORT. {e} Using the default, {DEFAULT_QPG_PORT}, instead."
                    );
                    DEFAULT_QPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_QPG_PORT);
        let database_url = env::var("QPG_DATABASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ QPG_DATABASE_URL is not set. Using the default.");
            String::default()
        });
        let poll_interval = env::var("QPG_POLL_INTERVAL_SECONDS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| {
                        error!("🪛️ {s} is not a valid value for QPG_POLL_INTERVAL_SECONDS. {e} Using the default.");
                    })
                    .ok()
            })
            .map(std::time::Duration::from_secs)
            .unwrap_or_else(|| std::time::Duration::from_secs(DEFAULT_POLL_INTERVAL_SECONDS));
        let payment_timeout = env::var("QPG_PAYMENT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| {
                        error!("🪛️ {s} is not a valid value for QPG_PAYMENT_TIMEOUT_SECONDS. {e} Using the default.");
                    })
                    .ok()
            })
            .map(Duration::seconds)
            .unwrap_or_else(|| Duration::seconds(DEFAULT_PAYMENT_TIMEOUT_SECONDS));
        let paypay = PayPayConfig::new_from_env_or_default();
        info!(
            "🪛️ Poller runs every {}s; payments time out after {}s unless the provider says otherwise.",
            poll_interval.as_secs(),
            payment_timeout.num_seconds()
        );
        Self { host, port, database_url, poll_interval, payment_timeout, paypay }
    }
}
