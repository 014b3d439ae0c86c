use std::env;

use log::*;
use qpg_common::Secret;

/// The PayPay sandbox endpoint. Production use must set `QPG_PAYPAY_ENDPOINT` explicitly.
pub const PAYPAY_SANDBOX_ENDPOINT: &str = "https://stg-api.sandbox.paypay.ne.jp";

#[derive(Clone, Debug, Default)]
pub struct PayPayConfig {
    /// Base URL of the PayPay API, without a trailing slash.
    pub endpoint: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
    /// The merchant id this gateway assumes when talking to PayPay.
    pub merchant_id: String,
}

impl PayPayConfig {
    pub fn new_from_env_or_default() -> Self {
        let endpoint = env::var("QPG_PAYPAY_ENDPOINT").ok().unwrap_or_else(|| {
            info!("🪛️ QPG_PAYPAY_ENDPOINT is not set. Using the sandbox endpoint, {PAYPAY_SANDBOX_ENDPOINT}.");
            PAYPAY_SANDBOX_ENDPOINT.into()
        });
        let api_key = env::var("QPG_PAYPAY_API_KEY").ok().unwrap_or_else(|| {
            error!("🪛️ QPG_PAYPAY_API_KEY is not set. Please set it to the API key for your PayPay merchant account.");
            String::default()
        });
        let api_secret = env::var("QPG_PAYPAY_API_SECRET").ok().unwrap_or_else(|| {
            error!("🪛️ QPG_PAYPAY_API_SECRET is not set. Requests to PayPay will not be authorized.");
            String::default()
        });
        let merchant_id = env::var("QPG_PAYPAY_MERCHANT_ID").ok().unwrap_or_else(|| {
            error!("🪛️ QPG_PAYPAY_MERCHANT_ID is not set. Please set it to your PayPay merchant id.");
            String::default()
        });
        Self { endpoint, api_key, api_secret: Secret::new(api_secret), merchant_id }
    }
}
