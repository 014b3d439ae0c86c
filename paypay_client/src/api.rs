use std::sync::Arc;

use hmac::{Hmac, Mac};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    config::PayPayConfig,
    data_objects::{CreateQrRequest, PayPayEnvelope, PaymentDetailsData, QrCodeData},
    PayPayApiError,
};

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct PayPayApi {
    config: PayPayConfig,
    client: Arc<Client>,
}

impl PayPayApi {
    pub fn new(config: PayPayConfig) -> Result<Self, PayPayApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let merchant = HeaderValue::from_str(config.merchant_id.as_str())
            .map_err(|e| PayPayApiError::Initialization(e.to_string()))?;
        headers.insert("X-ASSUME-MERCHANT", merchant);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PayPayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Asks PayPay to create a scannable QR code for the given payment request.
    pub async fn create_qr_code(&self, request: &CreateQrRequest) -> Result<QrCodeData, PayPayApiError> {
        trace!("Creating QR code for merchant payment id {}", request.merchant_payment_id);
        self.send(Method::POST, "/v2/codes", Some(request)).await
    }

    /// Fetches the current details of a payment, keyed by the merchant payment id we supplied at creation time.
    pub async fn payment_details(&self, merchant_payment_id: &str) -> Result<PaymentDetailsData, PayPayApiError> {
        let path = format!("/v2/codes/payments/{merchant_payment_id}");
        self.send::<PaymentDetailsData, ()>(Method::GET, &path, None).await
    }

    async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, PayPayApiError> {
        let url = format!("{}{path}", self.config.endpoint.trim_end_matches('/'));
        let body_json = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| PayPayApiError::ResponseFormat(e.to_string()))?;
        let auth = self.auth_header(&method, path, body_json.as_deref())?;
        let mut req = self.client.request(method, url).header(AUTHORIZATION, auth);
        if let Some(json) = body_json {
            req = req.body(json);
        }
        let response = req.send().await.map_err(|e| PayPayApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!("PayPay call to {path} failed with HTTP {status}: {message}");
            return Err(PayPayApiError::HttpStatus { status: status.as_u16(), message });
        }
        let envelope = response
            .json::<PayPayEnvelope<T>>()
            .await
            .map_err(|e| PayPayApiError::ResponseFormat(e.to_string()))?;
        if envelope.result_info.code != "SUCCESS" {
            return Err(PayPayApiError::Api { code: envelope.result_info.code, message: envelope.result_info.message });
        }
        envelope.data.ok_or_else(|| PayPayApiError::ResponseFormat("response envelope contained no data".to_string()))
    }

    /// Builds the `hmac OPA-Auth` authorization header. The signature covers the path, method, a nonce, the epoch
    /// and a digest of the request body, so a captured request cannot be replayed against another endpoint.
    fn auth_header(&self, method: &Method, path: &str, body: Option<&str>) -> Result<String, PayPayApiError> {
        let nonce: String = thread_rng().sample_iter(&Alphanumeric).take(8).map(char::from).collect();
        let epoch = chrono::Utc::now().timestamp();
        let body_hash = match body {
            Some(json) => {
                let mut hasher = Sha256::new();
                hasher.update(b"application/json");
                hasher.update(json.as_bytes());
                base64::encode(hasher.finalize())
            },
            None => "empty".to_string(),
        };
        let payload = format!("{path}\n{method}\n{nonce}\n{epoch}\n{body_hash}");
        let mut mac = HmacSha256::new_from_slice(self.config.api_secret.reveal().as_bytes())
            .map_err(|e| PayPayApiError::Initialization(e.to_string()))?;
        mac.update(payload.as_bytes());
        let signature = base64::encode(mac.finalize().into_bytes());
        Ok(format!("hmac OPA-Auth:{}:{signature}:{nonce}:{epoch}:{body_hash}", self.config.api_key))
    }
}
