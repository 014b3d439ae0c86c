use serde::{Deserialize, Serialize};

//--------------------------------------    Requests    --------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPayAmount {
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQrRequest {
    pub merchant_payment_id: String,
    pub amount: PayPayAmount,
    pub code_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

impl CreateQrRequest {
    pub fn new<S: Into<String>>(merchant_payment_id: S, amount: i64, currency: &str) -> Self {
        Self {
            merchant_payment_id: merchant_payment_id.into(),
            amount: PayPayAmount { amount, currency: currency.to_string() },
            code_type: "ORDER_QR".to_string(),
            store_id: None,
        }
    }

    pub fn with_store_id<S: Into<String>>(mut self, store_id: S) -> Self {
        self.store_id = Some(store_id.into());
        self
    }
}

//--------------------------------------    Responses    -------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInfo {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Every PayPay response wraps its payload in a `resultInfo`/`data` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPayEnvelope<T> {
    pub result_info: ResultInfo,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeData {
    pub merchant_payment_id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub deeplink: Option<String>,
    /// Unix timestamp at which the QR code stops being scannable.
    #[serde(default)]
    pub expiry_date: Option<i64>,
}

impl QrCodeData {
    /// The scannable payload. PayPay reports both a deeplink and a web url; the deeplink is preferred.
    pub fn reference(&self) -> Option<&str> {
        self.deeplink.as_deref().or(self.url.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsData {
    pub status: String,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub merchant_payment_id: Option<String>,
}
