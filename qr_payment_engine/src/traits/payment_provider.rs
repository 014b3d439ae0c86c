use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::{NewPaymentRequest, ProviderStatus, RequestId};

/// What the provider hands back when it accepts a new payment request.
#[derive(Debug, Clone)]
pub struct ProviderPaymentIntent {
    /// The scannable payload (QR deeplink or equivalent opaque handle).
    pub provider_reference: String,
    /// The provider's own deadline for the payment, when it reports one. When present it takes precedence over the
    /// locally computed timeout.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A provider's answer to a status query. A `Completed` status is only actionable when `txn_id` accompanies it.
#[derive(Debug, Clone)]
pub struct ProviderStatusReport {
    pub status: ProviderStatus,
    pub txn_id: Option<String>,
}

impl ProviderStatusReport {
    pub fn new(status: ProviderStatus) -> Self {
        Self { status, txn_id: None }
    }

    pub fn completed<S: Into<String>>(txn_id: S) -> Self {
        Self { status: ProviderStatus::Completed, txn_id: Some(txn_id.into()) }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider could not be reached, or answered with a 5xx-class failure. Retrying later is reasonable.
    #[error("The payment provider is unavailable. {0}")]
    Unavailable(String),
    /// The provider rejected the request outright. Retrying the same request will not help.
    #[error("The payment provider rejected the request. {0}")]
    Rejected(String),
}

/// The contract every payment provider integration must satisfy.
///
/// Implementations hold no local state between calls: each call stands alone and is retry-safe from the caller's
/// perspective. The provider keys payments on the merchant reference id (our [`RequestId`]), which is what makes a
/// retried create call after a crash safe.
#[allow(async_fn_in_trait)]
pub trait PaymentProvider: Clone {
    /// Asks the provider to create a payment and mint a scannable reference for it.
    async fn create_payment_request(&self, request: &NewPaymentRequest)
        -> Result<ProviderPaymentIntent, ProviderError>;

    /// Asks the provider what it currently knows about the payment. Implementations must map "no record" to a
    /// report with [`ProviderStatus::Unknown`] rather than an error; `Err` is reserved for not getting an answer
    /// at all.
    async fn query_status(&self, request_id: &RequestId) -> Result<ProviderStatusReport, ProviderError>;
}
