//! Wire-facing request and response shapes for the REST endpoints.
use chrono::{DateTime, Utc};
use qpg_common::Money;
use qr_payment_engine::db_types::{NewPaymentRequest, PaymentRequest, PaymentStatus, RequestId, Tender};
use serde::{Deserialize, Serialize};

/// The body of a `POST /payments/init` call.
#[derive(Debug, Clone, Deserialize)]
pub struct InitPaymentParams {
    pub request_id: RequestId,
    pub amount: Money,
    pub currency: String,
    pub tender: Tender,
    pub terminal_id: i64,
}

impl From<InitPaymentParams> for NewPaymentRequest {
    fn from(params: InitPaymentParams) -> Self {
        NewPaymentRequest::new(params.request_id, params.amount, &params.currency, params.tender, params.terminal_id)
    }
}

/// What clients see of a payment record. The scannable reference is only echoed while the payment can still be
/// paid; once the record is terminal the reference is dead and is withheld.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResult {
    pub request_id: RequestId,
    pub amount: Money,
    pub currency: String,
    pub tender: Tender,
    pub terminal_id: i64,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_txn_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentRequest> for PaymentResult {
    fn from(payment: PaymentRequest) -> Self {
        let provider_reference =
            (payment.status == PaymentStatus::Pending).then_some(payment.provider_reference);
        Self {
            request_id: payment.request_id,
            amount: payment.amount,
            currency: payment.currency,
            tender: payment.tender,
            terminal_id: payment.terminal_id,
            status: payment.status,
            provider_reference,
            provider_txn_id: payment.provider_txn_id,
            created_at: payment.created_at,
            expires_at: payment.expires_at,
            updated_at: payment.updated_at,
        }
    }
}
