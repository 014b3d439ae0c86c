//! The PayPay implementation of the engine's [`PaymentProvider`] contract.
//!
//! The client's `request_id` is used as PayPay's `merchantPaymentId`, which is what makes a retried create call
//! idempotent at the provider: PayPay refuses a second payment under the same merchant payment id.
use chrono::{DateTime, Utc};
use log::*;
use paypay_client::{CreateQrRequest, PayPayApi, PayPayApiError, PayPayConfig};
use qr_payment_engine::{
    db_types::{NewPaymentRequest, ProviderStatus, RequestId},
    traits::{PaymentProvider, ProviderError, ProviderPaymentIntent, ProviderStatusReport},
};

use crate::errors::ServerError;

#[derive(Clone)]
pub struct PayPayProvider {
    api: PayPayApi,
}

impl PayPayProvider {
    pub fn new(config: PayPayConfig) -> Result<Self, ServerError> {
        let api = PayPayApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { api })
    }
}

fn map_api_error(e: PayPayApiError) -> ProviderError {
    if e.is_transient() {
        ProviderError::Unavailable(e.to_string())
    } else {
        ProviderError::Rejected(e.to_string())
    }
}

impl PaymentProvider for PayPayProvider {
    async fn create_payment_request(
        &self,
        request: &NewPaymentRequest,
    ) -> Result<ProviderPaymentIntent, ProviderError> {
        // PayPay takes integer amounts (JPY has no minor unit).
        let amount = request
            .amount
            .whole_units()
            .ok_or_else(|| ProviderError::Rejected(format!("{} is not a valid PayPay amount", request.amount)))?;
        let qr_request = CreateQrRequest::new(request.request_id.as_str(), amount, &request.currency);
        let qr = self.api.create_qr_code(&qr_request).await.map_err(map_api_error)?;
        let provider_reference = qr
            .reference()
            .map(String::from)
            .ok_or_else(|| ProviderError::Unavailable("PayPay returned a QR code without a url".into()))?;
        let expires_at = qr.expiry_date.and_then(|epoch| DateTime::<Utc>::from_timestamp(epoch, 0));
        debug!("🛒️ PayPay issued a QR code for [{}]", request.request_id);
        Ok(ProviderPaymentIntent { provider_reference, expires_at })
    }

    async fn query_status(&self, request_id: &RequestId) -> Result<ProviderStatusReport, ProviderError> {
        let details = match self.api.payment_details(request_id.as_str()).await {
            Ok(details) => details,
            Err(e) if e.is_transient() => return Err(ProviderError::Unavailable(e.to_string())),
            // A definitive "no" from PayPay (no such payment, malformed id) carries no outcome. Report it as
            // UNKNOWN rather than failing the whole reconciliation pass.
            Err(e) => {
                debug!("🛒️ PayPay has no usable answer for [{request_id}]: {e}");
                return Ok(ProviderStatusReport::new(ProviderStatus::Unknown));
            },
        };
        let report = match details.status.as_str() {
            "CREATED" | "AUTHORIZED" => ProviderStatusReport::new(ProviderStatus::Pending),
            "COMPLETED" => ProviderStatusReport { status: ProviderStatus::Completed, txn_id: details.payment_id },
            // A canceled-at-the-provider payment failed from the client's point of view; CANCELLED is reserved
            // for operator action on our side.
            "FAILED" | "CANCELED" => ProviderStatusReport::new(ProviderStatus::Failed),
            "EXPIRED" => ProviderStatusReport::new(ProviderStatus::Expired),
            other => {
                warn!("🛒️ PayPay reported an unrecognized status '{other}' for [{request_id}]");
                ProviderStatusReport::new(ProviderStatus::Unknown)
            },
        };
        Ok(report)
    }
}
