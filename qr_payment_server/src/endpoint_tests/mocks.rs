use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use qr_payment_engine::{
    db_types::{NewPaymentRequest, ProviderStatus, RequestId},
    traits::{PaymentProvider, ProviderError, ProviderPaymentIntent, ProviderStatusReport},
};

/// A provider stand-in for endpoint tests. Creates succeed with a synthetic QR reference unless a failure has been
/// scripted; status queries answer whatever was scripted, or `UNKNOWN`.
#[derive(Clone, Default)]
pub struct StubProvider {
    create_failure: Arc<Mutex<Option<ProviderError>>>,
    reports: Arc<Mutex<HashMap<RequestId, ProviderStatusReport>>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_create(&self, err: ProviderError) {
        *self.create_failure.lock().unwrap() = Some(err);
    }

    #[allow(dead_code)]
    pub fn set_report(&self, request_id: &str, report: ProviderStatusReport) {
        self.reports.lock().unwrap().insert(RequestId::from(request_id), report);
    }
}

impl PaymentProvider for StubProvider {
    async fn create_payment_request(
        &self,
        request: &NewPaymentRequest,
    ) -> Result<ProviderPaymentIntent, ProviderError> {
        if let Some(err) = self.create_failure.lock().unwrap().take() {
            return Err(err);
        }
        Ok(ProviderPaymentIntent {
            provider_reference: format!("https://qr.example.com/{}", request.request_id),
            expires_at: None,
        })
    }

    async fn query_status(&self, request_id: &RequestId) -> Result<ProviderStatusReport, ProviderError> {
        let report = self
            .reports
            .lock()
            .unwrap()
            .get(request_id)
            .cloned()
            .unwrap_or_else(|| ProviderStatusReport::new(ProviderStatus::Unknown));
        Ok(report)
    }
}
