//! Shared helpers for the lifecycle integration tests: a throwaway on-disk database per test, and a scripted
//! provider whose answers the test controls.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use qpg_common::Money;
use qr_payment_engine::{
    db_types::{NewPaymentRequest, ProviderStatus, RequestId, Tender},
    traits::{PaymentProvider, ProviderError, ProviderPaymentIntent, ProviderStatusReport},
    SqliteStore,
};
use rand::{distributions::Alphanumeric, Rng};

pub fn random_db_path() -> String {
    let id: String = rand::thread_rng().sample_iter(&Alphanumeric).take(12).map(char::from).collect();
    let mut path = std::env::temp_dir();
    path.push(format!("qpg_test_{id}.db"));
    path.to_string_lossy().into_owned()
}

/// A fresh store backed by its own database file, with migrations applied.
pub async fn prepare_test_store() -> SqliteStore {
    let _ = env_logger::try_init();
    let url = format!("sqlite://{}?mode=rwc", random_db_path());
    let store = SqliteStore::new_with_url(&url, 5).await.expect("Could not create test database");
    sqlx::migrate!("./migrations").run(store.pool()).await.expect("Could not run migrations");
    store
}

pub fn new_request(request_id: &str, amount: &str) -> NewPaymentRequest {
    let amount = amount.parse::<Money>().expect("Invalid test amount");
    NewPaymentRequest::new(RequestId::from(request_id), amount, "JPY", Tender::Paypay, 1)
}

/// A provider whose behavior is scripted per request id. Unscripted status queries answer `UNKNOWN`, and unscripted
/// creates succeed with a synthetic reference, so tests only spell out what they care about.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    reports: Arc<Mutex<HashMap<RequestId, Result<ProviderStatusReport, ProviderError>>>>,
    create_failure: Arc<Mutex<Option<ProviderError>>>,
    intent_expiry: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_report(&self, request_id: &str, report: ProviderStatusReport) {
        self.reports.lock().unwrap().insert(RequestId::from(request_id), Ok(report));
    }

    pub fn set_query_failure(&self, request_id: &str, err: ProviderError) {
        self.reports.lock().unwrap().insert(RequestId::from(request_id), Err(err));
    }

    /// The next `create_payment_request` call fails with `err`. The one after that succeeds again.
    pub fn fail_next_create(&self, err: ProviderError) {
        *self.create_failure.lock().unwrap() = Some(err);
    }

    /// Makes subsequent creates carry a provider-side deadline.
    pub fn set_intent_expiry(&self, expires_at: DateTime<Utc>) {
        *self.intent_expiry.lock().unwrap() = Some(expires_at);
    }
}

impl PaymentProvider for ScriptedProvider {
    async fn create_payment_request(
        &self,
        request: &NewPaymentRequest,
    ) -> Result<ProviderPaymentIntent, ProviderError> {
        if let Some(err) = self.create_failure.lock().unwrap().take() {
            return Err(err);
        }
        let expires_at = *self.intent_expiry.lock().unwrap();
        Ok(ProviderPaymentIntent {
            provider_reference: format!("https://qr.example.com/{}", request.request_id),
            expires_at,
        })
    }

    async fn query_status(&self, request_id: &RequestId) -> Result<ProviderStatusReport, ProviderError> {
        match self.reports.lock().unwrap().get(request_id) {
            Some(result) => result.clone(),
            None => Ok(ProviderStatusReport::new(ProviderStatus::Unknown)),
        }
    }
}
