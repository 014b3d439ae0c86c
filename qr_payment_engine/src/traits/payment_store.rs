use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::{NewPaymentRecord, PaymentRequest, PaymentStatus, RequestId};

#[derive(Debug, Clone, Error)]
pub enum PaymentStoreError {
    #[error("A payment with request id {0} already exists")]
    DuplicateRequest(RequestId),
    #[error("Store error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PaymentStoreError {
    fn from(e: sqlx::Error) -> Self {
        PaymentStoreError::DatabaseError(e.to_string())
    }
}

/// The durable record of payment requests. The store is the only shared mutable resource in the system, and this
/// trait is deliberately narrow: key-addressed reads, a uniqueness-enforcing insert, and status transitions that are
/// compare-and-set on the record still being `PENDING`.
#[allow(async_fn_in_trait)]
pub trait PaymentStore: Clone {
    /// The URL of the backing database.
    fn url(&self) -> &str;

    /// Persists a freshly initiated payment in the `PENDING` state.
    /// Fails with [`PaymentStoreError::DuplicateRequest`] if the request id has ever been used before.
    async fn insert_payment(&self, payment: NewPaymentRecord) -> Result<PaymentRequest, PaymentStoreError>;

    /// Fetches the payment with the given request id, if it exists.
    async fn fetch_payment_by_request_id(&self, request_id: &RequestId)
        -> Result<Option<PaymentRequest>, PaymentStoreError>;

    /// All `PENDING` payments whose deadline has not passed at `now`, oldest first. This is the reconciliation
    /// loop's scan source; it is a durable query, not an in-memory queue, so pending work survives restarts.
    async fn fetch_pending_payments(&self, now: DateTime<Utc>) -> Result<Vec<PaymentRequest>, PaymentStoreError>;

    /// Moves a payment into a terminal state, if and only if it is still `PENDING` at the moment the update lands.
    ///
    /// Returns the updated record, or `None` when the precondition did not hold (the record is already terminal, or
    /// does not exist). Of two racing callers exactly one receives `Some`; the loser's write is rejected rather than
    /// applied over the winner's.
    ///
    /// `txn_id` must be supplied exactly when `status` is [`PaymentStatus::Completed`].
    async fn finalize_payment(
        &self,
        request_id: &RequestId,
        status: PaymentStatus,
        txn_id: Option<&str>,
    ) -> Result<Option<PaymentRequest>, PaymentStoreError>;

    /// Bulk compare-and-set of every `PENDING` payment whose deadline has passed at `now` to `EXPIRED`.
    /// Returns the records that were expired by this call.
    async fn expire_overdue_payments(&self, now: DateTime<Utc>) -> Result<Vec<PaymentRequest>, PaymentStoreError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), PaymentStoreError> {
        Ok(())
    }
}
