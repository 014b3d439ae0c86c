use thiserror::Error;

use crate::{
    db_types::{PaymentStatus, RequestId},
    traits::{PaymentStoreError, ProviderError},
};

#[derive(Debug, Clone, Error)]
pub enum PaymentLifecycleError {
    #[error("A payment with request id {0} already exists")]
    DuplicateRequest(RequestId),
    /// The provider rejected the request. Permanent: retrying with the same input will fail again.
    #[error("The payment request is invalid. {0}")]
    InvalidPaymentRequest(String),
    /// The provider could not be reached. Transient: the client may retry with the same request id.
    #[error("The payment provider is temporarily unavailable. {0}")]
    ProviderUnavailable(String),
    #[error("No payment found with request id {0}")]
    PaymentNotFound(RequestId),
    #[error("Payment {0} is already {1} and cannot be modified")]
    AlreadyFinalized(RequestId, PaymentStatus),
    /// The store could not be reached or the write failed. Transient.
    #[error("The payment store is unavailable. {0}")]
    StoreError(String),
}

impl From<PaymentStoreError> for PaymentLifecycleError {
    fn from(e: PaymentStoreError) -> Self {
        match e {
            PaymentStoreError::DuplicateRequest(id) => PaymentLifecycleError::DuplicateRequest(id),
            PaymentStoreError::DatabaseError(msg) => PaymentLifecycleError::StoreError(msg),
        }
    }
}

impl From<ProviderError> for PaymentLifecycleError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Rejected(msg) => PaymentLifecycleError::InvalidPaymentRequest(msg),
            ProviderError::Unavailable(msg) => PaymentLifecycleError::ProviderUnavailable(msg),
        }
    }
}

impl PaymentLifecycleError {
    /// Whether retrying the same call later can succeed. The distinction is preserved all the way to clients so
    /// they know whether re-submitting the same request id is meaningful.
    pub fn is_transient(&self) -> bool {
        matches!(self, PaymentLifecycleError::ProviderUnavailable(_) | PaymentLifecycleError::StoreError(_))
    }
}
