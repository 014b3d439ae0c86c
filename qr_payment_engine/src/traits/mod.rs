//! The two seams of the engine: durable storage and the external payment provider.
mod payment_provider;
mod payment_store;

pub use payment_provider::{PaymentProvider, ProviderError, ProviderPaymentIntent, ProviderStatusReport};
pub use payment_store::{PaymentStore, PaymentStoreError};
