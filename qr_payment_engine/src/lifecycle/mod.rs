//! The payment lifecycle state machine and the reconciliation pass the poller drives.
mod api;
mod errors;

pub use api::{CycleSummary, PaymentLifecycleApi};
pub use errors::PaymentLifecycleError;
