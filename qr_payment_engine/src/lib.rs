//! QR Payment Engine
//!
//! The core of the QR payment gateway. It owns the payment lifecycle state machine and knows nothing about HTTP.
//!
//! The crate is split along the same lines as the system design:
//! 1. Database types and the storage contract ([`db_types`], [`traits::PaymentStore`]). SQLite is the only backend
//!    currently implemented; the store trait is the seam for adding another.
//! 2. The provider contract ([`traits::PaymentProvider`]): an abstraction over an external payment network that can
//!    mint a scannable payment reference and report what it currently knows about a payment.
//! 3. The lifecycle API ([`PaymentLifecycleApi`]): creation, lookup with lazy expiry, validated state transitions and
//!    the reconciliation cycle the background poller drives.
//!
//! Every state transition goes through a compare-and-set keyed on the record still being `PENDING`, so concurrent
//! writers (a foreground lookup expiring a record, and the poller applying a provider result) cannot both win.
pub mod db_types;
mod lifecycle;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

pub use lifecycle::{CycleSummary, PaymentLifecycleApi, PaymentLifecycleError};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
