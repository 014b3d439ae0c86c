use std::fmt::{Debug, Display};

use chrono::{Duration, Utc};
use log::*;

use crate::{
    db_types::{NewPaymentRecord, NewPaymentRequest, PaymentRequest, PaymentStatus, ProviderStatus, RequestId},
    lifecycle::PaymentLifecycleError,
    traits::{PaymentProvider, PaymentStore, ProviderStatusReport},
};

/// `PaymentLifecycleApi` is the primary API for creating payments, looking them up, and applying provider-reported
/// outcomes. It is the only component that mutates payment records, and every mutation it makes goes through the
/// store's compare-and-set, so racing callers resolve to exactly one winner.
pub struct PaymentLifecycleApi<B, P> {
    db: B,
    provider: P,
    payment_timeout: Duration,
}

impl<B, P> Debug for PaymentLifecycleApi<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentLifecycleApi")
    }
}

impl<B, P> PaymentLifecycleApi<B, P> {
    pub fn new(db: B, provider: P, payment_timeout: Duration) -> Self {
        Self { db, provider, payment_timeout }
    }
}

impl<B, P> PaymentLifecycleApi<B, P>
where
    B: PaymentStore,
    P: PaymentProvider,
{
    /// Initiates a brand-new payment.
    ///
    /// The provider is asked for a scannable reference first, and only then is the record persisted in `PENDING`.
    /// The two steps are deliberately not atomic: if the process dies in between, the payment exists at the provider
    /// but not locally, and the client's retry with the same request id finds no local record and goes through the
    /// provider again. That retry is safe because the provider keys the payment on the request id.
    ///
    /// Nothing is persisted when the provider rejects the request or cannot be reached.
    pub async fn initiate_payment(&self, request: NewPaymentRequest) -> Result<PaymentRequest, PaymentLifecycleError> {
        if let Some(existing) = self.db.fetch_payment_by_request_id(&request.request_id).await? {
            debug!("🔄️ Payment [{}] already exists with status {}", existing.request_id, existing.status);
            return Err(PaymentLifecycleError::DuplicateRequest(request.request_id));
        }
        let intent = self.provider.create_payment_request(&request).await?;
        let now = Utc::now();
        let expires_at = match intent.expires_at {
            Some(deadline) if deadline > now => deadline,
            // Clock skew or a stale provider deadline. A record must always be born with time left on the
            // clock, so fall back to the local timeout.
            Some(deadline) => {
                warn!(
                    "🔄️ Provider deadline {deadline} for [{}] is not in the future. Using the local timeout instead.",
                    request.request_id
                );
                now + self.payment_timeout
            },
            None => now + self.payment_timeout,
        };
        let record =
            NewPaymentRecord { request, provider_reference: intent.provider_reference, expires_at };
        // A concurrent initiation with the same id between the check above and this insert loses here, on the
        // store's uniqueness constraint.
        let payment = self.db.insert_payment(record).await?;
        info!("🔄️ Payment [{}] created in PENDING state. It expires at {}", payment.request_id, payment.expires_at);
        Ok(payment)
    }

    /// Fetches a payment by request id.
    ///
    /// A `PENDING` record whose deadline has passed is expired here and now (lazy expiry) before being returned, so
    /// callers never observe a stale `PENDING` record past its deadline, whatever the poller is up to.
    pub async fn get_payment(&self, request_id: &RequestId) -> Result<PaymentRequest, PaymentLifecycleError> {
        let payment = self
            .db
            .fetch_payment_by_request_id(request_id)
            .await?
            .ok_or_else(|| PaymentLifecycleError::PaymentNotFound(request_id.clone()))?;
        if payment.status == PaymentStatus::Pending && payment.is_past_deadline(Utc::now()) {
            debug!("🔄️ Payment [{request_id}] is past its deadline. Expiring it lazily.");
            match self.db.finalize_payment(request_id, PaymentStatus::Expired, None).await? {
                Some(expired) => return Ok(expired),
                // Someone else finalized it first. Whatever they wrote is the answer.
                None => {
                    return self
                        .db
                        .fetch_payment_by_request_id(request_id)
                        .await?
                        .ok_or_else(|| PaymentLifecycleError::PaymentNotFound(request_id.clone()));
                },
            }
        }
        Ok(payment)
    }

    /// Applies a provider-reported status to a payment. This is the reconciliation loop's write path.
    ///
    /// Returns the updated record when a transition was applied, and `None` when there was nothing to do:
    /// * the report carries no information (`UNKNOWN`, or still `PENDING` at the provider),
    /// * the report says `COMPLETED` but has no transaction id (a completion without a transaction id is not
    ///   trustworthy, so the record is left `PENDING` for a later cycle),
    /// * or the record is no longer `PENDING`, which makes duplicate reconciliation passes idempotent.
    pub async fn apply_provider_status(
        &self,
        request_id: &RequestId,
        report: ProviderStatusReport,
    ) -> Result<Option<PaymentRequest>, PaymentLifecycleError> {
        let (new_status, txn_id) = match report.status {
            ProviderStatus::Pending | ProviderStatus::Unknown => {
                trace!("🔄️ Provider has nothing new on [{request_id}] ({})", report.status);
                return Ok(None);
            },
            ProviderStatus::Completed => match report.txn_id.as_deref() {
                Some(txn_id) => (PaymentStatus::Completed, Some(txn_id)),
                None => {
                    warn!(
                        "🔄️ Provider reported [{request_id}] as COMPLETED without a transaction id. Treating the \
                         report as UNKNOWN."
                    );
                    return Ok(None);
                },
            },
            ProviderStatus::Failed => (PaymentStatus::Failed, None),
            ProviderStatus::Expired => (PaymentStatus::Expired, None),
        };
        let updated = self.db.finalize_payment(request_id, new_status, txn_id).await?;
        match &updated {
            Some(payment) => info!("🔄️ Payment [{request_id}] transitioned to {}", payment.status),
            None => debug!("🔄️ Payment [{request_id}] is no longer PENDING. Ignoring the provider report."),
        }
        Ok(updated)
    }

    /// Cancels a `PENDING` payment. This is an operator action; cancellation is never derived from provider polling.
    pub async fn cancel_payment(&self, request_id: &RequestId) -> Result<PaymentRequest, PaymentLifecycleError> {
        match self.db.finalize_payment(request_id, PaymentStatus::Cancelled, None).await? {
            Some(cancelled) => {
                info!("🔄️ Payment [{request_id}] was cancelled");
                Ok(cancelled)
            },
            None => match self.db.fetch_payment_by_request_id(request_id).await? {
                Some(payment) => Err(PaymentLifecycleError::AlreadyFinalized(request_id.clone(), payment.status)),
                None => Err(PaymentLifecycleError::PaymentNotFound(request_id.clone())),
            },
        }
    }

    /// Runs one reconciliation pass over the store.
    ///
    /// Overdue `PENDING` records are expired first, without a provider call, so polling and direct lookups converge
    /// on the same outcome. The remaining `PENDING` records are each checked against the provider; a failure on one
    /// record is logged and skipped so it never aborts the pass for the others. A skipped record is simply retried
    /// on the next cycle, bounded by its own deadline.
    pub async fn run_reconciliation_cycle(&self) -> Result<CycleSummary, PaymentLifecycleError> {
        let now = Utc::now();
        let expired = self.db.expire_overdue_payments(now).await?;
        for payment in &expired {
            debug!("🔄️ Payment [{}] passed its deadline at {} and was expired", payment.request_id, payment.expires_at);
        }
        let pending = self.db.fetch_pending_payments(now).await?;
        let mut summary = CycleSummary { expired: expired.len(), scanned: pending.len(), ..Default::default() };
        for payment in pending {
            let report = match self.provider.query_status(&payment.request_id).await {
                Ok(report) => report,
                Err(e) => {
                    warn!("🔄️ Status query for [{}] failed: {e}. It will be retried next cycle.", payment.request_id);
                    summary.skipped += 1;
                    continue;
                },
            };
            match self.apply_provider_status(&payment.request_id, report).await {
                Ok(Some(_)) => summary.settled += 1,
                Ok(None) => {},
                Err(e) => {
                    warn!("🔄️ Could not apply provider status to [{}]: {e}", payment.request_id);
                    summary.skipped += 1;
                },
            }
        }
        Ok(summary)
    }
}

/// Counters for one reconciliation pass, for the poller's logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Records expired without a provider call because their deadline had passed.
    pub expired: usize,
    /// Records still pending that were checked against the provider.
    pub scanned: usize,
    /// Records that reached a terminal state this pass.
    pub settled: usize,
    /// Records skipped because of a provider or store failure. They stay pending.
    pub skipped: usize,
}

impl Display for CycleSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} scanned, {} settled, {} expired, {} skipped",
            self.scanned, self.settled, self.expired, self.skipped
        )
    }
}
