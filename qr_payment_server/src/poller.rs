use chrono::Duration;
use log::*;
use qr_payment_engine::{PaymentLifecycleApi, SqliteStore};
use tokio::{sync::watch, task::JoinHandle};

use crate::provider::PayPayProvider;

/// Starts the status poller. It runs one reconciliation pass per tick until the shutdown signal fires, and the
/// returned handle resolves once the final pass has completed, so awaiting it gives a clean shutdown.
pub fn start_status_poller(
    db: SqliteStore,
    provider: PayPayProvider,
    poll_interval: std::time::Duration,
    payment_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let api = PaymentLifecycleApi::new(db, provider, payment_timeout);
        let mut timer = tokio::time::interval(poll_interval);
        info!("🕰️ Status poller started. Polling every {}s", poll_interval.as_secs());
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    match api.run_reconciliation_cycle().await {
                        Ok(summary) => debug!("🕰️ Reconciliation pass complete: {summary}"),
                        Err(e) => error!("🕰️ Reconciliation pass failed: {e}. Trying again next tick."),
                    }
                },
                _ = shutdown.changed() => {
                    info!("🕰️ Status poller shutting down");
                    break;
                },
            }
        }
    })
}
