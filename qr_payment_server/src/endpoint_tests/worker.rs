use paypay_client::PayPayConfig;
use tokio::sync::watch;

use super::helpers::prepare_test_db;
use crate::{poller::start_status_poller, provider::PayPayProvider};

#[actix_web::test]
async fn poller_finishes_its_pass_and_stops_on_the_shutdown_signal() {
    let db = prepare_test_db().await;
    let provider = PayPayProvider::new(PayPayConfig::default()).unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = start_status_poller(
        db,
        provider,
        std::time::Duration::from_millis(50),
        chrono::Duration::seconds(300),
        shutdown_rx,
    );
    // Let at least one reconciliation pass run against the (empty) store.
    tokio::time::sleep(std::time::Duration::from_millis(120)).await;
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(2), poller)
        .await
        .expect("The poller did not stop after the shutdown signal")
        .expect("The poller task panicked");
}
