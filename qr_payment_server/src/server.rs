use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use qr_payment_engine::{PaymentLifecycleApi, SqliteStore};
use tokio::sync::watch;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    poller::start_status_poller,
    provider::PayPayProvider,
    routes::{cancel_payment, health, init_payment, payment_status},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteStore::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let provider = PayPayProvider::new(config.paypay.clone())?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller =
        start_status_poller(db.clone(), provider.clone(), config.poll_interval, config.payment_timeout, shutdown_rx);
    let srv = create_server_instance(config, db, provider)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    // The server has stopped taking requests; let the poller finish its pass and exit before returning.
    let _ = shutdown_tx.send(true);
    if let Err(e) = poller.await {
        warn!("🚀️ The status poller did not shut down cleanly: {e}");
    }
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteStore,
    provider: PayPayProvider,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let payments_api = PaymentLifecycleApi::new(db.clone(), provider.clone(), config.payment_timeout);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("qpg::access_log"))
            .app_data(web::Data::new(payments_api))
            .service(health)
            .route("/payments/init", web::post().to(init_payment::<SqliteStore, PayPayProvider>))
            .route("/payments/{request_id}", web::get().to(payment_status::<SqliteStore, PayPayProvider>))
            .route("/payments/{request_id}/cancel", web::post().to(cancel_payment::<SqliteStore, PayPayProvider>))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
