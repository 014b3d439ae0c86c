use qr_payment_engine::SqliteStore;
use rand::{distributions::Alphanumeric, Rng};

/// A fresh store backed by its own throwaway database file, with the engine's migrations applied.
pub async fn prepare_test_db() -> SqliteStore {
    let _ = env_logger::try_init();
    let id: String = rand::thread_rng().sample_iter(&Alphanumeric).take(12).map(char::from).collect();
    let mut path = std::env::temp_dir();
    path.push(format!("qpg_endpoint_test_{id}.db"));
    let url = format!("sqlite://{}?mode=rwc", path.to_string_lossy());
    let store = SqliteStore::new_with_url(&url, 5).await.expect("Could not create test database");
    sqlx::migrate!("../qr_payment_engine/migrations").run(store.pool()).await.expect("Could not run migrations");
    store
}

/// Builds an in-process service with the payment routes wired to the given store and stub provider.
macro_rules! test_service {
    ($store:expr, $provider:expr) => {{
        let api = qr_payment_engine::PaymentLifecycleApi::new($store, $provider, chrono::Duration::seconds(300));
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(api))
                .service(crate::routes::health)
                .route(
                    "/payments/init",
                    actix_web::web::post()
                        .to(crate::routes::init_payment::<
                            qr_payment_engine::SqliteStore,
                            crate::endpoint_tests::mocks::StubProvider,
                        >),
                )
                .route(
                    "/payments/{request_id}",
                    actix_web::web::get()
                        .to(crate::routes::payment_status::<
                            qr_payment_engine::SqliteStore,
                            crate::endpoint_tests::mocks::StubProvider,
                        >),
                )
                .route(
                    "/payments/{request_id}/cancel",
                    actix_web::web::post()
                        .to(crate::routes::cancel_payment::<
                            qr_payment_engine::SqliteStore,
                            crate::endpoint_tests::mocks::StubProvider,
                        >),
                ),
        )
        .await
    }};
}

pub(crate) use test_service;
