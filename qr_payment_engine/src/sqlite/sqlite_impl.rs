//! `SqliteStore` is the concrete [`PaymentStore`] backend. It holds a connection pool and delegates the actual SQL
//! to the functions in [`super::db::payments`].
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::db::{db_url, new_pool, payments};
use crate::{
    db_types::{NewPaymentRecord, PaymentRequest, PaymentStatus, RequestId},
    traits::{PaymentStore, PaymentStoreError},
};

#[derive(Clone)]
pub struct SqliteStore {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteStore ({:?})", self.pool)
    }
}

impl SqliteStore {
    /// Creates a new store against the database named by `QPG_DATABASE_URL` (or the default).
    pub async fn new(max_connections: u32) -> Result<Self, PaymentStoreError> {
        let url = db_url();
        SqliteStore::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, PaymentStoreError> {
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl PaymentStore for SqliteStore {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_payment(&self, payment: NewPaymentRecord) -> Result<PaymentRequest, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        payments::insert_payment(payment, &mut conn).await
    }

    async fn fetch_payment_by_request_id(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<PaymentRequest>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        let payment = payments::fetch_payment_by_request_id(request_id, &mut conn).await?;
        Ok(payment)
    }

    async fn fetch_pending_payments(&self, now: DateTime<Utc>) -> Result<Vec<PaymentRequest>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        let pending = payments::fetch_pending_payments(now, &mut conn).await?;
        Ok(pending)
    }

    async fn finalize_payment(
        &self,
        request_id: &RequestId,
        status: PaymentStatus,
        txn_id: Option<&str>,
    ) -> Result<Option<PaymentRequest>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        let updated = payments::finalize_payment(request_id, status, txn_id, &mut conn).await?;
        Ok(updated)
    }

    async fn expire_overdue_payments(&self, now: DateTime<Utc>) -> Result<Vec<PaymentRequest>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        let expired = payments::expire_overdue_payments(now, &mut conn).await?;
        Ok(expired)
    }

    async fn close(&mut self) -> Result<(), PaymentStoreError> {
        self.pool.close().await;
        Ok(())
    }
}
