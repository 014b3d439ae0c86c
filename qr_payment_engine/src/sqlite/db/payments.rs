use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPaymentRecord, NewPaymentRequest, PaymentRequest, PaymentStatus, RequestId},
    traits::PaymentStoreError,
};

/// Inserts a new payment request in the `PENDING` state. The UNIQUE constraint on `request_id` is what enforces the
/// duplicate guard, so two racing inserts resolve in the database, not in application code.
pub async fn insert_payment(
    payment: NewPaymentRecord,
    conn: &mut SqliteConnection,
) -> Result<PaymentRequest, PaymentStoreError> {
    let NewPaymentRecord { request, provider_reference, expires_at } = payment;
    let NewPaymentRequest { request_id, amount, currency, tender, terminal_id } = request;
    let now = Utc::now();
    let inserted = sqlx::query_as::<_, PaymentRequest>(
        r#"
            INSERT INTO payments (
                request_id,
                amount,
                currency,
                tender,
                terminal_id,
                status,
                provider_reference,
                created_at,
                expires_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, 'PENDING', $6, $7, $8, $7)
            RETURNING *;
        "#,
    )
    .bind(request_id.as_str())
    .bind(amount)
    .bind(currency)
    .bind(tender)
    .bind(terminal_id)
    .bind(provider_reference)
    .bind(now)
    .bind(expires_at)
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(de) if de.is_unique_violation() => PaymentStoreError::DuplicateRequest(request_id.clone()),
        _ => PaymentStoreError::from(e),
    })?;
    debug!("🗃️ Payment [{}] inserted with id {}", inserted.request_id, inserted.id);
    Ok(inserted)
}

pub async fn fetch_payment_by_request_id(
    request_id: &RequestId,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentRequest>, sqlx::Error> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE request_id = $1")
        .bind(request_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

/// All `PENDING` payments that have not passed their deadline at `now`, oldest first.
pub async fn fetch_pending_payments(
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentRequest>, sqlx::Error> {
    let payments =
        sqlx::query_as("SELECT * FROM payments WHERE status = 'PENDING' AND expires_at > $1 ORDER BY created_at ASC")
            .bind(now)
            .fetch_all(conn)
            .await?;
    Ok(payments)
}

/// The compare-and-set at the heart of the state machine: the UPDATE only matches when the record is still
/// `PENDING`, so of two concurrent terminal transitions exactly one row is written. `None` means the precondition
/// failed — the record was already terminal, or never existed.
pub async fn finalize_payment(
    request_id: &RequestId,
    status: PaymentStatus,
    txn_id: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentRequest>, sqlx::Error> {
    let updated = sqlx::query_as::<_, PaymentRequest>(
        r#"
            UPDATE payments
            SET status = $1, provider_txn_id = $2, updated_at = $3
            WHERE request_id = $4 AND status = 'PENDING'
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(txn_id)
    .bind(Utc::now())
    .bind(request_id.as_str())
    .fetch_optional(conn)
    .await?;
    if let Some(payment) = &updated {
        debug!("🗃️ Payment [{}] is now {}", payment.request_id, payment.status);
    }
    Ok(updated)
}

/// Expires every `PENDING` payment whose deadline has passed at `now`, in one statement. The status guard makes the
/// sweep idempotent and safe against a concurrent lazy expiry or provider-driven transition.
pub async fn expire_overdue_payments(
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentRequest>, sqlx::Error> {
    let expired = sqlx::query_as::<_, PaymentRequest>(
        r#"
            UPDATE payments
            SET status = 'EXPIRED', updated_at = $1
            WHERE status = 'PENDING' AND expires_at <= $1
            RETURNING *;
        "#,
    )
    .bind(now)
    .fetch_all(conn)
    .await?;
    Ok(expired)
}
