use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use qpg_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------   PaymentStatus   -----------------------------------------------------------
/// The lifecycle state of a payment request.
///
/// `Pending` is the only non-terminal state. Every other state is terminal: once a record leaves `Pending`, no
/// further transition is ever applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// The payment request exists and the provider has not yet reported an outcome.
    Pending,
    /// The customer paid. `provider_txn_id` is set if and only if a record is in this state.
    Completed,
    /// The provider reported the payment as failed.
    Failed,
    /// The deadline passed without a terminal report from the provider.
    Expired,
    /// An operator cancelled the request. Never inferred from provider polling.
    Cancelled,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Completed => write!(f, "COMPLETED"),
            PaymentStatus::Failed => write!(f, "FAILED"),
            PaymentStatus::Expired => write!(f, "EXPIRED"),
            PaymentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment status: {0}")]
pub struct ConversionError(String);

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            "EXPIRED" => Ok(Self::Expired),
            "CANCELLED" => Ok(Self::Cancelled),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------   ProviderStatus   ----------------------------------------------------------
/// What the provider currently knows about a payment. This is the normalized form every provider integration maps
/// its own response shapes into before the lifecycle service sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Pending,
    Completed,
    Failed,
    Expired,
    /// The provider has no record, or its answer could not be interpreted. This means "no information" and must
    /// never be treated as an outcome.
    Unknown,
}

impl Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderStatus::Pending => write!(f, "PENDING"),
            ProviderStatus::Completed => write!(f, "COMPLETED"),
            ProviderStatus::Failed => write!(f, "FAILED"),
            ProviderStatus::Expired => write!(f, "EXPIRED"),
            ProviderStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

//--------------------------------------      Tender       -----------------------------------------------------------
/// Which payment network handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Tender {
    Paypay,
    Rakuten,
}

impl Display for Tender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tender::Paypay => write!(f, "PAYPAY"),
            Tender::Rakuten => write!(f, "RAKUTEN"),
        }
    }
}

//--------------------------------------     RequestId     -----------------------------------------------------------
/// The client-supplied identifier of a payment request. Unique for the lifetime of the system; also the merchant
/// reference the provider keys the payment on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------   PaymentRequest   ----------------------------------------------------------
/// A persisted payment request. One row per client-initiated payment attempt; rows are never deleted by the engine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentRequest {
    pub id: i64,
    pub request_id: RequestId,
    pub amount: Money,
    pub currency: String,
    pub tender: Tender,
    pub terminal_id: i64,
    pub status: PaymentStatus,
    /// The scannable payload (QR deeplink or equivalent) the provider issued at creation time.
    pub provider_reference: String,
    /// The provider's own transaction id. Set exactly when the record transitions to `Completed`.
    pub provider_txn_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRequest {
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

//--------------------------------------  NewPaymentRequest  ---------------------------------------------------------
/// The client-facing shape of a payment initiation, before the provider has been consulted.
#[derive(Debug, Clone)]
pub struct NewPaymentRequest {
    pub request_id: RequestId,
    pub amount: Money,
    pub currency: String,
    pub tender: Tender,
    pub terminal_id: i64,
}

impl NewPaymentRequest {
    pub fn new(request_id: RequestId, amount: Money, currency: &str, tender: Tender, terminal_id: i64) -> Self {
        Self { request_id, amount, currency: currency.to_string(), tender, terminal_id }
    }
}

//--------------------------------------   NewPaymentRecord  ---------------------------------------------------------
/// Everything the store needs to persist a freshly initiated payment: the client's request plus what the provider
/// handed back for it.
#[derive(Debug, Clone)]
pub struct NewPaymentRecord {
    pub request: NewPaymentRequest,
    pub provider_reference: String,
    pub expires_at: DateTime<Utc>,
}
