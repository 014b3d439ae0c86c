//! A small client for the PayPay Open Payment API.
//!
//! Only the two calls the payment gateway needs are implemented: creating a QR code for a payment request, and
//! fetching the details (i.e. status) of a payment identified by its merchant payment id. Requests are signed with
//! the HMAC scheme PayPay uses for machine-to-machine auth.
//!
//! This crate knows nothing about persistence or the payment engine. It talks HTTP and reports errors in a way that
//! lets callers distinguish "try again later" from "this request is bad".
mod api;
mod config;
mod data_objects;
mod error;

pub use api::PayPayApi;
pub use config::PayPayConfig;
pub use data_objects::{CreateQrRequest, PayPayAmount, PaymentDetailsData, QrCodeData, ResultInfo};
pub use error::PayPayApiError;
