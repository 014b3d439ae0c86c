//! # QR payment gateway server
//! This module hosts the HTTP surface of the gateway. It is responsible for:
//! Accepting payment initiation, status, and cancellation requests from point-of-sale clients.
//! Driving the payment lifecycle engine against the PayPay Open Payment API.
//! Running the background status poller that reconciles pending payments.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /payments/init`: Creates a new payment and returns the scannable QR reference.
//! * `GET /payments/{request_id}`: Returns the current state of a payment.
//! * `POST /payments/{request_id}/cancel`: Cancels a pending payment.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod poller;
pub mod provider;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
