//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into a separate
//! module. Keep this module neat and tidy 🙏
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use qr_payment_engine::{
    db_types::RequestId,
    traits::{PaymentProvider, PaymentStore},
    PaymentLifecycleApi,
};

use crate::{
    data_objects::{InitPaymentParams, PaymentResult},
    errors::ServerError,
};

/// Route handler for the health check endpoint
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// Route handler for `POST /payments/init`. Creates a new payment and returns the scannable reference.
pub async fn init_payment<B: PaymentStore, P: PaymentProvider>(
    api: web::Data<PaymentLifecycleApi<B, P>>,
    body: web::Json<InitPaymentParams>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    debug!("💻️ POST /payments/init for [{}]", params.request_id);
    let payment = api.initiate_payment(params.into()).await?;
    Ok(HttpResponse::Created().json(PaymentResult::from(payment)))
}

/// Route handler for `GET /payments/{request_id}`. Overdue `PENDING` payments are expired before being returned.
pub async fn payment_status<B: PaymentStore, P: PaymentProvider>(
    api: web::Data<PaymentLifecycleApi<B, P>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let request_id = RequestId::from(path.into_inner());
    let payment = api.get_payment(&request_id).await?;
    Ok(HttpResponse::Ok().json(PaymentResult::from(payment)))
}

/// Route handler for `POST /payments/{request_id}/cancel`. An operator action; only `PENDING` payments qualify.
pub async fn cancel_payment<B: PaymentStore, P: PaymentProvider>(
    api: web::Data<PaymentLifecycleApi<B, P>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let request_id = RequestId::from(path.into_inner());
    info!("💻️ Cancellation requested for [{request_id}]");
    let payment = api.cancel_payment(&request_id).await?;
    Ok(HttpResponse::Ok().json(PaymentResult::from(payment)))
}
