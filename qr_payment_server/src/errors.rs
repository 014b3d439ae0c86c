use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use qr_payment_engine::PaymentLifecycleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("{0}")]
    PaymentError(#[from] PaymentLifecycleError),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::PaymentError(e) => match e {
                PaymentLifecycleError::DuplicateRequest(_) => StatusCode::CONFLICT,
                PaymentLifecycleError::InvalidPaymentRequest(_) => StatusCode::BAD_REQUEST,
                PaymentLifecycleError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
                PaymentLifecycleError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
                PaymentLifecycleError::AlreadyFinalized(_, _) => StatusCode::CONFLICT,
                PaymentLifecycleError::StoreError(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}
