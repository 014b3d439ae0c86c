use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PayPayApiError {
    #[error("Could not initialize the PayPay client. {0}")]
    Initialization(String),
    #[error("Could not reach the PayPay API. {0}")]
    Transport(String),
    #[error("The PayPay API returned HTTP {status}. {message}")]
    HttpStatus { status: u16, message: String },
    #[error("The PayPay API rejected the request ({code}). {message}")]
    Api { code: String, message: String },
    #[error("Could not interpret the PayPay response. {0}")]
    ResponseFormat(String),
}

impl PayPayApiError {
    /// True when a retry on a later cycle can plausibly succeed. 4xx-class and explicit API rejections are
    /// permanent; everything else is treated as a provider hiccup.
    pub fn is_transient(&self) -> bool {
        match self {
            PayPayApiError::Transport(_) | PayPayApiError::ResponseFormat(_) => true,
            PayPayApiError::HttpStatus { status, .. } => *status >= 500,
            PayPayApiError::Initialization(_) | PayPayApiError::Api { .. } => false,
        }
    }
}
