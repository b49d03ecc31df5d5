pub mod cancel;
pub mod identity;
pub mod memory;
pub mod payment;
pub mod repository;

pub use cancel::{await_or_cancel, guarded, CancelAware};
pub use memory::InMemoryBackend;
pub use payment::{CheckoutOptions, CheckoutOutcome, GatewayPayment, MockPaymentGateway, PaymentGateway, Prefill};
pub use repository::{AuthRepository, BookingRepository, TripRepository};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Could not reach backend: {0}")]
    TransportError(String),
    #[error("Backend responded with {status}: {body}")]
    StatusError { status: u16, body: String },
    #[error("Unexpected backend payload: {0}")]
    DecodeError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Payment gateway error: {0}")]
    GatewayError(String),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl CoreError {
    /// Body text of a non-success response, if this error carries one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            CoreError::StatusError { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::TransportError(_))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
