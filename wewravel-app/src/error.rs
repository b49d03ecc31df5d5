use wewravel_catalog::CatalogError;
use wewravel_core::identity::FieldErrors;
use wewravel_core::CoreError;
use wewravel_order::CheckoutError;
use wewravel_store::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Client-side checks failed; nothing was sent.
    #[error("Please correct the highlighted fields")]
    Fields(FieldErrors),

    #[error("{message}")]
    Rejected { message: String, offer_reset: bool },

    #[error("Cannot connect to server. Please try again later.")]
    Unreachable { offer_reset: bool },

    #[error("Signup Failed: {0}")]
    SignupFailed(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Whether the "forgot password" hint should be shown with this error.
    pub fn offers_reset(&self) -> bool {
        matches!(
            self,
            AuthError::Rejected { offer_reset: true, .. } | AuthError::Unreachable { offer_reset: true }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Backend(#[from] CoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<wewravel_store::app_config::ConfigError> for AppError {
    fn from(err: wewravel_store::app_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
