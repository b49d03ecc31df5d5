use chrono::NaiveDate;
use wewravel_catalog::PricingError;

/// Input problems, reported one at a time in field order.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please select a room type before confirming booking.")]
    MissingRoomType,

    #[error("Please select your preferred trip start date.")]
    MissingStartDate,

    #[error("Trip start date {date} is in the past (today is {today}).")]
    StartDateInPast { date: NaiveDate, today: NaiveDate },

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Please log in to continue booking.")]
    NotLoggedIn,

    #[error("Trip details are not loaded yet")]
    TripUnavailable,

    #[error(transparent)]
    Validation(#[from] FormError),

    #[error("A booking request is already in flight")]
    AlreadySubmitting,

    #[error("Failed to create booking or payment order: {0}")]
    CreationFailed(String),

    #[error("Payment gateway failed: {0}")]
    Gateway(String),

    #[error("Checkout cancelled")]
    Cancelled,
}
