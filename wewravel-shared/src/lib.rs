pub mod models;
pub mod pii;

pub use models::booking::{
    Booking, BookingId, CreateBookingRequest, CreateBookingResponse, PaymentStatus, PaymentUpdate,
};
pub use models::events::SessionEvent;
pub use models::trip::{ItineraryDay, PricingTier, Trip, TripId};
pub use models::user::{LoginRequest, LoginResponse, SignupRequest, UserId, UserSession};
pub use pii::Masked;
