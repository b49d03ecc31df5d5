use async_trait::async_trait;
use wewravel_shared::{
    Booking, BookingId, CreateBookingRequest, CreateBookingResponse, LoginRequest, LoginResponse,
    PaymentUpdate, SignupRequest, Trip, TripId, UserId,
};

use crate::CoreResult;

/// Read access to the trip catalog (`GET /trips`, `GET /trips/{id}`).
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn list_trips(&self) -> CoreResult<Vec<Trip>>;

    async fn get_trip(&self, id: TripId) -> CoreResult<Trip>;
}

/// Booking persistence owned by the backend.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a booking and open a gateway order for its deposit in one call.
    ///
    /// A reply carrying an error flag is returned as `Ok`; callers decide
    /// whether it counts as a failure.
    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> CoreResult<CreateBookingResponse>;

    async fn update_payment(&self, id: BookingId, update: &PaymentUpdate) -> CoreResult<Booking>;

    async fn bookings_for_user(&self, user_id: UserId) -> CoreResult<Vec<Booking>>;
}

/// Credential exchange. Rejections come back as
/// [`crate::CoreError::StatusError`] so the caller can inspect the body.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> CoreResult<LoginResponse>;

    async fn signup(&self, request: &SignupRequest) -> CoreResult<()>;
}
