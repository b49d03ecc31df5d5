//! A backend that lives in process memory. Used by the CLI's offline mode
//! and as the recording stand-in for the REST backend in tests.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wewravel_shared::{
    Booking, BookingId, CreateBookingRequest, CreateBookingResponse, ItineraryDay, LoginRequest,
    LoginResponse, PaymentUpdate, PricingTier, SignupRequest, Trip, TripId, UserId, UserSession,
};

use crate::repository::{AuthRepository, BookingRepository, TripRepository};
use crate::{CoreError, CoreResult};

/// Number of calls seen per endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    pub list_trips: usize,
    pub get_trip: usize,
    pub create_booking: usize,
    pub update_payment: usize,
    pub bookings_for_user: usize,
    pub login: usize,
    pub signup: usize,
}

impl CallLog {
    pub fn total(&self) -> usize {
        self.list_trips
            + self.get_trip
            + self.create_booking
            + self.update_payment
            + self.bookings_for_user
            + self.login
            + self.signup
    }
}

#[derive(Default)]
struct Faults {
    create_error_flag: bool,
    create_transport_failure: bool,
    failing_updates: usize,
    create_delay: Option<Duration>,
    trips_unavailable: bool,
}

#[derive(Default)]
struct MemoryState {
    trips: Vec<Trip>,
    bookings: Vec<Booking>,
    users: Vec<(UserSession, String)>,
    updates: Vec<(BookingId, PaymentUpdate)>,
    calls: CallLog,
    faults: Faults,
}

#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// One demo trip and one demo account (`demo@wewravel.com` / `travel123`).
    pub fn seeded() -> Self {
        let backend = Self::new().with_trip(Trip {
            id: 1,
            title: "Kasol Kheerganga Trek".into(),
            location: Some("Himachal Pradesh".into()),
            duration: Some("3 Days / 2 Nights".into()),
            description: "Riverside camps and a hot-spring summit.".into(),
            image_url: None,
            itinerary: vec![
                ItineraryDay {
                    day_number: 1,
                    title: "Arrive in Kasol".into(),
                    description: "Check in and explore the market.".into(),
                },
                ItineraryDay {
                    day_number: 2,
                    title: "Kheerganga trek".into(),
                    description: "Hike to the hot springs.".into(),
                },
            ],
            inclusions: vec!["Stay".into(), "Breakfast".into()],
            exclusions: vec!["Travel to Delhi".into()],
            pricing: vec![
                PricingTier { room_type: "Triple Sharing".into(), price: Decimal::from(7999) },
                PricingTier { room_type: "Double Sharing".into(), price: Decimal::from(8999) },
            ],
        });
        backend.with_user(
            UserSession {
                id: 1,
                name: "Demo Traveler".into(),
                email: "demo@wewravel.com".into(),
                mobile: Some("9876543210".into()),
                phone: None,
                contact_number: None,
                created_at: Some("2025-01-01T00:00:00".into()),
                image_url: None,
            },
            "travel123",
        )
    }

    pub fn with_trip(self, trip: Trip) -> Self {
        self.lock().trips.push(trip);
        self
    }

    pub fn with_user(self, user: UserSession, password: &str) -> Self {
        self.lock().users.push((user, password.to_string()));
        self
    }

    pub fn with_booking(self, booking: Booking) -> Self {
        self.lock().bookings.push(booking);
        self
    }

    /// Next creations reply `{ "error": true }`.
    pub fn reject_bookings(&self) {
        self.lock().faults.create_error_flag = true;
    }

    /// Next creations fail before reaching the backend.
    pub fn drop_booking_requests(&self) {
        self.lock().faults.create_transport_failure = true;
    }

    /// The next `count` payment updates fail in transit.
    pub fn fail_payment_updates(&self, count: usize) {
        self.lock().faults.failing_updates = count;
    }

    pub fn delay_booking_creation(&self, delay: Duration) {
        self.lock().faults.create_delay = Some(delay);
    }

    pub fn take_catalog_offline(&self) {
        self.lock().faults.trips_unavailable = true;
    }

    pub fn calls(&self) -> CallLog {
        self.lock().calls.clone()
    }

    pub fn payment_updates(&self) -> Vec<(BookingId, PaymentUpdate)> {
        self.lock().updates.clone()
    }

    pub fn booking(&self, id: BookingId) -> Option<Booking> {
        self.lock().bookings.iter().find(|b| b.id == id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // a panicking test thread must not wedge the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TripRepository for InMemoryBackend {
    async fn list_trips(&self) -> CoreResult<Vec<Trip>> {
        let mut state = self.lock();
        state.calls.list_trips += 1;
        if state.faults.trips_unavailable {
            return Err(CoreError::StatusError { status: 503, body: "Failed to fetch trips".into() });
        }
        Ok(state.trips.clone())
    }

    async fn get_trip(&self, id: TripId) -> CoreResult<Trip> {
        let mut state = self.lock();
        state.calls.get_trip += 1;
        if state.faults.trips_unavailable {
            return Err(CoreError::StatusError { status: 503, body: "Failed to fetch trip".into() });
        }
        state
            .trips
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("trip {}", id)))
    }
}

#[async_trait]
impl BookingRepository for InMemoryBackend {
    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> CoreResult<CreateBookingResponse> {
        let delay = {
            let mut state = self.lock();
            state.calls.create_booking += 1;
            state.faults.create_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if state.faults.create_transport_failure {
            return Err(CoreError::TransportError("connection refused".into()));
        }
        if state.faults.create_error_flag {
            return Ok(CreateBookingResponse {
                error: Some(serde_json::Value::Bool(true)),
                ..Default::default()
            });
        }

        let id = state.bookings.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let booking = Booking {
            id,
            trip_id: request.trip_id,
            trip_title: request.trip_title.clone(),
            user_name: request.user_name.clone(),
            user_email: request.user_email.clone(),
            user_mobile: request.user_mobile.clone(),
            room_type: request.room_type.clone(),
            travelers: request.travelers,
            special_request: Some(request.special_request.clone()),
            start_date: request.start_date,
            end_date: None,
            duration: state
                .trips
                .iter()
                .find(|t| t.id == request.trip_id)
                .and_then(|t| t.duration.clone()),
            total_cost: request.total_cost,
            booking_amount: request.booking_amount,
            payment_status: Default::default(),
            paid_amount: None,
            gateway_order_id: Some(format!("order_mem_{}", id)),
            gateway_payment_id: None,
        };
        state.bookings.push(booking.clone());

        let amount = (request.booking_amount * Decimal::from(100))
            .round()
            .to_i64()
            .ok_or_else(|| CoreError::InternalError("deposit out of range".into()))?;

        Ok(CreateBookingResponse {
            error: None,
            payment_order_id: booking.gateway_order_id.clone(),
            booking: Some(booking),
            payment_key: Some("rzp_test_inmemory".into()),
            amount: Some(amount),
        })
    }

    async fn update_payment(&self, id: BookingId, update: &PaymentUpdate) -> CoreResult<Booking> {
        let mut state = self.lock();
        state.calls.update_payment += 1;
        state.updates.push((id, update.clone()));
        if state.faults.failing_updates > 0 {
            state.faults.failing_updates -= 1;
            return Err(CoreError::TransportError("connection reset".into()));
        }
        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("booking {}", id)))?;
        booking.payment_status = update.payment_status;
        booking.paid_amount = Some(update.paid_amount);
        booking.gateway_order_id = Some(update.gateway_order_id.clone());
        booking.gateway_payment_id = Some(update.gateway_payment_id.clone());
        Ok(booking.clone())
    }

    async fn bookings_for_user(&self, user_id: UserId) -> CoreResult<Vec<Booking>> {
        let mut state = self.lock();
        state.calls.bookings_for_user += 1;
        let email = state
            .users
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(u, _)| u.email.clone());
        Ok(state
            .bookings
            .iter()
            .filter(|b| Some(&b.user_email) == email.as_ref())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AuthRepository for InMemoryBackend {
    async fn login(&self, request: &LoginRequest) -> CoreResult<LoginResponse> {
        let mut state = self.lock();
        state.calls.login += 1;
        let (user, password) = state
            .users
            .iter()
            .find(|(u, _)| u.email == request.email)
            .ok_or_else(|| CoreError::StatusError { status: 401, body: "Invalid email".into() })?;
        if password != request.password.expose() {
            return Err(CoreError::StatusError { status: 401, body: "Invalid password".into() });
        }
        Ok(LoginResponse { token: Some(format!("mem-token-{}", user.id)), user: user.clone() })
    }

    async fn signup(&self, request: &SignupRequest) -> CoreResult<()> {
        let mut state = self.lock();
        state.calls.signup += 1;
        if state.users.iter().any(|(u, _)| u.email == request.email) {
            return Err(CoreError::StatusError { status: 409, body: "Email already registered".into() });
        }
        let id = state.users.iter().map(|(u, _)| u.id).max().unwrap_or(0) + 1;
        let user = UserSession {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            mobile: None,
            phone: None,
            contact_number: Some(request.contact_number.clone()),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            image_url: None,
        };
        state.users.push((user, request.password.expose().clone()));
        Ok(())
    }
}
