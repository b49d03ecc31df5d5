use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use wewravel_catalog::{BookingQuote, PricingEngine};
use wewravel_core::{guarded, BookingRepository, CoreError, Prefill};
use wewravel_shared::{Booking, CreateBookingRequest, Masked, Trip, TripId, UserSession};

use crate::error::{CheckoutError, FormError};

/// In-memory booking input. Lost if the form is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub trip_id: TripId,
    pub room_type: String,
    pub travelers: u32,
    pub special_request: String,
    pub start_date: Option<NaiveDate>,
}

impl BookingDraft {
    pub fn new(trip_id: TripId) -> Self {
        Self {
            trip_id,
            room_type: String::new(),
            travelers: 1,
            special_request: String::new(),
            start_date: None,
        }
    }
}

/// A booking the backend accepted, together with the gateway order it
/// opened. `total_cost` is the figure computed at submission and is what
/// gets recorded as paid.
#[derive(Debug, Clone)]
pub struct CreatedBooking {
    pub booking: Booking,
    pub payment_order_id: String,
    pub payment_key: String,
    pub amount: i64,
    pub total_cost: Decimal,
    pub trip_title: String,
    pub prefill: Prefill,
}

/// Result of trying to open the booking form.
pub enum FormEntry {
    Ready(Box<BookingForm>),
    /// Trip was not handed over by the previous screen.
    Loading,
    LoginRequired { notice: String },
}

impl FormEntry {
    /// Session is checked before the trip: an anonymous visitor is sent to
    /// login even when the trip is known.
    pub fn open(
        user: Option<UserSession>,
        trip: Option<Trip>,
        bookings: Arc<dyn BookingRepository>,
        pricing: Arc<PricingEngine>,
    ) -> Self {
        let Some(user) = user else {
            return FormEntry::LoginRequired {
                notice: CheckoutError::NotLoggedIn.to_string(),
            };
        };
        match trip {
            Some(trip) => FormEntry::Ready(Box::new(BookingForm::new(trip, user, bookings, pricing))),
            None => FormEntry::Loading,
        }
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BookingForm {
    trip: Trip,
    user: UserSession,
    draft: BookingDraft,
    quote: BookingQuote,
    bookings: Arc<dyn BookingRepository>,
    pricing: Arc<PricingEngine>,
    submitting: AtomicBool,
}

impl BookingForm {
    pub fn new(
        trip: Trip,
        user: UserSession,
        bookings: Arc<dyn BookingRepository>,
        pricing: Arc<PricingEngine>,
    ) -> Self {
        Self {
            draft: BookingDraft::new(trip.id),
            trip,
            user,
            quote: BookingQuote::zero(),
            bookings,
            pricing,
            submitting: AtomicBool::new(false),
        }
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    /// Identity fields are display-only.
    pub fn user(&self) -> &UserSession {
        &self.user
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn quote(&self) -> BookingQuote {
        self.quote
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Empty clears the selection and zeroes the quote. Anything else must
    /// name one of the trip's tiers.
    pub fn set_room_type(&mut self, room_type: &str) -> Result<(), FormError> {
        if !room_type.is_empty() && self.trip.tier(room_type).is_none() {
            return Err(wewravel_catalog::PricingError::UnknownRoomType(room_type.to_string()).into());
        }
        self.draft.room_type = room_type.to_string();
        self.recalculate();
        Ok(())
    }

    pub fn set_travelers(&mut self, travelers: u32) -> Result<(), FormError> {
        self.pricing.check_travelers(travelers)?;
        self.draft.travelers = travelers;
        self.recalculate();
        Ok(())
    }

    pub fn set_start_date(&mut self, start_date: Option<NaiveDate>) {
        self.draft.start_date = start_date;
    }

    pub fn set_special_request(&mut self, request: impl Into<String>) {
        self.draft.special_request = request.into();
    }

    fn recalculate(&mut self) {
        self.quote = self
            .pricing
            .quote(&self.trip, &self.draft.room_type, self.draft.travelers)
            .unwrap_or_default();
    }

    /// First failing field wins; the order is room type, start date, then
    /// pricing consistency.
    pub fn validate(&self, today: NaiveDate) -> Result<(), FormError> {
        if self.draft.room_type.is_empty() {
            return Err(FormError::MissingRoomType);
        }
        let Some(date) = self.draft.start_date else {
            return Err(FormError::MissingStartDate);
        };
        if date < today {
            return Err(FormError::StartDateInPast { date, today });
        }
        self.pricing
            .quote(&self.trip, &self.draft.room_type, self.draft.travelers)?;
        Ok(())
    }

    fn creation_request(&self, start_date: NaiveDate) -> CreateBookingRequest {
        CreateBookingRequest {
            trip_id: self.trip.id,
            trip_title: self.trip.title.clone(),
            user_name: self.user.name.clone(),
            user_email: self.user.email.clone(),
            user_mobile: self.user.mobile().to_string(),
            room_type: self.draft.room_type.clone(),
            travelers: self.draft.travelers,
            total_cost: self.quote.total_cost,
            booking_amount: self.quote.booking_amount,
            special_request: self.draft.special_request.clone(),
            start_date,
        }
    }

    /// Validate, then ask the backend to create the booking and its gateway
    /// order. A second call while one is outstanding is refused without
    /// touching the network.
    pub async fn submit(&self, cancel: &CancellationToken) -> Result<CreatedBooking, CheckoutError> {
        let _in_flight = InFlight::acquire(&self.submitting).ok_or(CheckoutError::AlreadySubmitting)?;

        self.validate(Local::now().date_naive())?;
        let start_date = self.draft.start_date.ok_or(FormError::MissingStartDate)?;
        let request = self.creation_request(start_date);

        let reply = guarded(cancel, self.bookings.create_booking(&request))
            .await
            .map_err(|e| match e {
                CoreError::Cancelled => CheckoutError::Cancelled,
                other => {
                    warn!("Booking creation failed for trip {}: {}", self.trip.id, other);
                    CheckoutError::CreationFailed(other.to_string())
                }
            })?;

        if reply.has_error() {
            warn!("Backend flagged booking creation for trip {} as failed", self.trip.id);
            return Err(CheckoutError::CreationFailed("backend reported an error".into()));
        }
        let (Some(booking), Some(payment_order_id), Some(payment_key), Some(amount)) =
            (reply.booking, reply.payment_order_id, reply.payment_key, reply.amount)
        else {
            return Err(CheckoutError::CreationFailed("incomplete booking reply".into()));
        };

        info!(
            "Booking {} created for trip {} by {} ({} travelers, deposit {})",
            booking.id,
            self.trip.id,
            Masked::new(self.user.email.clone()).hint(),
            request.travelers,
            request.booking_amount
        );

        Ok(CreatedBooking {
            booking,
            payment_order_id,
            payment_key,
            amount,
            total_cost: request.total_cost,
            trip_title: self.trip.title.clone(),
            prefill: Prefill {
                name: self.user.name.clone(),
                email: self.user.email.clone(),
                contact: self.user.mobile().to_string(),
            },
        })
    }
}
