use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::info;
use wewravel_catalog::CatalogClient;
use wewravel_core::{guarded, BookingRepository};
use wewravel_order::format_rupees;
use wewravel_shared::{Booking, Trip, UserSession};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct BookingCard {
    pub booking: Booking,
    pub badge: String,
}

impl BookingCard {
    pub fn new(booking: Booking) -> Self {
        let badge = payment_badge(&booking);
        Self { booking, badge }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub user: UserSession,
    pub upcoming: Vec<BookingCard>,
    pub previous: Vec<BookingCard>,
    pub trips: Vec<Trip>,
}

impl DashboardView {
    /// Bookings and the trip list are fetched side by side.
    pub async fn load(
        user: UserSession,
        bookings: &dyn BookingRepository,
        catalog: &CatalogClient,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Self, AppError> {
        let (mine, trips) = tokio::join!(
            guarded(cancel, bookings.bookings_for_user(user.id)),
            catalog.list_trips(cancel),
        );
        let mine = mine?;
        let trips = trips?;

        let (upcoming, previous) = split_by_start(mine, today);
        info!(
            "Dashboard for user {}: {} upcoming, {} previous",
            user.id,
            upcoming.len(),
            previous.len()
        );
        Ok(Self { user, upcoming, previous, trips })
    }

    pub fn member_since(&self) -> Option<String> {
        self.user.member_since().map(|year| format!("Member since {}", year))
    }
}

/// A trip starting today already counts as previous.
pub fn split_by_start(bookings: Vec<Booking>, today: NaiveDate) -> (Vec<BookingCard>, Vec<BookingCard>) {
    let (upcoming, previous): (Vec<_>, Vec<_>) =
        bookings.into_iter().partition(|b| b.start_date > today);
    (
        upcoming.into_iter().map(BookingCard::new).collect(),
        previous.into_iter().map(BookingCard::new).collect(),
    )
}

pub fn payment_badge(booking: &Booking) -> String {
    if booking.is_paid() {
        format!("Paid {}", format_rupees(booking.paid_amount.unwrap_or_default()))
    } else {
        "Payment Pending".to_string()
    }
}
