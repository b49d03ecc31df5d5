use chrono::Local;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use wewravel_order::{BookingForm, BookingStatusView, FormEntry};
use wewravel_shared::{Booking, Trip, TripId};

use crate::auth::greeting;
use crate::dashboard::DashboardView;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Trips { search: Option<String> },
    TripDetail { id: TripId },
    /// The trip travels with the route; without it the form cannot render.
    Booking { trip_id: TripId, trip: Option<Trip> },
    BookingStatus { booking: Option<Booking>, payment_success: Option<bool> },
    Dashboard,
    Login { notice: Option<String> },
    Signup,
}

impl Route {
    /// "Book now" from a trip page.
    pub fn book(trip: &Trip) -> Self {
        Route::Booking { trip_id: trip.id, trip: Some(trip.clone()) }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Booking { .. } | Route::Dashboard)
    }
}

pub enum Screen {
    Home { greeting: String },
    Trips(Vec<Trip>),
    TripDetail(Trip),
    Booking(Box<BookingForm>),
    /// Booking route reached without its trip.
    LoadingTrip,
    Status(BookingStatusView),
    Dashboard(Box<DashboardView>),
    Login { notice: Option<String> },
    Signup,
}

/// Resolves routes to screens, applying the session guards on the way.
pub struct Navigator {
    state: AppState,
    current: Route,
}

impl Navigator {
    pub fn new(state: AppState) -> Self {
        Self { state, current: Route::Home }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub async fn navigate(
        &mut self,
        route: Route,
        cancel: &CancellationToken,
    ) -> Result<Screen, AppError> {
        debug!("Navigating to {:?}", route);
        let user = self.state.session.current_user();

        let (landed, screen) = match route {
            Route::Home => {
                let greeting = greeting(&self.state.session);
                (Route::Home, Screen::Home { greeting })
            }
            Route::Trips { search } => {
                let catalog = self.state.catalog();
                let trips = match search.as_deref() {
                    Some(term) => catalog.search(term, cancel).await?,
                    None => catalog.list_trips(cancel).await?,
                };
                (Route::Trips { search }, Screen::Trips(trips))
            }
            Route::TripDetail { id } => {
                let trip = self.state.catalog().get_trip(id, cancel).await?;
                (Route::TripDetail { id }, Screen::TripDetail(trip))
            }
            Route::Booking { trip_id, trip } => {
                let entry = FormEntry::open(
                    user,
                    trip.clone(),
                    self.state.bookings.clone(),
                    self.state.pricing.clone(),
                );
                match entry {
                    FormEntry::Ready(form) => {
                        (Route::Booking { trip_id, trip }, Screen::Booking(form))
                    }
                    FormEntry::Loading => (Route::Booking { trip_id, trip }, Screen::LoadingTrip),
                    FormEntry::LoginRequired { notice } => {
                        info!("Booking for trip {} needs a session; redirecting to login", trip_id);
                        (
                            Route::Login { notice: Some(notice.clone()) },
                            Screen::Login { notice: Some(notice) },
                        )
                    }
                }
            }
            Route::BookingStatus { booking, payment_success } => {
                let view = BookingStatusView::from_navigation(booking.clone(), payment_success);
                (Route::BookingStatus { booking, payment_success }, Screen::Status(view))
            }
            Route::Dashboard => match user {
                Some(user) => {
                    let view = DashboardView::load(
                        user,
                        self.state.bookings.as_ref(),
                        &self.state.catalog(),
                        Local::now().date_naive(),
                        cancel,
                    )
                    .await?;
                    (Route::Dashboard, Screen::Dashboard(Box::new(view)))
                }
                None => (Route::Login { notice: None }, Screen::Login { notice: None }),
            },
            Route::Login { notice } => (Route::Login { notice: notice.clone() }, Screen::Login { notice }),
            Route::Signup => (Route::Signup, Screen::Signup),
        };

        self.current = landed;
        Ok(screen)
    }

    /// Status page reached straight from checkout, with the live view
    /// rather than navigation parameters.
    pub fn show_status(&mut self, view: BookingStatusView) -> Screen {
        self.current = Route::BookingStatus {
            booking: view.booking.clone(),
            payment_success: Some(view.payment_success),
        };
        Screen::Status(view)
    }
}
