//! Plain-text rendering of each screen for the terminal.

use std::fmt::Write;

use wewravel_core::identity::FieldErrors;
use wewravel_order::{format_rupees, BookingForm};
use wewravel_shared::Trip;

use crate::dashboard::{BookingCard, DashboardView};
use crate::routes::Screen;

pub fn screen(screen: &Screen, helpline: &str) -> String {
    match screen {
        Screen::Home { greeting } => format!("WeWravel Experiences\n{}\n", greeting),
        Screen::Trips(trips) => trip_list(trips),
        Screen::TripDetail(trip) => trip_detail(trip),
        Screen::Booking(form) => booking_form(form),
        Screen::LoadingTrip => "Loading trip details...\n".to_string(),
        Screen::Status(view) => view.render(helpline),
        Screen::Dashboard(view) => dashboard(view),
        Screen::Login { notice } => match notice {
            Some(notice) => format!("{}\nLogin to continue.\n", notice),
            None => "Login to continue.\n".to_string(),
        },
        Screen::Signup => "Create your account.\n".to_string(),
    }
}

pub fn trip_list(trips: &[Trip]) -> String {
    if trips.is_empty() {
        return "No trips found.\n".to_string();
    }
    let mut out = String::new();
    for trip in trips {
        let _ = write!(out, "[{}] {}", trip.id, trip.title);
        if let Some(location) = &trip.location {
            let _ = write!(out, " - {}", location);
        }
        if let Some(price) = trip.starting_price() {
            let _ = write!(out, " (from {})", format_rupees(price));
        }
        out.push('\n');
    }
    out
}

pub fn trip_detail(trip: &Trip) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", trip.title);
    if let Some(location) = &trip.location {
        let _ = writeln!(out, "Location: {}", location);
    }
    if let Some(duration) = &trip.duration {
        let _ = writeln!(out, "Duration: {}", duration);
    }
    if !trip.description.is_empty() {
        let _ = writeln!(out, "\n{}", trip.description);
    }
    if let Some(price) = trip.starting_price() {
        let _ = writeln!(out, "\nStarting from {}", format_rupees(price));
    }

    if !trip.itinerary.is_empty() {
        let _ = writeln!(out, "\nItinerary");
        let mut days = trip.itinerary.clone();
        days.sort_by_key(|d| d.day_number);
        for day in days {
            let _ = writeln!(out, "  Day {}: {}", day.day_number, day.title);
            if !day.description.is_empty() {
                let _ = writeln!(out, "    {}", day.description);
            }
        }
    }
    section(&mut out, "Inclusions", &trip.inclusions);
    section(&mut out, "Exclusions", &trip.exclusions);

    if !trip.pricing.is_empty() {
        let _ = writeln!(out, "\nPricing");
        for tier in &trip.pricing {
            let _ = writeln!(out, "  {}: {} per person", tier.room_type, format_rupees(tier.price));
        }
    }
    out
}

fn section(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", heading);
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

pub fn booking_form(form: &BookingForm) -> String {
    let user = form.user();
    let draft = form.draft();
    let quote = form.quote();
    let mut out = String::new();
    let _ = writeln!(out, "Booking: {}", form.trip().title);
    let _ = writeln!(out, "Name: {}", user.name);
    let _ = writeln!(out, "Email: {}", user.email);
    let _ = writeln!(out, "Mobile: {}", user.mobile());
    let _ = writeln!(
        out,
        "Room Type: {}",
        if draft.room_type.is_empty() { "-" } else { draft.room_type.as_str() }
    );
    let _ = writeln!(out, "Travelers: {}", draft.travelers);
    if let Some(date) = draft.start_date {
        let _ = writeln!(out, "Start Date: {}", date);
    }
    if !draft.special_request.is_empty() {
        let _ = writeln!(out, "Special Request: {}", draft.special_request);
    }
    let _ = writeln!(out, "Total Cost: {}", format_rupees(quote.total_cost));
    let _ = writeln!(out, "Booking Amount (30%): {}", format_rupees(quote.booking_amount));
    out
}

pub fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome back, {}", view.user.first_name());
    if let Some(since) = view.member_since() {
        let _ = writeln!(out, "{}", since);
    }
    cards(&mut out, "Upcoming Trips", &view.upcoming);
    cards(&mut out, "Previous Trips", &view.previous);
    if !view.trips.is_empty() {
        let _ = writeln!(out, "\nExplore");
        out.push_str(&trip_list(&view.trips));
    }
    out
}

fn cards(out: &mut String, heading: &str, cards: &[BookingCard]) {
    let _ = writeln!(out, "\n{}", heading);
    if cards.is_empty() {
        let _ = writeln!(out, "  none");
        return;
    }
    for card in cards {
        let b = &card.booking;
        let _ = writeln!(
            out,
            "  #{} {} | {} | {} x{} | {}",
            b.id, b.trip_title, b.start_date, b.room_type, b.travelers, card.badge
        );
    }
}

pub fn field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, message) in errors.iter() {
        let _ = writeln!(out, "{:?}: {}", field, message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use wewravel_shared::{ItineraryDay, PricingTier};

    fn trip() -> Trip {
        Trip {
            id: 3,
            title: "Spiti Valley Circuit".into(),
            location: Some("Himachal Pradesh".into()),
            duration: Some("8 Days".into()),
            description: "High desert loop.".into(),
            image_url: None,
            itinerary: vec![
                ItineraryDay { day_number: 2, title: "Kaza".into(), description: String::new() },
                ItineraryDay { day_number: 1, title: "Manali".into(), description: "Acclimatise.".into() },
            ],
            inclusions: vec!["Stay".into()],
            exclusions: vec![],
            pricing: vec![
                PricingTier { room_type: "Triple Sharing".into(), price: Decimal::from(18500) },
                PricingTier { room_type: "Double Sharing".into(), price: Decimal::from(21000) },
            ],
        }
    }

    #[test]
    fn detail_lists_days_in_order_and_first_tier_as_starting_price() {
        let text = trip_detail(&trip());
        assert!(text.contains("Starting from ₹18,500"));
        let manali = text.find("Day 1: Manali").unwrap();
        let kaza = text.find("Day 2: Kaza").unwrap();
        assert!(manali < kaza);
        assert!(text.contains("Inclusions\n  - Stay"));
        assert!(!text.contains("Exclusions"));
        assert!(text.contains("Double Sharing: ₹21,000 per person"));
    }

    #[test]
    fn empty_catalog() {
        assert_eq!(trip_list(&[]), "No trips found.\n");
        assert!(trip_list(&[trip()]).starts_with("[3] Spiti Valley Circuit - Himachal Pradesh (from ₹18,500)"));
    }
}
