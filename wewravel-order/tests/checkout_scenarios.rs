use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as Days, Local};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use wewravel_catalog::PricingEngine;
use wewravel_core::{BookingRepository, CoreError, InMemoryBackend, MockPaymentGateway};
use wewravel_order::{
    BookingForm, CheckoutError, CheckoutFlow, FormEntry, FormError, HandoffSettings, PaymentHandoff,
    StatusKind,
};
use wewravel_shared::{PaymentStatus, PricingTier, Trip, UserSession};

fn deluxe_trip() -> Trip {
    Trip {
        id: 11,
        title: "Manali Escape".into(),
        location: Some("Himachal Pradesh".into()),
        duration: Some("4 Days / 3 Nights".into()),
        description: "Snow and cafes".into(),
        image_url: None,
        itinerary: vec![],
        inclusions: vec![],
        exclusions: vec![],
        pricing: vec![PricingTier { room_type: "Deluxe".into(), price: Decimal::from(10000) }],
    }
}

fn traveler() -> UserSession {
    UserSession {
        id: 5,
        name: "Ravi Kumar".into(),
        email: "ravi@example.com".into(),
        mobile: Some("9123456780".into()),
        phone: None,
        contact_number: None,
        created_at: None,
        image_url: None,
    }
}

fn settings() -> HandoffSettings {
    HandoffSettings { retry_backoff: Duration::from_millis(1), ..HandoffSettings::default() }
}

fn filled_form(backend: &Arc<InMemoryBackend>) -> BookingForm {
    let mut form = BookingForm::new(
        deluxe_trip(),
        traveler(),
        backend.clone(),
        Arc::new(PricingEngine::default()),
    );
    form.set_room_type("Deluxe").unwrap();
    form.set_travelers(2).unwrap();
    form.set_start_date(Some(Local::now().date_naive() + Days::days(14)));
    form
}

fn flow(backend: &Arc<InMemoryBackend>, gateway: MockPaymentGateway) -> (CheckoutFlow, Arc<MockPaymentGateway>) {
    let gateway = Arc::new(gateway);
    let handoff = PaymentHandoff::new(gateway.clone(), backend.clone(), settings());
    (CheckoutFlow::new(handoff), gateway)
}

#[test]
fn scenario_a_deluxe_for_two() {
    let backend = Arc::new(InMemoryBackend::new());
    let form = filled_form(&backend);
    assert_eq!(form.quote().total_cost, Decimal::from(20000));
    assert_eq!(form.quote().booking_amount, Decimal::from(6000));
}

#[tokio::test]
async fn scenario_b_missing_room_type_blocks_submit() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut form = filled_form(&backend);
    form.set_room_type("").unwrap();

    let err = form.submit(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(FormError::MissingRoomType)));
    assert_eq!(backend.calls().total(), 0);
}

#[tokio::test]
async fn past_or_missing_start_date_blocks_submit() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut form = filled_form(&backend);

    form.set_start_date(None);
    let err = form.submit(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(FormError::MissingStartDate)));

    form.set_start_date(Some(Local::now().date_naive() - Days::days(1)));
    let err = form.submit(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(FormError::StartDateInPast { .. })));

    assert_eq!(backend.calls().total(), 0);
}

#[tokio::test]
async fn scenario_c_dismissed_overlay_leaves_booking_pending() {
    let backend = Arc::new(InMemoryBackend::new());
    let form = filled_form(&backend);
    let (flow, gateway) = flow(&backend, MockPaymentGateway::dismissing());

    let view = flow.run(&form, &CancellationToken::new()).await.unwrap();

    assert_eq!(view.kind(), StatusKind::Pending);
    assert!(!view.payment_success);
    let booking = view.booking.as_ref().unwrap();
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert!(booking.paid_amount.is_none());
    assert_eq!(backend.calls().update_payment, 0);
    assert_eq!(backend.booking(booking.id).unwrap(), *booking);
    assert_eq!(gateway.opened().len(), 1);
}

#[tokio::test]
async fn scenario_d_successful_payment_is_recorded() {
    let backend = Arc::new(InMemoryBackend::new());
    let form = filled_form(&backend);
    let (flow, gateway) = flow(&backend, MockPaymentGateway::paying("pay_123"));

    let view = flow.run(&form, &CancellationToken::new()).await.unwrap();

    assert_eq!(view.kind(), StatusKind::Confirmed);
    let booking = view.booking.as_ref().unwrap();
    assert_eq!(booking.payment_status, PaymentStatus::Paid);
    assert_eq!(booking.paid_amount, Some(Decimal::from(20000)));

    let updates = backend.payment_updates();
    assert_eq!(updates.len(), 1);
    let (id, update) = &updates[0];
    assert_eq!(*id, booking.id);
    assert_eq!(update.payment_status, PaymentStatus::Paid);
    assert_eq!(update.gateway_payment_id, "pay_123");
    assert_eq!(update.paid_amount, Decimal::from(20000));

    let opened = &gateway.opened()[0];
    assert_eq!(opened.amount, 600000);
    assert_eq!(opened.currency, "INR");
    assert_eq!(opened.description, "Booking for Manali Escape");
    assert_eq!(opened.prefill.contact, "9123456780");
    assert_eq!(update.gateway_order_id, opened.order_id);
}

#[tokio::test]
async fn paid_amount_is_the_total_at_submission() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut form = filled_form(&backend);
    let (flow, _) = flow(&backend, MockPaymentGateway::paying("pay_9"));

    let created = form.submit(&CancellationToken::new()).await.unwrap();
    // editing after submission must not leak into the recorded payment
    form.set_travelers(5).unwrap();
    let view = flow.handoff().complete(created, &CancellationToken::new()).await.unwrap();

    assert_eq!(view.booking.unwrap().paid_amount, Some(Decimal::from(20000)));
}

#[test]
fn scenario_e_no_session_redirects_to_login() {
    let backend = Arc::new(InMemoryBackend::new());
    let repo: Arc<dyn BookingRepository> = backend.clone();
    let entry = FormEntry::open(None, Some(deluxe_trip()), repo, Arc::new(PricingEngine::default()));
    match entry {
        FormEntry::LoginRequired { notice } => assert_eq!(notice, "Please log in to continue booking."),
        _ => panic!("form must not open without a session"),
    }
    assert_eq!(backend.calls().total(), 0);
}

#[tokio::test]
async fn creation_transport_failure_halts_before_gateway() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.drop_booking_requests();
    let form = filled_form(&backend);
    let (flow, gateway) = flow(&backend, MockPaymentGateway::new());

    let err = flow.run(&form, &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, CheckoutError::CreationFailed(_)));
    assert!(gateway.opened().is_empty());
    assert_eq!(backend.calls().create_booking, 1);
}

#[tokio::test]
async fn transient_update_failure_is_retried() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.fail_payment_updates(2);
    let form = filled_form(&backend);
    let (flow, _) = flow(&backend, MockPaymentGateway::paying("pay_retry"));

    let view = flow.run(&form, &CancellationToken::new()).await.unwrap();
    assert_eq!(view.kind(), StatusKind::Confirmed);
    assert_eq!(backend.calls().update_payment, 3);
}

#[tokio::test]
async fn exhausted_update_retries_surface_unrecorded_payment() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.fail_payment_updates(10);
    let form = filled_form(&backend);
    let (flow, _) = flow(&backend, MockPaymentGateway::paying("pay_lost"));

    let view = flow.run(&form, &CancellationToken::new()).await.unwrap();
    assert_eq!(view.kind(), StatusKind::Unrecorded);
    let receipt = view.receipt.as_ref().unwrap();
    assert_eq!(receipt.payment_id, "pay_lost");
    assert_eq!(receipt.amount, Decimal::from(20000));
    assert_eq!(view.booking.as_ref().unwrap().payment_status, PaymentStatus::Pending);
    assert_eq!(backend.calls().update_payment, 3);
}

#[tokio::test]
async fn gateway_failure_is_reported_distinctly() {
    let backend = Arc::new(InMemoryBackend::new());
    let gateway = MockPaymentGateway::new();
    gateway.push(Err(CoreError::GatewayError("checkout script failed to load".into())));
    let form = filled_form(&backend);
    let (flow, _) = flow(&backend, gateway);

    let err = flow.run(&form, &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Gateway(_)));
    assert_eq!(backend.calls().update_payment, 0);
}
