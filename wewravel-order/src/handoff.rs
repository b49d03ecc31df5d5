use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use wewravel_core::{
    await_or_cancel, guarded, BookingRepository, CancelAware, CheckoutOptions, CheckoutOutcome,
    CoreError, GatewayPayment, PaymentGateway,
};
use wewravel_shared::{PaymentStatus, PaymentUpdate};

use crate::error::CheckoutError;
use crate::form::CreatedBooking;
use crate::status::{BookingStatusView, PaymentReceipt};

#[derive(Debug, Clone)]
pub struct HandoffSettings {
    pub currency: String,
    pub merchant_name: String,
    pub image: Option<String>,
    pub theme_color: Option<String>,
    /// Attempts at recording a completed payment before giving up.
    pub update_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for HandoffSettings {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            merchant_name: "WeWravel Experiences".to_string(),
            image: Some("/logo.png".to_string()),
            theme_color: Some("#facc15".to_string()),
            update_attempts: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Drives the gateway overlay for a freshly created booking and writes the
/// result back to the backend.
pub struct PaymentHandoff {
    gateway: Arc<dyn PaymentGateway>,
    bookings: Arc<dyn BookingRepository>,
    settings: HandoffSettings,
}

impl PaymentHandoff {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        bookings: Arc<dyn BookingRepository>,
        settings: HandoffSettings,
    ) -> Self {
        Self { gateway, bookings, settings }
    }

    pub fn checkout_options(&self, created: &CreatedBooking) -> CheckoutOptions {
        CheckoutOptions {
            key: created.payment_key.clone(),
            amount: created.amount,
            currency: self.settings.currency.clone(),
            name: self.settings.merchant_name.clone(),
            description: format!("Booking for {}", created.trip_title),
            image: self.settings.image.clone(),
            order_id: created.payment_order_id.clone(),
            prefill: created.prefill.clone(),
            theme_color: self.settings.theme_color.clone(),
        }
    }

    /// Open the overlay and reconcile its outcome.
    ///
    /// Dismissal makes no backend call; the booking stays exactly as created.
    pub async fn complete(
        &self,
        created: CreatedBooking,
        cancel: &CancellationToken,
    ) -> Result<BookingStatusView, CheckoutError> {
        let options = self.checkout_options(&created);
        info!("Opening checkout for booking {} (order {})", created.booking.id, options.order_id);

        let outcome = guarded(cancel, self.gateway.open_checkout(&options))
            .await
            .map_err(|e| match e {
                CoreError::Cancelled => CheckoutError::Cancelled,
                other => CheckoutError::Gateway(other.to_string()),
            })?;

        match outcome {
            CheckoutOutcome::Dismissed => {
                info!("Checkout dismissed, booking {} left pending", created.booking.id);
                Ok(BookingStatusView::pending(created.booking))
            }
            CheckoutOutcome::Paid(payment) => Ok(self.record_payment(created, payment, cancel).await),
        }
    }

    /// Tell the backend the booking is paid. Once the gateway has taken the
    /// money this never fails outright: exhausted retries or a cancelled
    /// view yield an `Unrecorded` status carrying the gateway ids.
    async fn record_payment(
        &self,
        created: CreatedBooking,
        payment: GatewayPayment,
        cancel: &CancellationToken,
    ) -> BookingStatusView {
        let update = PaymentUpdate {
            payment_status: PaymentStatus::Paid,
            gateway_order_id: payment.order_id.clone(),
            gateway_payment_id: payment.payment_id.clone(),
            paid_amount: created.total_cost,
        };
        let receipt = PaymentReceipt {
            order_id: payment.order_id,
            payment_id: payment.payment_id,
            amount: created.total_cost,
        };
        let booking_id = created.booking.id;
        let attempts = self.settings.update_attempts.max(1);

        for attempt in 1..=attempts {
            match guarded(cancel, self.bookings.update_payment(booking_id, &update)).await {
                Ok(updated) => {
                    info!("Booking {} marked paid ({})", booking_id, receipt.payment_id);
                    return BookingStatusView::confirmed(updated);
                }
                Err(CoreError::Cancelled) => {
                    warn!(
                        "View closed before payment {} for booking {} was recorded",
                        receipt.payment_id, booking_id
                    );
                    return BookingStatusView::unrecorded(created.booking, receipt);
                }
                Err(e) if attempt < attempts => {
                    warn!(
                        "Recording payment for booking {} failed (attempt {}/{}): {}",
                        booking_id, attempt, attempts, e
                    );
                    let backoff = self.settings.retry_backoff * attempt;
                    if let CancelAware::Cancelled = await_or_cancel(cancel, tokio::time::sleep(backoff)).await {
                        return BookingStatusView::unrecorded(created.booking, receipt);
                    }
                }
                Err(e) => {
                    error!(
                        "Payment {} for booking {} could not be recorded after {} attempts: {}",
                        receipt.payment_id, booking_id, attempts, e
                    );
                }
            }
        }
        BookingStatusView::unrecorded(created.booking, receipt)
    }
}
