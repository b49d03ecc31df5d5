use tokio_util::sync::CancellationToken;

use crate::error::CheckoutError;
use crate::form::BookingForm;
use crate::handoff::PaymentHandoff;
use crate::status::BookingStatusView;

/// Submit the form, then hand the created booking to the gateway.
pub struct CheckoutFlow {
    handoff: PaymentHandoff,
}

impl CheckoutFlow {
    pub fn new(handoff: PaymentHandoff) -> Self {
        Self { handoff }
    }

    pub fn handoff(&self) -> &PaymentHandoff {
        &self.handoff
    }

    pub async fn run(
        &self,
        form: &BookingForm,
        cancel: &CancellationToken,
    ) -> Result<BookingStatusView, CheckoutError> {
        let created = form.submit(cancel).await?;
        self.handoff.complete(created, cancel).await
    }
}
