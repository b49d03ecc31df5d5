pub mod checkout;
pub mod error;
pub mod form;
pub mod handoff;
pub mod status;

pub use checkout::CheckoutFlow;
pub use error::{CheckoutError, FormError};
pub use form::{BookingDraft, BookingForm, CreatedBooking, FormEntry};
pub use handoff::{HandoffSettings, PaymentHandoff};
pub use status::{format_rupees, BookingStatusView, PaymentReceipt, StatusKind};
