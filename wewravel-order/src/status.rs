use rust_decimal::Decimal;
use wewravel_shared::Booking;

/// Gateway references for a payment the backend has not acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub order_id: String,
    pub payment_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Confirmed,
    Pending,
    /// The gateway took the money but the update call never landed.
    Unrecorded,
    NotFound,
}

/// Read-only outcome page at the end of checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingStatusView {
    pub booking: Option<Booking>,
    pub payment_success: bool,
    pub receipt: Option<PaymentReceipt>,
}

impl BookingStatusView {
    /// Build from whatever the previous screen handed over; a missing flag
    /// reads as "not paid".
    pub fn from_navigation(booking: Option<Booking>, payment_success: Option<bool>) -> Self {
        Self {
            booking,
            payment_success: payment_success.unwrap_or(false),
            receipt: None,
        }
    }

    pub fn confirmed(booking: Booking) -> Self {
        Self { booking: Some(booking), payment_success: true, receipt: None }
    }

    pub fn pending(booking: Booking) -> Self {
        Self { booking: Some(booking), payment_success: false, receipt: None }
    }

    pub fn unrecorded(booking: Booking, receipt: PaymentReceipt) -> Self {
        Self { booking: Some(booking), payment_success: true, receipt: Some(receipt) }
    }

    pub fn kind(&self) -> StatusKind {
        match (&self.booking, &self.receipt, self.payment_success) {
            (None, _, _) => StatusKind::NotFound,
            (Some(_), Some(_), _) => StatusKind::Unrecorded,
            (Some(_), None, true) => StatusKind::Confirmed,
            (Some(_), None, false) => StatusKind::Pending,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self.kind() {
            StatusKind::Confirmed => "Booking Confirmed!",
            StatusKind::Pending => "Payment Pending",
            StatusKind::Unrecorded => "Payment Received, Not Yet Recorded",
            StatusKind::NotFound => "No booking details found.",
        }
    }

    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let Some(b) = &self.booking else {
            return Vec::new();
        };
        let mut rows = vec![
            ("Trip", b.trip_title.clone()),
            ("Name", b.user_name.clone()),
            ("Email", b.user_email.clone()),
            ("Mobile", b.user_mobile.clone()),
            ("Room Type", b.room_type.clone()),
            ("Travelers", b.travelers.to_string()),
            ("Total Cost", format_rupees(b.total_cost)),
            ("Paid Amount", format_rupees(b.paid_amount.unwrap_or_default())),
            ("Payment Status", b.payment_status.as_str().to_string()),
        ];
        if let Some(receipt) = &self.receipt {
            rows.push(("Gateway Order", receipt.order_id.clone()));
            rows.push(("Gateway Payment", receipt.payment_id.clone()));
        }
        rows
    }

    pub fn render(&self, helpline: &str) -> String {
        let mut out = String::new();
        out.push_str(self.headline());
        out.push('\n');
        if self.kind() == StatusKind::NotFound {
            return out;
        }
        for (label, value) in self.rows() {
            out.push_str(&format!("{}: {}\n", label, value));
        }
        match self.kind() {
            StatusKind::Pending => {
                out.push_str(&format!("For any query, talk with {}\n", helpline));
            }
            StatusKind::Unrecorded => {
                out.push_str(&format!(
                    "Your payment went through but we could not record it. Quote the gateway payment id above when you call {}\n",
                    helpline
                ));
            }
            _ => {}
        }
        out
    }
}

/// Rupee amount with Indian digit grouping, e.g. `₹12,34,567.5`.
pub fn format_rupees(amount: Decimal) -> String {
    let amount = amount.round_dp(2).normalize();
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    let text = amount.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let grouped = if int_part.len() <= 3 {
        int_part
    } else {
        let (head, tail) = int_part.split_at(int_part.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (front, pair) = rest.split_at(rest.len() - 2);
            groups.push(pair);
            rest = front;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    match frac_part {
        Some(frac) => format!("{}₹{}.{}", sign, grouped, frac),
        None => format!("{}₹{}", sign, grouped),
    }
}
