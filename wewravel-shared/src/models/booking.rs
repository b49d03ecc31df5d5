use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trip::TripId;

pub type BookingId = i64;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }
}

/// A reservation persisted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub trip_id: TripId,
    #[serde(default)]
    pub trip_title: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_mobile: String,
    pub room_type: String,
    pub travelers: u32,
    #[serde(default)]
    pub special_request: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration: Option<String>,
    pub total_cost: Decimal,
    pub booking_amount: Decimal,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub paid_amount: Option<Decimal>,
    #[serde(default, rename = "razorpayOrderId", alias = "gatewayOrderId")]
    pub gateway_order_id: Option<String>,
    #[serde(default, rename = "razorpayPaymentId", alias = "gatewayPaymentId")]
    pub gateway_payment_id: Option<String>,
}

impl Booking {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub trip_id: TripId,
    pub trip_title: String,
    pub user_name: String,
    pub user_email: String,
    pub user_mobile: String,
    pub room_type: String,
    pub travelers: u32,
    pub total_cost: Decimal,
    pub booking_amount: Decimal,
    pub special_request: String,
    pub start_date: NaiveDate,
}

/// Reply to `POST /bookings`: the persisted booking plus the gateway order
/// that the backend opened for its deposit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub booking: Option<Booking>,
    #[serde(default, rename = "razorpayOrderId", alias = "paymentOrderId")]
    pub payment_order_id: Option<String>,
    #[serde(default, rename = "razorpayKey", alias = "paymentKey")]
    pub payment_key: Option<String>,
    /// Minor currency units, as the gateway expects them.
    #[serde(default)]
    pub amount: Option<i64>,
}

impl CreateBookingResponse {
    /// `error: false`, `error: null` and `error: ""` are all treated as absent.
    pub fn has_error(&self) -> bool {
        match &self.error {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// Body of `PUT /bookings/{id}/update-payment`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub payment_status: PaymentStatus,
    #[serde(rename = "razorpayOrderId")]
    pub gateway_order_id: String,
    #[serde(rename = "razorpayPaymentId")]
    pub gateway_payment_id: String,
    pub paid_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booking_accepts_gateway_aliases() {
        let booking: Booking = serde_json::from_value(json!({
            "id": 42,
            "tripId": 7,
            "roomType": "Deluxe",
            "travelers": 2,
            "startDate": "2026-12-01",
            "totalCost": 20000,
            "bookingAmount": 6000,
            "paymentStatus": "PAID",
            "paidAmount": 20000,
            "gatewayOrderId": "order_1",
            "razorpayPaymentId": "pay_1"
        }))
        .unwrap();
        assert!(booking.is_paid());
        assert_eq!(booking.gateway_order_id.as_deref(), Some("order_1"));
        assert_eq!(booking.gateway_payment_id.as_deref(), Some("pay_1"));
    }

    #[test]
    fn missing_status_defaults_to_pending() {
        let booking: Booking = serde_json::from_value(json!({
            "id": 1, "tripId": 1, "roomType": "Deluxe", "travelers": 1,
            "startDate": "2026-12-01", "totalCost": 100, "bookingAmount": 30
        }))
        .unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert!(booking.paid_amount.is_none());
    }

    #[test]
    fn error_flag_interpretation() {
        let parse = |v: serde_json::Value| -> CreateBookingResponse { serde_json::from_value(v).unwrap() };
        assert!(!parse(json!({})).has_error());
        assert!(!parse(json!({ "error": false })).has_error());
        assert!(!parse(json!({ "error": null })).has_error());
        assert!(parse(json!({ "error": true })).has_error());
        assert!(parse(json!({ "error": "order failed" })).has_error());
    }

    #[test]
    fn payment_update_uses_gateway_field_names() {
        let update = PaymentUpdate {
            payment_status: PaymentStatus::Paid,
            gateway_order_id: "order_9".into(),
            gateway_payment_id: "pay_123".into(),
            paid_amount: Decimal::from(20000),
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["paymentStatus"], "PAID");
        assert_eq!(body["razorpayOrderId"], "order_9");
        assert_eq!(body["razorpayPaymentId"], "pay_123");
    }
}
