use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Identity pre-filled into the gateway's checkout form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Everything the hosted checkout needs to collect a deposit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutOptions {
    pub key: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub order_id: String,
    pub prefill: Prefill,
    pub theme_color: Option<String>,
}

/// What the gateway hands back after a completed payment. The signature is
/// passed along untouched; it is never verified on this side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayPayment {
    pub order_id: String,
    pub payment_id: String,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Paid(GatewayPayment),
    /// Overlay closed without paying.
    Dismissed,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open the checkout overlay and wait, without a timeout, for the user
    /// to pay or close it.
    async fn open_checkout(&self, options: &CheckoutOptions) -> CoreResult<CheckoutOutcome>;
}

/// Gateway that replays a scripted list of outcomes. Once the script runs
/// dry every checkout succeeds with a generated payment id.
#[derive(Default)]
pub struct MockPaymentGateway {
    script: Mutex<VecDeque<CoreResult<CheckoutOutcome>>>,
    opened: Mutex<Vec<CheckoutOptions>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dismissing() -> Self {
        let gateway = Self::new();
        gateway.push(Ok(CheckoutOutcome::Dismissed));
        gateway
    }

    /// Succeeds once with `payment_id` against whatever order is opened.
    pub fn paying(payment_id: &str) -> Self {
        let gateway = Self::new();
        gateway.push(Ok(CheckoutOutcome::Paid(GatewayPayment {
            order_id: String::new(),
            payment_id: payment_id.to_string(),
            signature: None,
        })));
        gateway
    }

    pub fn push(&self, outcome: CoreResult<CheckoutOutcome>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
    }

    pub fn opened(&self) -> Vec<CheckoutOptions> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn open_checkout(&self, options: &CheckoutOptions) -> CoreResult<CheckoutOutcome> {
        let count = {
            let mut opened = self
                .opened
                .lock()
                .map_err(|_| CoreError::InternalError("mock gateway poisoned".into()))?;
            opened.push(options.clone());
            opened.len()
        };
        tracing::info!("Mock checkout opened for order {}", options.order_id);

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            // Scripted payments take the order id of the checkout they answer.
            Some(Ok(CheckoutOutcome::Paid(mut payment))) => {
                if payment.order_id.is_empty() {
                    payment.order_id = options.order_id.clone();
                }
                Ok(CheckoutOutcome::Paid(payment))
            }
            Some(other) => other,
            None => Ok(CheckoutOutcome::Paid(GatewayPayment {
                order_id: options.order_id.clone(),
                payment_id: format!("pay_mock_{}", count),
                signature: None,
            })),
        }
    }
}
