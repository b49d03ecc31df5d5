use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::info;
use wewravel_core::{CheckoutOptions, CheckoutOutcome, CoreError, CoreResult, GatewayPayment, PaymentGateway};
use wewravel_order::format_rupees;

/// Terminal stand-in for the hosted checkout overlay. Prints the order and
/// waits for one line: blank closes the overlay, `<order_id> <payment_id>`
/// reports a completed payment.
pub struct ConsoleGateway<R> {
    input: Mutex<R>,
}

impl ConsoleGateway<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> ConsoleGateway<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self { input: Mutex::new(input) }
    }
}

pub fn checkout_summary(options: &CheckoutOptions) -> String {
    let amount = Decimal::new(options.amount, 2);
    format!(
        "{}\n{}\nAmount: {} {} ({})\nOrder: {}\nKey: {}\nPaying as {} <{}> {}\n\
         Enter '<order_id> <payment_id>' once paid, or press Enter to close:",
        options.name,
        options.description,
        options.currency,
        amount,
        format_rupees(amount),
        options.order_id,
        options.key,
        options.prefill.name,
        options.prefill.email,
        options.prefill.contact,
    )
}

pub fn parse_reply(line: &str) -> CoreResult<CheckoutOutcome> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [] => Ok(CheckoutOutcome::Dismissed),
        [order_id, payment_id] => Ok(CheckoutOutcome::Paid(GatewayPayment {
            order_id: (*order_id).to_string(),
            payment_id: (*payment_id).to_string(),
            signature: None,
        })),
        _ => Err(CoreError::GatewayError(format!(
            "expected '<order_id> <payment_id>', got '{}'",
            line.trim()
        ))),
    }
}

#[async_trait]
impl<R> PaymentGateway for ConsoleGateway<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn open_checkout(&self, options: &CheckoutOptions) -> CoreResult<CheckoutOutcome> {
        println!("{}", checkout_summary(options));

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .await
            .read_line(&mut line)
            .await
            .map_err(|e| CoreError::GatewayError(e.to_string()))?;

        // EOF closes the overlay
        if read == 0 {
            info!("Checkout input closed; treating as dismissed");
            return Ok(CheckoutOutcome::Dismissed);
        }
        parse_reply(&line)
    }
}
