use std::sync::Arc;
use std::time::Duration;

use wewravel_catalog::{CatalogClient, PricingEngine};
use wewravel_core::{
    AuthRepository, BookingRepository, InMemoryBackend, MockPaymentGateway, PaymentGateway,
    TripRepository,
};
use wewravel_order::{CheckoutFlow, HandoffSettings, PaymentHandoff};
use wewravel_store::app_config::{Config, PaymentConfig};
use wewravel_store::{FileSessionStorage, RestBackend, SessionStore};

use crate::console_gateway::ConsoleGateway;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: SessionStore,
    pub trips: Arc<dyn TripRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub auth: Arc<dyn AuthRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub pricing: Arc<PricingEngine>,
}

impl AppState {
    /// Live wiring: REST backend, session persisted to disk, payment
    /// confirmed at the terminal.
    pub fn connect(config: Config) -> Result<Self, AppError> {
        let session = SessionStore::restore(Arc::new(FileSessionStorage::new(
            &config.session.storage_path,
        )));
        let backend = Arc::new(RestBackend::new(&config.backend)?.with_session(session.clone()));
        let gateway = Arc::new(ConsoleGateway::stdin());
        Ok(Self::from_parts(config, session, backend, gateway))
    }

    /// Seeded in-memory backend and a gateway that always pays.
    pub fn offline(config: Config, session: SessionStore) -> Self {
        Self::from_parts(
            config,
            session,
            Arc::new(InMemoryBackend::seeded()),
            Arc::new(MockPaymentGateway::new()),
        )
    }

    pub fn from_parts<B>(
        config: Config,
        session: SessionStore,
        backend: Arc<B>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self
    where
        B: TripRepository + BookingRepository + AuthRepository + 'static,
    {
        Self {
            config,
            session,
            trips: backend.clone(),
            bookings: backend.clone(),
            auth: backend,
            gateway,
            pricing: Arc::new(PricingEngine::default()),
        }
    }

    pub fn catalog(&self) -> CatalogClient {
        CatalogClient::new(self.trips.clone())
    }

    pub fn checkout(&self) -> CheckoutFlow {
        CheckoutFlow::new(PaymentHandoff::new(
            self.gateway.clone(),
            self.bookings.clone(),
            handoff_settings(&self.config.payment),
        ))
    }

    pub fn helpline(&self) -> &str {
        &self.config.support.helpline
    }
}

pub fn handoff_settings(payment: &PaymentConfig) -> HandoffSettings {
    HandoffSettings {
        currency: payment.currency.clone(),
        merchant_name: payment.merchant_name.clone(),
        image: payment.image.clone(),
        theme_color: payment.theme_color.clone(),
        update_attempts: payment.update_attempts,
        retry_backoff: Duration::from_millis(payment.retry_backoff_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handoff_settings_follow_config() {
        let mut config = Config::from_defaults().unwrap();
        config.payment.update_attempts = 5;
        config.payment.retry_backoff_ms = 20;

        let settings = handoff_settings(&config.payment);
        assert_eq!(settings.currency, "INR");
        assert_eq!(settings.merchant_name, "WeWravel Experiences");
        assert_eq!(settings.theme_color.as_deref(), Some("#facc15"));
        assert_eq!(settings.update_attempts, 5);
        assert_eq!(settings.retry_backoff, Duration::from_millis(20));
    }
}
