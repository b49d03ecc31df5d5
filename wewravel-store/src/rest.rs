use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use wewravel_core::{
    AuthRepository, BookingRepository, CoreError, CoreResult, TripRepository,
};
use wewravel_shared::{
    Booking, BookingId, CreateBookingRequest, CreateBookingResponse, LoginRequest, LoginResponse,
    PaymentUpdate, SignupRequest, Trip, TripId, UserId,
};

use crate::app_config::BackendConfig;
use crate::session::SessionStore;

/// JSON-over-HTTP client for the booking backend.
///
/// Trip and booking resources live under `base_url + api_prefix`; the auth
/// endpoints hang directly off `base_url`.
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_prefix: String,
    session: Option<SessionStore>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CoreError::InternalError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_prefix: normalize_prefix(&config.api_prefix),
            session: None,
        })
    }

    /// Attach the session so requests carry `Authorization: Bearer <token>`.
    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.session.as_ref().and_then(|s| s.token()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> CoreResult<String> {
        let response = builder
            .send()
            .await
            .map_err(|e| CoreError::TransportError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::TransportError(e.to_string()))?;

        if !status.is_success() {
            warn!("Backend returned {} ({} bytes)", status, body.len());
            return Err(status_error(status, body));
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> CoreResult<T> {
        let body = self.send(builder).await?;
        serde_json::from_str(&body).map_err(|e| CoreError::DecodeError(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> CoreResult<T> {
        debug!("GET {}", url);
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> CoreResult<T> {
        debug!("POST {}", url);
        self.send_json(self.request(Method::POST, url).json(body)).await
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn status_error(status: StatusCode, body: String) -> CoreError {
    CoreError::StatusError { status: status.as_u16(), body }
}

#[async_trait]
impl TripRepository for RestBackend {
    async fn list_trips(&self) -> CoreResult<Vec<Trip>> {
        self.get_json(&self.api_url("/trips")).await
    }

    async fn get_trip(&self, id: TripId) -> CoreResult<Trip> {
        match self.get_json(&self.api_url(&format!("/trips/{}", id))).await {
            Err(CoreError::StatusError { status: 404, .. }) => {
                Err(CoreError::NotFound(format!("trip {}", id)))
            }
            other => other,
        }
    }
}

#[async_trait]
impl BookingRepository for RestBackend {
    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> CoreResult<CreateBookingResponse> {
        self.post_json(&self.api_url("/bookings"), request).await
    }

    async fn update_payment(&self, id: BookingId, update: &PaymentUpdate) -> CoreResult<Booking> {
        let url = self.api_url(&format!("/bookings/{}/update-payment", id));
        debug!("PUT {}", url);
        self.send_json(self.request(Method::PUT, &url).json(update)).await
    }

    async fn bookings_for_user(&self, user_id: UserId) -> CoreResult<Vec<Booking>> {
        self.get_json(&self.api_url(&format!("/bookings/user/{}", user_id))).await
    }
}

#[async_trait]
impl AuthRepository for RestBackend {
    async fn login(&self, request: &LoginRequest) -> CoreResult<LoginResponse> {
        self.post_json(&self.auth_url("/auth/login"), request).await
    }

    async fn signup(&self, request: &SignupRequest) -> CoreResult<()> {
        let url = self.auth_url("/auth/signup");
        debug!("POST {}", url);
        // success body is not used
        self.send(self.request(Method::POST, &url).json(request)).await?;
        Ok(())
    }
}
