use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use wewravel_core::identity::{validate_login, validate_signup};
use wewravel_core::{guarded, AuthRepository, CoreError};
use wewravel_shared::{LoginRequest, Masked, SignupRequest, UserSession};
use wewravel_store::SessionStore;

use crate::error::AuthError;
use crate::routes::Route;

/// Used when the backend accepts the credentials but sends no token.
pub const FALLBACK_TOKEN: &str = "dummy-token";

/// Consecutive failures before the password-reset hint is offered.
pub const RESET_HINT_AFTER: u32 = 3;

pub struct LoginController {
    auth: Arc<dyn AuthRepository>,
    session: SessionStore,
    failed_attempts: u32,
}

impl LoginController {
    pub fn new(auth: Arc<dyn AuthRepository>, session: SessionStore) -> Self {
        Self { auth, session, failed_attempts: 0 }
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub async fn submit(
        &mut self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<(UserSession, Route), AuthError> {
        let errors = validate_login(email, password);
        if !errors.is_empty() {
            return Err(AuthError::Fields(errors));
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: Masked::new(password.to_string()),
        };

        match guarded(cancel, self.auth.login(&request)).await {
            Ok(response) => {
                self.failed_attempts = 0;
                let token = response
                    .token
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| FALLBACK_TOKEN.to_string());
                self.session.establish(response.user.clone(), token)?;
                info!("Login succeeded for user {}", response.user.id);
                Ok((response.user, Route::Dashboard))
            }
            Err(CoreError::Cancelled) => Err(AuthError::Cancelled),
            Err(err) => {
                self.failed_attempts += 1;
                let offer_reset = self.failed_attempts >= RESET_HINT_AFTER;
                warn!(
                    "Login failed for {} (attempt {}): {}",
                    Masked::new(request.email.clone()).hint(),
                    self.failed_attempts,
                    err
                );
                Err(login_failure(&err, offer_reset))
            }
        }
    }
}

fn login_failure(err: &CoreError, offer_reset: bool) -> AuthError {
    if err.is_transport() {
        return AuthError::Unreachable { offer_reset };
    }
    let body = err.response_body().unwrap_or_default().to_lowercase();
    let message = if body.contains("email") {
        "Invalid or unregistered email."
    } else if body.contains("password") {
        "Incorrect password."
    } else {
        "Invalid credentials. Please try again."
    };
    AuthError::Rejected { message: message.to_string(), offer_reset }
}

pub struct SignupController {
    auth: Arc<dyn AuthRepository>,
}

impl SignupController {
    pub fn new(auth: Arc<dyn AuthRepository>) -> Self {
        Self { auth }
    }

    /// Signup never logs the user in; success just leads to the login page.
    pub async fn submit(
        &self,
        name: &str,
        contact_number: &str,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<Route, AuthError> {
        let errors = validate_signup(name, contact_number, email, password);
        if !errors.is_empty() {
            return Err(AuthError::Fields(errors));
        }

        let request = SignupRequest {
            name: name.trim().to_string(),
            contact_number: contact_number.to_string(),
            email: email.trim().to_string(),
            password: Masked::new(password.to_string()),
        };

        match guarded(cancel, self.auth.signup(&request)).await {
            Ok(()) => {
                info!("Signup succeeded for {}", Masked::new(request.email.clone()).hint());
                Ok(Route::Login {
                    notice: Some("Signup successful! Please log in.".to_string()),
                })
            }
            Err(CoreError::Cancelled) => Err(AuthError::Cancelled),
            Err(err) => {
                let detail = err.response_body().map(str::to_string).unwrap_or_else(|| err.to_string());
                Err(AuthError::SignupFailed(detail))
            }
        }
    }
}

pub fn logout(session: &SessionStore) -> Result<Route, AuthError> {
    session.clear()?;
    Ok(Route::Login { notice: None })
}

/// Navbar text for the current session.
pub fn greeting(session: &SessionStore) -> String {
    match session.current_user() {
        Some(user) => format!("Hi, {}", user.first_name()),
        None => "Login".to_string(),
    }
}
