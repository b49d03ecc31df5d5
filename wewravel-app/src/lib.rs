pub mod auth;
pub mod console_gateway;
pub mod dashboard;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

pub use error::{AppError, AuthError};
pub use routes::{Navigator, Route, Screen};
pub use state::AppState;
