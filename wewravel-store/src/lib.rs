pub mod app_config;
pub mod rest;
pub mod session;

pub use rest::RestBackend;
pub use session::{FileSessionStorage, MemorySessionStorage, SessionError, SessionStorage, SessionStore, StoredSession};
