use crate::models::user::UserId;

/// Broadcast whenever the session slot is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { user_id: UserId, name: String },
    LoggedOut,
}
