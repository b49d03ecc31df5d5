use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::pii::Masked;

pub type UserId = i64;

/// The client-held record of the authenticated user.
///
/// The backend has shipped the phone number under three different keys over
/// time, so all of them are kept and [`UserSession::mobile`] picks the first
/// one present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl UserSession {
    pub fn mobile(&self) -> &str {
        self.mobile
            .as_deref()
            .or(self.phone.as_deref())
            .or(self.contact_number.as_deref())
            .unwrap_or("")
    }

    pub fn first_name(&self) -> &str {
        self.name
            .split_whitespace()
            .next()
            .unwrap_or("Traveler")
    }

    /// Year the account was created, if the backend sent a parsable timestamp.
    pub fn member_since(&self) -> Option<i32> {
        let raw = self.created_at.as_deref()?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.year());
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(ts.year());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(|d| d.year())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Masked<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user: UserSession,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub contact_number: String,
    pub email: String,
    pub password: Masked<String>,
}
