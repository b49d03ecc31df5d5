//! Credential checks applied before anything is sent to `/auth/*`.

use std::collections::BTreeMap;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    ContactNumber,
    Email,
    Password,
    General,
}

/// Per-field messages, shown next to the offending input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &String)> {
        self.0.iter()
    }
}

fn is_email_shaped(email: &str) -> bool {
    lazy_static::lazy_static! {
        static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .expect("Invalid email regex");
    }
    EMAIL_REGEX.is_match(email)
}

fn is_valid_contact_number(contact: &str) -> bool {
    lazy_static::lazy_static! {
        static ref CONTACT_REGEX: Regex = Regex::new(r"^[0-9]{10}$")
            .expect("Invalid contact number regex");
    }
    CONTACT_REGEX.is_match(contact)
}

/// Login accepts only `.com` addresses.
pub fn validate_login(email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required.");
    } else if !is_email_shaped(email) || !email.contains(".com") {
        errors.insert(Field::Email, "Enter a valid email (must include @ and .com).");
    }
    if password.trim().is_empty() {
        errors.insert(Field::Password, "Password cannot be empty.");
    }
    errors
}

pub fn validate_signup(name: &str, contact_number: &str, email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if name.trim().is_empty() {
        errors.insert(Field::Name, "Name is required.");
    }
    if !is_valid_contact_number(contact_number) {
        errors.insert(Field::ContactNumber, "Enter a valid 10-digit contact number.");
    }
    if !is_email_shaped(email) {
        errors.insert(Field::Email, "Please enter a valid email.");
    }
    if password.chars().count() < 6 {
        errors.insert(Field::Password, "Password must be at least 6 characters.");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login("  ", "");
        assert_eq!(errors.get(Field::Email), Some("Email is required."));
        assert_eq!(errors.get(Field::Password), Some("Password cannot be empty."));
    }

    #[test]
    fn login_rejects_non_com_domains() {
        let errors = validate_login("asha@example.in", "secret");
        assert!(errors.get(Field::Email).is_some());
        assert!(validate_login("asha@example.com", "secret").is_empty());
    }

    #[test]
    fn signup_checks_every_field() {
        let errors = validate_signup("", "12345", "not-an-email", "abc");
        assert_eq!(errors.iter().count(), 4);

        let ok = validate_signup("Asha", "9876543210", "asha@example.in", "secret1");
        assert!(ok.is_empty());
    }

    #[test]
    fn contact_number_must_be_ten_digits() {
        assert!(validate_signup("A", "98765-4321", "a@b.co", "123456")
            .get(Field::ContactNumber)
            .is_some());
        assert!(validate_signup("A", "98765432101", "a@b.co", "123456")
            .get(Field::ContactNumber)
            .is_some());
    }
}
