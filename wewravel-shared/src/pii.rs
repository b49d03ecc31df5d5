use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps contact details and credentials so that `{:?}` and `{}` in log
/// macros never print them. Serialization still writes the real value,
/// since request bodies sent to the backend need it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Masked<String> {
    /// Short, log-safe hint: first character plus the domain for emails,
    /// last two digits for anything else.
    pub fn hint(&self) -> String {
        let raw = self.0.as_str();
        if let Some((local, domain)) = raw.split_once('@') {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            return format!("{}***@{}", first, domain);
        }
        let tail: String = raw
            .chars()
            .rev()
            .take(2)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("***{}", tail)
    }
}

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_hide_value() {
        let token = Masked::new("secret-token".to_string());
        assert_eq!(format!("{:?}", token), "********");
        assert_eq!(format!("{}", token), "********");
    }

    #[test]
    fn serializes_real_value() {
        let email = Masked::new("asha@example.com".to_string());
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"asha@example.com\"");
    }

    #[test]
    fn hint_keeps_only_fragments() {
        assert_eq!(Masked::new("asha@example.com".to_string()).hint(), "a***@example.com");
        assert_eq!(Masked::new("9876543210".to_string()).hint(), "***10");
    }
}
