//! User records
//!
//! Users own tasks. The phone number is the delivery address the messaging
//! transport uses; this crate treats it as an opaque string.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from its hyphenated string form
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: UserId,

    /// Display name used in summaries
    pub username: String,

    /// Delivery address for the messaging transport
    pub phone_number: String,
}

impl User {
    /// Create a new user
    pub fn new(username: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            phone_number: phone_number.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parse() {
        let id = UserId::new();
        let parsed = UserId::parse(&id.to_string());
        assert_eq!(parsed, Some(id));

        assert!(UserId::parse("not-a-uuid").is_none());
    }
}
