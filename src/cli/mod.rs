//! CLI command implementations

pub mod definition;
pub mod summary;
pub mod task;
pub mod tool;
pub mod user;

pub use definition::{Cli, Commands};

use anyhow::{bail, Result};

use crate::config::Config;
use crate::store::{JsonStore, TaskStore};
use crate::user::User;

/// Open the JSON store at the configured data dir
pub fn open_store(config: &Config) -> Result<JsonStore> {
    let data_dir = config.resolved_data_dir()?;
    Ok(JsonStore::open(&data_dir)?)
}

/// Resolve a user from an ID, phone number, or username
pub fn resolve_user(identifier: &str, store: &dyn TaskStore) -> Result<User> {
    if let Some(id) = crate::user::UserId::parse(identifier) {
        if let Ok(user) = store.get_user(id) {
            return Ok(user);
        }
    }

    if let Some(user) = store.find_user_by_phone(identifier)? {
        return Ok(user);
    }

    if let Some(user) = store
        .list_users()?
        .into_iter()
        .find(|u| u.username == identifier)
    {
        return Ok(user);
    }

    bail!("User not found: {}", identifier)
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else if max <= 3 {
        s[..max].to_string()
    } else {
        format!("{}...", &s[..max - 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_resolve_user_by_phone_and_name() {
        let mut store = MemoryStore::new();
        let ada = store.upsert_user("+15550001", "ada").unwrap();

        assert_eq!(resolve_user("+15550001", &store).unwrap().id, ada.id);
        assert_eq!(resolve_user("ada", &store).unwrap().id, ada.id);
        assert_eq!(
            resolve_user(&ada.id.to_string(), &store).unwrap().id,
            ada.id
        );
        assert!(resolve_user("nobody", &store).is_err());
    }
}
