//! Flat JSON persistence for user records.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::User;

/// File name used when no data path is configured.
pub const DEFAULT_DATA_FILE: &str = "user_data.json";

/// Every user record, backed by a single JSON document.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: Vec<User>,
}

impl UserStore {
    /// Load the document at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let users = if path.exists() {
            let users = read_users(&path)?;
            info!("loaded {} user(s) from {}", users.len(), path.display());
            users
        } else {
            warn!("user data {} does not exist yet; starting empty", path.display());
            Vec::new()
        };
        Ok(Self { path, users })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All users in registration order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Look up a user by exact username.
    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    /// Whether a user already has this username.
    pub fn username_taken(&self, username: &str) -> bool {
        self.find(username).is_some()
    }

    /// Whether a user already has this email address.
    pub fn email_taken(&self, email: &str) -> bool {
        self.users.iter().any(|user| user.email == email)
    }

    /// Append a user and write the document.
    ///
    /// The user is dropped again if the write fails.
    pub fn add(&mut self, user: User) -> Result<()> {
        info!("registering user {}", user.username);
        self.users.push(user);
        if let Err(err) = self.save() {
            self.users.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Apply `change` to one user and write the document.
    ///
    /// The record is restored if the write fails.
    pub fn update<F>(&mut self, username: &str, change: F) -> Result<()>
    where
        F: FnOnce(&mut User),
    {
        let index = self
            .users
            .iter()
            .position(|user| user.username == username)
            .with_context(|| format!("user {username} is missing from the store"))?;
        let previous = self.users[index].clone();
        change(&mut self.users[index]);
        if let Err(err) = self.save() {
            self.users[index] = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Write every record back to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialised =
            serde_json::to_vec_pretty(&self.users).context("failed to serialize user data")?;
        fs::write(&self.path, serialised)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!("saved {} user(s) to {}", self.users.len(), self.path.display());
        Ok(())
    }
}

fn read_users(path: &Path) -> Result<Vec<User>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let users = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Purchase;
    use tempfile::tempdir;

    fn sample_user(name: &str) -> User {
        User {
            username: name.to_string(),
            password: "Secret#123".to_string(),
            email: format!("{name}@example.com"),
            phone: "+491234567890".to_string(),
            purchases: Vec::new(),
            spending_limit: 100.0,
        }
    }

    #[test]
    fn missing_file_opens_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = UserStore::open(dir.path().join("none.json"))?;
        assert!(store.users().is_empty());
        Ok(())
    }

    #[test]
    fn save_and_reopen() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(DEFAULT_DATA_FILE);
        let mut store = UserStore::open(&path)?;
        store.add(sample_user("alice"))?;

        store.update("alice", |alice| {
            alice.purchases.push(Purchase::new(
                "2024/01/02".into(),
                "ebay".into(),
                "lamp".into(),
                10.0,
                2.0,
                1.5,
                2,
            ))
        })?;

        let reopened = UserStore::open(&path)?;
        assert_eq!(reopened.users().len(), 1);
        let alice = reopened.find("alice").expect("alice persisted");
        assert_eq!(alice.purchases.len(), 1);
        assert_eq!(alice.purchases[0].total_cost, 22.0);
        assert!(reopened.username_taken("alice"));
        assert!(reopened.email_taken("alice@example.com"));
        assert!(!reopened.email_taken("bob@example.com"));
        Ok(())
    }

    #[test]
    fn failed_writes_leave_memory_untouched() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DEFAULT_DATA_FILE);
        let mut store = UserStore::open(&path)?;
        store.add(sample_user("alice"))?;

        fs::remove_file(&path)?;
        fs::create_dir(&path)?;

        assert!(store.add(sample_user("bob")).is_err());
        assert!(!store.username_taken("bob"));

        assert!(store.update("alice", |alice| alice.spending_limit = 5.0).is_err());
        assert_eq!(store.find("alice").map(|u| u.spending_limit), Some(100.0));
        Ok(())
    }

    #[test]
    fn update_requires_a_known_user() -> Result<()> {
        let dir = tempdir()?;
        let mut store = UserStore::open(dir.path().join(DEFAULT_DATA_FILE))?;
        assert!(store.update("nobody", |user| user.spending_limit = 1.0).is_err());
        Ok(())
    }

    #[test]
    fn corrupt_document_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DEFAULT_DATA_FILE);
        fs::write(&path, "{not json")?;
        let err = UserStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
        Ok(())
    }
}
