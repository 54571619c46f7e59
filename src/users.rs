//! users
//!
//! User identities referenced by stored content.
//!
//! The lock layer stores user ids inside the changes slot and resolves them
//! back through the [`Users`] registry. Resolution is a foreign-key-style
//! lookup: a stored id may no longer exist, and callers must handle a miss.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from user registry construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("duplicate user id: {0}")]
    DuplicateId(String),
}

/// A user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: String,
    email: Option<String>,
}

impl User {
    /// Create a user with an id and an optional email address.
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }

    /// Get the user id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the email address, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Check whether two values refer to the same identity.
    ///
    /// Identity is the id alone; other attributes may differ between
    /// snapshots of the same user.
    pub fn is(&self, other: &User) -> bool {
        self.id == other.id
    }
}

/// Registry of known users, looked up by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Users {
    list: Vec<User>,
}

impl Users {
    /// Create a registry.
    ///
    /// # Errors
    ///
    /// Returns `UserError::DuplicateId` if two users share an id.
    pub fn new(list: Vec<User>) -> Result<Self, UserError> {
        for (index, user) in list.iter().enumerate() {
            if list[..index].iter().any(|u| u.id() == user.id()) {
                return Err(UserError::DuplicateId(user.id().to_string()));
            }
        }
        Ok(Self { list })
    }

    /// Find a user by id.
    pub fn find(&self, id: &str) -> Option<&User> {
        self.list.iter().find(|u| u.id() == id)
    }

    /// Iterate over all users.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.list.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_the_id() {
        let a = User::new("u1", Some("a@example.com".into()));
        let b = User::new("u1", Some("b@example.com".into()));
        let c = User::new("u2", None);

        assert!(a.is(&b));
        assert!(!a.is(&c));
    }

    #[test]
    fn find_by_id() {
        let users = Users::new(vec![User::new("u1", None), User::new("u2", None)]).unwrap();

        assert_eq!(users.find("u2").map(User::id), Some("u2"));
        assert!(users.find("missing").is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = Users::new(vec![User::new("u1", None), User::new("u1", None)]);
        assert_eq!(result, Err(UserError::DuplicateId("u1".into())));
    }
}
