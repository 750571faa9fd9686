//! # Ownership Guard
//!
//! Notebin does not authenticate anyone itself. An [`AuthProvider`] (a session
//! cookie lookup, a hosted auth client, a CLI flag) reports the signed-in
//! [`User`], and [`require_owner`] turns that into the [`OwnerId`] every store
//! query is filtered by.
//!
//! A missing session is [`NotebinError::Unauthorized`]. Once an owner is
//! resolved, records belonging to anyone else are simply invisible: they fail
//! with `NotFoundOrUnauthorized` like records that do not exist.

use serde::{Deserialize, Serialize};

use crate::error::{NotebinError, Result};
use crate::model::OwnerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: OwnerId,
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: OwnerId::new(id),
            email: email.into(),
        }
    }
}

/// Source of the current session.
pub trait AuthProvider {
    fn current_user(&self) -> Option<User>;
}

/// A session that is always signed in as the same user.
#[derive(Debug, Clone)]
pub struct StaticSession {
    user: User,
}

impl StaticSession {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// Session for a bare user id, as given on the command line.
    pub fn for_id(id: impl Into<String>) -> Self {
        Self::new(User::new(id, ""))
    }
}

impl AuthProvider for StaticSession {
    fn current_user(&self) -> Option<User> {
        Some(self.user.clone())
    }
}

/// A provider with nobody signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl AuthProvider for NoSession {
    fn current_user(&self) -> Option<User> {
        None
    }
}

impl<A: AuthProvider + ?Sized> AuthProvider for Box<A> {
    fn current_user(&self) -> Option<User> {
        (**self).current_user()
    }
}

/// Resolves the owner for the current request.
pub fn require_owner<A: AuthProvider + ?Sized>(auth: &A) -> Result<OwnerId> {
    match auth.current_user() {
        Some(user) if !user.id.as_str().trim().is_empty() => Ok(user.id),
        _ => Err(NotebinError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_session_resolves_owner() {
        let auth = StaticSession::new(User::new("u-42", "ada@example.com"));
        assert_eq!(require_owner(&auth).unwrap(), OwnerId::new("u-42"));
    }

    #[test]
    fn missing_session_is_unauthorized() {
        assert!(matches!(
            require_owner(&NoSession),
            Err(NotebinError::Unauthorized)
        ));
    }

    #[test]
    fn blank_user_id_is_unauthorized() {
        let auth = StaticSession::for_id("  ");
        assert!(matches!(
            require_owner(&auth),
            Err(NotebinError::Unauthorized)
        ));
    }

    #[test]
    fn boxed_providers_delegate() {
        let auth: Box<dyn AuthProvider> = Box::new(StaticSession::for_id("u-1"));
        assert_eq!(require_owner(&auth).unwrap().as_str(), "u-1");
    }
}
