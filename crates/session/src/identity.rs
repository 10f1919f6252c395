//! External identity collaborator port.
//!
//! The remote service owns credentials, sessions and server-side role
//! assignments. Every operation is asynchronous and fallible; consumers map
//! any failure to "not authenticated" / "role not held" rather than
//! propagating it as a fatal error.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hailpoint_catalog::RoleId;

/// Failure reported by the identity service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email address not confirmed")]
    EmailNotConfirmed,

    #[error("rate limited, try again later")]
    RateLimited,

    #[error("network failure: {0}")]
    Network(String),
}

/// An authenticated remote session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
}

/// Result of a successful sign-up call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignUpOutcome {
    /// False when the service requires email confirmation before a session
    /// is issued.
    pub session_present: bool,
}

/// The remote identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<SignUpOutcome, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;

    async fn current_session(&self) -> Option<Session>;

    /// Whether the identified user holds `role` on the server side.
    async fn has_role(&self, user_id: &str, role: &RoleId) -> Result<bool, IdentityError>;
}

/// Fixed-content identity provider for tests and offline demos.
///
/// Holds a static user table; `failing` switches every operation into a
/// network-fault mode so callers' degradation paths can be exercised.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentity {
    users: HashMap<String, StaticUser>,
    session: Option<Session>,
    failing: bool,
}

#[derive(Debug, Clone)]
struct StaticUser {
    password: String,
    roles: HashSet<String>,
}

impl StaticIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        roles: &[&str],
    ) -> Self {
        let email = email.into();
        self.users.insert(
            email.clone(),
            StaticUser {
                password: password.into(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
        );
        self
    }

    pub fn with_session(mut self, user_id: impl Into<String>, email: impl Into<String>) -> Self {
        self.session = Some(Session {
            user_id: user_id.into(),
            email: email.into(),
        });
        self
    }

    /// Every operation fails with a network fault.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn check_reachable(&self) -> Result<(), IdentityError> {
        if self.failing {
            Err(IdentityError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        _metadata: serde_json::Value,
    ) -> Result<SignUpOutcome, IdentityError> {
        self.check_reachable()?;
        if self.users.contains_key(email) {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(SignUpOutcome {
            session_present: false,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        self.check_reachable()?;
        match self.users.get(email) {
            Some(user) if user.password == password => Ok(()),
            _ => Err(IdentityError::InvalidCredentials),
        }
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.check_reachable()
    }

    async fn current_session(&self) -> Option<Session> {
        if self.failing {
            return None;
        }
        self.session.clone()
    }

    async fn has_role(&self, user_id: &str, role: &RoleId) -> Result<bool, IdentityError> {
        self.check_reachable()?;
        let email = self
            .session
            .as_ref()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.email.clone());
        let Some(email) = email else {
            return Ok(false);
        };
        Ok(self
            .users
            .get(&email)
            .is_some_and(|u| u.roles.contains(role.as_str())))
    }
}
