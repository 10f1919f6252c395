//! The auth state controller: single owner of [`AuthState`].
//!
//! Transition rules:
//! - `login`/`signup` move LoggedOut → LoggedIn after structural validation
//!   of the form (non-empty fields only; credential verification belongs to
//!   the [`IdentityProvider`] port and the `*_remote` variants).
//! - `logout` clears everything and is idempotent.
//! - `select_entity`/`set_active_tab` adjust UI focus in any state.
//!
//! Persistence is write-then-reflect: the durable store is updated before
//! the in-memory state changes, so a crash between the two replays the new
//! session on the next start rather than losing it.

use thiserror::Error;

use hailpoint_catalog::{RoleCatalog, RoleId, SubRoleId};

use crate::identity::{IdentityError, IdentityProvider};
use crate::notify::{Notification, Notifier};
use crate::state::{AuthState, EntityRef, tab};
use crate::store::{SessionStore, keys};

/// Auth transition error. Never fatal; the worst case is a stuck LoggedOut
/// state with a visible message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed form input, rejected before any state change.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The identity service rejected or failed the operation.
    #[error("authentication failed: {0}")]
    Identity(String),
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        Self::Identity(err.to_string())
    }
}

/// Login form payload. The username field doubles as the sign-in email for
/// the remote path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub role: String,
    pub sub_role: String,
}

impl LoginForm {
    fn validate(&self) -> Result<(), AuthError> {
        if self.username.is_empty() {
            return Err(AuthError::Validation("username is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }
        Ok(())
    }
}

/// Signup form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub sub_role: String,
}

impl SignupForm {
    fn validate(&self) -> Result<(), AuthError> {
        if self.username.is_empty() {
            return Err(AuthError::Validation("username is required".to_string()));
        }
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(AuthError::Validation(
                "a valid email address is required".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }
        Ok(())
    }
}

/// Owner of the single [`AuthState`] instance.
///
/// Single-writer by construction: every transition takes `&mut self`, and
/// nothing else holds the state.
pub struct AuthController<S: SessionStore, N: Notifier> {
    state: AuthState,
    store: S,
    notifier: N,
    catalog: &'static RoleCatalog,
}

impl<S: SessionStore, N: Notifier> AuthController<S, N> {
    /// Create the controller, hydrating from any prior persisted session.
    pub fn new(store: S, notifier: N) -> Self {
        Self::with_catalog(store, notifier, RoleCatalog::builtin())
    }

    pub fn with_catalog(store: S, notifier: N, catalog: &'static RoleCatalog) -> Self {
        let state = hydrate(&store);
        if state.logged_in {
            tracing::info!(username = %state.username, role = %state.role, "session restored");
        }
        Self {
            state,
            store,
            notifier,
            catalog,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Log in with a structurally valid form.
    ///
    /// Does not verify the password against any authority; see
    /// [`Self::sign_in_remote`] for the verified path.
    pub fn login(&mut self, form: LoginForm) -> Result<(), AuthError> {
        form.validate()?;
        self.establish(form.username, form.role, form.sub_role);
        Ok(())
    }

    /// Sign up and immediately enter the LoggedIn state.
    pub fn signup(&mut self, form: SignupForm) -> Result<(), AuthError> {
        form.validate()?;
        self.establish(form.username, form.role, form.sub_role);
        Ok(())
    }

    /// Clear the session. No-op when already logged out.
    pub fn logout(&mut self) {
        if !self.state.logged_in {
            return;
        }
        for key in keys::ALL {
            self.store.remove(key);
        }
        tracing::info!(username = %self.state.username, "logged out");
        self.state = AuthState::default();
        self.notifier.notify(Notification::info("Signed out"));
    }

    /// Focus a domain record and switch to the detail tab. Legal in any
    /// state; rendering restrictions are the route guard's concern.
    pub fn select_entity(&mut self, entity: EntityRef) {
        self.state.selected_entity = Some(entity);
        self.state.active_tab = tab::DETAIL.to_string();
    }

    /// Switch the active tab. Free-form, no validation.
    pub fn set_active_tab(&mut self, tab: impl Into<String>) {
        self.state.active_tab = tab.into();
    }

    /// Sign in against the identity service, then establish the local
    /// session. Any service failure leaves the state LoggedOut and surfaces
    /// as an error notification.
    pub async fn sign_in_remote(
        &mut self,
        provider: &dyn IdentityProvider,
        form: LoginForm,
    ) -> Result<(), AuthError> {
        form.validate()?;
        if let Err(err) = provider.sign_in(&form.username, &form.password).await {
            tracing::warn!(error = %err, "remote sign-in failed");
            self.notifier
                .notify(Notification::error(format!("Could not sign in: {err}")));
            return Err(err.into());
        }
        self.establish(form.username, form.role, form.sub_role);
        Ok(())
    }

    /// Register with the identity service, then establish the local session.
    pub async fn sign_up_remote(
        &mut self,
        provider: &dyn IdentityProvider,
        form: SignupForm,
    ) -> Result<(), AuthError> {
        form.validate()?;
        let metadata = serde_json::json!({
            "username": form.username,
            "role": form.role,
            "subRole": form.sub_role,
        });
        match provider.sign_up(&form.email, &form.password, metadata).await {
            Ok(outcome) => {
                if !outcome.session_present {
                    self.notifier.notify(Notification::info(
                        "Check your inbox to confirm your email address",
                    ));
                }
                self.establish(form.username, form.role, form.sub_role);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote sign-up failed");
                self.notifier
                    .notify(Notification::error(format!("Could not sign up: {err}")));
                Err(err.into())
            }
        }
    }

    /// Sign out remotely and clear the local session. The local session is
    /// cleared even when the service call fails; an unreachable service must
    /// not pin the user into a logged-in UI.
    pub async fn sign_out_remote(&mut self, provider: &dyn IdentityProvider) {
        if let Err(err) = provider.sign_out().await {
            tracing::warn!(error = %err, "remote sign-out failed, clearing local session anyway");
        }
        self.logout();
    }

    /// Persist then reflect the LoggedIn state, and announce it.
    fn establish(&mut self, username: String, role: String, sub_role: String) {
        self.store.set(keys::IS_AUTHENTICATED, "true");
        self.store.set(keys::USERNAME, &username);
        self.store.set(keys::ROLE, &role);
        self.store.set(keys::SUB_ROLE, &sub_role);

        self.state.logged_in = true;
        self.state.username = username;
        self.state.role = role;
        self.state.sub_role = sub_role;

        tracing::info!(
            username = %self.state.username,
            role = %self.state.role,
            sub_role = %self.state.sub_role,
            "logged in"
        );
        let message = self.welcome_message();
        self.notifier.notify(Notification::success(message));
    }

    /// Welcome text with catalog-derived permission messaging. A role the
    /// catalog does not know degrades to a plain greeting; the transition
    /// itself never depends on catalog contents.
    fn welcome_message(&self) -> String {
        let role = RoleId::new(self.state.role.clone());
        let sub_role = (!self.state.sub_role.is_empty())
            .then(|| SubRoleId::new(self.state.sub_role.clone()));
        match self.catalog.effective_permissions(&role, sub_role.as_ref()) {
            Ok(permissions) => {
                let listed: Vec<&str> = permissions.iter().map(|p| p.as_str()).collect();
                format!(
                    "Welcome, {}! Your access: {}",
                    self.state.username,
                    listed.join(", ")
                )
            }
            Err(_) => format!("Welcome, {}!", self.state.username),
        }
    }
}

/// Best-effort hydration: a well-formed prior session restores LoggedIn;
/// anything else (absent, partial, malformed) is silently LoggedOut.
fn hydrate<S: SessionStore>(store: &S) -> AuthState {
    let mut state = AuthState::default();
    let authenticated = store.get(keys::IS_AUTHENTICATED);
    let username = store.get(keys::USERNAME).unwrap_or_default();
    if authenticated.as_deref() == Some("true") && !username.is_empty() {
        state.logged_in = true;
        state.username = username;
        state.role = store.get(keys::ROLE).unwrap_or_default();
        state.sub_role = store.get(keys::SUB_ROLE).unwrap_or_default();
    }
    state
}
