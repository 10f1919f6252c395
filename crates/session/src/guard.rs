//! Route guard: the rendering decision for protected views.
//!
//! [`decide`] is a pure policy check (no IO, no panics, no storage
//! mutation); [`evaluate`] layers the asynchronous role check on top and
//! maps every identity-service failure to "role not held".

use std::borrow::Cow;

use hailpoint_catalog::RoleId;

use crate::identity::IdentityProvider;
use crate::state::AuthState;

/// Configured redirect targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    pub login: String,
    pub unauthorized: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            unauthorized: "/unauthorized".to_string(),
        }
    }
}

/// What a protected view requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    pub require_auth: bool,
    pub required_role: Option<RoleId>,
}

impl Requirement {
    pub fn authenticated() -> Self {
        Self {
            require_auth: true,
            required_role: None,
        }
    }

    pub fn role(role: impl Into<Cow<'static, str>>) -> Self {
        Self {
            require_auth: true,
            required_role: Some(RoleId::new(role)),
        }
    }
}

/// Outcome for the routing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Render the protected children.
    Render,
    /// Render nothing; navigate to the given path.
    Redirect(String),
    /// Role check still in flight; render a non-blocking placeholder.
    Loading,
}

/// Pure decision over (requirement, state, resolved role flag).
///
/// `role_check` is `None` while the asynchronous check is unresolved.
pub fn decide(
    requirement: &Requirement,
    paths: &GuardPaths,
    state: &AuthState,
    role_check: Option<bool>,
) -> Decision {
    if requirement.require_auth && !state.logged_in {
        return Decision::Redirect(paths.login.clone());
    }
    if requirement.required_role.is_some() {
        if !state.logged_in {
            return Decision::Redirect(paths.login.clone());
        }
        return match role_check {
            None => Decision::Loading,
            Some(false) => Decision::Redirect(paths.unauthorized.clone()),
            Some(true) => Decision::Render,
        };
    }
    Decision::Render
}

/// Resolve the role check against the identity service, then decide.
///
/// A missing remote session redirects to login; a failed `has_role` call
/// counts as "role not held". No storage is touched.
pub async fn evaluate(
    requirement: &Requirement,
    paths: &GuardPaths,
    state: &AuthState,
    provider: &dyn IdentityProvider,
) -> Decision {
    let role_check = match &requirement.required_role {
        Some(role) if state.logged_in => {
            let Some(session) = provider.current_session().await else {
                return Decision::Redirect(paths.login.clone());
            };
            match provider.has_role(&session.user_id, role).await {
                Ok(held) => Some(held),
                Err(err) => {
                    tracing::warn!(error = %err, role = %role, "role check failed");
                    Some(false)
                }
            }
        }
        _ => None,
    };
    decide(requirement, paths, state, role_check)
}

#[cfg(test)]
mod tests {
    use crate::identity::StaticIdentity;

    use super::*;

    fn logged_in(role: &str) -> AuthState {
        AuthState {
            logged_in: true,
            role: role.to_string(),
            username: "alice".to_string(),
            ..AuthState::default()
        }
    }

    #[test]
    fn require_auth_redirects_logged_out_to_login() {
        let paths = GuardPaths::default();
        let decision = decide(
            &Requirement::authenticated(),
            &paths,
            &AuthState::default(),
            None,
        );
        assert_eq!(decision, Decision::Redirect("/login".to_string()));
    }

    #[test]
    fn open_route_renders_in_any_state() {
        let paths = GuardPaths::default();
        let req = Requirement::default();
        assert_eq!(decide(&req, &paths, &AuthState::default(), None), Decision::Render);
        assert_eq!(decide(&req, &paths, &logged_in("rider"), None), Decision::Render);
    }

    #[test]
    fn role_requirement_walks_loading_then_resolution() {
        let paths = GuardPaths::default();
        let req = Requirement::role("admin");
        let state = logged_in("employee");

        assert_eq!(decide(&req, &paths, &state, None), Decision::Loading);
        assert_eq!(
            decide(&req, &paths, &state, Some(false)),
            Decision::Redirect("/unauthorized".to_string())
        );
        assert_eq!(decide(&req, &paths, &state, Some(true)), Decision::Render);
    }

    #[tokio::test]
    async fn evaluate_renders_when_the_role_is_held() {
        let identity = StaticIdentity::new()
            .with_user("a@x.io", "pw", &["admin"])
            .with_session("u-1", "a@x.io");
        let decision = evaluate(
            &Requirement::role("admin"),
            &GuardPaths::default(),
            &logged_in("admin"),
            &identity,
        )
        .await;
        assert_eq!(decision, Decision::Render);
    }

    #[tokio::test]
    async fn evaluate_treats_provider_failure_as_role_not_held() {
        let decision = evaluate(
            &Requirement::role("admin"),
            &GuardPaths::default(),
            &logged_in("admin"),
            &StaticIdentity::failing(),
        )
        .await;
        // A failing provider has no session either, so this is the login
        // redirect, never a render.
        assert_eq!(decision, Decision::Redirect("/login".to_string()));
    }

    #[tokio::test]
    async fn evaluate_maps_has_role_errors_to_unauthorized() {
        // Session resolves, but the user table lacks the role.
        let identity = StaticIdentity::new()
            .with_user("a@x.io", "pw", &["employee"])
            .with_session("u-1", "a@x.io");
        let decision = evaluate(
            &Requirement::role("admin"),
            &GuardPaths::default(),
            &logged_in("employee"),
            &identity,
        )
        .await;
        assert_eq!(decision, Decision::Redirect("/unauthorized".to_string()));
    }
}
