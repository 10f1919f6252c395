//! `hailpoint-session` — client auth-state ownership and guarded navigation.
//!
//! This crate owns the single [`AuthState`] instance and its transition
//! rules, bridges it to a durable key-value store, and exposes the route
//! guard's rendering decision. Real credential verification stays behind the
//! [`IdentityProvider`] port.

pub mod controller;
pub mod guard;
pub mod identity;
pub mod notify;
pub mod state;
pub mod store;

pub use controller::{AuthController, AuthError, LoginForm, SignupForm};
pub use guard::{Decision, GuardPaths, Requirement, decide, evaluate};
pub use identity::{IdentityError, IdentityProvider, Session, SignUpOutcome, StaticIdentity};
pub use notify::{Notification, NotifyLevel, Notifier, TracingNotifier};
pub use state::{AuthState, EntityKind, EntityRef, tab};
pub use store::{MemoryStore, SessionStore, keys};
