//! The client-side authentication/UI-focus state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hailpoint_core::{DriverId, RiderId, TripId};

/// View-selector markers used by the dashboards.
pub mod tab {
    /// Initial tab shown after login (and after logout resets the state).
    pub const GENERAL: &str = "general";

    /// Tab activated whenever an entity is selected for inspection.
    pub const DETAIL: &str = "detail";
}

/// Kind of domain record a dashboard can focus on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Driver,
    Rider,
    Trip,
}

/// Reference to the domain record currently selected in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: Uuid,
    /// Display label (e.g. the driver's name), purely presentational.
    pub label: String,
}

impl EntityRef {
    pub fn driver(id: DriverId, label: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Driver,
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn rider(id: RiderId, label: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Rider,
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn trip(id: TripId, label: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Trip,
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The single auth/UI-focus state instance.
///
/// # Invariants
/// - When `logged_in` is false, `role`, `sub_role` and `username` are empty
///   (established at initialization and re-established by logout).
/// - `role` and `sub_role` are stored as raw identifiers; hydration does not
///   validate them against the catalog (see [`crate::AuthController`]).
///
/// Owned exclusively by [`crate::AuthController`]; no other component
/// mutates it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub logged_in: bool,
    pub role: String,
    pub sub_role: String,
    pub username: String,
    pub selected_entity: Option<EntityRef>,
    pub active_tab: String,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            logged_in: false,
            role: String::new(),
            sub_role: String::new(),
            username: String::new(),
            selected_entity: None,
            active_tab: tab::GENERAL.to_string(),
        }
    }
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_logged_out_on_general_tab() {
        let state = AuthState::default();
        assert!(!state.logged_in);
        assert!(state.role.is_empty());
        assert!(state.sub_role.is_empty());
        assert!(state.username.is_empty());
        assert!(state.selected_entity.is_none());
        assert_eq!(state.active_tab, tab::GENERAL);
    }

    #[test]
    fn entity_ref_constructors_tag_the_kind() {
        let driver = EntityRef::driver(DriverId::new(), "Dana");
        assert_eq!(driver.kind, EntityKind::Driver);
        let trip = EntityRef::trip(TripId::new(), "Trip #42");
        assert_eq!(trip.kind, EntityKind::Trip);
    }
}
