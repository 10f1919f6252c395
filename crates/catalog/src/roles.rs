//! Role and sub-role metadata.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role identifier used for RBAC.
///
/// Roles are intentionally opaque strings at this layer; the catalog maps
/// them to display metadata and permission lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Cow<'static, str>);

impl RoleId {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RoleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sub-role identifier, scoped to a parent role (e.g. "support" under
/// "employee").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubRoleId(Cow<'static, str>);

impl SubRoleId {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SubRoleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A quick-access application entry shown on a role's dashboard.
///
/// Purely descriptive; the only invariant is a non-empty name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    pub description: String,
    /// Navigation path within the front-end (e.g. "/company/support").
    pub path: String,
}

impl Application {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            path: path.into(),
        }
    }
}

/// A sub-role with its own permission list.
///
/// Sub-role permissions replace (not extend) the parent role's list when the
/// sub-role is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRole {
    pub id: SubRoleId,
    pub display_name: String,
    pub permissions: Vec<Permission>,
}

impl SubRole {
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        display_name: impl Into<String>,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            id: SubRoleId::new(id),
            display_name: display_name.into(),
            permissions,
        }
    }
}

/// Role metadata: display information, the permission list, optional
/// sub-roles, and optional quick-access applications.
///
/// # Invariants (enforced by [`crate::RoleCatalog::from_roles`])
/// - Permission strings are unique within the role and within each sub-role.
/// - The permission list is non-empty.
/// - Application names are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub display_name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub sub_roles: BTreeMap<SubRoleId, SubRole>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl Role {
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            id: RoleId::new(id),
            display_name: display_name.into(),
            description: description.into(),
            permissions,
            sub_roles: BTreeMap::new(),
            applications: Vec::new(),
        }
    }

    pub fn with_sub_roles(mut self, sub_roles: Vec<SubRole>) -> Self {
        self.sub_roles = sub_roles.into_iter().map(|s| (s.id.clone(), s)).collect();
        self
    }

    pub fn with_applications(mut self, applications: Vec<Application>) -> Self {
        self.applications = applications;
        self
    }

    pub fn has_sub_roles(&self) -> bool {
        !self.sub_roles.is_empty()
    }

    pub fn sub_role(&self, id: &SubRoleId) -> Option<&SubRole> {
        self.sub_roles.get(id)
    }
}
