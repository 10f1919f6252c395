//! The process-wide role catalog.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use thiserror::Error;

use crate::{Application, Permission, Role, RoleId, SubRole, SubRoleId};

/// Catalog error.
///
/// `RoleNotFound`/`SubRoleNotFound` signal a configuration defect (an id that
/// was never registered), not a recoverable runtime condition. The remaining
/// variants are rejected at construction time by [`RoleCatalog::from_roles`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("role not found: '{0}'")]
    RoleNotFound(RoleId),

    #[error("sub-role not found: '{sub_role}' under role '{role}'")]
    SubRoleNotFound { role: RoleId, sub_role: SubRoleId },

    #[error("duplicate role: '{0}'")]
    DuplicateRole(RoleId),

    #[error("duplicate permission '{permission}' in role '{role}'")]
    DuplicatePermission { role: RoleId, permission: Permission },

    #[error("role '{0}' has an empty permission list")]
    EmptyPermissions(RoleId),

    #[error("role '{0}' has an application with an empty name")]
    InvalidApplication(RoleId),
}

/// Immutable mapping from role identifier to role metadata.
///
/// Constructed once at startup and never mutated; all lookups are pure reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    roles: BTreeMap<RoleId, Role>,
}

impl RoleCatalog {
    /// Build a catalog, validating every role's invariants.
    pub fn from_roles(roles: Vec<Role>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for role in roles {
            validate_role(&role)?;
            if map.contains_key(&role.id) {
                return Err(CatalogError::DuplicateRole(role.id));
            }
            map.insert(role.id.clone(), role);
        }
        Ok(Self { roles: map })
    }

    /// The builtin ride-hailing catalog, constructed on first use.
    pub fn builtin() -> &'static RoleCatalog {
        static CATALOG: OnceLock<RoleCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            RoleCatalog::from_roles(builtin_roles())
                .expect("builtin role catalog is internally consistent")
        })
    }

    /// Look up a role by id.
    ///
    /// An unknown id is a configuration defect on the caller's side.
    pub fn lookup_role(&self, role: &RoleId) -> Result<&Role, CatalogError> {
        self.roles
            .get(role)
            .ok_or_else(|| CatalogError::RoleNotFound(role.clone()))
    }

    /// Look up a sub-role under a role.
    ///
    /// Fails with `SubRoleNotFound` both when the role carries no sub-roles
    /// and when the sub-role id is absent.
    pub fn lookup_sub_role(
        &self,
        role: &RoleId,
        sub_role: &SubRoleId,
    ) -> Result<&SubRole, CatalogError> {
        let parent = self.lookup_role(role)?;
        parent
            .sub_role(sub_role)
            .ok_or_else(|| CatalogError::SubRoleNotFound {
                role: role.clone(),
                sub_role: sub_role.clone(),
            })
    }

    /// Resolve the permission list in effect for a role/sub-role selection.
    ///
    /// Returns the sub-role's list when `sub_role` names a valid sub-role of
    /// `role`; in every other case (no sub-role given, or an id the role does
    /// not carry) the role's own list applies. Pure function over static data.
    pub fn effective_permissions(
        &self,
        role: &RoleId,
        sub_role: Option<&SubRoleId>,
    ) -> Result<&[Permission], CatalogError> {
        let parent = self.lookup_role(role)?;
        match sub_role.and_then(|s| parent.sub_role(s)) {
            Some(sub) => Ok(&sub.permissions),
            None => Ok(&parent.permissions),
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

fn validate_role(role: &Role) -> Result<(), CatalogError> {
    if role.permissions.is_empty() {
        return Err(CatalogError::EmptyPermissions(role.id.clone()));
    }
    ensure_unique(&role.id, &role.permissions)?;
    for sub in role.sub_roles.values() {
        if sub.permissions.is_empty() {
            return Err(CatalogError::EmptyPermissions(role.id.clone()));
        }
        ensure_unique(&role.id, &sub.permissions)?;
    }
    if role.applications.iter().any(|a| a.name.is_empty()) {
        return Err(CatalogError::InvalidApplication(role.id.clone()));
    }
    Ok(())
}

fn ensure_unique(role: &RoleId, permissions: &[Permission]) -> Result<(), CatalogError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for perm in permissions {
        if !seen.insert(perm.as_str()) {
            return Err(CatalogError::DuplicatePermission {
                role: role.clone(),
                permission: perm.clone(),
            });
        }
    }
    Ok(())
}

fn perms(names: &[&'static str]) -> Vec<Permission> {
    names.iter().map(|n| Permission::new(*n)).collect()
}

/// The curated roles shipped with the platform.
fn builtin_roles() -> Vec<Role> {
    vec![
        Role::new(
            "rider",
            "Rider",
            "End customer booking and taking trips",
            perms(&[
                "trips.request",
                "trips.history.read",
                "payments.manage",
                "profile.write",
            ]),
        )
        .with_applications(vec![
            Application::new("Book a Ride", "Request a trip from the map view", "/ride"),
            Application::new("Trip History", "Past trips and receipts", "/trips"),
        ]),
        Role::new(
            "driver",
            "Driver",
            "Partner driver accepting and completing trips",
            perms(&[
                "trips.accept",
                "trips.complete",
                "earnings.read",
                "vehicle.manage",
                "profile.write",
            ]),
        )
        .with_applications(vec![
            Application::new("Drive", "Go online and accept trip requests", "/drive"),
            Application::new("Earnings", "Daily and weekly payout summary", "/earnings"),
        ]),
        Role::new(
            "employee",
            "Employee",
            "Internal company staff; department selected as a sub-role",
            perms(&["dashboard.read", "drivers.read", "riders.read"]),
        )
        .with_sub_roles(vec![
            SubRole::new(
                "operations",
                "Operations",
                perms(&[
                    "dashboard.read",
                    "trips.monitor",
                    "drivers.assign",
                    "zones.manage",
                ]),
            ),
            SubRole::new(
                "support",
                "Support",
                perms(&[
                    "dashboard.read",
                    "tickets.manage",
                    "trips.read",
                    "refunds.issue",
                ]),
            ),
            SubRole::new(
                "finance",
                "Finance",
                perms(&[
                    "dashboard.read",
                    "payouts.manage",
                    "invoices.read",
                    "reports.export",
                ]),
            ),
            SubRole::new(
                "fleet",
                "Fleet",
                perms(&[
                    "dashboard.read",
                    "vehicles.manage",
                    "drivers.onboard",
                    "inspections.schedule",
                ]),
            ),
        ])
        .with_applications(vec![
            Application::new(
                "Operations Console",
                "Live trip monitoring and dispatch",
                "/company/operations",
            ),
            Application::new(
                "Support Desk",
                "Rider and driver ticket queue",
                "/company/support",
            ),
            Application::new(
                "Finance Hub",
                "Payouts, invoices and reporting",
                "/company/finance",
            ),
        ]),
        Role::new(
            "admin",
            "Administrator",
            "Platform administrator with full access",
            perms(&["*"]),
        )
        .with_applications(vec![Application::new(
            "Admin Panel",
            "User, role and configuration management",
            "/admin",
        )]),
    ]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn role_id(s: &str) -> RoleId {
        RoleId::new(s.to_string())
    }

    fn sub_role_id(s: &str) -> SubRoleId {
        SubRoleId::new(s.to_string())
    }

    #[test]
    fn builtin_roles_have_unique_nonempty_permissions() {
        let catalog = RoleCatalog::builtin();
        assert!(!catalog.is_empty());

        for role in catalog.roles() {
            assert!(!role.permissions.is_empty(), "role {}", role.id);
            let unique: HashSet<&str> =
                role.permissions.iter().map(|p| p.as_str()).collect();
            assert_eq!(unique.len(), role.permissions.len(), "role {}", role.id);

            for sub in role.sub_roles.values() {
                assert!(!sub.permissions.is_empty(), "sub-role {}", sub.id);
                let unique: HashSet<&str> =
                    sub.permissions.iter().map(|p| p.as_str()).collect();
                assert_eq!(unique.len(), sub.permissions.len(), "sub-role {}", sub.id);
            }
        }
    }

    #[test]
    fn lookup_role_unknown_is_not_found() {
        let err = RoleCatalog::builtin()
            .lookup_role(&role_id("astronaut"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::RoleNotFound(_)));
    }

    #[test]
    fn lookup_sub_role_requires_parent_to_carry_it() {
        let catalog = RoleCatalog::builtin();

        let sub = catalog
            .lookup_sub_role(&role_id("employee"), &sub_role_id("support"))
            .unwrap();
        assert_eq!(sub.display_name, "Support");

        // Rider has no sub-roles at all.
        let err = catalog
            .lookup_sub_role(&role_id("rider"), &sub_role_id("support"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::SubRoleNotFound { .. }));
    }

    #[test]
    fn effective_permissions_prefers_valid_sub_role() {
        let catalog = RoleCatalog::builtin();
        let employee = role_id("employee");

        let own = catalog.effective_permissions(&employee, None).unwrap();
        assert!(own.iter().any(|p| p.as_str() == "drivers.read"));

        let support = catalog
            .effective_permissions(&employee, Some(&sub_role_id("support")))
            .unwrap();
        assert!(support.iter().any(|p| p.as_str() == "tickets.manage"));
        assert!(!support.iter().any(|p| p.as_str() == "drivers.read"));
    }

    #[test]
    fn effective_permissions_falls_back_on_invalid_sub_role() {
        let catalog = RoleCatalog::builtin();
        let employee = role_id("employee");

        let resolved = catalog
            .effective_permissions(&employee, Some(&sub_role_id("astronaut")))
            .unwrap();
        let own = catalog.effective_permissions(&employee, None).unwrap();
        assert_eq!(resolved, own);
    }

    #[test]
    fn from_roles_rejects_duplicate_permission() {
        let role = Role::new(
            "dup",
            "Dup",
            "",
            vec![Permission::new("a.read"), Permission::new("a.read")],
        );
        let err = RoleCatalog::from_roles(vec![role]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicatePermission { .. }));
    }

    #[test]
    fn from_roles_rejects_empty_permissions_and_duplicate_role() {
        let err = RoleCatalog::from_roles(vec![Role::new("r", "R", "", vec![])]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyPermissions(_)));

        let a = Role::new("r", "R", "", perms(&["x.read"]));
        let b = Role::new("r", "R again", "", perms(&["y.read"]));
        let err = RoleCatalog::from_roles(vec![a, b]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateRole(_)));
    }

    #[test]
    fn from_roles_rejects_unnamed_application() {
        let role = Role::new("r", "R", "", perms(&["x.read"]))
            .with_applications(vec![Application::new("", "nameless", "/x")]);
        let err = RoleCatalog::from_roles(vec![role]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidApplication(_)));
    }

    #[test]
    fn admin_holds_the_wildcard() {
        let admin = RoleCatalog::builtin().lookup_role(&role_id("admin")).unwrap();
        assert!(admin.permissions.iter().any(|p| p.is_wildcard()));
    }

    proptest! {
        // Any sub-role id that the role does not carry resolves to the
        // role's own permission list.
        #[test]
        fn unknown_sub_role_never_changes_resolution(sub in "[a-z]{1,12}") {
            let catalog = RoleCatalog::builtin();
            for role in catalog.roles() {
                let candidate = sub_role_id(&sub);
                if role.sub_role(&candidate).is_some() {
                    continue;
                }
                let resolved = catalog
                    .effective_permissions(&role.id, Some(&candidate))
                    .unwrap();
                prop_assert_eq!(resolved, role.permissions.as_slice());
            }
        }
    }
}
