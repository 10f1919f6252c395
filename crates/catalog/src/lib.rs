//! `hailpoint-catalog` — immutable role/sub-role/permission metadata.
//!
//! This crate is intentionally decoupled from session state and transport:
//! it supplies the static role catalog the UI resolves permissions against.

pub mod catalog;
pub mod permissions;
pub mod roles;

pub use catalog::{CatalogError, RoleCatalog};
pub use permissions::Permission;
pub use roles::{Application, Role, RoleId, SubRole, SubRoleId};
