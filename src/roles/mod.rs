//! Role hierarchy and permission evaluation.
//!
//! - [`role`]: the closed [`Role`] enum, its rank table and display metadata
//! - [`authority`]: [`RoleAuthority`], which answers permission questions
//!   for raw role strings and fails closed on anything it does not know

pub mod authority;
pub mod role;

pub use authority::{RoleAuthority, Threshold};
pub use role::{Role, RoleDescriptor, is_legacy_role, normalize_role_synonym};
