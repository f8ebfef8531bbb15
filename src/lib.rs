//! assetdesk - permission and idempotency core for the asset dashboard.
//!
//! Two independent utilities consumed by the dashboard's UI layer:
//!
//! - [`roles::RoleAuthority`] answers "is this role privileged enough?" and
//!   "which roles may this subject hand out?", failing closed on unknown roles.
//! - [`cache::IdempotencyCache`] remembers the result of a mutation for a
//!   short TTL so repeated submissions with the same key replay it.

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod roles;
pub mod telemetry;

pub use cache::{IdempotencyCache, IdempotencyKey};
pub use error::{CacheError, RoleError};
pub use roles::{Role, RoleAuthority, Threshold};
