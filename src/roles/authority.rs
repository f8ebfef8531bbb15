//! Role Authority - the single place permission comparisons happen.
//!
//! UI permission gates and role-assignment forms ask [`RoleAuthority`]
//! instead of comparing role strings themselves. Every check is logged and
//! counted. Checks never fail: unknown subjects are ranked as the lowest
//! role and unknown requirements deny.

use super::role::{Role, normalize_role_synonym};
use crate::config::RolesConfig;
use crate::error::RoleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

// ============================================================================
// Threshold Predicate Generation
// ============================================================================

/// Macro to generate named threshold predicates on the authority.
macro_rules! impl_threshold_predicate {
    ($(
        $(#[$meta:meta])*
        $method:ident -> $threshold:ident
    ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $method(&self, subject: &str) -> bool {
                self.is_at_least(subject, Threshold::$threshold)
            }
        )*
    };
}

/// Named privilege thresholds used by permission gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Threshold {
    AdminOnly,
    SupportOrAbove,
    ClientOrAbove,
    Anyone,
}

impl Threshold {
    /// The minimum role that satisfies this threshold.
    pub const fn minimum(self) -> Role {
        match self {
            Threshold::AdminOnly => Role::Admin,
            Threshold::SupportOrAbove => Role::Suporte,
            Threshold::ClientOrAbove => Role::Cliente,
            Threshold::Anyone => Role::User,
        }
    }
}

// ============================================================================
// Role Authority
// ============================================================================

/// Evaluates role hierarchy questions for raw role strings.
///
/// Stateless apart from logging policy; cheap to clone and share.
#[derive(Debug, Clone)]
pub struct RoleAuthority {
    warn_on_unknown: bool,
}

impl Default for RoleAuthority {
    fn default() -> Self {
        Self::new(&RolesConfig::default())
    }
}

impl RoleAuthority {
    /// Create an authority with the given logging policy.
    pub fn new(config: &RolesConfig) -> Self {
        Self {
            warn_on_unknown: config.warn_on_unknown,
        }
    }

    /// Parse a raw role string, synonyms included.
    pub fn resolve(&self, raw: &str) -> Result<Role, RoleError> {
        raw.parse()
    }

    /// Fixed rank for a role; errors on roles outside the hierarchy.
    pub fn rank_of(&self, raw: &str) -> Result<u8, RoleError> {
        self.resolve(raw).map(Role::rank)
    }

    /// Rank for a role, treating unknown roles as the lowest rank.
    pub fn rank_or_lowest(&self, raw: &str) -> u8 {
        self.subject_role(raw).rank()
    }

    /// Resolve a subject's role, falling back to the lowest privilege.
    pub fn subject_role(&self, raw: &str) -> Role {
        match self.resolve(raw) {
            Ok(role) => role,
            Err(e) => {
                self.note_unknown(&e, "subject");
                Role::LOWEST
            }
        }
    }

    /// Map known synonyms to canonical names; unknown strings pass through.
    pub fn normalize_role_synonym<'a>(&self, raw: &'a str) -> &'a str {
        normalize_role_synonym(raw)
    }

    /// Check whether `subject` meets or exceeds `required`.
    ///
    /// An unknown subject ranks lowest. An unknown `required` role denies,
    /// so a misspelt gate never opens.
    pub fn has_minimum_role(&self, subject: &str, required: &str) -> bool {
        let required_role = match self.resolve(required) {
            Ok(role) => role,
            Err(e) => {
                self.note_unknown(&e, "required");
                self.log_check(subject, required, false);
                return false;
            }
        };
        let allowed = self.subject_role(subject).at_least(required_role);
        self.log_check(subject, required, allowed);
        allowed
    }

    /// Check a subject against a named threshold.
    pub fn is_at_least(&self, subject: &str, threshold: Threshold) -> bool {
        let allowed = self.subject_role(subject).at_least(threshold.minimum());
        self.log_check(subject, threshold.minimum().as_str(), allowed);
        allowed
    }

    impl_threshold_predicate! {
        /// Only administrators.
        is_admin -> AdminOnly,
        /// Support staff or administrators.
        is_support_or_above -> SupportOrAbove,
        /// Any client-facing account or staff.
        is_client_or_above -> ClientOrAbove,
    }

    /// Roles the subject may grant to others: everything at or below its
    /// own rank. Empty for an unrecognized subject.
    pub fn assignable_roles(&self, subject: &str) -> BTreeSet<Role> {
        match self.resolve(subject) {
            Ok(role) => role.assignable(),
            Err(e) => {
                self.note_unknown(&e, "subject");
                BTreeSet::new()
            }
        }
    }

    /// Check whether `subject` may grant `target` to someone else.
    pub fn can_assign(&self, subject: &str, target: &str) -> bool {
        let target_role = match self.resolve(target) {
            Ok(role) => role,
            Err(e) => {
                self.note_unknown(&e, "target");
                return false;
            }
        };
        let allowed = self.assignable_roles(subject).contains(&target_role);
        if !allowed {
            debug!(subject = %subject, target = %target_role, "role assignment denied");
        }
        allowed
    }

    fn note_unknown(&self, error: &RoleError, position: &'static str) {
        crate::metrics::record_unknown_role(error.error_code());
        if self.warn_on_unknown {
            warn!(role = %error.role(), position, code = error.error_code(), "unrecognized role, failing closed");
        } else {
            debug!(role = %error.role(), position, "unrecognized role, failing closed");
        }
    }

    fn log_check(&self, subject: &str, required: &str, allowed: bool) {
        crate::metrics::record_permission_check(allowed);
        trace!(subject = %subject, required = %required, allowed, "permission check");
    }
}
