//! Role hierarchy types.
//!
//! The hierarchy is a closed enum with an exhaustive rank table. Raw role
//! strings coming from the session provider are parsed at the boundary via
//! [`Role::from_str`], which understands the known synonyms.

use crate::error::RoleError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A dashboard role.
///
/// Priority: admin > suporte > cliente > user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    /// Full access, including role management.
    Admin,
    /// Support staff: manages chips, routers and client links.
    Suporte,
    /// Client account: sees its own assets and usage.
    Cliente,
    /// Authenticated user without elevated access.
    User,
}

impl Role {
    /// Every role, highest rank first.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Suporte, Role::Cliente, Role::User];

    /// The lowest-privilege role. Unknown subjects are treated as this.
    pub const LOWEST: Role = Role::User;

    /// Rank in the hierarchy (higher = more privileged). No ties.
    pub const fn rank(self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Suporte => 2,
            Role::Cliente => 1,
            Role::User => 0,
        }
    }

    /// Canonical wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Suporte => "suporte",
            Role::Cliente => "cliente",
            Role::User => "user",
        }
    }

    /// Localized display label.
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Suporte => "Suporte",
            Role::Cliente => "Cliente",
            Role::User => "Usuário",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Role::Admin => "Acesso total ao sistema, incluindo gestão de usuários",
            Role::Suporte => "Gerencia chips, roteadores e vínculos com clientes",
            Role::Cliente => "Visualiza os próprios ativos e o consumo",
            Role::User => "Acesso básico somente leitura",
        }
    }

    /// Presentation style token for badges.
    pub const fn color(self) -> &'static str {
        match self {
            Role::Admin => "bg-red-100 text-red-800",
            Role::Suporte => "bg-blue-100 text-blue-800",
            Role::Cliente => "bg-green-100 text-green-800",
            Role::User => "bg-gray-100 text-gray-800",
        }
    }

    /// Check if this role meets or exceeds `required`.
    #[inline]
    pub fn at_least(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Roles a holder of this role may grant: every role at or below it.
    pub fn assignable(self) -> BTreeSet<Role> {
        Role::ALL
            .iter()
            .copied()
            .filter(|r| r.rank() <= self.rank())
            .collect()
    }

    /// Serializable description of every role, highest rank first.
    pub fn descriptors() -> Vec<RoleDescriptor> {
        Role::ALL.iter().copied().map(RoleDescriptor::from).collect()
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = RoleError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_role_synonym(s) {
            "admin" => Ok(Role::Admin),
            "suporte" => Ok(Role::Suporte),
            "cliente" => Ok(Role::Cliente),
            "user" => Ok(Role::User),
            _ if is_legacy_role(s) => Err(RoleError::LegacyRole(s.to_string())),
            _ => Err(RoleError::UnknownRole(s.to_string())),
        }
    }
}

/// Map a known synonym or case variant to its canonical role name.
///
/// Unrecognized strings come back unchanged, so the function is idempotent.
pub fn normalize_role_synonym(raw: &str) -> &str {
    match canonical_name(raw) {
        Some(name) => name,
        None => raw,
    }
}

fn canonical_name(raw: &str) -> Option<&'static str> {
    let lowered = raw.trim().to_ascii_lowercase();
    let name = match lowered.as_str() {
        "admin" => "admin",
        "suporte" | "suport" | "support" => "suporte",
        "cliente" => "cliente",
        "user" => "user",
        _ => return None,
    };
    Some(name)
}

/// Names from the admin/tech/analyst role set, which was never reconciled
/// with the canonical hierarchy. They are rejected, not merged.
pub fn is_legacy_role(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "tech" | "analyst")
}

/// Flat, serializable view of a role for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDescriptor {
    pub role: Role,
    pub rank: u8,
    pub label: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

impl From<Role> for RoleDescriptor {
    fn from(role: Role) -> Self {
        Self {
            role,
            rank: role.rank(),
            label: role.label(),
            description: role.description(),
            color: role.color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_table_has_no_ties() {
        let ranks: BTreeSet<u8> = Role::ALL.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks.len(), Role::ALL.len());
    }

    #[test]
    fn test_all_is_sorted_highest_first() {
        for pair in Role::ALL.windows(2) {
            assert!(pair[0] > pair[1], "{} should outrank {}", pair[0], pair[1]);
        }
        assert_eq!(Role::ALL.last(), Some(&Role::LOWEST));
    }

    #[test]
    fn test_parse_synonyms() {
        assert_eq!("suport".parse::<Role>(), Ok(Role::Suporte));
        assert_eq!("Support".parse::<Role>(), Ok(Role::Suporte));
        assert_eq!("  ADMIN ".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("cliente".parse::<Role>(), Ok(Role::Cliente));
    }

    #[test]
    fn test_parse_rejects_unknown_and_legacy() {
        assert_eq!(
            "gerente".parse::<Role>(),
            Err(RoleError::UnknownRole("gerente".into()))
        );
        assert_eq!(
            "tech".parse::<Role>(),
            Err(RoleError::LegacyRole("tech".into()))
        );
        assert!(matches!("Analyst".parse::<Role>(), Err(RoleError::LegacyRole(_))));
    }

    #[test]
    fn test_normalize_passes_unknown_through() {
        assert_eq!(normalize_role_synonym("support"), "suporte");
        assert_eq!(normalize_role_synonym("Gerente"), "Gerente");
        assert_eq!(normalize_role_synonym(""), "");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Role::Suporte).unwrap();
        assert_eq!(json, "\"suporte\"");
        let role: Role = serde_json::from_str("\"cliente\"").unwrap();
        assert_eq!(role, Role::Cliente);
        let role: Role = serde_json::from_str("\"support\"").unwrap();
        assert_eq!(role, Role::Suporte);
        let role: Role = serde_json::from_str("\" Admin \"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"tech\"").is_err());
    }

    #[test]
    fn test_assignable_includes_self_and_below() {
        let set = Role::Suporte.assignable();
        assert!(set.contains(&Role::Suporte));
        assert!(set.contains(&Role::Cliente));
        assert!(set.contains(&Role::User));
        assert!(!set.contains(&Role::Admin));
        assert_eq!(Role::User.assignable().len(), 1);
    }

    #[test]
    fn test_descriptors_cover_every_role() {
        let descriptors = Role::descriptors();
        assert_eq!(descriptors.len(), 4);
        assert_eq!(descriptors[0].role, Role::Admin);
        assert_eq!(descriptors[0].label, "Administrador");
        assert_eq!(descriptors[3].rank, 0);
    }
}
