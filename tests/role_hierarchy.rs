//! Integration tests for the role hierarchy and permission checks.

use assetdesk::roles::{Role, RoleAuthority, Threshold, normalize_role_synonym};
use std::collections::BTreeSet;

const RAW_ROLES: [&str; 8] = [
    "admin", "suporte", "support", "suport", "cliente", "user", "tech", "ninguem",
];

#[test]
fn test_minimum_role_matches_rank_for_all_pairs() {
    let auth = RoleAuthority::default();
    for r1 in Role::ALL {
        for r2 in Role::ALL {
            assert_eq!(
                auth.has_minimum_role(r1.as_str(), r2.as_str()),
                r1.rank() >= r2.rank(),
                "{r1} vs {r2}"
            );
        }
    }
}

#[test]
fn test_hierarchy_is_a_total_order() {
    let auth = RoleAuthority::default();
    let meets = |a: Role, b: Role| auth.has_minimum_role(a.as_str(), b.as_str());

    for a in Role::ALL {
        for b in Role::ALL {
            // totality
            assert!(meets(a, b) || meets(b, a));
            // antisymmetry
            if meets(a, b) && meets(b, a) {
                assert_eq!(a, b);
            }
            for c in Role::ALL {
                if meets(a, b) && meets(b, c) {
                    assert!(meets(a, c), "{a} >= {b} >= {c}");
                }
            }
        }
    }
}

#[test]
fn test_assignable_roles_contain_self_and_nothing_higher() {
    let auth = RoleAuthority::default();
    for role in Role::ALL {
        let assignable = auth.assignable_roles(role.as_str());
        assert!(assignable.contains(&role));
        assert!(assignable.iter().all(|r| r.rank() <= role.rank()));
    }
}

#[test]
fn test_normalize_is_idempotent() {
    for raw in RAW_ROLES.iter().chain(["  Support ", "ADMIN", ""].iter()) {
        let once = normalize_role_synonym(raw);
        assert_eq!(normalize_role_synonym(once), once, "input {raw:?}");
    }
}

#[test]
fn test_dashboard_scenario() {
    let auth = RoleAuthority::default();
    assert!(!auth.has_minimum_role("cliente", "suporte"));
    assert!(auth.has_minimum_role("admin", "user"));

    let expected: BTreeSet<Role> = [Role::Suporte, Role::Cliente, Role::User].into();
    assert_eq!(auth.assignable_roles("suporte"), expected);
}

#[test]
fn test_legacy_role_set_grants_nothing() {
    let auth = RoleAuthority::default();
    for legacy in ["tech", "analyst"] {
        assert!(auth.rank_of(legacy).is_err());
        assert!(!auth.is_at_least(legacy, Threshold::ClientOrAbove));
        assert!(auth.assignable_roles(legacy).is_empty());
    }
}

#[test]
fn test_unknown_roles_never_raise_privilege() {
    let auth = RoleAuthority::default();
    for raw in ["", "root", "Administrador", "admin!", "null"] {
        assert_eq!(auth.rank_or_lowest(raw), Role::LOWEST.rank());
        assert!(!auth.is_support_or_above(raw));
    }
}
