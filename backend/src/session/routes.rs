//! Static route-to-role rules. Configuration, not runtime state, but the
//! matcher semantics here are load-bearing for every authorization decision.

use crate::models::user::Role;

/// Access requirement for a protected path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Any authenticated role. Finer checks (seller-only listing creation)
    /// live in the handlers.
    Authenticated,
    AdminOnly,
}

impl RouteAccess {
    pub fn permits(&self, role: Role) -> bool {
        match self {
            RouteAccess::Authenticated => true,
            RouteAccess::AdminOnly => role.is_admin(),
        }
    }
}

struct RouteRule {
    prefix: &'static str,
    access: RouteAccess,
}

const PROTECTED_ROUTES: &[RouteRule] = &[
    RouteRule {
        prefix: "/admin",
        access: RouteAccess::AdminOnly,
    },
    RouteRule {
        prefix: "/my-products",
        access: RouteAccess::Authenticated,
    },
    RouteRule {
        prefix: "/products/new",
        access: RouteAccess::Authenticated,
    },
];

/// Where unauthenticated visitors to protected paths are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where authenticated-but-unauthorized visitors are sent.
pub const HOME_PATH: &str = "/";

/// Returns the access requirement for the path, or `None` when this subsystem
/// never gates it.
pub fn required_access(path: &str) -> Option<RouteAccess> {
    PROTECTED_ROUTES
        .iter()
        .find(|rule| prefix_matches(path, rule.prefix))
        .map(|rule| rule.access)
}

/// Matches the prefix itself and its descendants: `/admin` and `/admin/...`,
/// but never `/administrator`.
fn prefix_matches(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
