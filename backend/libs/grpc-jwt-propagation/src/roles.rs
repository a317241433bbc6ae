//! Role-based route authorization
//!
//! The access policy is a single immutable table keyed by gRPC route
//! (`/<namespace>.<Service>/<Method>`). It is declared once at startup and
//! injected into the [`AuthGate`](crate::AuthGate).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Caller classes known to the tracer-study platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Role {
    SuperAdmin = 1,
    Admin = 2,
    Manager = 3,
    Executive = 4,
    AdminProdi = 5,
    Alumni = 6,
    PenggunaAlumni = 7,
    AdminPost = 8,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Manager,
        Role::Executive,
        Role::AdminProdi,
        Role::Alumni,
        Role::PenggunaAlumni,
        Role::AdminPost,
    ];

    pub const fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }
}

/// Build the gRPC route for a method
pub fn route(namespace: &str, service: &str, method: &str) -> String {
    format!("/{namespace}.{service}/{method}")
}

/// What to do with routes that have no table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnlistedRoutePolicy {
    /// Any authenticated caller may use the route
    #[default]
    Allow,
    /// Unlisted routes are rejected with `PermissionDenied`
    Deny,
}

impl FromStr for UnlistedRoutePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            other => Err(format!("unknown unlisted-route policy '{other}' (expected allow or deny)")),
        }
    }
}

impl fmt::Display for UnlistedRoutePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Deny => f.write_str("deny"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Permitted,
    Denied,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoleTableError {
    #[error("route {0} declared more than once")]
    DuplicateRoute(String),

    #[error("route {0} declared with no roles")]
    EmptyRoleSet(String),
}

/// Immutable route → allowed-roles mapping
#[derive(Debug, Clone, Default)]
pub struct RoleAuthorizationTable {
    routes: HashMap<String, HashSet<u32>>,
    unlisted: UnlistedRoutePolicy,
}

impl RoleAuthorizationTable {
    pub fn builder() -> RoleTableBuilder {
        RoleTableBuilder::default()
    }

    /// Decide whether a caller holding `roles` may invoke `route`
    pub fn check(&self, route: &str, roles: &[u32]) -> Authorization {
        match self.routes.get(route) {
            Some(allowed) if roles.iter().any(|role| allowed.contains(role)) => {
                Authorization::Permitted
            }
            Some(_) => Authorization::Denied,
            None => match self.unlisted {
                UnlistedRoutePolicy::Allow => Authorization::Permitted,
                UnlistedRoutePolicy::Deny => Authorization::Denied,
            },
        }
    }

    pub fn allowed_roles(&self, route: &str) -> Option<&HashSet<u32>> {
        self.routes.get(route)
    }

    pub fn is_listed(&self, route: &str) -> bool {
        self.routes.contains_key(route)
    }

    pub fn unlisted_policy(&self) -> UnlistedRoutePolicy {
        self.unlisted
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Declarative builder, one `service` call per gRPC service
#[derive(Debug, Default)]
pub struct RoleTableBuilder {
    entries: Vec<(String, HashSet<u32>)>,
    unlisted: UnlistedRoutePolicy,
}

impl RoleTableBuilder {
    pub fn service(mut self, namespace: &str, service: &str, methods: &[(&str, &[Role])]) -> Self {
        for (method, roles) in methods {
            let allowed = roles.iter().map(|role| role.id()).collect();
            self.entries.push((route(namespace, service, method), allowed));
        }
        self
    }

    pub fn unlisted_routes(mut self, policy: UnlistedRoutePolicy) -> Self {
        self.unlisted = policy;
        self
    }

    pub fn build(self) -> Result<RoleAuthorizationTable, RoleTableError> {
        let mut routes = HashMap::with_capacity(self.entries.len());

        for (route, allowed) in self.entries {
            if allowed.is_empty() {
                return Err(RoleTableError::EmptyRoleSet(route));
            }
            if routes.contains_key(&route) {
                return Err(RoleTableError::DuplicateRoute(route));
            }
            routes.insert(route, allowed);
        }

        Ok(RoleAuthorizationTable {
            routes,
            unlisted: self.unlisted,
        })
    }
}
