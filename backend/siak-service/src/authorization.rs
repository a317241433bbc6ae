//! Route authorization for the services this binary exposes

use grpc_jwt_propagation::{
    AuthGate, Role, RoleAuthorizationTable, RoleTableError, TokenVerifier, UnlistedRoutePolicy,
};
use std::sync::Arc;

pub const NAMESPACE: &str = "tracer_study_grpc";
pub const MHS_BIODATA_SERVICE: &str = "MhsBiodataApiService";

/// Standard gRPC health service, probed without credentials
pub const HEALTH_PREFIX: &str = "/grpc.health.v1.Health/";

/// Methods absent here are governed by the unlisted-route policy.
/// `CheckMhsAlumni` is deliberately absent: any authenticated caller,
/// including alumni users and employers, may check alumni status.
pub fn role_table(policy: UnlistedRoutePolicy) -> Result<RoleAuthorizationTable, RoleTableError> {
    RoleAuthorizationTable::builder()
        .service(
            NAMESPACE,
            MHS_BIODATA_SERVICE,
            &[(
                "FetchMhsBiodataByNim",
                &[
                    Role::SuperAdmin,
                    Role::Admin,
                    Role::Manager,
                    Role::Executive,
                    Role::AdminProdi,
                    Role::Alumni,
                ],
            )],
        )
        .unlisted_routes(policy)
        .build()
}

pub fn auth_gate(verifier: Arc<TokenVerifier>, table: Arc<RoleAuthorizationTable>) -> AuthGate {
    AuthGate::new(verifier, table).with_public_prefix(HEALTH_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grpc_jwt_propagation::{route, Authorization};

    fn fetch_route() -> String {
        route(NAMESPACE, MHS_BIODATA_SERVICE, "FetchMhsBiodataByNim")
    }

    #[test]
    fn test_fetch_route_roles() {
        let table = role_table(UnlistedRoutePolicy::Allow).unwrap();

        for role in Role::ALL {
            let expected = if role.id() <= 6 {
                Authorization::Permitted
            } else {
                Authorization::Denied
            };
            assert_eq!(table.check(&fetch_route(), &[role.id()]), expected, "{role:?}");
        }
    }

    #[test]
    fn test_mixed_role_set_permitted() {
        let table = role_table(UnlistedRoutePolicy::Allow).unwrap();
        assert_eq!(table.check(&fetch_route(), &[7, 6]), Authorization::Permitted);
        assert_eq!(table.check(&fetch_route(), &[7, 8]), Authorization::Denied);
        assert_eq!(table.check(&fetch_route(), &[]), Authorization::Denied);
    }

    #[test]
    fn test_check_alumni_unlisted() {
        let check_route = route(NAMESPACE, MHS_BIODATA_SERVICE, "CheckMhsAlumni");

        let open = role_table(UnlistedRoutePolicy::Allow).unwrap();
        assert!(!open.is_listed(&check_route));
        assert_eq!(open.check(&check_route, &[7]), Authorization::Permitted);

        let closed = role_table(UnlistedRoutePolicy::Deny).unwrap();
        assert_eq!(closed.check(&check_route, &[1]), Authorization::Denied);
    }

    #[test]
    fn test_health_is_public() {
        let verifier = Arc::new(
            TokenVerifier::new("secret", std::time::Duration::from_secs(60)).unwrap(),
        );
        let table = Arc::new(role_table(UnlistedRoutePolicy::Deny).unwrap());
        let gate = auth_gate(verifier, table);

        assert!(gate.is_public("/grpc.health.v1.Health/Check"));
        assert!(!gate.is_public(&fetch_route()));
    }
}
