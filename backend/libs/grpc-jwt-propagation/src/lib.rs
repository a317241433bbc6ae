//! JWT Authentication and Role Authorization for gRPC Services
//!
//! ## Core Components
//!
//! - **TokenVerifier**: validates (and issues) HS256 credentials with injected key material
//! - **JwtClaims**: caller identity and role identifiers carried by a credential
//! - **RoleAuthorizationTable**: immutable route → allowed-roles policy
//! - **AuthGate / AuthLayer**: the per-call gate and the tower layer that runs it
//!   in front of every tonic service
//! - **JwtClientInterceptor**: injects a bearer token into outgoing calls
//! - **JwtClaimsExt**: request extension trait for handlers
//!
//! ## Server Side
//!
//! ```rust,no_run
//! use grpc_jwt_propagation::{AuthGate, AuthLayer, Role, RoleAuthorizationTable, TokenVerifier};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let verifier = Arc::new(TokenVerifier::new("secret", Duration::from_secs(1800))?);
//! let table = RoleAuthorizationTable::builder()
//!     .service("tracer_study_grpc", "ReportService", &[("Export", &[Role::Admin])])
//!     .build()?;
//!
//! let layer = AuthLayer::new(AuthGate::new(verifier, Arc::new(table)));
//! // tonic::transport::Server::builder().layer(layer).add_service(...)
//! # Ok(())
//! # }
//! ```
//!
//! ## Status Mapping
//!
//! - No token / malformed / expired / wrong signature = `Status::unauthenticated`
//! - Role not permitted on the route = `Status::permission_denied`

mod claims;
mod client;
mod extensions;
mod layer;
mod roles;
mod server;
mod verifier;

pub use claims::JwtClaims;
pub use client::JwtClientInterceptor;
pub use extensions::JwtClaimsExt;
pub use layer::{AuthLayer, AuthService};
pub use roles::{
    route, Authorization, Role, RoleAuthorizationTable, RoleTableBuilder, RoleTableError,
    UnlistedRoutePolicy,
};
pub use server::{extract_bearer_token, AuthGate};
pub use verifier::{TokenError, TokenVerifier};

// Re-export tonic Status for convenience
pub use tonic::Status;
