//! Server-side authentication gate
//!
//! Composes the [`TokenVerifier`] and the [`RoleAuthorizationTable`] into one
//! decision applied to every inbound call before it reaches a handler.

use crate::claims::JwtClaims;
use crate::roles::{Authorization, RoleAuthorizationTable};
use crate::verifier::TokenVerifier;
use std::sync::Arc;
use tonic::metadata::MetadataMap;
use tonic::Status;
use tracing::{debug, warn};

/// Authenticates and authorizes inbound gRPC calls
///
/// Sequence for every non-public route:
/// 1. Extract `authorization: Bearer <token>` from metadata
/// 2. Verify the token signature and expiry
/// 3. Look up the route in the role table
///
/// Steps 1 and 2 fail with `Status::unauthenticated`, step 3 with
/// `Status::permission_denied`. The gate holds no mutable state and is
/// cheap to clone.
#[derive(Clone, Debug)]
pub struct AuthGate {
    verifier: Arc<TokenVerifier>,
    table: Arc<RoleAuthorizationTable>,
    public_prefixes: Arc<Vec<String>>,
}

impl AuthGate {
    pub fn new(verifier: Arc<TokenVerifier>, table: Arc<RoleAuthorizationTable>) -> Self {
        Self {
            verifier,
            table,
            public_prefixes: Arc::new(Vec::new()),
        }
    }

    /// Exempt every route starting with `prefix` from authentication
    ///
    /// Intended for infrastructure services such as `/grpc.health.v1.Health/`.
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.public_prefixes).push(prefix.into());
        self
    }

    pub fn is_public(&self, route: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|prefix| route.starts_with(prefix.as_str()))
    }

    pub fn table(&self) -> &RoleAuthorizationTable {
        &self.table
    }

    /// Run the full gate for one call
    pub fn authorize(&self, route: &str, metadata: &MetadataMap) -> Result<JwtClaims, Status> {
        let token = extract_bearer_token(metadata)?;

        let claims = self.verifier.verify(token).map_err(|e| {
            warn!(route = %route, error = %e, "Credential rejected");
            Status::unauthenticated("access token is invalid")
        })?;

        match self.table.check(route, &claims.roles) {
            Authorization::Permitted => {
                debug!(
                    route = %route,
                    user_id = claims.id,
                    username = %claims.username,
                    "Call authorized"
                );
                Ok(claims)
            }
            Authorization::Denied => {
                warn!(
                    route = %route,
                    user_id = claims.id,
                    roles = ?claims.roles,
                    "Caller lacks a permitted role"
                );
                Err(Status::permission_denied(
                    "no permission to access this RPC",
                ))
            }
        }
    }
}

/// Pull the bearer token out of call metadata
pub fn extract_bearer_token(metadata: &MetadataMap) -> Result<&str, Status> {
    let auth_header = metadata.get("authorization").ok_or_else(|| {
        warn!("Missing authorization header");
        Status::unauthenticated("authorization token is not provided")
    })?;

    let auth_str = auth_header.to_str().map_err(|e| {
        warn!("Invalid authorization header encoding: {}", e);
        Status::unauthenticated("invalid authorization header")
    })?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("Invalid authorization format (expected 'Bearer <token>')");
            Status::unauthenticated("invalid authorization format")
        })?;

    Ok(token)
}
