//! JWT Claims Structure
//!
//! This module defines the JwtClaims structure that is extracted from validated tokens
//! and stored in request extensions for access by service handlers.

use serde::{Deserialize, Serialize};

/// JWT Claims carried by tracer-study credentials
///
/// The issuer always signs `roles` and `exp`. `id` and `username` are
/// optional on the wire and default to zero / empty when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Numeric user id assigned by the issuer
    #[serde(default)]
    pub id: u32,

    /// Login name, used for audit logging only
    #[serde(default)]
    pub username: String,

    /// Role identifiers granted to the caller
    pub roles: Vec<u32>,

    /// Issued at timestamp (Unix timestamp)
    #[serde(default)]
    pub iat: i64,

    /// Expiration timestamp (Unix timestamp)
    pub exp: i64,
}
