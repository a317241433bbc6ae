//! Request Extension Trait for JWT Claims Access
//!
//! Handlers behind the [`AuthLayer`](crate::AuthLayer) find the verified
//! claims in the request extensions.

use crate::JwtClaims;
use tonic::{Request, Status};

pub trait JwtClaimsExt {
    /// Claims stored by the auth layer
    ///
    /// Returns `Status::unauthenticated` if the layer was not attached or
    /// the route was public.
    fn jwt_claims(&self) -> Result<&JwtClaims, Status>;
}

impl<T> JwtClaimsExt for Request<T> {
    fn jwt_claims(&self) -> Result<&JwtClaims, Status> {
        self.extensions()
            .get::<JwtClaims>()
            .ok_or_else(|| Status::unauthenticated("No JWT claims found. Ensure AuthLayer is attached."))
    }
}
