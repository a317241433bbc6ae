//! Client-side JWT Interceptor
//!
//! Injects a bearer token into outgoing gRPC requests via metadata.

use tonic::metadata::errors::InvalidMetadataValue;
use tonic::metadata::AsciiMetadataValue;
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// Client-side interceptor that adds `authorization: Bearer {token}` to every call
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_jwt_propagation::JwtClientInterceptor;
/// use tonic::transport::Channel;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let interceptor = JwtClientInterceptor::new("eyJhbGc...")?;
///
/// let channel = Channel::from_static("http://127.0.0.1:8081")
///     .connect()
///     .await?;
///
/// // let mut client = MhsBiodataApiServiceClient::with_interceptor(channel, interceptor);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct JwtClientInterceptor {
    /// Pre-formatted authorization header value
    auth_header: AsciiMetadataValue,
}

impl JwtClientInterceptor {
    /// Create an interceptor for a token (without the "Bearer " prefix)
    ///
    /// ## Errors
    ///
    /// Fails if the token contains characters not allowed in metadata.
    /// Well-formed JWTs (base64url segments) always pass.
    pub fn new(jwt_token: impl Into<String>) -> Result<Self, InvalidMetadataValue> {
        let auth_header = format!("Bearer {}", jwt_token.into()).parse()?;
        Ok(Self { auth_header })
    }
}

impl Interceptor for JwtClientInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert("authorization", self.auth_header.clone());

        Ok(request)
    }
}
