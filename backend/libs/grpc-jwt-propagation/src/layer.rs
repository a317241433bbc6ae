//! Tower layer placing the [`AuthGate`] in the server dispatch path
//!
//! A tonic `Interceptor` only sees metadata, not the request path, so the
//! gate runs one level lower on the raw `http::Request` where the route is
//! known. Rejected calls are answered with a trailers-only gRPC response and
//! never reach the wrapped service.

use crate::server::AuthGate;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tonic::body::BoxBody;
use tonic::metadata::MetadataMap;
use tower::{Layer, Service};

#[derive(Clone, Debug)]
pub struct AuthLayer {
    gate: AuthGate,
}

impl AuthLayer {
    pub fn new(gate: AuthGate) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, service: S) -> Self::Service {
        AuthService {
            inner: service,
            gate: self.gate.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthService<S> {
    inner: S,
    gate: AuthGate,
}

impl<S, ReqBody> Service<http::Request<ReqBody>> for AuthService<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<ReqBody>) -> Self::Future {
        // The clone is not guaranteed ready; keep the one that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let route = req.uri().path().to_owned();
        if self.gate.is_public(&route) {
            return Box::pin(inner.call(req));
        }

        let metadata = MetadataMap::from_headers(req.headers().clone());
        match self.gate.authorize(&route, &metadata) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(inner.call(req))
            }
            Err(status) => Box::pin(async move { Ok(status.into_http()) }),
        }
    }
}
