/// Trusted host middleware
///
/// Rejects requests whose target host is not on the configured allow-list with
/// `400 Bad Request`, guarding against Host header attacks. The host is read
/// from the request URI authority (HTTP/2) or the `Host` header (HTTP/1.1),
/// and compared without its port. A `*` entry disables the check.
///
/// # Example
///
/// ```no_run
/// use axum::Router;
/// use bookportal_api::middleware::trusted_host::TrustedHostLayer;
///
/// let app: Router = Router::new()
///     .layer(TrustedHostLayer::new(vec!["localhost".to_string()]));
/// ```

use axum::{
    extract::Request,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::error::ApiError;

/// Trusted host middleware layer
#[derive(Clone)]
pub struct TrustedHostLayer {
    /// `None` accepts every host
    allowed: Option<Arc<Vec<String>>>,
}

impl TrustedHostLayer {
    pub fn new(allowed_hosts: Vec<String>) -> Self {
        if allowed_hosts.iter().any(|h| h == "*") {
            return Self { allowed: None };
        }

        let allowed = allowed_hosts
            .into_iter()
            .map(|h| h.to_ascii_lowercase())
            .collect();
        Self {
            allowed: Some(Arc::new(allowed)),
        }
    }
}

impl<S> Layer<S> for TrustedHostLayer {
    type Service = TrustedHostMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TrustedHostMiddleware {
            inner,
            allowed: self.allowed.clone(),
        }
    }
}

/// Trusted host middleware service
#[derive(Clone)]
pub struct TrustedHostMiddleware<S> {
    inner: S,
    allowed: Option<Arc<Vec<String>>>,
}

/// Host of the request without port, lowercased
fn request_host(request: &Request) -> Option<String> {
    let raw = match request.uri().authority() {
        Some(authority) => authority.host().to_string(),
        None => request
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())?
            .to_string(),
    };

    let host = if let Some(rest) = raw.strip_prefix('[') {
        // IPv6 literal, e.g. [::1]:8000
        rest.split(']').next().unwrap_or_default()
    } else {
        raw.split(':').next().unwrap_or_default()
    };

    (!host.is_empty()).then(|| host.to_ascii_lowercase())
}

impl<S> Service<Request> for TrustedHostMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        if let Some(allowed) = &self.allowed {
            let trusted = request_host(&request)
                .map(|host| allowed.iter().any(|a| *a == host))
                .unwrap_or(false);

            if !trusted {
                tracing::warn!(
                    host = ?request.headers().get(header::HOST),
                    "Rejected request for untrusted host"
                );
                let response =
                    ApiError::BadRequest("Invalid host header".to_string()).into_response();
                return Box::pin(async move { Ok(response) });
            }
        }

        Box::pin(self.inner.call(request))
    }
}
