//! Origin guard: cross-origin filtering for the public endpoints.
//!
//! Two pieces cooperate:
//! - [`cors_layer`] answers preflight requests and stamps CORS headers on every
//!   response, echoing the caller's origin only when the policy allows it.
//!   [`allow_headers_layer`] adds `Access-Control-Allow-Headers` to the
//!   non-preflight responses as well.
//! - [`require_allowed_origin`] rejects non-preflight requests from any other
//!   origin with a 403 before the handler (and therefore any LLM call) runs.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::ApiError;

/// Headers browsers may send on cross-origin calls.
const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];

/// [`ALLOWED_HEADERS`] as a single header value.
const ALLOWED_HEADERS_VALUE: &str = "authorization, x-client-info, apikey, content-type";

/// Allow-list of web origins: exact matches plus trusted host suffixes.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    exact: Vec<String>,
    suffixes: Vec<String>,
}

impl OriginPolicy {
    pub fn new(exact: Vec<String>, suffixes: Vec<String>) -> Self {
        Self { exact, suffixes }
    }

    /// Is this declared origin allowed to call us?
    pub fn allows(&self, origin: &str) -> bool {
        if origin.is_empty() {
            return false;
        }
        self.exact.iter().any(|o| o == origin)
            || self.suffixes.iter().any(|s| origin.ends_with(s.as_str()))
    }

    /// Same as [`allows`](Self::allows) for a raw header value.
    pub fn allows_header(&self, origin: Option<&HeaderValue>) -> bool {
        origin
            .and_then(|v| v.to_str().ok())
            .is_some_and(|o| self.allows(o))
    }
}

/// Build the CORS layer for a policy.
///
/// Never emits a wildcard allow-origin; the request's own origin is echoed
/// when allowed, and credentials are permitted.
pub fn cors_layer(policy: Arc<OriginPolicy>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            policy.allows_header(Some(origin))
        }))
        .allow_credentials(true)
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
        .allow_methods([Method::POST, Method::OPTIONS])
}

/// `Access-Control-Allow-Headers` on every response, errors included.
///
/// [`CorsLayer`] only sends it on preflight; this fills it in elsewhere.
pub fn allow_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS_VALUE),
    )
}

/// Middleware rejecting requests whose `Origin` is missing or not allowed.
pub async fn require_allowed_origin(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN);
    if policy.allows_header(origin) {
        return next.run(request).await;
    }

    let origin = origin.map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    ApiError::OriginRejected { origin }.into_response()
}
