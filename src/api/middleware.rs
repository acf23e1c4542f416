//! Request instrumentation middleware.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::trace;

use crate::metrics::{record_http_request, RequestLabels};

/// Time every request and record it against its method, route and status.
///
/// The route label is the matched route template when routing succeeded and
/// the raw request path otherwise, so 404s are still counted.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let response = next.run(req).await;

    let labels = RequestLabels::new(method, route, response.status().as_u16());
    trace!(?labels, "request recorded");
    record_http_request(start, &labels);

    response
}
