use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request correlation id, echoed in every envelope's `meta.request_id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse a caller-supplied id when it is non-blank visible ASCII of at
    /// most 128 bytes, otherwise mint a `UUIDv4`.
    fn from_header(value: Option<&HeaderValue>) -> Self {
        let supplied = value
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.len() <= 128);
        Self(supplied.map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned))
    }
}

/// Tags each request with a [`RequestId`] and logs its outcome.
///
/// The id is stored as a request extension, set on the response header, and
/// recorded with method, path, status and latency once the handler returns.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_header(req.headers().get(REQUEST_ID_HEADER));
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    req.extensions_mut().insert(id.clone());

    let started = Instant::now();
    let mut res = next.run(req).await;

    tracing::info!(
        request_id = %id.0,
        method = %method,
        path = %path,
        status = res.status().as_u16(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request complete"
    );

    if let Ok(val) = HeaderValue::from_str(&id.0) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_caller_supplied_id() {
        let header = HeaderValue::from_static("  trace-42 ");
        assert_eq!(RequestId::from_header(Some(&header)).0, "trace-42");
    }

    #[test]
    fn mints_uuid_when_header_missing_or_blank() {
        let minted = RequestId::from_header(None);
        assert!(Uuid::parse_str(&minted.0).is_ok(), "{}", minted.0);

        let blank = HeaderValue::from_static("   ");
        assert!(Uuid::parse_str(&RequestId::from_header(Some(&blank)).0).is_ok());
    }

    #[test]
    fn oversized_id_is_replaced() {
        let long = "x".repeat(200);
        let header = HeaderValue::from_str(&long).expect("header");
        assert_ne!(RequestId::from_header(Some(&header)).0, long);
    }
}
