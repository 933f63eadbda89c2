//! Lets HTML forms, which can only send GET and POST, reach the PUT and DELETE
//! routes. A POST carrying `?_method=PUT` (or the `X-HTTP-Method-Override`
//! header) is rewritten before it reaches the router.

use axum::{
    extract::{Query, Request},
    http::{HeaderName, Method},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::debug;

pub const OVERRIDE_HEADER: HeaderName = HeaderName::from_static("x-http-method-override");

#[derive(Debug, Deserialize)]
struct OverrideQuery {
    #[serde(rename = "_method")]
    method: Option<String>,
}

fn parse_method(raw: &str) -> Option<Method> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

fn requested_method(req: &Request) -> Option<Method> {
    let from_query = Query::<OverrideQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(q)| q.method);
    let raw = from_query.or_else(|| {
        req.headers()
            .get(&OVERRIDE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    })?;
    parse_method(&raw)
}

pub async fn method_override(mut req: Request, next: Next) -> Response {
    if req.method() == Method::POST {
        if let Some(method) = requested_method(&req) {
            debug!(%method, uri = %req.uri(), "method override");
            *req.method_mut() = method;
        }
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn post(uri: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn query_parameter_selects_method() {
        assert_eq!(requested_method(&post("/users/1?_method=PUT")), Some(Method::PUT));
        assert_eq!(
            requested_method(&post("/users/1?x=1&_method=delete")),
            Some(Method::DELETE)
        );
    }

    #[test]
    fn header_is_used_when_query_is_absent() {
        let mut req = post("/users/1");
        req.headers_mut()
            .insert(OVERRIDE_HEADER, "DELETE".parse().unwrap());
        assert_eq!(requested_method(&req), Some(Method::DELETE));
    }

    #[test]
    fn unsupported_values_are_ignored() {
        assert_eq!(requested_method(&post("/users/1?_method=TRACE")), None);
        assert_eq!(requested_method(&post("/users/1?_method=")), None);
        assert_eq!(requested_method(&post("/users/1")), None);
    }
}
