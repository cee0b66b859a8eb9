//! HTTP security headers middleware
//!
//! Invite tokens travel in URL paths, so responses must neither leak the URL
//! through the Referer header nor be kept by shared caches.

use axum::{extract::Request, middleware::Next, response::Response};
use http::{header, HeaderValue};

/// Middleware that injects security headers into every response.
///
/// - `Referrer-Policy: no-referrer`
/// - `Cache-Control: no-store`
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn dummy_handler() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn test_headers_present() {
        let app = Router::new()
            .route("/invites/{token}", get(dummy_handler))
            .layer(middleware::from_fn(security_headers));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/invites/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
        assert_eq!(headers.get("cache-control").unwrap(), "no-store");
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    }
}
