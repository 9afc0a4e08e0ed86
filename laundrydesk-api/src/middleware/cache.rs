/// Cache suppression middleware
///
/// Adds headers preventing clients and intermediaries from caching
/// identity-bearing responses (user listings, profiles, task lists):
///
/// - `Cache-Control: no-store, no-cache, must-revalidate, private`
/// - `Pragma: no-cache`
/// - `Expires: 0`
///
/// # Example
///
/// ```no_run
/// use axum::Router;
/// use laundrydesk_api::middleware::cache::NoCacheLayer;
///
/// let app: Router = Router::new().layer(NoCacheLayer);
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    response::Response,
};
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Layer applying no-store cache headers to every response it wraps
#[derive(Debug, Clone, Copy)]
pub struct NoCacheLayer;

impl<S> Layer<S> for NoCacheLayer {
    type Service = NoCacheMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        NoCacheMiddleware { inner }
    }
}

/// Middleware service produced by [`NoCacheLayer`]
#[derive(Debug, Clone)]
pub struct NoCacheMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for NoCacheMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let future = self.inner.call(req);

        Box::pin(async move {
            let mut response = future.await?;

            let headers = response.headers_mut();
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
            );
            headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
            headers.insert(header::EXPIRES, HeaderValue::from_static("0"));

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use tower::Service as _;

    #[tokio::test]
    async fn test_no_cache_headers_applied() {
        let mut app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(NoCacheLayer);

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.call(request).await.unwrap();

        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "no-store, no-cache, must-revalidate, private"
        );
        assert_eq!(response.headers()[header::PRAGMA], "no-cache");
        assert_eq!(response.headers()[header::EXPIRES], "0");
    }
}
