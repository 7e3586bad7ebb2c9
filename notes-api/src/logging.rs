use axum::{body::Body, http::Request, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{self, TraceLayer},
};
use tracing_subscriber::prelude::*;

use crate::config::LogFormat;

const DEFAULT_FILTER: &str = "notes_api=debug,tower_http=debug,axum::rejection=trace";

pub fn setup_tracing(format: LogFormat) {
    let tracing = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
    );

    match format {
        LogFormat::Json => tracing.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Compact => tracing
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false),
            )
            .init(),
    }
}

/// Tags every request with an `x-request-id` (generated when the client sent none), echoes it
/// back and opens a span carrying it.
pub fn add_tracing_layer(app: Router) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default();
                        tracing::span!(
                            tracing::Level::DEBUG,
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = request_id,
                        )
                    })
                    .on_request(trace::DefaultOnRequest::new())
                    .on_response(trace::DefaultOnResponse::new().include_headers(false))
                    .on_failure(trace::DefaultOnFailure::new()),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderName, HeaderValue},
        routing::get,
    };
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_request_id_is_generated_and_propagated() {
        let app = add_tracing_layer(Router::new().route("/", get(|| async { "ok" })));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/").await;
        let generated = response.header("x-request-id");
        assert!(!generated.is_empty());

        let response = server
            .get("/")
            .add_header(HeaderName::from_static("x-request-id"), HeaderValue::from_static("abc"))
            .await;
        assert_eq!(response.header("x-request-id"), "abc");
    }
}
