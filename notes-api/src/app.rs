use aide::redoc::Redoc;
use axum::{
    middleware::{self},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use rand::Rng;
use serde_json::json;

use crate::{
    ai::Summarizer,
    config::Config,
    db::DB,
    errors::{self, on_error, ErrorResponseDocs},
    openapi::{
        self,
        aide::axum::ApiRouter,
        OpenApi,
    },
    state::AppState,
};

pub struct AppParams<Router>
where
    Router: FnOnce(AppState) -> ApiRouter,
{
    pub db: DB,
    pub summarizer: Summarizer,
    pub config: Arc<Config>,
    pub router: Router,
}

pub async fn create<R>(
    AppParams {
        db,
        summarizer,
        config,
        router,
    }: AppParams<R>,
) -> errors::Result<(Router, OpenApi)>
where
    R: FnOnce(AppState) -> ApiRouter,
{
    let mut api = OpenApi::default();

    let state = AppState {
        conn: db.clone(),
        summarizer,
    };

    let docs_router = axum::Router::new()
        .route(
            "/__docs__",
            get(Redoc::new("/__docs__/spec.json").with_title("Notes API").axum_handler()),
        )
        .route("/__docs__/spec.json", get(serve_docs));

    let app = ApiRouter::new()
        .route("/", get(welcome))
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .merge(docs_router)
        .merge(router(state))
        .finish_api_with(&mut api, |t| {
            t.title("Notes API")
                .version(env!("CARGO_PKG_VERSION"))
                .default_response::<openapi::Json<ErrorResponseDocs>>()
        })
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(Extension(db))
                .layer(Extension(Arc::new(api.clone())))
                .layer(Extension(config))
                .layer(middleware::from_fn(on_error)),
        );

    Ok((app, api))
}

async fn welcome() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to the Notes API" }))
}

async fn version(Extension(config): Extension<Arc<Config>>) -> impl IntoResponse {
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat() -> impl IntoResponse {
    let mut rng = rand::thread_rng();
    let random: u32 = rng.gen_range(0..=10000);

    Json(json!({
        "status" : "ok",
        "random": random,
    }))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoResponse {
    openapi::Json(api.as_ref()).into_response()
}
