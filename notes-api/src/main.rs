mod config;

mod ai;
mod analytics;
mod app;
mod ctx;
mod db;
mod errors;
mod logging;
mod notes;
mod openapi;
mod state;
mod text;

use std::{net::SocketAddr, sync::Arc};

use aide::axum::ApiRouter;
use app::AppParams;
pub use config::Config;
pub use db::{init_db, DB};
pub use errors::{Error, Result};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = Config::from_env()?;

    logging::setup_tracing(config.log_format);

    let conn = init_db(&config.database_url).await?;
    let summarizer = ai::Summarizer::from_config(&config)?;
    let port = config.port;

    let (app, _) = app::create(AppParams {
        db: conn,
        summarizer,
        config: Arc::new(config),
        router: |state| {
            ApiRouter::new()
                .merge(notes::router(state.clone()))
                .merge(analytics::router(state.clone()))
                .merge(ai::router(state))
        },
    })
    .await?;

    let app = logging::add_tracing_layer(app);

    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
