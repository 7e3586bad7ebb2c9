mod handlers;
mod model;
mod provider;
mod routes;
mod summarizer;

pub use handlers::{list_models, summarize_note};
pub use model::*;
pub use provider::{AiProvider, GeminiProvider, ProviderError};
#[cfg(test)]
pub use summarizer::fake;
pub use summarizer::{build_prompt, select_model, Summarizer, DEFAULT_MODEL};

use crate::{openapi::aide::axum::ApiRouter, state::AppState};

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new().merge(routes::router(state.clone()))
}
