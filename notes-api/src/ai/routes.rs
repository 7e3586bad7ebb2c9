use axum::extract::State;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::{
    ctx::BaseParams,
    notes::NoteId,
    openapi::{
        aide::{
            axum::{routing::get_with, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Json, Path,
    },
    state::AppState,
};

use super::{handlers, Summarizer};

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteIdPath {
    note_id: NoteId,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/v1/ai/notes/:note_id/summary",
            get_with(summarize_note, |t| t.description("Summarize a note with the configured AI provider.")),
        )
        .api_route(
            "/api/v1/ai/models",
            get_with(list_models, |t| t.description("Models currently offered by the AI provider.")),
        )
        .with_state(state)
}

async fn summarize_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    State(summarizer): State<Summarizer>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::summarize_note(note_id, &summarizer, base).await.map(Json)
}

async fn list_models(State(summarizer): State<Summarizer>) -> impl IntoApiResponse {
    handlers::list_models(&summarizer).await.map(Json)
}
