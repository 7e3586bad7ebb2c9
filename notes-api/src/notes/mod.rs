mod handlers;
mod history;
mod model;
mod routes;

pub use handlers::{
    create_note, delete_note, find_notes, get_history, get_note, get_note_with_history, update_note, Notes,
};
pub use model::*;

use crate::{openapi::aide::axum::ApiRouter, state::AppState};

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new().merge(routes::router(state.clone()))
}
