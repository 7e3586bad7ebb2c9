use axum::extract::FromRef;

use crate::{ai::Summarizer, db::DB};

#[derive(FromRef, Clone)]
pub struct AppState {
    pub conn: DB,
    pub summarizer: Summarizer,
}
