use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::notes::NoteId;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NoteSummary {
    pub note_id: NoteId,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}
