use crate::{ctx::BaseParams, notes, notes::NoteId, Result};

use super::{ModelsResponse, NoteSummary, Summarizer};

pub async fn summarize_note(note_id: NoteId, summarizer: &Summarizer, base: BaseParams) -> Result<NoteSummary> {
    let request_id = base.ctx.request_id().to_string();
    let note = notes::get_note(note_id, base).await?;

    let summary = summarizer.summarize(&note.title, &note.content).await?;
    tracing::info!(request_id = %request_id, note_id, "note summarized");

    Ok(NoteSummary {
        note_id: note.id,
        summary,
    })
}

pub async fn list_models(summarizer: &Summarizer) -> Result<ModelsResponse> {
    let models = summarizer.available_models().await?;
    Ok(ModelsResponse { models })
}
