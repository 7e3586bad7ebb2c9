use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::notes::NoteId;

/// Aggregate statistics over all notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Statistics {
    pub total_notes: usize,
    pub total_words: usize,
    pub average_note_length: f64,
    /// Up to five `(word, frequency)` pairs, most frequent first
    pub most_common_words: Vec<(String, usize)>,
    pub top_3_shortest_notes: Vec<NoteId>,
    pub top_3_longest_notes: Vec<NoteId>,
}
