use indexmap::IndexMap;

use crate::{
    notes::NoteId,
    text::{word_count, Tokenizer},
};

use super::Statistics;

pub const MOST_COMMON_WORDS: usize = 5;
pub const TOP_NOTES: usize = 3;

/// Computes corpus statistics from `(id, content)` pairs.
pub struct Engine<'a, T: Tokenizer + ?Sized> {
    tokenizer: &'a T,
}

impl<'a, T: Tokenizer + ?Sized> Engine<'a, T> {
    pub fn new(tokenizer: &'a T) -> Self {
        Self { tokenizer }
    }

    pub fn analyze(&self, notes: &[(NoteId, String)]) -> Statistics {
        if notes.is_empty() {
            return Statistics::default();
        }

        let counts: Vec<(NoteId, usize)> = notes.iter().map(|(id, content)| (*id, word_count(content))).collect();
        let total_words: usize = counts.iter().map(|(_, count)| count).sum();

        Statistics {
            total_notes: notes.len(),
            total_words,
            average_note_length: total_words as f64 / notes.len() as f64,
            most_common_words: self.most_common_words(notes),
            top_3_shortest_notes: shortest(&counts),
            top_3_longest_notes: longest(&counts),
        }
    }

    fn most_common_words(&self, notes: &[(NoteId, String)]) -> Vec<(String, usize)> {
        let text = notes.iter().map(|(_, content)| content.as_str()).collect::<Vec<_>>().join(" ");

        let mut frequencies: IndexMap<String, usize> = IndexMap::new();
        for word in self.tokenizer.words(&text) {
            *frequencies.entry(word).or_insert(0) += 1;
        }

        // stable: equal counts keep first-seen order
        let mut ranked: Vec<(String, usize)> = frequencies.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(MOST_COMMON_WORDS);
        ranked
    }
}

fn sorted_by_length(counts: &[(NoteId, usize)]) -> Vec<NoteId> {
    let mut sorted = counts.to_vec();
    sorted.sort_by_key(|(_, count)| *count);
    sorted.into_iter().map(|(id, _)| id).collect()
}

/// Ids of the shortest notes, shortest first.
fn shortest(counts: &[(NoteId, usize)]) -> Vec<NoteId> {
    sorted_by_length(counts).into_iter().take(TOP_NOTES).collect()
}

/// Ids of the longest notes in ascending length order, so the longest comes last.
fn longest(counts: &[(NoteId, usize)]) -> Vec<NoteId> {
    let sorted = sorted_by_length(counts);
    let skip = sorted.len().saturating_sub(TOP_NOTES);
    sorted.into_iter().skip(skip).collect()
}
