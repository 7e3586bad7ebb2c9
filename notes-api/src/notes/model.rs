use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub type NoteId = i64;

pub const TITLE_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot of a note taken right before an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryEntry {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip)]
    pub note_id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NoteWithHistory {
    #[serde(flatten)]
    pub note: Note,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateNote {
    #[schemars(length(min = 1, max = 255))]
    pub title: String,
    #[schemars(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateNote {
    #[schemars(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[schemars(length(min = 1))]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindNotesQuery {
    /// Number of notes to skip
    #[serde(default, alias = "offset")]
    pub skip: u32,
    /// Page size, 1..=100
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for FindNotesQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u32 {
    100
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindNotesResponse {
    pub results: Vec<Note>,
}

pub(super) fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(Error::Validation("title must not be empty".into()));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(Error::Validation(format!(
            "title must be at most {TITLE_MAX_LENGTH} characters"
        )));
    }
    Ok(())
}

pub(super) fn validate_content(content: &str) -> Result<()> {
    if content.is_empty() {
        return Err(Error::Validation("content must not be empty".into()));
    }
    Ok(())
}

impl CreateNote {
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

impl UpdateNote {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        Ok(())
    }
}

impl FindNotesQuery {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.limit) {
            return Err(Error::Validation("limit must be between 1 and 100".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_note_validation() {
        let valid = CreateNote {
            title: "Title".into(),
            content: "Body".into(),
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateNote {
            title: "".into(),
            content: "Body".into(),
        };
        assert!(matches!(empty_title.validate(), Err(Error::Validation(_))));

        let empty_content = CreateNote {
            title: "Title".into(),
            content: "".into(),
        };
        assert!(matches!(empty_content.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn title_length_counts_characters() {
        assert!(validate_title(&"é".repeat(TITLE_MAX_LENGTH)).is_ok());
        assert!(validate_title(&"a".repeat(TITLE_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateNote::default().validate().is_ok());
        let update = UpdateNote {
            title: Some("".into()),
            content: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn limit_bounds() {
        assert!(FindNotesQuery { skip: 0, limit: 0 }.validate().is_err());
        assert!(FindNotesQuery { skip: 0, limit: 1 }.validate().is_ok());
        assert!(FindNotesQuery { skip: 5, limit: 100 }.validate().is_ok());
        assert!(FindNotesQuery { skip: 0, limit: 101 }.validate().is_err());
    }
}
