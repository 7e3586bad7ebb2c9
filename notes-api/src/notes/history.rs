//! Append-only log of note snapshots.
//!
//! Rows are only ever written by a note update and removed by a note delete;
//! both callers pass the transaction they run in.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use sea_query::{Expr, Iden, Order, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;

use super::{HistoryEntry, Note, NoteId};

#[derive(Iden)]
pub enum NoteHistory {
    Table,
    Id,
    NoteId,
    Title,
    Content,
    CreatedAt,
}

impl<'a> TryFrom<&Row<'a>> for HistoryEntry {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            note_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

/// Store the note's current title and content as a history entry.
pub fn record(conn: &Connection, note: &Note, at: DateTime<Utc>) -> rusqlite::Result<HistoryEntry> {
    conn.query_row(
        r#"INSERT INTO note_history (note_id, title, content, created_at) VALUES (?, ?, ?, ?)
        RETURNING id, note_id, title, content, created_at"#,
        params![note.id, note.title, note.content, at],
        |row| HistoryEntry::try_from(row),
    )
}

/// Entries of a note, oldest first.
pub fn list(conn: &Connection, note_id: NoteId) -> rusqlite::Result<Vec<HistoryEntry>> {
    let (sql, values) = Query::select()
        .columns([
            NoteHistory::Id,
            NoteHistory::NoteId,
            NoteHistory::Title,
            NoteHistory::Content,
            NoteHistory::CreatedAt,
        ])
        .from(NoteHistory::Table)
        .and_where(Expr::col(NoteHistory::NoteId).eq(note_id))
        .order_by(NoteHistory::CreatedAt, Order::Asc)
        .order_by(NoteHistory::Id, Order::Asc)
        .build_rusqlite(SqliteQueryBuilder);

    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map(&*values.as_params(), |row| HistoryEntry::try_from(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

/// Remove every entry of a note. Returns the number of removed rows.
pub fn purge(conn: &Connection, note_id: NoteId) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM note_history WHERE note_id = ?", params![note_id])
}

pub fn count(conn: &Connection, note_id: NoteId) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT count(*) FROM note_history WHERE note_id = ?",
        params![note_id],
        |row| row.get(0),
    )
}
