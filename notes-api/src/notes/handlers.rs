use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use sea_query::{Iden, Order, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;

use crate::{ctx::BaseParams, db, Error, Result};

use super::history;
use super::{CreateNote, FindNotesQuery, FindNotesResponse, HistoryEntry, Note, NoteId, NoteWithHistory, UpdateNote};

#[derive(Iden)]
pub enum Notes {
    Table,
    Id,
    Title,
    Content,
    CreatedAt,
    UpdatedAt,
}

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

pub async fn find_notes(query: FindNotesQuery, BaseParams { db, ctx }: BaseParams) -> Result<FindNotesResponse> {
    query.validate()?;

    db.call(move |conn| {
        let (sql, values) = Query::select()
            .columns([Notes::Id, Notes::Title, Notes::Content, Notes::CreatedAt, Notes::UpdatedAt])
            .from(Notes::Table)
            .order_by(Notes::Id, Order::Asc)
            .limit(query.limit.into())
            .offset(query.skip.into())
            .build_rusqlite(SqliteQueryBuilder);

        let notes = conn
            .prepare(&sql)?
            .query_map(&*values.as_params(), |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(FindNotesResponse { results: notes })
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn create_note(args: CreateNote, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    args.validate()?;
    let CreateNote { title, content } = args;

    let note = db
        .call(move |conn| {
            let now = Utc::now();
            conn.query_row(
                r#"INSERT INTO notes (title, content, created_at, updated_at) VALUES (?, ?, ?, ?)
                RETURNING id, title, content, created_at, updated_at"#,
                params![title, content, now, now],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)?;

    tracing::info!(request_id = ctx.request_id(), note_id = note.id, "note created");
    Ok(note)
}

pub async fn get_note(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    db.call(move |conn| Ok(select_note(conn, note_id)?))
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message("Note not found"))
        .map_err(Error::from)
}

/// Snapshots the current state into the history log and applies the provided fields,
/// both inside one transaction.
pub async fn update_note(note_id: NoteId, args: UpdateNote, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    args.validate()?;

    let note = db
        .call(move |conn| Ok(apply_update(conn, note_id, args, Utc::now())?))
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message("Note not found"))
        .map_err(Error::from)?;

    tracing::info!(request_id = ctx.request_id(), note_id, "note updated");
    Ok(note)
}

/// Removes the note together with its history.
pub async fn delete_note(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let (note, purged) = db
        .call(move |conn| {
            let tx = conn.transaction()?;

            let note = select_note(&tx, note_id)?;
            let purged = history::purge(&tx, note_id)?;
            tx.execute("DELETE FROM notes WHERE id = ?", params![note_id])?;

            tx.commit()?;
            Ok((note, purged))
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message("Note not found"))
        .map_err(Error::from)?;

    tracing::info!(request_id = ctx.request_id(), note_id, purged, "note deleted");
    Ok(note)
}

pub async fn get_history(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<Vec<HistoryEntry>> {
    get_note_with_history(note_id, BaseParams { db, ctx })
        .await
        .map(|n| n.history)
}

pub async fn get_note_with_history(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<NoteWithHistory> {
    db.call(move |conn| {
        let tx = conn.transaction()?;

        let note = select_note(&tx, note_id)?;
        let history = history::list(&tx, note_id)?;

        tx.commit()?;
        Ok(NoteWithHistory { note, history })
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
    .map_err(Error::from)
}

fn select_note(conn: &Connection, note_id: NoteId) -> rusqlite::Result<Note> {
    conn.query_row(
        "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = ?",
        params![note_id],
        |row| Note::try_from(row),
    )
}

fn apply_update(
    conn: &mut Connection,
    note_id: NoteId,
    UpdateNote { title, content }: UpdateNote,
    now: DateTime<Utc>,
) -> rusqlite::Result<Note> {
    let tx = conn.transaction()?;

    let current = select_note(&tx, note_id)?;
    history::record(&tx, &current, now)?;

    let note = tx.query_row(
        r#"UPDATE notes SET title = coalesce(?, title), content = coalesce(?, content), updated_at = ?
        WHERE id = ?
        RETURNING id, title, content, created_at, updated_at"#,
        params![title, content, now, note_id],
        |row| Note::try_from(row),
    )?;

    tx.commit()?;
    Ok(note)
}
