use sea_query::{Order, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;

use crate::{
    ctx::BaseParams,
    db,
    notes::{NoteId, Notes},
    text::EnglishTokenizer,
    Error, Result,
};

use super::{Engine, Statistics};

/// Loads the whole corpus and computes its statistics.
pub async fn analyze(BaseParams { db, ctx }: BaseParams) -> Result<Statistics> {
    let corpus = db
        .call(|conn| {
            let (sql, values) = Query::select()
                .columns([Notes::Id, Notes::Content])
                .from(Notes::Table)
                .order_by(Notes::Id, Order::Asc)
                .build_rusqlite(SqliteQueryBuilder);

            let corpus = conn
                .prepare(&sql)?
                .query_map(&*values.as_params(), |row| Ok((row.get::<_, NoteId>(0)?, row.get::<_, String>(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(corpus)
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)?;

    tracing::debug!(request_id = ctx.request_id(), notes = corpus.len(), "analyzing notes");

    Ok(Engine::new(&EnglishTokenizer).analyze(&corpus))
}
