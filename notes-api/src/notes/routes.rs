use crate::{
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{
                routing::{get, get_with},
                ApiRouter, IntoApiResponse,
            },
            NoApi,
        },
        Json, Path, Query,
    },
    state::AppState,
};
use axum::http::StatusCode;

use schemars::JsonSchema;

use serde::Deserialize;

use super::{handlers, CreateNote, FindNotesQuery, Note, NoteId, NoteWithHistory, UpdateNote};

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteIdPath {
    note_id: NoteId,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/v1/notes",
            get(find_notes).post_with(create_note, |t| t.response::<201, Json<Note>>()),
        )
        .api_route(
            "/api/v1/notes/:note_id",
            get(get_note)
                .put(update_note)
                .patch(update_note)
                .delete_with(delete_note, |t| t.response::<204, ()>()),
        )
        .api_route(
            "/api/v1/notes/:note_id/history",
            get_with(get_note_history, |t| t.description("A note with its previous versions, oldest first.")),
        )
        .with_state(state)
}

async fn find_notes(NoApi(base): NoApi<BaseParams>, Query(query): Query<FindNotesQuery>) -> impl IntoApiResponse {
    handlers::find_notes(query, base).await.map(Json)
}

async fn create_note(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateNote>) -> impl IntoApiResponse {
    handlers::create_note(args, base)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn get_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::get_note(note_id, base).await.map(Json)
}

async fn update_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<UpdateNote>,
) -> impl IntoApiResponse {
    handlers::update_note(note_id, args, base).await.map(Json)
}

async fn delete_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::delete_note(note_id, base)
        .await
        .map(|_| (StatusCode::NO_CONTENT, ()))
}

async fn get_note_history(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::get_note_with_history(note_id, base)
        .await
        .map(Json::<NoteWithHistory>)
}

#[cfg(test)]
mod tests {
    use crate::{
        db::{init_test_db, DB},
        errors::Result,
        notes::{FindNotesResponse, Note, NoteWithHistory},
    };
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn seed(db: &DB) {
        db.call(|conn| {
            conn.execute_batch(
                r#"
                INSERT INTO notes (title, content, created_at, updated_at) VALUES ('first', '1', '2024-01-01 00:00:00+00:00', '2024-01-01 00:00:00+00:00');
                INSERT INTO notes (title, content, created_at, updated_at) VALUES ('second', '2', '2024-01-01 00:00:00+00:00', '2024-01-01 00:00:00+00:00');
                INSERT INTO notes (title, content, created_at, updated_at) VALUES ('third', '3', '2024-01-01 00:00:00+00:00', '2024-01-01 00:00:00+00:00');
                "#,
            )?;
            Ok(())
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn find_notes() -> Result<()> {
        let db = init_test_db().await?;
        seed(&db).await;

        let server = test_server(db).await?;
        let response = server.get("/api/v1/notes").await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<FindNotesResponse>().results.len(), 3);

        let response = server.get("/api/v1/notes").add_query_param("skip", 1).add_query_param("limit", 1).await;
        let results = response.json::<FindNotesResponse>().results;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "second");
        Ok(())
    }

    #[tokio::test]
    async fn find_notes_rejects_bad_limit() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server.get("/api/v1/notes").add_query_param("limit", 101).await;
        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<Value>()["error"], "validation");

        let response = server.get("/api/v1/notes").add_query_param("skip", -1).await;
        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<Value>()["error"], "query_validation");
        Ok(())
    }

    #[tokio::test]
    async fn create_note() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server
            .post("/api/v1/notes")
            .json(&json!({
                "title": "Test Note",
                "content": "Test content."
            }))
            .await;

        assert_eq!(response.status_code(), 201);
        let note = response.json::<Note>();
        assert_eq!(note.title, "Test Note");
        assert_eq!(note.content, "Test content.");
        Ok(())
    }

    #[tokio::test]
    async fn create_note_validation() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server
            .post("/api/v1/notes")
            .json(&json!({ "title": "", "content": "x" }))
            .await;
        assert_eq!(response.status_code(), 400);

        let response = server
            .post("/api/v1/notes")
            .json(&json!({ "title": "t".repeat(256), "content": "x" }))
            .await;
        assert_eq!(response.status_code(), 400);

        let response = server.post("/api/v1/notes").json(&json!({ "title": "t" })).await;
        assert_eq!(response.status_code(), 400);
        Ok(())
    }

    #[tokio::test]
    async fn get_note() -> Result<()> {
        let db = init_test_db().await?;
        seed(&db).await;

        let server = test_server(db).await?;
        let response = server.get("/api/v1/notes/1").await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Note>().title, "first");

        let response = server.get("/api/v1/notes/404").await;
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<Value>()["message"], "Note not found");

        let response = server.get("/api/v1/notes/abc").await;
        assert_eq!(response.status_code(), 400);
        Ok(())
    }

    #[tokio::test]
    async fn update_note() -> Result<()> {
        let db = init_test_db().await?;
        seed(&db).await;

        let server = test_server(db).await?;
        let response = server
            .patch("/api/v1/notes/1")
            .json(&json!({
                "content": "2",
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Note>().title, "first");
        assert_eq!(response.json::<Note>().content, "2");

        let response = server
            .put("/api/v1/notes/1")
            .json(&json!({ "title": "Updated", "content": "Updated content" }))
            .await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Note>().title, "Updated");

        let response = server.put("/api/v1/notes/99").json(&json!({ "title": "x" })).await;
        assert_eq!(response.status_code(), 404);
        Ok(())
    }

    #[tokio::test]
    async fn note_history() -> Result<()> {
        let db = init_test_db().await?;
        seed(&db).await;

        let server = test_server(db).await?;
        server.put("/api/v1/notes/1").json(&json!({ "title": "v2" })).await;
        server.put("/api/v1/notes/1").json(&json!({ "content": "v3" })).await;

        let response = server.get("/api/v1/notes/1/history").await;
        assert_eq!(response.status_code(), 200);

        let body = response.json::<NoteWithHistory>();
        assert_eq!(body.note.title, "v2");
        assert_eq!(body.note.content, "v3");
        assert_eq!(body.history.len(), 2);
        assert_eq!((body.history[0].title.as_str(), body.history[0].content.as_str()), ("first", "1"));
        assert_eq!((body.history[1].title.as_str(), body.history[1].content.as_str()), ("v2", "1"));

        let raw = response.json::<Value>();
        assert_eq!(raw["id"], 1);
        assert!(raw["history"][0].get("note_id").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_note() -> Result<()> {
        let db = init_test_db().await?;
        seed(&db).await;

        let server = test_server(db.clone()).await?;
        server.put("/api/v1/notes/1").json(&json!({ "title": "changed" })).await;

        let response = server.delete("/api/v1/notes/1").await;
        assert_eq!(response.status_code(), 204);

        assert_eq!(server.get("/api/v1/notes/1").await.status_code(), 404);
        assert_eq!(server.get("/api/v1/notes/1/history").await.status_code(), 404);
        assert_eq!(server.delete("/api/v1/notes/1").await.status_code(), 404);

        let (notes, history) = db
            .call(|conn| {
                let notes = conn.query_row::<u32, _, _>("select count(*) from notes", [], |r| r.get(0))?;
                let history = conn.query_row::<u32, _, _>("select count(*) from note_history", [], |r| r.get(0))?;
                Ok((notes, history))
            })
            .await
            .unwrap();

        assert_eq!(notes, 2);
        assert_eq!(history, 0);

        Ok(())
    }

    async fn test_server(db: DB) -> Result<TestServer> {
        crate::tests::test_server(db, super::router).await
    }
}
