use crate::{
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{routing::get_with, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Json,
    },
    state::AppState,
};

use super::handlers;

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/v1/analytics/notes",
            get_with(analyze_notes, |t| t.description("Word statistics over all notes.")),
        )
        .with_state(state)
}

async fn analyze_notes(NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::analyze(base).await.map(Json)
}

#[cfg(test)]
mod tests {
    use crate::{
        analytics::Statistics,
        db::{init_test_db, DB},
        errors::Result,
        notes,
        openapi::aide::axum::ApiRouter,
    };
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn test_server(db: DB) -> Result<TestServer> {
        crate::tests::test_server(db, |state| {
            ApiRouter::new()
                .merge(notes::router(state.clone()))
                .merge(super::router(state))
        })
        .await
    }

    #[tokio::test]
    async fn analyze_empty() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server.get("/api/v1/analytics/notes").await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(
            response.json::<Value>(),
            json!({
                "total_notes": 0,
                "total_words": 0,
                "average_note_length": 0.0,
                "most_common_words": [],
                "top_3_shortest_notes": [],
                "top_3_longest_notes": []
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn analyze_notes() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        for (title, content) in [
            ("Short Note", "Short."),
            ("Medium Note", "This is a medium length note with several words."),
            (
                "Long Note",
                "This is a much longer note with many more words. It should have the highest word count among all the notes we've created for this test. We need to make sure it has significantly more words than the others.",
            ),
        ] {
            let response = server
                .post("/api/v1/notes")
                .json(&json!({ "title": title, "content": content }))
                .await;
            assert_eq!(response.status_code(), 201);
        }

        let response = server.get("/api/v1/analytics/notes").await;
        assert_eq!(response.status_code(), 200);

        let stats = response.json::<Statistics>();
        assert_eq!(stats.total_notes, 3);
        assert_eq!(stats.total_words, 49);
        assert!((stats.average_note_length - 16.33).abs() < 0.01);
        assert_eq!(stats.most_common_words[0], ("words".to_string(), 3));
        assert_eq!(stats.top_3_shortest_notes[0], 1);
        assert_eq!(stats.top_3_longest_notes.last(), Some(&3));

        let raw = response.json::<Value>();
        assert_eq!(raw["most_common_words"][0], json!(["words", 3]));
        Ok(())
    }
}
