use axum::{
    async_trait,
    extract::{Extension, FromRequestParts},
    http::request::Parts,
    response::Response,
};

use crate::DB;

#[derive(Clone, Debug, FromRequestParts)]
pub struct BaseParams {
    pub ctx: Ctx,
    #[from_request(via(Extension))]
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { db, ctx }
    }
}

/// Per-request context handed to the core operations.
#[derive(Clone, Debug, Default)]
pub struct Ctx {
    pub request_id: Option<String>,
}

impl Ctx {
    pub fn new(request_id: Option<String>) -> Self {
        Self { request_id }
    }

    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or("-")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(Self { request_id })
    }
}
