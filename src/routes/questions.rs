use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;

use crate::extractors::{JsonBody, PathId};
use crate::quiz::types::{NewQuestion, PublicQuestion};
use crate::response::{created, ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_question))
        .route("/:id", get(get_question))
}

async fn create_question(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewQuestion>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let question = state.quiz().create_question(req).await?;
    Ok(created(PublicQuestion::from(&question)))
}

async fn get_question(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let question = state.quiz().question(&id).await?;
    Ok(ok(question))
}
