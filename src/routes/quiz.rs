use axum::extract::State;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;

use crate::extractors::JsonBody;
use crate::quiz::types::AnswerSubmission;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/next-question", post(next_question))
        .route("/answers", post(submit_answer))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextQuestionRequest {
    student_id: String,
    topic_id: String,
}

async fn next_question(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NextQuestionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let question = state
        .quiz()
        .next_question(&req.student_id, &req.topic_id)
        .await?;
    Ok(ok(question))
}

async fn submit_answer(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnswerSubmission>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let outcome = state.quiz().submit_answer(req).await?;
    Ok(ok(outcome))
}
