use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ATTEMPT_PAGE_SIZE;
use crate::extractors::PathId;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::attempts::Attempt;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/rating", get(get_rating))
        .route("/:id/attempts", get(list_attempts))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RatingResponse {
    student_id: String,
    rating: f64,
}

async fn get_rating(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rating = state.quiz().student_rating(&id).await?;
    Ok(ok(RatingResponse {
        student_id: id,
        rating,
    }))
}

#[derive(Debug, Deserialize)]
struct ListAttemptsQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttemptPage {
    attempts: Vec<Attempt>,
    total: usize,
}

async fn list_attempts(
    State(state): State<AppState>,
    PathId(id): PathId,
    Query(q): Query<ListAttemptsQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = q.limit.unwrap_or(DEFAULT_ATTEMPT_PAGE_SIZE);
    let attempts = state.quiz().attempt_history(&id, limit).await?;
    let total = state.store().count_student_attempts(&id)?;
    Ok(ok(AttemptPage { attempts, total }))
}
