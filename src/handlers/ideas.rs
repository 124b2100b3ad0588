use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::{json_body, parse_id, AppState};
use crate::error::AppError;
use crate::metrics;
use crate::models::marketplace::{Idea, NewIdea};

/// Handle GET /api/ideas
pub async fn list_ideas(State(state): State<AppState>) -> Json<Vec<Idea>> {
    Json(state.storage.list_ideas())
}

/// Handle POST /api/ideas
pub async fn create_idea(
    State(state): State<AppState>,
    payload: Result<Json<NewIdea>, JsonRejection>,
) -> Result<(StatusCode, Json<Idea>), AppError> {
    let idea = json_body(payload)?;

    let missing: Vec<&str> = [
        ("title", &idea.title),
        ("description", &idea.description),
        ("author", &idea.author),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Required fields missing: {}",
            missing.join(", ")
        )));
    }

    let idea = state.storage.create_idea(idea);
    metrics::record_created("idea");
    Ok((StatusCode::CREATED, Json(idea)))
}

/// Handle POST /api/ideas/{id}/vote
pub async fn vote_for_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Idea>, AppError> {
    let id = parse_id(&id, "idea")?;
    state
        .storage
        .like_idea(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Idea not found".to_string()))
}
