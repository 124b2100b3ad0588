use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::models::marketplace::Subsidy;

#[derive(Debug, Default, Deserialize)]
pub struct SubsidyQuery {
    pub state: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
}

fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "all")
}

/// Handle GET /api/subsidies
///
/// A state other than `all` takes precedence, then category, then search.
pub async fn list_subsidies(
    State(app): State<AppState>,
    Query(query): Query<SubsidyQuery>,
) -> Json<Vec<Subsidy>> {
    let subsidies = if let Some(state) = selected(&query.state) {
        app.storage.subsidies_by_state(state)
    } else if let Some(category) = selected(&query.category) {
        app.storage.subsidies_by_category(category)
    } else if let Some(term) = selected(&query.q) {
        app.storage.search_subsidies(term)
    } else {
        app.storage.list_subsidies()
    };
    Json(subsidies)
}

/// Handle GET /api/subsidies/category/{category}
pub async fn subsidies_by_category(
    State(app): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<Subsidy>> {
    Json(app.storage.subsidies_by_category(&category))
}
