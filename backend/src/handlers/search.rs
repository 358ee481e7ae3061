//! City search handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppResult, ErrorKind};
use crate::external::Place;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "citySrch")]
    pub city_srch: Option<String>,
}

/// Up to five places matching `citySrch`
pub async fn search_cities(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Place>>> {
    let text = query
        .city_srch
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| state.errors.error(ErrorKind::MissingSearchQuery))?;

    let places = state.geocoder.search(text).await.map_err(|e| {
        tracing::warn!("City search for {:?} failed: {}", text, e);
        state.errors.error(ErrorKind::GeocodingFailed)
    })?;

    Ok(Json(places))
}
