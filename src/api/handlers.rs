use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{FoodIntent, Mood, RecommendationRequest, RecommendationResponse, RestaurantRecord},
    services::{copy, parse_food_intent, CatalogQuery},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    pub text: String,
}

/// Query string of the catalog search; list fields are comma separated
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub city: Option<String>,
    pub cuisines: Option<String>,
    pub max_price_level: Option<u8>,
    pub diet: Option<String>,
    pub limit: Option<usize>,
}

impl CatalogParams {
    fn into_query(self) -> CatalogQuery {
        CatalogQuery {
            city: self.city.filter(|c| !c.trim().is_empty()),
            cuisines: split_list(self.cuisines.as_deref()),
            max_price_level: self.max_price_level,
            diet_restrictions: split_list(self.diet.as_deref()),
            limit: self.limit,
        }
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct MoodInsightsResponse {
    pub mood: Mood,
    pub scientific_reasoning: String,
    pub tips: Vec<String>,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        city = %request.city,
        mood = %request.mood,
        cuisine_count = request.cuisines.len(),
        "Processing recommendation request"
    );

    let response = state.engine.recommend(request).await?;

    tracing::info!(
        request_id = %request_id,
        results = response.restaurants.len(),
        "Recommendation request completed"
    );

    Ok(Json(response))
}

/// Parses free text into a food intent
pub async fn parse_intent(Json(request): Json<IntentRequest>) -> Json<FoodIntent> {
    Json(parse_food_intent(&request.text))
}

/// Searches the local catalog directly
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<Vec<RestaurantRecord>>> {
    if params.limit == Some(0) {
        return Err(AppError::InvalidInput("limit must be at least 1".to_string()));
    }
    let records = state.catalog().search(&params.into_query());
    Ok(Json(records))
}

/// Reasoning and tips for one mood tag
pub async fn mood_insights(Path(mood): Path<String>) -> AppResult<Json<MoodInsightsResponse>> {
    let mood: Mood = mood.parse().map_err(AppError::NotFound)?;
    let no_keywords: &[&str] = &[];

    Ok(Json(MoodInsightsResponse {
        mood,
        scientific_reasoning: copy::scientific_reasoning(mood, no_keywords),
        tips: copy::mood_tips(mood),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty_items() {
        assert_eq!(
            split_list(Some(" Italian, ,Cafe ,")),
            vec!["Italian".to_string(), "Cafe".to_string()]
        );
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_blank_city_is_ignored() {
        let query = CatalogParams {
            city: Some("  ".to_string()),
            diet: Some("vegan".to_string()),
            ..Default::default()
        }
        .into_query();

        assert_eq!(query.city, None);
        assert_eq!(query.diet_restrictions, vec!["vegan".to_string()]);
    }
}
