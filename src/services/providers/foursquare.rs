/// Foursquare Places API provider
///
/// API Flow:
/// 1. Place Search: /v3/places/search → restaurants around a lat/lon
///
/// Ratings arrive on a 0-10 scale and prices on a 1-4 scale; both are mapped
/// onto the catalog's 0-5 rating and three budget tiers.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        maps_url, BudgetTier, DietFlag, FsqPlace, FsqSearchResponse, GeoPoint,
        NormalizedRestaurant, RestaurantSource,
    },
    services::providers::{NearbyQuery, PlaceProvider},
};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const RESTAURANT_CATEGORY: &str = "13065";
const DEFAULT_RATING: f64 = 4.0;
const DEFAULT_PRICE: u8 = 2;

#[derive(Clone)]
pub struct FoursquareProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    radius_meters: u32,
    cache: Option<Cache>,
}

impl FoursquareProvider {
    pub fn new(
        cache: Option<Cache>,
        api_key: String,
        api_url: String,
        radius_meters: u32,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key,
            api_url,
            radius_meters,
            cache,
        })
    }

    async fn fetch_places(&self, query: &NearbyQuery) -> AppResult<Vec<NormalizedRestaurant>> {
        let url = format!("{}/v3/places/search", self.api_url.trim_end_matches('/'));
        let ll = format!("{},{}", query.origin.lat, query.origin.lon);
        let search = query.cuisine_hint.as_deref().unwrap_or("restaurant");
        let limit = query.limit.to_string();
        let radius = self.radius_meters.to_string();

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", &self.api_key)
            .header("Accept", "application/json")
            .query(&[
                ("ll", ll.as_str()),
                ("query", search),
                ("categories", RESTAURANT_CATEGORY),
                ("limit", limit.as_str()),
                ("radius", radius.as_str()),
                ("sort", "RELEVANCE"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Foursquare API returned status {}: {}",
                status, body
            )));
        }

        let body: FsqSearchResponse = response.json().await?;
        let places: Vec<NormalizedRestaurant> = body
            .results
            .into_iter()
            .enumerate()
            .filter_map(|(index, place)| normalize_place(place, index, query))
            .collect();

        tracing::info!(count = places.len(), city = %query.city, "Foursquare search completed");

        Ok(places)
    }
}

fn cuisine_tag(category: &str) -> String {
    let trimmed = category.trim();
    trimmed
        .strip_suffix(" Restaurant")
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Maps one Foursquare place into the common shape; unnamed places are dropped
pub fn normalize_place(
    place: FsqPlace,
    index: usize,
    query: &NearbyQuery,
) -> Option<NormalizedRestaurant> {
    let name = place.name.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let diet_flag = if place.categories.iter().any(|c| {
        let lower = c.name.to_lowercase();
        lower.contains("vegetarian") || lower.contains("vegan")
    }) {
        DietFlag::Veg
    } else {
        DietFlag::NonVeg
    };

    let mut cuisine_tags: Vec<String> = place
        .categories
        .iter()
        .map(|c| cuisine_tag(&c.name))
        .filter(|c| !c.is_empty())
        .collect();
    if cuisine_tags.is_empty() {
        cuisine_tags.push("Restaurant".to_string());
    }

    let coordinates = place
        .geocodes
        .and_then(|g| g.main)
        .map(|main| GeoPoint::new(main.latitude, main.longitude))
        .filter(GeoPoint::is_valid);
    let distance_meters = place
        .distance
        .or_else(|| coordinates.map(|point| query.origin.distance_to(&point)));

    let location = place.location;
    let city = location
        .as_ref()
        .and_then(|l| l.locality.clone())
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| query.city.clone());
    let address = location
        .and_then(|l| l.formatted_address.or(l.address))
        .unwrap_or_else(|| "Address not available".to_string());

    let rating = place
        .rating
        .map(|r| (r / 2.0).clamp(0.0, 5.0))
        .unwrap_or(DEFAULT_RATING);
    let budget_tier = BudgetTier::from_level(place.price.unwrap_or(DEFAULT_PRICE));
    let id = place.fsq_id.unwrap_or_else(|| index.to_string());

    Some(NormalizedRestaurant {
        id: format!("fsq_{}", id),
        maps_url: maps_url(&name, &city, Some(query.origin)),
        name,
        city,
        cuisine_tags,
        diet_flag,
        budget_tier,
        rating,
        description: String::new(),
        address,
        coordinates,
        distance_meters,
        source: RestaurantSource::Foursquare,
        price_level_symbol: budget_tier.symbol(),
        avg_cost_for_two: budget_tier.avg_cost_for_two(),
    })
}

#[async_trait::async_trait]
impl PlaceProvider for FoursquareProvider {
    async fn search_nearby(&self, query: &NearbyQuery) -> AppResult<Vec<NormalizedRestaurant>> {
        cached!(
            self.cache.as_ref(),
            CacheKey::place_search(self.name(), query),
            SEARCH_CACHE_TTL,
            self.fetch_places(query)
        )
    }

    fn name(&self) -> &'static str {
        "foursquare"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::test_support::spawn_stub;
    use axum::{http::HeaderMap, routing::get, Json, Router};
    use serde_json::json;

    fn query() -> NearbyQuery {
        NearbyQuery::new(GeoPoint::new(13.0827, 80.2707), "Chennai", &[])
    }

    fn place(value: serde_json::Value) -> FsqPlace {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_rescales_rating_and_price() {
        let normalized = normalize_place(
            place(json!({
                "fsq_id": "abc",
                "name": "Writer's Cafe",
                "categories": [{"name": "Café"}, {"name": "Bakery"}],
                "geocodes": {"main": {"latitude": 13.05, "longitude": 80.25}},
                "location": {"formatted_address": "98 Peters Rd", "locality": "Chennai"},
                "rating": 8.6,
                "price": 4,
                "distance": 1200
            })),
            0,
            &query(),
        )
        .unwrap();

        assert_eq!(normalized.id, "fsq_abc");
        assert!((normalized.rating - 4.3).abs() < 1e-9);
        assert_eq!(normalized.budget_tier, BudgetTier::High);
        assert_eq!(normalized.price_level_symbol, "₹₹₹");
        assert_eq!(normalized.cuisine_tags, vec!["Café", "Bakery"]);
        assert_eq!(normalized.address, "98 Peters Rd");
        assert_eq!(normalized.distance_meters, Some(1200.0));
        assert_eq!(normalized.source, RestaurantSource::Foursquare);
        assert_eq!(normalized.diet_flag, DietFlag::NonVeg);
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let normalized = normalize_place(
            place(json!({
                "name": "Green Leaf",
                "categories": [{"name": "Vegetarian / Vegan Restaurant"}]
            })),
            7,
            &query(),
        )
        .unwrap();

        assert_eq!(normalized.id, "fsq_7");
        assert_eq!(normalized.rating, 4.0);
        assert_eq!(normalized.budget_tier, BudgetTier::Medium);
        assert_eq!(normalized.city, "Chennai");
        assert_eq!(normalized.address, "Address not available");
        assert_eq!(normalized.diet_flag, DietFlag::Veg);
        assert_eq!(normalized.cuisine_tags, vec!["Vegetarian / Vegan"]);
        assert_eq!(normalized.coordinates, None);
        assert_eq!(normalized.distance_meters, None);
    }

    #[test]
    fn test_normalize_drops_unnamed_places() {
        assert!(normalize_place(place(json!({"name": "  "})), 0, &query()).is_none());
    }

    #[tokio::test]
    async fn test_search_nearby_against_stub_server() {
        let router = Router::new().route(
            "/v3/places/search",
            get(|headers: HeaderMap| async move {
                let authorized = headers
                    .get("Authorization")
                    .map(|v| v == "test-key")
                    .unwrap_or(false);
                if !authorized {
                    return Json(json!({"results": []}));
                }
                Json(json!({
                    "results": [
                        {"fsq_id": "1", "name": "Pasta Street", "categories": [{"name": "Italian Restaurant"}], "rating": 9.0},
                        {"fsq_id": "2", "name": "Taco Town", "categories": [{"name": "Mexican Restaurant"}], "price": 1}
                    ]
                }))
            }),
        );
        let base_url = spawn_stub(router).await;

        let provider = FoursquareProvider::new(
            None,
            "test-key".to_string(),
            base_url,
            5000,
            Duration::from_secs(5),
        )
        .unwrap();
        let places = provider.search_nearby(&query()).await.unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].cuisine_tags, vec!["Italian"]);
        assert_eq!(places[0].rating, 4.5);
        assert_eq!(places[1].budget_tier, BudgetTier::Low);
    }

    #[tokio::test]
    async fn test_search_nearby_surfaces_api_errors() {
        let router = Router::new().route(
            "/v3/places/search",
            get(|| async { (axum::http::StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base_url = spawn_stub(router).await;

        let provider =
            FoursquareProvider::new(None, "k".to_string(), base_url, 5000, Duration::from_secs(5))
                .unwrap();
        let err = provider.search_nearby(&query()).await.unwrap_err();

        assert!(matches!(err, AppError::ExternalApi(_)));
    }
}
