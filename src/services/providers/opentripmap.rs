/// OpenTripMap places provider
///
/// Uses the radius search only; the per-place detail endpoint is not called.
/// `rate` is a 0-3 popularity score mapped to `min(5, rate + 1)`.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        maps_url, BudgetTier, DietFlag, GeoPoint, NormalizedRestaurant, OtmPlace,
        RestaurantSource,
    },
    services::providers::{NearbyQuery, PlaceProvider},
};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const PLACE_KINDS: &str = "cafes,restaurants,fast_food";
const MIN_POPULARITY: &str = "3";
const DEFAULT_RATING: f64 = 4.0;

#[derive(Clone)]
pub struct OpenTripMapProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    radius_meters: u32,
    cache: Option<Cache>,
}

impl OpenTripMapProvider {
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
        let url = format!("{}/0.1/en/places/radius", self.api_url.trim_end_matches('/'));
        let radius = self.radius_meters.to_string();
        let lat = query.origin.lat.to_string();
        let lon = query.origin.lon.to_string();
        let limit = query.limit.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("radius", radius.as_str()),
                ("lon", lon.as_str()),
                ("lat", lat.as_str()),
                ("kinds", PLACE_KINDS),
                ("rate", MIN_POPULARITY),
                ("limit", limit.as_str()),
                ("format", "json"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OpenTripMap API returned status {}: {}",
                status, body
            )));
        }

        let body: Vec<OtmPlace> = response.json().await?;
        let places: Vec<NormalizedRestaurant> = body
            .into_iter()
            .filter_map(|place| normalize_place(place, query))
            .collect();

        tracing::info!(count = places.len(), city = %query.city, "OpenTripMap search completed");

        Ok(places)
    }
}

/// First entry of a comma-separated `kinds` list, underscores as spaces
fn cuisine_from_kinds(kinds: Option<&str>) -> String {
    kinds
        .and_then(|k| k.split(',').next())
        .map(|k| k.trim().replace('_', " "))
        .filter(|k| !k.is_empty())
        .map(|k| {
            let mut chars = k.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => k,
            }
        })
        .unwrap_or_else(|| "Restaurant".to_string())
}

/// Maps one OpenTripMap place into the common shape; unnamed places are dropped
pub fn normalize_place(place: OtmPlace, query: &NearbyQuery) -> Option<NormalizedRestaurant> {
    let name = place.name.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let coordinates = place
        .point
        .map(|p| GeoPoint::new(p.lat, p.lon))
        .filter(GeoPoint::is_valid);
    let distance_meters = place
        .dist
        .or_else(|| coordinates.map(|point| query.origin.distance_to(&point)));
    let rating = place
        .rate
        .map(|r| (r + 1.0).min(5.0))
        .unwrap_or(DEFAULT_RATING);
    let budget_tier = BudgetTier::Medium;

    Some(NormalizedRestaurant {
        id: format!("otm_{}", place.xid),
        maps_url: maps_url(&name, &query.city, Some(query.origin)),
        city: query.city.clone(),
        cuisine_tags: vec![cuisine_from_kinds(place.kinds.as_deref())],
        name,
        diet_flag: DietFlag::NonVeg,
        budget_tier,
        rating,
        description: String::new(),
        address: query.city.clone(),
        coordinates,
        distance_meters,
        source: RestaurantSource::OpenTripMap,
        price_level_symbol: budget_tier.symbol(),
        avg_cost_for_two: budget_tier.avg_cost_for_two(),
    })
}

#[async_trait::async_trait]
impl PlaceProvider for OpenTripMapProvider {
    async fn search_nearby(&self, query: &NearbyQuery) -> AppResult<Vec<NormalizedRestaurant>> {
        cached!(
            self.cache.as_ref(),
            CacheKey::place_search(self.name(), query),
            SEARCH_CACHE_TTL,
            self.fetch_places(query)
        )
    }

    fn name(&self) -> &'static str {
        "opentripmap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::test_support::spawn_stub;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn query() -> NearbyQuery {
        NearbyQuery::new(GeoPoint::new(12.9716, 77.5946), "Bangalore", &[])
    }

    fn place(value: serde_json::Value) -> OtmPlace {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_rate_maps_to_rating() {
        let normalized = normalize_place(
            place(json!({
                "xid": "N123",
                "name": "Koshy's",
                "point": {"lat": 12.975, "lon": 77.601},
                "rate": 3,
                "kinds": "restaurants,foods,interesting_places",
                "dist": 640.5
            })),
            &query(),
        )
        .unwrap();

        assert_eq!(normalized.id, "otm_N123");
        assert_eq!(normalized.rating, 4.0);
        assert_eq!(normalized.cuisine_tags, vec!["Restaurants"]);
        assert_eq!(normalized.distance_meters, Some(640.5));
        assert_eq!(normalized.source, RestaurantSource::OpenTripMap);
        assert_eq!(normalized.city, "Bangalore");
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let normalized = normalize_place(
            place(json!({"xid": "W9", "name": "Corner Stop", "kinds": "fast_food"})),
            &query(),
        )
        .unwrap();

        assert_eq!(normalized.rating, 4.0);
        assert_eq!(normalized.cuisine_tags, vec!["Fast food"]);
        assert_eq!(normalized.coordinates, None);
        assert_eq!(normalized.budget_tier, BudgetTier::Medium);
    }

    #[test]
    fn test_unnamed_places_are_dropped() {
        assert!(normalize_place(place(json!({"xid": "X", "name": ""})), &query()).is_none());
    }

    #[test]
    fn test_cuisine_from_kinds() {
        assert_eq!(cuisine_from_kinds(Some("cafes,foods")), "Cafes");
        assert_eq!(cuisine_from_kinds(Some("")), "Restaurant");
        assert_eq!(cuisine_from_kinds(None), "Restaurant");
    }

    #[tokio::test]
    async fn test_search_nearby_sends_key_and_parses_array() {
        let router = Router::new().route(
            "/0.1/en/places/radius",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("apikey").map(String::as_str) != Some("otm-key")
                    || params.get("format").map(String::as_str) != Some("json")
                {
                    return Json(json!([]));
                }
                Json(json!([
                    {"xid": "A", "name": "Cafe Noir", "rate": 2, "kinds": "cafes"},
                    {"xid": "B", "name": "", "rate": 1, "kinds": "restaurants"}
                ]))
            }),
        );
        let base_url = spawn_stub(router).await;

        let provider = OpenTripMapProvider::new(
            None,
            "otm-key".to_string(),
            base_url,
            5000,
            Duration::from_secs(5),
        )
        .unwrap();
        let places = provider.search_nearby(&query()).await.unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Cafe Noir");
        assert_eq!(places[0].rating, 3.0);
    }
}
