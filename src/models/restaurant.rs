use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::{BudgetTier, DietFlag, RestaurantSource};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside the valid latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance in meters (haversine)
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }
}

/// Lowercases and strips every non-word character, so "AB's - Absolute Barbecue"
/// becomes "absabsolutebarbecue"
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Directions deep link to `name city`, starting from the user's position
pub fn maps_url(name: &str, city: &str, origin: Option<GeoPoint>) -> String {
    let destination = format!("{} {}", name, city).trim().to_string();
    let mut params = vec![("api", "1".to_string())];
    if let Some(origin) = origin {
        params.push(("origin", format!("{},{}", origin.lat, origin.lon)));
    }
    params.push(("destination", destination));

    Url::parse_with_params(MAPS_DIRECTIONS_URL, &params)
        .map(String::from)
        .unwrap_or_else(|_| MAPS_DIRECTIONS_URL.to_string())
}

/// A restaurant as held in the local catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantRecord {
    pub id: String,
    pub name: String,
    /// City, matched case-insensitively against the user's city
    pub location: String,
    /// Never empty; the first tag is the primary cuisine
    pub cuisine_tags: Vec<String>,
    pub diet_flag: DietFlag,
    pub budget_tier: BudgetTier,
    pub rating: f64,
    pub description: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
}

/// A dish recommended at a restaurant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dish {
    pub name: String,
    pub description: String,
}

/// Common shape every source is converted into before filtering and ranking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedRestaurant {
    pub id: String,
    pub name: String,
    pub city: String,
    pub cuisine_tags: Vec<String>,
    pub diet_flag: DietFlag,
    pub budget_tier: BudgetTier,
    pub rating: f64,
    pub description: String,
    pub address: String,
    pub coordinates: Option<GeoPoint>,
    pub distance_meters: Option<f64>,
    pub source: RestaurantSource,
    pub maps_url: String,
    pub price_level_symbol: String,
    pub avg_cost_for_two: u32,
}

impl NormalizedRestaurant {
    /// Converts a catalog record, deriving distance and links relative to the user
    pub fn from_record(record: RestaurantRecord, user: GeoPoint) -> Self {
        let distance_meters = record.coordinates.map(|point| user.distance_to(&point));
        let maps_url = maps_url(&record.name, &record.location, Some(user));
        let address = record
            .address
            .unwrap_or_else(|| format!("{} Center", record.location));

        Self {
            id: format!("local_{}", record.id),
            name: record.name,
            city: record.location,
            cuisine_tags: record.cuisine_tags,
            diet_flag: record.diet_flag,
            budget_tier: record.budget_tier,
            rating: record.rating,
            description: record.description,
            address,
            coordinates: record.coordinates,
            distance_meters,
            source: RestaurantSource::Local,
            maps_url,
            price_level_symbol: record.budget_tier.symbol(),
            avg_cost_for_two: record.budget_tier.avg_cost_for_two(),
        }
    }

    /// Two entries are the same restaurant iff this key matches
    pub fn dedupe_key(&self) -> (String, String) {
        (normalize_name(&self.name), self.city.trim().to_lowercase())
    }

    pub fn primary_cuisine(&self) -> &str {
        self.cuisine_tags
            .first()
            .map(String::as_str)
            .unwrap_or("Restaurant")
    }

    pub fn price_level(&self) -> u8 {
        self.budget_tier.level()
    }
}

/// Final output unit of the recommendation engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedRestaurant {
    #[serde(flatten)]
    pub restaurant: NormalizedRestaurant,
    pub dishes: Vec<Dish>,
    pub mood_boost: String,
    pub nutrition_insight: String,
    pub energy_badge: String,
    pub why_this_place: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playful_reason: Option<String>,
}

/// One row of a Zomato/Kaggle-style restaurant dataset export
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRow {
    #[serde(rename = "Restaurant ID", default)]
    pub restaurant_id: Option<serde_json::Value>,
    #[serde(rename = "Restaurant Name", default)]
    pub name: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "Cuisines", default)]
    pub cuisines: Option<String>,
    #[serde(rename = "Aggregate rating", default)]
    pub rating: Option<f64>,
    #[serde(rename = "Price range", default)]
    pub price_range: Option<u8>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "Locality", default)]
    pub locality: Option<String>,
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<f64>,
}

impl DatasetRow {
    const DEFAULT_RATING: f64 = 4.0;

    /// Converts a dataset row into a catalog record.
    ///
    /// Rows without a name or with zero/missing coordinates are rejected. Diet is
    /// unknown in these datasets, so rows are never flagged vegetarian.
    pub fn into_record(self, index: usize) -> Option<RestaurantRecord> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let lat = self.latitude.filter(|v| *v != 0.0)?;
        let lon = self.longitude.filter(|v| *v != 0.0)?;

        let id = match self.restaurant_id {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => index.to_string(),
        };

        let mut cuisine_tags: Vec<String> = self
            .cuisines
            .unwrap_or_default()
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if cuisine_tags.is_empty() {
            cuisine_tags.push("Restaurant".to_string());
        }

        let rating = self
            .rating
            .filter(|r| *r > 0.0)
            .map(|r| r.min(5.0))
            .unwrap_or(Self::DEFAULT_RATING);

        Some(RestaurantRecord {
            id: format!("dataset_{}", id),
            name: name.trim().to_string(),
            location: self.city.unwrap_or_default().trim().to_string(),
            cuisine_tags,
            diet_flag: DietFlag::NonVeg,
            budget_tier: BudgetTier::from_level(self.price_range.unwrap_or(2)),
            rating,
            description: String::new(),
            address: self.address.or(self.locality),
            coordinates: Some(GeoPoint::new(lat, lon)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> RestaurantRecord {
        RestaurantRecord {
            id: "12".to_string(),
            name: "Toscano".to_string(),
            location: "Chennai".to_string(),
            cuisine_tags: vec!["Italian".to_string(), "Continental".to_string()],
            diet_flag: DietFlag::Veg,
            budget_tier: BudgetTier::High,
            rating: 4.6,
            description: "Premium pizzas, pastas and Italian desserts.".to_string(),
            address: None,
            coordinates: None,
        }
    }

    #[test]
    fn test_normalize_name_strips_punctuation() {
        assert_eq!(normalize_name("AB's - Absolute Barbecue"), "absabsolutebarbecue");
        assert_eq!(normalize_name("Domino's Pizza"), "dominospizza");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Chennai Central to Bangalore City railway stations, roughly 290 km
        let chennai = GeoPoint::new(13.0827, 80.2707);
        let bangalore = GeoPoint::new(12.9716, 77.5946);
        let distance = chennai.distance_to(&bangalore);
        assert!(distance > 280_000.0 && distance < 300_000.0);
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let point = GeoPoint::new(11.0168, 76.9558);
        assert!(point.distance_to(&point).abs() < 1e-6);
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(13.0, 80.0).is_valid());
        assert!(!GeoPoint::new(91.0, 80.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 80.0).is_valid());
    }

    #[test]
    fn test_maps_url_encodes_destination() {
        let url = maps_url("Toscano", "Chennai", Some(GeoPoint::new(13.0, 80.0)));
        assert!(url.starts_with("https://www.google.com/maps/dir/?api=1"));
        assert!(url.contains("destination=Toscano+Chennai"));
        assert!(url.contains("origin=13%2C80"));
    }

    #[test]
    fn test_from_record_without_coordinates() {
        let user = GeoPoint::new(13.0827, 80.2707);
        let normalized = NormalizedRestaurant::from_record(sample_record(), user);

        assert_eq!(normalized.id, "local_12");
        assert_eq!(normalized.city, "Chennai");
        assert_eq!(normalized.source, RestaurantSource::Local);
        assert_eq!(normalized.price_level_symbol, "₹₹₹");
        assert_eq!(normalized.avg_cost_for_two, 1500);
        assert_eq!(normalized.distance_meters, None);
        assert_eq!(normalized.address, "Chennai Center");
        assert_eq!(normalized.primary_cuisine(), "Italian");
    }

    #[test]
    fn test_from_record_with_coordinates_has_distance() {
        let mut record = sample_record();
        record.coordinates = Some(GeoPoint::new(13.0600, 80.2500));
        let normalized = NormalizedRestaurant::from_record(record, GeoPoint::new(13.0827, 80.2707));

        let distance = normalized.distance_meters.unwrap();
        assert!(distance > 2_000.0 && distance < 4_000.0);
    }

    #[test]
    fn test_dedupe_key_ignores_case_and_punctuation() {
        let user = GeoPoint::new(13.0, 80.0);
        let a = NormalizedRestaurant::from_record(sample_record(), user);
        let mut other = sample_record();
        other.name = "TOSCANO!".to_string();
        other.location = " chennai ".to_string();
        let b = NormalizedRestaurant::from_record(other, user);

        assert_eq!(a.dedupe_key(), b.dedupe_key());
    }

    #[test]
    fn test_enriched_restaurant_flattens_fields() {
        let enriched = EnrichedRestaurant {
            restaurant: NormalizedRestaurant::from_record(sample_record(), GeoPoint::new(13.0, 80.0)),
            dishes: vec![Dish {
                name: "Lasagna".to_string(),
                description: "Layered pasta with rich cheese and sauce".to_string(),
            }],
            mood_boost: "Perfect for celebrating!".to_string(),
            nutrition_insight: "Balanced nutrition".to_string(),
            energy_badge: "🌟 Celebration".to_string(),
            why_this_place: "Celebratory vibes to match your mood. Highly rated Italian spot."
                .to_string(),
            playful_reason: None,
        };

        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["name"], "Toscano");
        assert_eq!(value["source"], "local");
        assert_eq!(value["dishes"][0]["name"], "Lasagna");
        assert!(value.get("playful_reason").is_none());
    }

    #[test]
    fn test_dataset_row_into_record() {
        let json = r#"{
            "Restaurant ID": 6317637,
            "Restaurant Name": "Le Petit Souffle",
            "City": "Makati City",
            "Cuisines": "French, Japanese, Desserts",
            "Aggregate rating": 4.8,
            "Price range": 3,
            "Address": "Third Floor, Century City Mall",
            "Latitude": 14.565443,
            "Longitude": 121.027535
        }"#;

        let row: DatasetRow = serde_json::from_str(json).unwrap();
        let record = row.into_record(0).unwrap();

        assert_eq!(record.id, "dataset_6317637");
        assert_eq!(record.cuisine_tags, vec!["French", "Japanese", "Desserts"]);
        assert_eq!(record.budget_tier, BudgetTier::High);
        assert_eq!(record.diet_flag, DietFlag::NonVeg);
        assert_eq!(record.rating, 4.8);
    }

    #[test]
    fn test_dataset_row_without_coordinates_is_rejected() {
        let json = r#"{"Restaurant Name": "Nowhere Diner", "Latitude": 0, "Longitude": 0}"#;
        let row: DatasetRow = serde_json::from_str(json).unwrap();
        assert!(row.into_record(3).is_none());
    }

    #[test]
    fn test_dataset_row_missing_rating_is_synthesized() {
        let json = r#"{
            "Restaurant Name": "Corner Cafe",
            "City": "Chennai",
            "Aggregate rating": 0,
            "Latitude": 13.05,
            "Longitude": 80.24
        }"#;
        let row: DatasetRow = serde_json::from_str(json).unwrap();
        let record = row.into_record(7).unwrap();

        assert_eq!(record.id, "dataset_7");
        assert_eq!(record.rating, 4.0);
        assert_eq!(record.cuisine_tags, vec!["Restaurant"]);
        assert_eq!(record.budget_tier, BudgetTier::Medium);
    }
}
