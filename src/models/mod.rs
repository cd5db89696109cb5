use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

mod intent;
mod restaurant;

pub use intent::{FoodIntent, PriceConstraint};
pub use restaurant::{
    maps_url, normalize_name, DatasetRow, Dish, EnrichedRestaurant, GeoPoint,
    NormalizedRestaurant, RestaurantRecord,
};

/// Closed set of mood tags driving copy and nutrition framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Happy,
    Calm,
    Stressed,
    Tired,
    Energetic,
    Pms,
    Anxious,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Stressed,
        Mood::Tired,
        Mood::Energetic,
        Mood::Pms,
        Mood::Anxious,
        Mood::Sad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Calm => "calm",
            Mood::Stressed => "stressed",
            Mood::Tired => "tired",
            Mood::Energetic => "energetic",
            Mood::Pms => "pms",
            Mood::Anxious => "anxious",
            Mood::Sad => "sad",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Mood::ALL
            .iter()
            .copied()
            .find(|mood| mood.as_str() == lower)
            .ok_or_else(|| format!("Unknown mood: {}", s))
    }
}

/// Budget tier of a restaurant, mapped to a numeric price level of 1-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BudgetTier {
    Low,
    Medium,
    High,
}

impl BudgetTier {
    const CURRENCY_GLYPH: &'static str = "₹";

    pub fn level(&self) -> u8 {
        match self {
            BudgetTier::Low => 1,
            BudgetTier::Medium => 2,
            BudgetTier::High => 3,
        }
    }

    /// Levels above 3 (e.g. Foursquare's 4) collapse into High
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => BudgetTier::Low,
            2 => BudgetTier::Medium,
            _ => BudgetTier::High,
        }
    }

    /// Currency glyphs repeated once per price level
    pub fn symbol(&self) -> String {
        Self::CURRENCY_GLYPH.repeat(self.level() as usize)
    }

    /// Inclusive cost-for-two range in rupees
    pub fn cost_range(&self) -> (u32, u32) {
        match self {
            BudgetTier::Low => (0, 500),
            BudgetTier::Medium => (501, 1000),
            BudgetTier::High => (1001, 5000),
        }
    }

    pub fn avg_cost_for_two(&self) -> u32 {
        match self {
            BudgetTier::Low => 400,
            BudgetTier::Medium => 800,
            BudgetTier::High => 1500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietFlag {
    Veg,
    #[serde(rename = "Non-Veg")]
    NonVeg,
}

impl DietFlag {
    /// Only `Veg` satisfies a vegetarian or vegan restriction
    pub fn is_meat_free(&self) -> bool {
        matches!(self, DietFlag::Veg)
    }
}

/// Returns true when any restriction excludes meat ("vegetarian" or "vegan")
pub fn requires_meat_free(restrictions: &[String]) -> bool {
    restrictions.iter().any(|r| {
        let r = r.trim().to_lowercase();
        r == "vegetarian" || r == "vegan"
    })
}

/// Where a restaurant entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestaurantSource {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "foursquare")]
    Foursquare,
    #[serde(rename = "opentripmap")]
    OpenTripMap,
    #[serde(rename = "synthesized-fallback")]
    SynthesizedFallback,
}

impl RestaurantSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, RestaurantSource::Foursquare | RestaurantSource::OpenTripMap)
    }
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Parameters for a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub max_price_level: Option<u8>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub diet_restrictions: Vec<String>,
    #[serde(default)]
    pub dish_intent: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            lat: None,
            lon: None,
            city: String::new(),
            cuisines: Vec::new(),
            mood: Mood::default(),
            max_price_level: None,
            keywords: Vec::new(),
            diet_restrictions: Vec::new(),
            dish_intent: None,
            limit: default_limit(),
        }
    }
}

/// Full answer returned by the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub restaurants: Vec<EnrichedRestaurant>,
    pub intent: FoodIntent,
    pub scientific_reasoning: String,
    pub mood_tips: Vec<String>,
    pub chef_message: String,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Foursquare Places API Types
// ============================================================================

/// Raw response from GET /v3/places/search
#[derive(Debug, Clone, Deserialize)]
pub struct FsqSearchResponse {
    #[serde(default)]
    pub results: Vec<FsqPlace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsqPlace {
    #[serde(default)]
    pub fsq_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<FsqCategory>,
    #[serde(default)]
    pub geocodes: Option<FsqGeocodes>,
    #[serde(default)]
    pub location: Option<FsqLocation>,
    /// 0-10 scale
    #[serde(default)]
    pub rating: Option<f64>,
    /// 1-4 scale
    #[serde(default)]
    pub price: Option<u8>,
    #[serde(default)]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsqCategory {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsqGeocodes {
    #[serde(default)]
    pub main: Option<FsqLatLng>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsqLatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsqLocation {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
}

// ============================================================================
// OpenTripMap API Types
// ============================================================================

/// One entry of GET /0.1/en/places/radius?format=json
#[derive(Debug, Clone, Deserialize)]
pub struct OtmPlace {
    pub xid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub point: Option<OtmPoint>,
    /// 0-3 popularity scale
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub kinds: Option<String>,
    #[serde(default)]
    pub dist: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtmPoint {
    pub lat: f64,
    pub lon: f64,
}
