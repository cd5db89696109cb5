//! Recommendation engine.
//!
//! Pipeline, in order: intent resolution, primary catalog fetch, the filter
//! stages (cheesy, cuisine, budget, diet), rank, truncate, backfill, remote
//! enrichment and finally per-restaurant enrichment. Remote providers are
//! started before the catalog path and awaited after backfill.

use std::{cmp::Ordering, collections::HashSet, sync::Arc};

use chrono::Utc;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        maps_url, normalize_name, requires_meat_free, BudgetTier, DietFlag, EnrichedRestaurant,
        FoodIntent, GeoPoint, Mood, NormalizedRestaurant, RecommendationRequest,
        RecommendationResponse, RestaurantSource,
    },
    services::{
        catalog::{cuisine_overlaps, CatalogQuery, LocalCatalog},
        copy::{self, CopyProvider},
        intent::{is_valid_for_cheesy, parse_food_intent, CHEESY_ALLOWED_CUISINES},
        knowledge::cuisine_appropriate_dishes,
        providers::{fetch_remote, NearbyQuery, PlaceProvider},
    },
};

const MAX_RESULT_LIMIT: usize = 50;
const LOCATION_REQUIRED: &str = "please set your location";

/// Cuisines used for placeholders when the request names none
const DEFAULT_BACKFILL_CUISINES: &[&str] = &[
    "Indian", "Chinese", "Italian", "Thai", "Mexican", "Japanese", "Korean", "Mediterranean",
];
const BACKFILL_NAME_PATTERNS: &[&str] = &["Kitchen", "House", "Corner"];
/// Degrees added per placeholder to both latitude and longitude
const BACKFILL_COORDINATE_STEP: f64 = 0.002;
/// Placeholder ratings start below this when there is no real candidate
const BACKFILL_RATING_CEILING: f64 = 4.0;
const BACKFILL_RATING_STEP: f64 = 0.1;

/// Tuning knobs for the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Backfill threshold, bounded by the request limit
    pub min_results: usize,
    /// Candidates requested from the catalog before filtering
    pub primary_fetch_limit: usize,
    /// Most remote-only restaurants appended to one list
    pub remote_enrichment_cap: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_results: 8,
            primary_fetch_limit: 50,
            remote_enrichment_cap: 3,
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_results: config.min_results,
            remote_enrichment_cap: config.remote_enrichment_cap,
            ..Self::default()
        }
    }
}

/// Whether a stage may be skipped to keep the candidate set non-empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    Hard,
    Soft,
}

/// One named narrowing step of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStage {
    /// Only cheese-friendly kitchens, never a forbidden one
    Cheesy,
    Cuisine(Vec<String>),
    /// Maximum price level, inclusive
    Budget(u8),
    /// Meat-free only
    Diet,
}

impl FilterStage {
    /// Stages for a request, in pipeline order
    pub fn for_request(
        cheesy: bool,
        cuisines: &[String],
        max_price_level: Option<u8>,
        meat_free: bool,
    ) -> Vec<FilterStage> {
        let mut stages = Vec::new();
        if cheesy {
            stages.push(FilterStage::Cheesy);
        } else if !cuisines.is_empty() {
            stages.push(FilterStage::Cuisine(cuisines.to_vec()));
        }
        if let Some(level) = max_price_level {
            stages.push(FilterStage::Budget(level));
        }
        if meat_free {
            stages.push(FilterStage::Diet);
        }
        stages
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterStage::Cheesy => "cheesy",
            FilterStage::Cuisine(_) => "cuisine",
            FilterStage::Budget(_) => "budget",
            FilterStage::Diet => "diet",
        }
    }

    pub fn strictness(&self) -> Strictness {
        match self {
            FilterStage::Cheesy | FilterStage::Diet => Strictness::Hard,
            FilterStage::Cuisine(_) | FilterStage::Budget(_) => Strictness::Soft,
        }
    }

    pub fn keeps(&self, restaurant: &NormalizedRestaurant) -> bool {
        match self {
            FilterStage::Cheesy => is_valid_for_cheesy(&restaurant.cuisine_tags),
            FilterStage::Cuisine(cuisines) => cuisine_overlaps(&restaurant.cuisine_tags, cuisines),
            FilterStage::Budget(max_level) => restaurant.price_level() <= *max_level,
            FilterStage::Diet => restaurant.diet_flag.is_meat_free(),
        }
    }

    /// Narrows `candidates`; a soft stage that would empty them is skipped
    pub fn apply(&self, mut candidates: Vec<NormalizedRestaurant>) -> Vec<NormalizedRestaurant> {
        let before = candidates.len();
        if self.strictness() == Strictness::Soft && !candidates.iter().any(|r| self.keeps(r)) {
            tracing::debug!(stage = self.name(), kept = before, "Soft filter skipped");
            return candidates;
        }
        candidates.retain(|r| self.keeps(r));
        tracing::debug!(stage = self.name(), before, after = candidates.len(), "Filter applied");
        candidates
    }
}

/// Rating descending, then known distance ascending, unknown distances last
fn rank_order(a: &NormalizedRestaurant, b: &NormalizedRestaurant) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| match (a.distance_meters, b.distance_meters) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

fn rank(restaurants: &mut [NormalizedRestaurant]) {
    restaurants.sort_by(rank_order);
}

fn title_case(value: &str) -> String {
    let mut chars = value.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn push_unique_cuisine(pool: &mut Vec<String>, cuisine: &str) {
    let cuisine = title_case(cuisine);
    if !cuisine.is_empty() && !pool.iter().any(|c| c.eq_ignore_ascii_case(&cuisine)) {
        pool.push(cuisine);
    }
}

/// Cycles cuisines first, then name patterns, then a numeric suffix
fn placeholder_name(pool: &[String], index: usize) -> String {
    let cuisine = &pool[index % pool.len()];
    let round = index / pool.len();
    let pattern = BACKFILL_NAME_PATTERNS[round % BACKFILL_NAME_PATTERNS.len()];
    match round / BACKFILL_NAME_PATTERNS.len() {
        0 => format!("{} {}", cuisine, pattern),
        cycle => format!("{} {} {}", cuisine, pattern, cycle + 1),
    }
}

fn validate_location(lat: Option<f64>, lon: Option<f64>) -> AppResult<GeoPoint> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let point = GeoPoint::new(lat, lon);
            if point.is_valid() {
                Ok(point)
            } else {
                Err(AppError::LocationRequired(LOCATION_REQUIRED.to_string()))
            }
        }
        _ => Err(AppError::LocationRequired(LOCATION_REQUIRED.to_string())),
    }
}

/// A request after validation and intent resolution
#[derive(Debug, Clone)]
struct Plan {
    user: GeoPoint,
    city: String,
    mood: Mood,
    intent: FoodIntent,
    /// Request keywords followed by the intent's, lowercased and deduped
    keywords: Vec<String>,
    cuisines: Vec<String>,
    max_price_level: Option<u8>,
    meat_free: bool,
    diet_restrictions: Vec<String>,
    limit: usize,
}

impl Plan {
    fn resolve(request: RecommendationRequest) -> AppResult<Self> {
        let user = validate_location(request.lat, request.lon)?;

        let mut intent_text = request.dish_intent.clone().unwrap_or_default();
        for keyword in &request.keywords {
            intent_text.push(' ');
            intent_text.push_str(keyword);
        }
        let intent = parse_food_intent(&intent_text);

        let mut keywords: Vec<String> = Vec::new();
        for keyword in request.keywords.iter().chain(intent.keywords.iter()) {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }

        let cuisines: Vec<String> = request
            .cuisines
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        Ok(Self {
            user,
            city: request.city.trim().to_string(),
            mood: request.mood,
            max_price_level: request.max_price_level.or(intent.max_price_level),
            meat_free: requires_meat_free(&request.diet_restrictions),
            diet_restrictions: request.diet_restrictions,
            limit: request.limit.clamp(1, MAX_RESULT_LIMIT),
            intent,
            keywords,
            cuisines,
        })
    }

    fn stages(&self) -> Vec<FilterStage> {
        FilterStage::for_request(
            self.intent.is_cheesy_intent,
            &self.cuisines,
            self.max_price_level,
            self.meat_free,
        )
    }

    fn backfill_cuisines(&self) -> Vec<String> {
        let mut pool = Vec::new();
        if self.intent.is_cheesy_intent {
            for cuisine in &self.intent.cuisines {
                if is_valid_for_cheesy(&[cuisine]) {
                    push_unique_cuisine(&mut pool, cuisine);
                }
            }
            if pool.is_empty() {
                for cuisine in CHEESY_ALLOWED_CUISINES {
                    push_unique_cuisine(&mut pool, cuisine);
                }
            }
            return pool;
        }

        let requested = if self.cuisines.is_empty() {
            &self.intent.cuisines
        } else {
            &self.cuisines
        };
        for cuisine in requested {
            push_unique_cuisine(&mut pool, cuisine);
        }
        if pool.is_empty() {
            for cuisine in DEFAULT_BACKFILL_CUISINES {
                push_unique_cuisine(&mut pool, cuisine);
            }
        }
        pool
    }

    fn backfill_tier(&self) -> BudgetTier {
        self.max_price_level
            .or(self.intent.min_price_level)
            .map(BudgetTier::from_level)
            .unwrap_or(BudgetTier::Medium)
    }

    fn display_city(&self) -> &str {
        if self.city.is_empty() {
            "Nearby"
        } else {
            &self.city
        }
    }
}

/// Produces mood-aware restaurant lists from the catalog and remote providers
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<LocalCatalog>,
    providers: Arc<Vec<Arc<dyn PlaceProvider>>>,
    copy: Arc<dyn CopyProvider>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<LocalCatalog>,
        providers: Vec<Arc<dyn PlaceProvider>>,
        copy: Arc<dyn CopyProvider>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            catalog,
            providers: Arc::new(providers),
            copy,
            settings,
        }
    }

    pub fn catalog(&self) -> &LocalCatalog {
        &self.catalog
    }

    /// Runs the full pipeline.
    ///
    /// Fails only when the request lacks usable coordinates; an empty
    /// catalog or failing providers still yield a backfilled list.
    pub async fn recommend(&self, request: RecommendationRequest) -> AppResult<RecommendationResponse> {
        let plan = Plan::resolve(request)?;

        tracing::info!(
            city = %plan.city,
            mood = %plan.mood,
            cheesy = plan.intent.is_cheesy_intent,
            max_price_level = ?plan.max_price_level,
            limit = plan.limit,
            "Starting recommendation"
        );

        let remote = if self.providers.is_empty() {
            None
        } else {
            let providers = Arc::clone(&self.providers);
            let query = NearbyQuery::new(plan.user, plan.city.clone(), &plan.cuisines);
            Some(tokio::spawn(async move { fetch_remote(&providers, &query).await }))
        };

        let mut restaurants = self.primary_candidates(&plan);
        for stage in plan.stages() {
            restaurants = stage.apply(restaurants);
        }
        rank(&mut restaurants);
        restaurants.truncate(plan.limit);

        let primary_count = restaurants.len();
        self.backfill(&mut restaurants, &plan);
        let synthesized_count = restaurants.len() - primary_count;

        if let Some(handle) = remote {
            match handle.await {
                Ok(places) => self.merge_remote(&mut restaurants, places, &plan),
                Err(e) => tracing::warn!(error = %e, "Remote enrichment task failed"),
            }
        }
        rank(&mut restaurants);

        tracing::info!(
            primary = primary_count,
            synthesized = synthesized_count,
            total = restaurants.len(),
            "Recommendation completed"
        );

        let restaurants = restaurants
            .into_iter()
            .map(|restaurant| self.enrich(restaurant, &plan))
            .collect();

        Ok(RecommendationResponse {
            restaurants,
            scientific_reasoning: copy::scientific_reasoning(plan.mood, &plan.keywords),
            mood_tips: copy::mood_tips(plan.mood),
            chef_message: copy::chef_message(&plan.intent, plan.mood),
            intent: plan.intent,
            generated_at: Utc::now(),
        })
    }

    fn primary_candidates(&self, plan: &Plan) -> Vec<NormalizedRestaurant> {
        let query = CatalogQuery {
            city: Some(plan.city.clone()),
            cuisines: if plan.intent.is_cheesy_intent {
                Vec::new()
            } else {
                plan.cuisines.clone()
            },
            max_price_level: plan.max_price_level,
            diet_restrictions: plan.diet_restrictions.clone(),
            limit: Some(self.settings.primary_fetch_limit),
        };

        self.catalog
            .search(&query)
            .into_iter()
            .map(|record| NormalizedRestaurant::from_record(record, plan.user))
            .collect()
    }

    /// Adds placeholders until the list reaches the backfill threshold
    fn backfill(&self, restaurants: &mut Vec<NormalizedRestaurant>, plan: &Plan) {
        let target = self.settings.min_results.min(plan.limit);
        if restaurants.len() >= target {
            return;
        }

        let pool = plan.backfill_cuisines();
        let tier = plan.backfill_tier();
        let diet_flag = if plan.meat_free {
            DietFlag::Veg
        } else {
            DietFlag::NonVeg
        };
        let ceiling = restaurants
            .iter()
            .map(|r| r.rating)
            .reduce(f64::min)
            .unwrap_or(BACKFILL_RATING_CEILING);
        let city = plan.display_city().to_string();

        let mut seen: HashSet<(String, String)> =
            restaurants.iter().map(NormalizedRestaurant::dedupe_key).collect();
        let mut index = 0;
        let mut added = 0;

        while restaurants.len() < target {
            let name = placeholder_name(&pool, index);
            let cuisine = pool[index % pool.len()].clone();
            index += 1;

            let key = (normalize_name(&name), city.to_lowercase());
            if !seen.insert(key) {
                continue;
            }
            added += 1;

            let step = BACKFILL_COORDINATE_STEP * added as f64;
            let coordinates = GeoPoint::new(plan.user.lat + step, plan.user.lon + step);
            let rating = ((ceiling - BACKFILL_RATING_STEP * added as f64) * 10.0).round() / 10.0;

            restaurants.push(NormalizedRestaurant {
                id: format!("synth_{}", normalize_name(&name)),
                maps_url: maps_url(&name, &city, Some(plan.user)),
                description: format!("Popular {} spot near you.", cuisine),
                name,
                city: city.clone(),
                cuisine_tags: vec![cuisine],
                diet_flag,
                budget_tier: tier,
                rating: rating.max(0.0),
                address: format!("{} Center", city),
                distance_meters: Some(plan.user.distance_to(&coordinates)),
                coordinates: Some(coordinates),
                source: RestaurantSource::SynthesizedFallback,
                price_level_symbol: tier.symbol(),
                avg_cost_for_two: tier.avg_cost_for_two(),
            });
        }

        tracing::debug!(added, target, "Backfilled recommendations");
    }

    /// Appends remote restaurants that pass every stage strictly and are not
    /// already listed
    fn merge_remote(
        &self,
        restaurants: &mut Vec<NormalizedRestaurant>,
        places: Vec<NormalizedRestaurant>,
        plan: &Plan,
    ) {
        let room = plan.limit.saturating_sub(restaurants.len());
        let cap = self.settings.remote_enrichment_cap.min(room);
        if cap == 0 || places.is_empty() {
            return;
        }

        // Providers report neighbourhoods as the city, so match on name alone
        let stages = plan.stages();
        let mut seen: HashSet<String> = restaurants.iter().map(|r| normalize_name(&r.name)).collect();
        let mut appended = 0;

        for place in places {
            if appended == cap {
                break;
            }
            if !stages.iter().all(|stage| stage.keeps(&place)) {
                continue;
            }
            if seen.insert(normalize_name(&place.name)) {
                restaurants.push(place);
                appended += 1;
            }
        }

        tracing::debug!(appended, cap, "Merged remote restaurants");
    }

    fn enrich(&self, restaurant: NormalizedRestaurant, plan: &Plan) -> EnrichedRestaurant {
        let dishes =
            cuisine_appropriate_dishes(&restaurant.cuisine_tags, &plan.keywords, &restaurant.name);
        let mood_copy = self.copy.mood_copy(plan.mood);
        let why_this_place = copy::why_this_place(&restaurant, plan.mood, &plan.keywords);

        EnrichedRestaurant {
            restaurant,
            dishes,
            mood_boost: mood_copy.mood_boost,
            nutrition_insight: mood_copy.nutrition_insight,
            energy_badge: mood_copy.energy_badge,
            why_this_place,
            playful_reason: Some(self.copy.playful_reason()),
        }
    }
}
