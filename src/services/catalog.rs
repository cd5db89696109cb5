use std::{collections::HashSet, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{normalize_name, requires_meat_free, DatasetRow, RestaurantRecord},
};

const BUILTIN_RESTAURANTS: &str = include_str!("../../data/restaurants.json");

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// What the catalog currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    Empty,
    Builtin,
    /// Built-in records plus an external dataset
    Loaded { dataset_rows: usize },
}

/// Filters for a catalog search
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub city: Option<String>,
    pub cuisines: Vec<String>,
    pub max_price_level: Option<u8>,
    pub diet_restrictions: Vec<String>,
    pub limit: Option<usize>,
}

/// True when any requested cuisine overlaps any tag by case-insensitive
/// substring in either direction
pub fn cuisine_overlaps<T: AsRef<str>, C: AsRef<str>>(tags: &[T], requested: &[C]) -> bool {
    tags.iter().any(|tag| {
        let tag = tag.as_ref().trim().to_lowercase();
        !tag.is_empty()
            && requested.iter().any(|wanted| {
                let wanted = wanted.as_ref().trim().to_lowercase();
                !wanted.is_empty() && (tag.contains(&wanted) || wanted.contains(&tag))
            })
    })
}

fn record_key(record: &RestaurantRecord) -> (String, String) {
    (normalize_name(&record.name), record.location.trim().to_lowercase())
}

/// Narrows `records` unless that would leave nothing
fn soft_narrow<F>(records: Vec<RestaurantRecord>, stage: &str, keep: F) -> Vec<RestaurantRecord>
where
    F: Fn(&RestaurantRecord) -> bool,
{
    let narrowed: Vec<RestaurantRecord> = records.iter().filter(|r| keep(r)).cloned().collect();
    if narrowed.is_empty() {
        tracing::debug!(stage, kept = records.len(), "Catalog filter skipped");
        records
    } else {
        narrowed
    }
}

/// Read-only restaurant catalog shared by the engine and the catalog endpoint
#[derive(Debug, Clone)]
pub struct LocalCatalog {
    records: Vec<RestaurantRecord>,
    state: CatalogState,
}

impl LocalCatalog {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            state: CatalogState::Empty,
        }
    }

    /// Curated records for Chennai, Bangalore and Coimbatore
    pub fn builtin() -> AppResult<Self> {
        let records: Vec<RestaurantRecord> = serde_json::from_str(BUILTIN_RESTAURANTS)
            .map_err(|e| AppError::Internal(format!("Invalid built-in catalog: {}", e)))?;
        Ok(Self {
            records,
            state: CatalogState::Builtin,
        })
    }

    pub fn from_records(records: Vec<RestaurantRecord>) -> Self {
        let state = if records.is_empty() {
            CatalogState::Empty
        } else {
            CatalogState::Builtin
        };
        Self { records, state }
    }

    /// Merges a JSON array of dataset rows read from `path`.
    ///
    /// Returns the number of records added. Rows without usable coordinates
    /// and rows that duplicate an existing restaurant are skipped.
    pub async fn load_dataset(&mut self, path: impl AsRef<Path>) -> AppResult<usize> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Internal(format!("Failed to read dataset {}: {}", path.display(), e))
        })?;
        self.merge_dataset_json(&raw)
    }

    pub fn merge_dataset_json(&mut self, raw: &str) -> AppResult<usize> {
        let rows: Vec<DatasetRow> = serde_json::from_str(raw)
            .map_err(|e| AppError::InvalidInput(format!("Malformed dataset: {}", e)))?;
        let total = rows.len();

        let mut seen: HashSet<(String, String)> = self.records.iter().map(record_key).collect();
        let mut added = 0;
        for (index, row) in rows.into_iter().enumerate() {
            let Some(record) = row.into_record(index) else {
                continue;
            };
            if seen.insert(record_key(&record)) {
                self.records.push(record);
                added += 1;
            }
        }

        let previous = match self.state {
            CatalogState::Loaded { dataset_rows } => dataset_rows,
            _ => 0,
        };
        self.state = CatalogState::Loaded {
            dataset_rows: previous + added,
        };

        tracing::info!(rows = total, added, "Merged restaurant dataset");
        Ok(added)
    }

    pub fn state(&self) -> CatalogState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, CatalogState::Loaded { .. })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    /// Runs the city, cuisine, budget and diet filters in order. Each one is
    /// skipped when it would empty the candidate set. Results are sorted by
    /// rating, highest first.
    pub fn search(&self, query: &CatalogQuery) -> Vec<RestaurantRecord> {
        let mut results = self.records.clone();

        if let Some(city) = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            let city = city.to_lowercase();
            results = soft_narrow(results, "city", |r| r.location.trim().to_lowercase() == city);
        }

        if !query.cuisines.is_empty() {
            results = soft_narrow(results, "cuisine", |r| {
                cuisine_overlaps(&r.cuisine_tags, &query.cuisines)
            });
        }

        if let Some(max_level) = query.max_price_level {
            results = soft_narrow(results, "budget", |r| r.budget_tier.level() <= max_level);
        }

        if requires_meat_free(&query.diet_restrictions) {
            results = soft_narrow(results, "diet", |r| r.diet_flag.is_meat_free());
        }

        results.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        results.truncate(query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetTier, DietFlag};

    fn record(id: &str, name: &str, city: &str, tags: &[&str], tier: BudgetTier, rating: f64) -> RestaurantRecord {
        RestaurantRecord {
            id: id.to_string(),
            name: name.to_string(),
            location: city.to_string(),
            cuisine_tags: tags.iter().map(|t| t.to_string()).collect(),
            diet_flag: DietFlag::NonVeg,
            budget_tier: tier,
            rating,
            description: String::new(),
            address: None,
            coordinates: None,
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = LocalCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 70);
        assert_eq!(catalog.state(), CatalogState::Builtin);
        assert!(!catalog.is_loaded());
        assert!(catalog.records().iter().all(|r| !r.cuisine_tags.is_empty()));
    }

    #[test]
    fn test_city_match_is_case_insensitive() {
        let catalog = LocalCatalog::builtin().unwrap();
        let results = catalog.search(&CatalogQuery {
            city: Some("chennai".to_string()),
            limit: Some(50),
            ..Default::default()
        });
        assert_eq!(results.len(), 22);
        assert!(results.iter().all(|r| r.location == "Chennai"));
    }

    #[test]
    fn test_unknown_city_keeps_all_cities() {
        let catalog = LocalCatalog::builtin().unwrap();
        let results = catalog.search(&CatalogQuery {
            city: Some("Atlantis".to_string()),
            cuisines: vec!["Japanese".to_string()],
            limit: Some(50),
            ..Default::default()
        });
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| cuisine_overlaps(&r.cuisine_tags, &["Japanese"])));
    }

    #[test]
    fn test_results_sorted_by_rating_and_limited() {
        let catalog = LocalCatalog::builtin().unwrap();
        let results = catalog.search(&CatalogQuery::default());
        assert_eq!(results.len(), DEFAULT_SEARCH_LIMIT);
        assert!(results.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn test_budget_and_diet_filters() {
        let catalog = LocalCatalog::builtin().unwrap();
        let results = catalog.search(&CatalogQuery {
            city: Some("Bangalore".to_string()),
            max_price_level: Some(1),
            diet_restrictions: vec!["vegetarian".to_string()],
            limit: Some(50),
            ..Default::default()
        });
        assert!(!results.is_empty());
        for r in &results {
            assert_eq!(r.budget_tier, BudgetTier::Low);
            assert!(r.diet_flag.is_meat_free());
        }
    }

    #[test]
    fn test_filter_that_would_empty_is_skipped() {
        let catalog = LocalCatalog::from_records(vec![
            record("1", "Grill Shack", "Pune", &["BBQ"], BudgetTier::High, 4.1),
            record("2", "Noodle Bar", "Pune", &["Chinese"], BudgetTier::High, 4.3),
        ]);
        let results = catalog.search(&CatalogQuery {
            city: Some("Pune".to_string()),
            cuisines: vec!["Peruvian".to_string()],
            max_price_level: Some(1),
            ..Default::default()
        });
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Noodle Bar");
    }

    #[test]
    fn test_cuisine_overlap_is_bidirectional() {
        assert!(cuisine_overlaps(&["South Indian"], &["indian"]));
        assert!(cuisine_overlaps(&["Cafe"], &["cafe bistro"]));
        assert!(!cuisine_overlaps(&["Chinese"], &["Italian"]));
        assert!(!cuisine_overlaps(&["Chinese"], &[""]));
    }

    #[test]
    fn test_merge_dataset_skips_invalid_and_duplicate_rows() {
        let mut catalog = LocalCatalog::builtin().unwrap();
        let raw = r#"[
            {"Restaurant ID": 9001, "Restaurant Name": "Spice Route", "City": "Pune",
             "Cuisines": "North Indian, Mughlai", "Aggregate rating": 4.2, "Price range": 2,
             "Latitude": 18.52, "Longitude": 73.85},
            {"Restaurant ID": 9002, "Restaurant Name": "Nowhere Diner", "City": "Pune",
             "Latitude": 0, "Longitude": 0},
            {"Restaurant ID": 9003, "Restaurant Name": "Toscano", "City": "Chennai",
             "Cuisines": "Italian", "Latitude": 13.06, "Longitude": 80.25}
        ]"#;

        let added = catalog.merge_dataset_json(raw).unwrap();

        assert_eq!(added, 1);
        assert_eq!(catalog.len(), 71);
        assert!(catalog.is_loaded());
        assert_eq!(catalog.state(), CatalogState::Loaded { dataset_rows: 1 });
    }

    #[test]
    fn test_malformed_dataset_is_rejected() {
        let mut catalog = LocalCatalog::empty();
        let err = catalog.merge_dataset_json("{not json").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(catalog.state(), CatalogState::Empty);
    }

    #[tokio::test]
    async fn test_load_dataset_missing_file() {
        let mut catalog = LocalCatalog::empty();
        let result = catalog.load_dataset("/nonexistent/restaurants.json").await;
        assert!(result.is_err());
    }
}
