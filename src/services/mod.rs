pub mod catalog;
pub mod copy;
pub mod intent;
pub mod knowledge;
pub mod providers;
pub mod recommendations;

pub use catalog::{CatalogQuery, CatalogState, LocalCatalog};
pub use copy::{CopyProvider, FixedCopy, RandomCopy};
pub use intent::parse_food_intent;
pub use recommendations::{EngineSettings, RecommendationEngine};
