use serde::{Deserialize, Serialize};

/// Price constraint expressed in free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceConstraint {
    Cheap,
    Moderate,
    Expensive,
    #[default]
    #[serde(rename = "none")]
    Unconstrained,
}

impl PriceConstraint {
    pub fn max_price_level(&self) -> Option<u8> {
        match self {
            PriceConstraint::Cheap => Some(2),
            PriceConstraint::Moderate => Some(3),
            _ => None,
        }
    }

    pub fn min_price_level(&self) -> Option<u8> {
        match self {
            PriceConstraint::Expensive => Some(3),
            _ => None,
        }
    }
}

/// Structured reading of a user's free-text food request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FoodIntent {
    pub keywords: Vec<String>,
    pub cuisines: Vec<String>,
    pub dishes: Vec<String>,
    pub price_constraint: PriceConstraint,
    /// Dominant flag: restricts the cuisine universe to cheese-friendly kitchens
    pub is_cheesy_intent: bool,
    pub max_price_level: Option<u8>,
    pub min_price_level: Option<u8>,
}

impl FoodIntent {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.cuisines.is_empty() && self.dishes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_constraint_levels() {
        assert_eq!(PriceConstraint::Cheap.max_price_level(), Some(2));
        assert_eq!(PriceConstraint::Moderate.max_price_level(), Some(3));
        assert_eq!(PriceConstraint::Expensive.max_price_level(), None);
        assert_eq!(PriceConstraint::Expensive.min_price_level(), Some(3));
        assert_eq!(PriceConstraint::Unconstrained.min_price_level(), None);
    }

    #[test]
    fn test_price_constraint_serde() {
        assert_eq!(
            serde_json::to_string(&PriceConstraint::Unconstrained).unwrap(),
            r#""none""#
        );
        assert_eq!(
            serde_json::to_string(&PriceConstraint::Cheap).unwrap(),
            r#""cheap""#
        );
    }

    #[test]
    fn test_default_intent_is_empty() {
        let intent = FoodIntent::default();
        assert!(intent.is_empty());
        assert!(!intent.is_cheesy_intent);
        assert_eq!(intent.price_constraint, PriceConstraint::Unconstrained);
    }
}
