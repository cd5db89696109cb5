use crate::models::{FoodIntent, PriceConstraint};

/// Cuisines that may appear for a cheesy request
pub const CHEESY_ALLOWED_CUISINES: &[&str] = &[
    "Italian", "French", "Mexican", "Cafe", "Continental", "American", "Pizza",
];

/// Cuisines that must never appear for a cheesy request
pub const CHEESY_FORBIDDEN_CUISINES: &[&str] = &[
    "Indian", "South Indian", "North Indian", "Chettinad", "Andhra", "Punjabi", "Arabian",
    "BBQ", "Chinese", "Thai", "Korean", "Japanese", "Vietnamese", "Mediterranean",
];

const CHEESY_TRIGGERS: &[&str] = &[
    "cheesy", "cheese", "pizza", "pasta", "lasagna", "nachos", "quesadilla", "fondue",
    "mac and cheese",
];

struct IntentMapping {
    keyword: &'static str,
    cuisines: &'static [&'static str],
    dishes: &'static [&'static str],
}

macro_rules! mapping {
    ($keyword:literal, [$($cuisine:literal),* $(,)?], [$($dish:literal),* $(,)?]) => {
        IntentMapping {
            keyword: $keyword,
            cuisines: &[$($cuisine),*],
            dishes: &[$($dish),*],
        }
    };
}

/// Scanned in order; each keyword contributes at most once
const FOOD_INTENT_MAP: &[IntentMapping] = &[
    mapping!("cheesy",
        ["Italian", "Mexican", "French", "American", "Cafe", "Continental"],
        ["Pizza", "Lasagna", "Mac and Cheese", "Quesadillas", "Cheese Fondue", "Nachos"]),
    mapping!("cheese",
        ["Italian", "American", "Mexican", "French", "Cafe"],
        ["Pizza", "Lasagna", "Mac and Cheese", "Quesadillas", "Grilled Cheese"]),
    mapping!("comfort",
        ["Italian", "American", "Continental", "Cafe"],
        ["Mac and Cheese", "Pasta", "Pizza", "Burger", "Grilled Cheese"]),
    mapping!("spicy",
        ["Chinese", "Thai", "Mexican", "Korean", "Indian"],
        ["Kung Pao Chicken", "Green Curry", "Tacos al Pastor", "Kimchi Jjigae"]),
    mapping!("hot",
        ["Thai", "Korean", "Chinese", "Indian"],
        ["Green Curry", "Tom Yum", "Tteokbokki", "Dan Dan Noodles"]),
    mapping!("sweet",
        ["Italian", "Thai", "Mexican", "French"],
        ["Tiramisu", "Mango Sticky Rice", "Churros", "Crème Brûlée"]),
    mapping!("healthy",
        ["Japanese", "Mediterranean", "Thai", "Vietnamese"],
        ["Poke Bowl", "Greek Salad", "Sushi", "Falafel Platter"]),
    mapping!("light",
        ["Japanese", "Mediterranean", "Thai", "Vietnamese"],
        ["Sashimi", "Greek Salad", "Som Tum", "Spring Rolls"]),
    mapping!("heavy",
        ["Indian", "American", "Italian", "Korean"],
        ["Biryani", "BBQ Ribs", "Lasagna", "Korean BBQ"]),
    mapping!("filling",
        ["Indian", "Mexican", "Japanese", "Chinese"],
        ["Biryani", "Burrito", "Ramen", "Hot Pot"]),
    mapping!("noodles",
        ["Japanese", "Thai", "Vietnamese", "Chinese"],
        ["Ramen", "Pad Thai", "Pho", "Dan Dan Noodles", "Udon"]),
    mapping!("rice",
        ["Indian", "Chinese", "Korean", "Italian"],
        ["Biryani", "Fried Rice", "Bibimbap", "Risotto"]),
    mapping!("meat",
        ["Korean", "American", "Mexican", "French"],
        ["Korean BBQ", "BBQ Ribs", "Carnitas", "Beef Bourguignon"]),
    mapping!("vegetarian",
        ["Italian", "Mediterranean", "Indian", "Thai"],
        ["Margherita Pizza", "Falafel", "Masala Dosa", "Paneer Tikka"]),
    mapping!("vegan",
        ["Mediterranean", "Thai", "Vietnamese", "Indian"],
        ["Falafel", "Som Tum", "Tabbouleh", "Spring Rolls"]),
    mapping!("soup",
        ["Thai", "Vietnamese", "Japanese", "French", "American"],
        ["Tom Yum", "Pho", "Ramen", "French Onion Soup", "Clam Chowder"]),
    mapping!("curry",
        ["Thai", "Indian", "Japanese"],
        ["Green Curry", "Butter Chicken", "Massaman Curry", "Khao Soi"]),
    mapping!("crispy",
        ["Japanese", "Korean", "Chinese", "Indian"],
        ["Tempura", "Fried Chicken", "Spring Rolls", "Pakora"]),
    mapping!("fried",
        ["Korean", "Japanese", "Chinese", "Indian", "American"],
        ["Fried Chicken", "Tempura", "Spring Rolls", "Samosa"]),
    mapping!("grilled",
        ["Korean", "Mediterranean", "Indian", "Thai"],
        ["Korean BBQ", "Souvlaki", "Tandoori Chicken", "Satay"]),
    mapping!("bbq",
        ["Korean", "American", "Mexican"],
        ["Korean BBQ", "BBQ Ribs", "Carnitas", "Pulled Pork"]),
    mapping!("seafood",
        ["Japanese", "American", "Thai", "Mediterranean"],
        ["Sushi", "Lobster Roll", "Tom Yum", "Paella"]),
    mapping!("pizza",
        ["Italian"],
        ["Margherita Pizza", "Pepperoni Pizza", "Neapolitan Pizza", "Cheese Burst Pizza"]),
    mapping!("pasta",
        ["Italian"],
        ["Carbonara", "Lasagna", "Gnocchi", "Penne Arrabbiata", "Mac and Cheese"]),
    mapping!("sushi", ["Japanese"], ["Sushi Omakase", "Sashimi Platter", "Nigiri"]),
    mapping!("ramen", ["Japanese"], ["Tonkotsu Ramen", "Miso Ramen", "Shoyu Ramen"]),
    mapping!("tacos", ["Mexican"], ["Tacos al Pastor", "Fish Tacos", "Carnitas Tacos"]),
    mapping!("burger", ["American"], ["Smash Burger", "Classic Burger", "Cheese Burger"]),
    mapping!("indian", ["Indian"], ["Butter Chicken", "Biryani", "Masala Dosa", "Dal Makhani"]),
    mapping!("chinese", ["Chinese"], ["Kung Pao Chicken", "Dim Sum", "Fried Rice", "Mapo Tofu"]),
    mapping!("japanese", ["Japanese"], ["Sushi", "Ramen", "Tempura", "Wagyu"]),
    mapping!("thai", ["Thai"], ["Pad Thai", "Green Curry", "Tom Yum", "Mango Sticky Rice"]),
    mapping!("italian", ["Italian"], ["Pizza", "Pasta", "Lasagna", "Risotto"]),
    mapping!("mexican",
        ["Mexican"],
        ["Tacos", "Burritos", "Enchiladas", "Guacamole", "Nachos"]),
    mapping!("korean", ["Korean"], ["Korean BBQ", "Bibimbap", "Kimchi Jjigae", "Tteokbokki"]),
    mapping!("french",
        ["French"],
        ["Croissant", "Coq au Vin", "Crème Brûlée", "Duck Confit", "Cheese Fondue"]),
    mapping!("mediterranean", ["Mediterranean"], ["Falafel", "Hummus", "Shawarma", "Greek Salad"]),
    mapping!("american", ["American"], ["Burger", "BBQ Ribs", "Mac and Cheese", "Buffalo Wings"]),
];

/// First matching constraint wins
const PRICE_KEYWORDS: &[(PriceConstraint, &[&str])] = &[
    (
        PriceConstraint::Cheap,
        &[
            "cheap", "budget", "affordable", "inexpensive", "low cost", "economical", "value",
            "not expensive", "not too expensive",
        ],
    ),
    (PriceConstraint::Moderate, &["moderate", "mid-range", "reasonable"]),
    (
        PriceConstraint::Expensive,
        &["expensive", "fancy", "upscale", "fine dining", "luxury", "premium", "high-end"],
    ),
];

/// True when any cheese trigger word appears in the text
pub fn detect_cheesy_intent(text: &str) -> bool {
    let lower = text.to_lowercase();
    CHEESY_TRIGGERS.iter().any(|trigger| lower.contains(trigger))
}

fn overlaps_any(cuisine: &str, list: &[&str]) -> bool {
    let cuisine = cuisine.trim().to_lowercase();
    !cuisine.is_empty()
        && list.iter().any(|entry| {
            let entry = entry.to_lowercase();
            cuisine.contains(&entry) || entry.contains(&cuisine)
        })
}

/// True when a cuisine tag overlaps the cheese-friendly allowlist
pub fn is_cheesy_allowed(cuisine: &str) -> bool {
    overlaps_any(cuisine, CHEESY_ALLOWED_CUISINES)
}

/// True when a cuisine tag overlaps the forbidden list
pub fn is_cheesy_forbidden(cuisine: &str) -> bool {
    overlaps_any(cuisine, CHEESY_FORBIDDEN_CUISINES)
}

/// A restaurant qualifies for a cheesy request when none of its tags is
/// forbidden and at least one is allowed
pub fn is_valid_for_cheesy<S: AsRef<str>>(cuisine_tags: &[S]) -> bool {
    let forbidden = cuisine_tags.iter().any(|tag| is_cheesy_forbidden(tag.as_ref()));
    !forbidden && cuisine_tags.iter().any(|tag| is_cheesy_allowed(tag.as_ref()))
}

fn push_unique(target: &mut Vec<String>, value: &str) {
    if !target.iter().any(|existing| existing == value) {
        target.push(value.to_string());
    }
}

fn detect_price_constraint(lower: &str) -> PriceConstraint {
    PRICE_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map(|(constraint, _)| *constraint)
        .unwrap_or_default()
}

/// Parses free text into a [`FoodIntent`].
///
/// Cheesy detection runs first; once set, only allowlisted cuisines enter the
/// cuisine set no matter which keywords matched.
pub fn parse_food_intent(text: &str) -> FoodIntent {
    let lower = text.to_lowercase();
    let is_cheesy_intent = detect_cheesy_intent(&lower);

    let mut keywords = Vec::new();
    let mut cuisines = Vec::new();
    let mut dishes = Vec::new();

    for mapping in FOOD_INTENT_MAP {
        if !lower.contains(mapping.keyword) {
            continue;
        }
        keywords.push(mapping.keyword.to_string());
        for cuisine in mapping.cuisines {
            if !is_cheesy_intent || CHEESY_ALLOWED_CUISINES.contains(cuisine) {
                push_unique(&mut cuisines, cuisine);
            }
        }
        for dish in mapping.dishes {
            push_unique(&mut dishes, dish);
        }
    }

    if is_cheesy_intent && cuisines.is_empty() {
        for cuisine in CHEESY_ALLOWED_CUISINES {
            push_unique(&mut cuisines, cuisine);
        }
    }
    if is_cheesy_intent && keywords.is_empty() {
        keywords.push("cheesy".to_string());
    }

    let price_constraint = detect_price_constraint(&lower);

    tracing::debug!(
        keywords = ?keywords,
        cheesy = is_cheesy_intent,
        price = ?price_constraint,
        "Parsed food intent"
    );

    FoodIntent {
        keywords,
        cuisines,
        dishes,
        price_constraint,
        is_cheesy_intent,
        max_price_level: price_constraint.max_price_level(),
        min_price_level: price_constraint.min_price_level(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cheesy_and_cheap() {
        let intent = parse_food_intent("cheesy and cheap");

        assert!(intent.is_cheesy_intent);
        assert_eq!(intent.price_constraint, PriceConstraint::Cheap);
        assert_eq!(intent.max_price_level, Some(2));
        assert_eq!(intent.min_price_level, None);
        assert_eq!(intent.keywords, vec!["cheesy"]);
        assert!(!intent.cuisines.is_empty());
        for cuisine in &intent.cuisines {
            assert!(CHEESY_ALLOWED_CUISINES.contains(&cuisine.as_str()));
        }
    }

    #[test]
    fn test_cheesy_overrides_spicy_cuisines() {
        let intent = parse_food_intent("something spicy with lots of cheese");

        assert!(intent.is_cheesy_intent);
        assert!(intent.keywords.contains(&"spicy".to_string()));
        assert!(intent.keywords.contains(&"cheese".to_string()));
        for cuisine in &intent.cuisines {
            assert!(!is_cheesy_forbidden(cuisine), "{} leaked into cheesy intent", cuisine);
        }
        // spicy still contributes its allowlisted cuisine
        assert!(intent.cuisines.contains(&"Mexican".to_string()));
    }

    #[test]
    fn test_cheesy_without_cuisine_mapping_uses_allowlist() {
        let intent = parse_food_intent("fondue night");

        assert!(intent.is_cheesy_intent);
        assert_eq!(intent.keywords, vec!["cheesy"]);
        assert_eq!(intent.cuisines.len(), CHEESY_ALLOWED_CUISINES.len());
    }

    #[test]
    fn test_spicy_without_cheese() {
        let intent = parse_food_intent("I want something spicy");

        assert!(!intent.is_cheesy_intent);
        assert_eq!(intent.keywords, vec!["spicy"]);
        assert_eq!(
            intent.cuisines,
            vec!["Chinese", "Thai", "Mexican", "Korean", "Indian"]
        );
        assert!(intent.dishes.contains(&"Green Curry".to_string()));
    }

    #[test]
    fn test_keywords_union_in_table_order_without_duplicates() {
        let intent = parse_food_intent("healthy and light");

        assert_eq!(intent.keywords, vec!["healthy", "light"]);
        assert_eq!(
            intent.cuisines,
            vec!["Japanese", "Mediterranean", "Thai", "Vietnamese"]
        );
        let salads = intent.dishes.iter().filter(|d| *d == "Greek Salad").count();
        assert_eq!(salads, 1);
    }

    #[test]
    fn test_first_price_constraint_wins() {
        let intent = parse_food_intent("not too expensive please");
        assert_eq!(intent.price_constraint, PriceConstraint::Cheap);

        let intent = parse_food_intent("a fancy dinner");
        assert_eq!(intent.price_constraint, PriceConstraint::Expensive);
        assert_eq!(intent.min_price_level, Some(3));
        assert_eq!(intent.max_price_level, None);

        let intent = parse_food_intent("somewhere reasonable");
        assert_eq!(intent.max_price_level, Some(3));
    }

    #[test]
    fn test_unrecognized_text_yields_empty_intent() {
        let intent = parse_food_intent("surprise me");

        assert!(intent.is_empty());
        assert!(!intent.is_cheesy_intent);
        assert_eq!(intent.price_constraint, PriceConstraint::Unconstrained);
        assert_eq!(intent.max_price_level, None);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let intent = parse_food_intent("PIZZA");
        assert!(intent.is_cheesy_intent);
        assert_eq!(intent.keywords, vec!["pizza"]);
        assert_eq!(intent.cuisines, vec!["Italian"]);
    }

    #[test]
    fn test_forbidden_and_allowed_checks() {
        assert!(is_cheesy_forbidden("South Indian"));
        assert!(is_cheesy_forbidden("mediterranean"));
        assert!(!is_cheesy_forbidden("Italian"));
        assert!(is_cheesy_allowed("cafe"));
        assert!(is_cheesy_allowed("Pizza Place"));
        assert!(!is_cheesy_allowed("Thai"));
    }

    #[test]
    fn test_valid_for_cheesy_requires_allowed_and_no_forbidden() {
        assert!(is_valid_for_cheesy(&["Italian", "Continental"]));
        assert!(is_valid_for_cheesy(&["Cafe"]));
        assert!(!is_valid_for_cheesy(&["North Indian", "Continental"]));
        assert!(!is_valid_for_cheesy(&["Fast Food"]));
        assert!(!is_valid_for_cheesy::<&str>(&[]));
    }
}
