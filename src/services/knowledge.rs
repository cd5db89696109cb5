//! Static cuisine and dish knowledge.
//!
//! Cuisine lookups normalize the cuisine (lowercase, non-word characters
//! stripped) and match it against each cuisine family key by substring in
//! either direction, so "South Indian" resolves to the `indian` family.

use crate::models::Dish;

/// Cuisine family → dishes considered authentic to it
const CUISINE_DISHES: &[(&str, &[&str])] = &[
    (
        "indian",
        &[
            "butter chicken", "dal makhani", "paneer tikka", "biryani", "chole bhature",
            "masala dosa", "palak paneer", "tandoori chicken", "naan", "samosa", "thali",
            "rajma chawal", "idli", "upma", "vindaloo",
        ],
    ),
    (
        "italian",
        &[
            "margherita pizza", "carbonara", "lasagna", "risotto", "tiramisu", "gnocchi",
            "bruschetta", "pasta", "osso buco", "pizza", "mac and cheese",
        ],
    ),
    (
        "chinese",
        &[
            "kung pao chicken", "dim sum", "mapo tofu", "sweet and sour pork", "hot pot",
            "peking duck", "dan dan noodles", "spring rolls", "fried rice", "dumplings",
        ],
    ),
    (
        "japanese",
        &[
            "sushi", "ramen", "tempura", "wagyu", "sashimi", "udon", "okonomiyaki", "gyoza",
            "tonkotsu ramen", "miso soup",
        ],
    ),
    (
        "mexican",
        &[
            "tacos al pastor", "mole", "carnitas", "enchiladas", "guacamole", "churros",
            "pozole", "quesadillas", "burritos", "nachos",
        ],
    ),
    (
        "thai",
        &[
            "pad thai", "green curry", "tom yum", "massaman curry", "mango sticky rice",
            "som tum", "khao soi", "satay", "thai basil chicken",
        ],
    ),
    (
        "korean",
        &[
            "korean bbq", "bibimbap", "kimchi jjigae", "bulgogi", "japchae", "tteokbokki",
            "samgyeopsal", "fried chicken",
        ],
    ),
    (
        "mediterranean",
        &[
            "falafel", "shawarma", "hummus", "greek salad", "moussaka", "souvlaki",
            "tabbouleh", "lamb kofta", "pita",
        ],
    ),
    (
        "american",
        &[
            "smash burger", "bbq ribs", "mac and cheese", "buffalo wings", "philly cheesesteak",
            "lobster roll", "clam chowder", "apple pie", "grilled cheese", "burger", "fries",
        ],
    ),
    (
        "french",
        &[
            "coq au vin", "beef bourguignon", "croissant", "creme brulee", "duck confit",
            "french onion soup", "ratatouille", "escargot", "quiche",
        ],
    ),
    (
        "vietnamese",
        &[
            "pho", "banh mi", "spring rolls", "bun cha", "com tam", "ca kho to",
            "vermicelli bowl",
        ],
    ),
    (
        "cafe",
        &[
            "avocado toast", "eggs benedict", "pancakes", "acai bowl", "club sandwich",
            "croissant", "latte", "smoothie", "salad",
        ],
    ),
    (
        "bakery",
        &[
            "sourdough bread", "cinnamon roll", "chocolate croissant", "fruit tart", "pastries",
            "cookies", "cake",
        ],
    ),
];

/// Craving keyword → candidate dishes, independent of cuisine
const KEYWORD_DISHES: &[(&str, &[&str])] = &[
    (
        "cheesy",
        &[
            "pizza", "lasagna", "mac and cheese", "quesadillas", "grilled cheese", "pasta",
            "risotto", "nachos", "cheesy fries",
        ],
    ),
    (
        "comfort",
        &[
            "dosa", "rajma chawal", "biryani", "pasta", "thali", "ramen", "mac and cheese",
            "butter chicken", "dal makhani",
        ],
    ),
    (
        "spicy",
        &[
            "biryani", "chettinad", "korean bbq", "thai curry", "kimchi jjigae", "tteokbokki",
            "green curry", "vindaloo",
        ],
    ),
    (
        "light",
        &[
            "salads", "idli", "upma", "soup", "sashimi", "poke bowl", "spring rolls",
            "greek salad",
        ],
    ),
    (
        "healthy",
        &[
            "bowls", "grilled items", "salads", "sushi", "falafel", "hummus", "grilled chicken",
        ],
    ),
    (
        "crispy",
        &["tempura", "fried chicken", "pakora", "spring rolls", "samosa", "fries"],
    ),
    (
        "sweet",
        &["tiramisu", "mango sticky rice", "churros", "creme brulee", "ice cream", "pancakes"],
    ),
    (
        "savory",
        &["steak", "bbq ribs", "burger", "shawarma", "kebab", "grilled meats"],
    ),
];

/// Served when a restaurant's cuisine is not in any known family
pub const FALLBACK_DISHES: &[&str] = &["chef's signature", "seasonal special", "house specialty"];

const DISH_DESCRIPTIONS: &[(&str, &str)] = &[
    ("pizza", "Wood-fired perfection with premium toppings"),
    ("lasagna", "Layered pasta with rich cheese and sauce"),
    ("mac and cheese", "Creamy, cheesy comfort classic"),
    ("pasta", "Al dente perfection with signature sauce"),
    ("risotto", "Creamy arborio rice, perfectly cooked"),
    ("biryani", "Fragrant basmati with aromatic spices"),
    ("butter chicken", "Tender chicken in rich tomato cream"),
    ("dal makhani", "Slow-cooked lentils in creamy gravy"),
    ("paneer tikka", "Grilled cottage cheese with spices"),
    ("ramen", "Rich broth with perfectly chewy noodles"),
    ("sushi", "Fresh, expertly prepared nigiri"),
    ("tacos", "Authentic fillings, handmade tortillas"),
    ("burger", "Juicy patty, premium toppings"),
    ("salad", "Fresh, crisp, nutritious greens"),
    ("green curry", "Aromatic coconut curry with Thai basil"),
    ("korean bbq", "Premium meats, grilled tableside"),
    ("bibimbap", "Colorful rice bowl with vegetables and egg"),
];

const DEFAULT_DISH_DESCRIPTION: &str = "House specialty, prepared with care";

/// Offset between the first and second dish pick
const SECOND_PICK_OFFSET: usize = 7;

fn normalize_cuisine(cuisine: &str) -> String {
    cuisine
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn family_matches(normalized: &str, key: &str) -> bool {
    !normalized.is_empty() && (normalized.contains(key) || key.contains(normalized))
}

fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Authentic dishes for one (possibly noisy) cuisine name, or the generic
/// fallback set when no family matches
pub fn dishes_for_cuisine(cuisine: &str) -> Vec<&'static str> {
    let dishes = dishes_for_cuisines(&[cuisine]);
    if dishes.is_empty() {
        FALLBACK_DISHES.to_vec()
    } else {
        dishes
    }
}

/// Union of the authentic dishes of every matched family, in table order,
/// without duplicates. Empty when nothing matches.
pub fn dishes_for_cuisines<S: AsRef<str>>(cuisines: &[S]) -> Vec<&'static str> {
    let mut dishes: Vec<&'static str> = Vec::new();
    for cuisine in cuisines {
        let normalized = normalize_cuisine(cuisine.as_ref());
        for (key, family) in CUISINE_DISHES {
            if family_matches(&normalized, key) {
                for dish in family.iter() {
                    if !dishes.contains(dish) {
                        dishes.push(dish);
                    }
                }
            }
        }
    }
    dishes
}

/// Candidate dishes for a craving keyword such as "spicy"
pub fn dishes_for_keyword(keyword: &str) -> &'static [&'static str] {
    let keyword = keyword.trim().to_lowercase();
    KEYWORD_DISHES
        .iter()
        .find(|(key, _)| *key == keyword)
        .map(|(_, dishes)| *dishes)
        .unwrap_or(&[])
}

/// Short description for a dish, matched by substring
pub fn describe_dish(dish: &str) -> &'static str {
    let lower = dish.to_lowercase();
    DISH_DESCRIPTIONS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, description)| *description)
        .unwrap_or(DEFAULT_DISH_DESCRIPTION)
}

/// True when `dish` belongs to the family of at least one of `cuisines`
pub fn is_dish_valid_for_cuisine<S: AsRef<str>>(dish: &str, cuisines: &[S]) -> bool {
    let dish = dish.to_lowercase();
    dishes_for_cuisines(cuisines)
        .iter()
        .any(|valid| overlaps(&dish, valid))
}

/// Sum of character codes; stable across calls and processes
pub fn name_hash(name: &str) -> usize {
    name.chars().map(|c| c as usize).sum()
}

fn capitalize(dish: &str) -> String {
    let mut chars = dish.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Picks one or two dishes for a restaurant.
///
/// Candidates are the restaurant's cuisine dishes, narrowed to keyword dishes
/// that overlap one of them when any keyword matches. The pick is indexed by
/// [`name_hash`], so a restaurant always shows the same dishes.
pub fn cuisine_appropriate_dishes<S: AsRef<str>, K: AsRef<str>>(
    cuisines: &[S],
    keywords: &[K],
    restaurant_name: &str,
) -> Vec<Dish> {
    let mut valid = dishes_for_cuisines(cuisines);
    if valid.is_empty() {
        valid = FALLBACK_DISHES.to_vec();
    }

    let mut candidates: Vec<&'static str> = Vec::new();
    for keyword in keywords {
        for dish in dishes_for_keyword(keyword.as_ref()) {
            if valid.iter().any(|v| overlaps(v, dish)) && !candidates.contains(dish) {
                candidates.push(dish);
            }
        }
    }
    if candidates.is_empty() {
        candidates = valid;
    }

    let hash = name_hash(restaurant_name);
    let len = candidates.len();
    let first = hash % len;
    let mut second = (hash + SECOND_PICK_OFFSET) % len;
    if second == first {
        second = (first + 1) % len;
    }

    let mut picks = vec![candidates[first]];
    if second != first {
        picks.push(candidates[second]);
    }

    picks
        .into_iter()
        .map(|dish| Dish {
            name: capitalize(dish),
            description: describe_dish(dish).to_string(),
        })
        .collect()
}
