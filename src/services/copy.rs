//! Mood-keyed copy attached to recommendations.
//!
//! Flavor text (boosts, insights, badges, playful reasons) is picked at random
//! behind [`CopyProvider`]. Reasoning, tips, chef messages and the
//! "why this place" sentence are deterministic.

use rand::seq::SliceRandom;

use crate::models::{FoodIntent, Mood, NormalizedRestaurant, PriceConstraint};

const HIGHLY_RATED_THRESHOLD: f64 = 4.5;

fn mood_boosts(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &["Perfect for celebrating!", "Keep the joy flowing!", "Match your happy vibes!"],
        Mood::Calm => &["Peaceful ambiance", "Relaxing atmosphere", "Zen dining experience"],
        Mood::Stressed => &["Stress-melting comfort", "Unwind here", "Calm your mind"],
        Mood::Tired => &["Energy-boosting menu", "Revitalizing options", "Recharge station"],
        Mood::Energetic => &["Fuel your fire!", "Power-up spot", "High-energy vibes"],
        Mood::Pms => &["Comfort & care", "Iron-rich options", "Self-care dining"],
        Mood::Anxious => &["Calming atmosphere", "Soothing choices", "Peace on a plate"],
        Mood::Sad => &["Mood-lifting treats", "Comfort food therapy", "Feel-good flavors"],
    }
}

/// Nutrition insight pool for a mood
pub fn nutrition_insights(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Tired => &["Rich in iron & B12", "Complex carbs for sustained energy", "Protein-packed"],
        Mood::Stressed => &["High in magnesium", "Omega-3 rich", "Vitamin B complex"],
        Mood::Sad => &["Tryptophan boost", "Vitamin D support", "Serotonin-friendly"],
        Mood::Happy => &["Balanced nutrition", "Vibrant ingredients", "Feel-good foods"],
        Mood::Anxious => &["Gut-friendly probiotics", "Anti-inflammatory", "Calming herbs"],
        Mood::Calm => &["Light & balanced", "Gentle on digestion", "Mindful portions"],
        Mood::Energetic => &["High protein", "Performance fuel", "Muscle-supporting"],
        Mood::Pms => &["Iron-rich", "Magnesium boost", "Hormone-balancing"],
    }
}

fn energy_badges(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Tired => &["⚡ Energy Boost", "🔋 Recharge", "💪 Power Up"],
        Mood::Stressed => &["🧘 Calming", "💆 De-stress", "🌿 Soothing"],
        Mood::Sad => &["🌈 Mood Lift", "💙 Comfort", "🤗 Warming"],
        Mood::Happy => &["🌟 Celebration", "✨ Joyful", "🎉 Festive"],
        Mood::Anxious => &["🌊 Calming", "🕊️ Peaceful", "🍃 Gentle"],
        Mood::Calm => &["☯️ Balanced", "🧘 Zen", "🌸 Tranquil"],
        Mood::Energetic => &["🔥 Power", "⚡ Fuel", "🚀 Momentum"],
        Mood::Pms => &["🌸 Care", "💜 Comfort", "🍫 Indulgent"],
    }
}

pub const PLAYFUL_REASONS: &[&str] = &[
    "Your taste buds called and said YES! 📞",
    "The food gods have spoken favorably! 👑",
    "This one hits different, trust us! 💫",
    "Your stomach will send you a thank-you note! 📝",
    "Destiny brought you here for a reason! ✨",
    "We have a good feeling about this one! 🔮",
    "Warning: May cause extreme satisfaction! ⚠️",
    "Happiness served on a plate! 🍽️",
];

fn mood_reason(mood: Mood) -> &'static str {
    match mood {
        Mood::Tired => "Energy-boosting menu with iron-rich options",
        Mood::Stressed => "Calming ambiance perfect for unwinding",
        Mood::Sad => "Comfort food that lifts your spirits",
        Mood::Happy => "Celebratory vibes to match your mood",
        Mood::Anxious => "Peaceful setting with soothing flavors",
        Mood::Calm => "Balanced menu for mindful dining",
        Mood::Energetic => "High-protein options to fuel your energy",
        Mood::Pms => "Iron-rich comfort food for self-care",
    }
}

fn keyword_reason(keyword: &str) -> Option<&'static str> {
    match keyword.trim().to_lowercase().as_str() {
        "cheesy" => Some("Known for amazing cheese-loaded dishes 🧀"),
        "spicy" => Some("Perfect for spice lovers seeking heat 🌶️"),
        "healthy" => Some("Fresh, nutritious options made daily 🥗"),
        "comfort" => Some("Hearty portions of soul-satisfying food 🤗"),
        "light" => Some("Light, refreshing options perfect for you 🌿"),
        _ => None,
    }
}

/// Randomly chosen per-mood copy for one restaurant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCopy {
    pub mood_boost: String,
    pub nutrition_insight: String,
    pub energy_badge: String,
}

/// Source of flavor text
pub trait CopyProvider: Send + Sync {
    fn mood_copy(&self, mood: Mood) -> MoodCopy;
    fn playful_reason(&self) -> String;
}

/// Picks uniformly at random from the copy pools
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCopy;

impl CopyProvider for RandomCopy {
    fn mood_copy(&self, mood: Mood) -> MoodCopy {
        let mut rng = rand::thread_rng();
        let mut pick = |pool: &[&str]| pool.choose(&mut rng).copied().unwrap_or_default().to_string();
        MoodCopy {
            mood_boost: pick(mood_boosts(mood)),
            nutrition_insight: pick(nutrition_insights(mood)),
            energy_badge: pick(energy_badges(mood)),
        }
    }

    fn playful_reason(&self) -> String {
        PLAYFUL_REASONS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default()
            .to_string()
    }
}

/// Always returns the first entry of each pool
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCopy;

impl CopyProvider for FixedCopy {
    fn mood_copy(&self, mood: Mood) -> MoodCopy {
        let first = |pool: &[&str]| pool.first().copied().unwrap_or_default().to_string();
        MoodCopy {
            mood_boost: first(mood_boosts(mood)),
            nutrition_insight: first(nutrition_insights(mood)),
            energy_badge: first(energy_badges(mood)),
        }
    }

    fn playful_reason(&self) -> String {
        PLAYFUL_REASONS[0].to_string()
    }
}

/// "{reason}. {rating tier} {primary cuisine} spot."
///
/// The first keyword with a dedicated reason replaces the mood reason.
pub fn why_this_place<K: AsRef<str>>(
    restaurant: &NormalizedRestaurant,
    mood: Mood,
    keywords: &[K],
) -> String {
    let reason = keywords
        .iter()
        .find_map(|k| keyword_reason(k.as_ref()))
        .unwrap_or_else(|| mood_reason(mood));
    let rating_text = if restaurant.rating >= HIGHLY_RATED_THRESHOLD {
        "Highly rated"
    } else {
        "Well reviewed"
    };
    format!("{}. {} {} spot.", reason, rating_text, restaurant.primary_cuisine())
}

pub fn scientific_reasoning<K: AsRef<str>>(mood: Mood, keywords: &[K]) -> String {
    let mut reasoning = match mood {
        Mood::Happy => "Dopamine-rich foods enhance your already positive mood. We've selected restaurants with vibrant, satisfying options that maintain your feel-good state.",
        Mood::Calm => "L-theanine and magnesium-rich foods promote relaxation. Our picks feature balanced, gentle flavors that support your peaceful state.",
        Mood::Stressed => "Omega-3s and B-vitamins help reduce cortisol levels. We've chosen places known for comfort foods with stress-reducing nutrients.",
        Mood::Tired => "Iron and B12 boost energy production at the cellular level. These restaurants offer revitalizing meals rich in energy-boosting nutrients.",
        Mood::Energetic => "Complex carbs and protein sustain your high energy. We've matched you with places that fuel performance without the crash.",
        Mood::Pms => "Magnesium and iron help alleviate PMS symptoms. Our selections feature comfort foods with hormone-balancing properties.",
        Mood::Anxious => "Gut-brain axis research shows probiotics reduce anxiety. We've picked places with calming, gut-friendly options.",
        Mood::Sad => "Tryptophan converts to serotonin, the 'happiness hormone'. These comfort-food spots are chosen to naturally boost your mood.",
    }
    .to_string();

    if keywords.iter().any(|k| k.as_ref().eq_ignore_ascii_case("cheesy")) {
        reasoning.push_str(
            " Plus, cheese contains casomorphins that provide that cozy, satisfied feeling!",
        );
    }
    reasoning
}

pub fn mood_tips(mood: Mood) -> Vec<String> {
    let tips: [&str; 3] = match mood {
        Mood::Happy => [
            "🌟 Share your meal with friends to amplify the joy!",
            "📸 Capture the moment - food photos boost happiness hormones!",
            "🎵 Play upbeat music while eating to enhance the experience.",
        ],
        Mood::Calm => [
            "🧘 Practice mindful eating - savor each bite slowly.",
            "🌿 Choose a quiet corner for a peaceful dining experience.",
            "💧 Stay hydrated - water complements calm digestion.",
        ],
        Mood::Stressed => [
            "🫁 Take 3 deep breaths before your first bite.",
            "📵 Put your phone away and be present with your food.",
            "🍫 Dark chocolate post-meal can help reduce cortisol.",
        ],
        Mood::Tired => [
            "☀️ Eat near a window - natural light boosts energy.",
            "🚶 A short walk after eating improves digestion and alertness.",
            "🍌 Pair your meal with potassium-rich sides for energy.",
        ],
        Mood::Energetic => [
            "💪 Protein within 30 minutes sustains your momentum!",
            "🥗 Balance with greens to avoid the energy crash.",
            "⏰ Regular meal timing maintains peak energy levels.",
        ],
        Mood::Pms => [
            "🍫 A small dark chocolate treat is scientifically beneficial!",
            "💧 Extra hydration helps with bloating and mood.",
            "🥬 Iron-rich leafy greens replenish what you're losing.",
        ],
        Mood::Anxious => [
            "🫖 Warm beverages like tea have calming effects.",
            "🌸 Lavender or chamomile after meals aid relaxation.",
            "🧠 Fermented foods support the gut-brain connection.",
        ],
        Mood::Sad => [
            "☀️ Vitamin D from eggs or fortified foods lifts mood.",
            "🤗 Comfort food is okay - nourishing yourself is self-care.",
            "🍊 Citrus scents while eating can boost serotonin.",
        ],
    };
    tips.iter().map(|tip| tip.to_string()).collect()
}

/// Chat-style opener; intent takes precedence over mood
pub fn chef_message(intent: &FoodIntent, mood: Mood) -> String {
    let has = |keyword: &str| intent.keywords.iter().any(|k| k == keyword);

    let message = if intent.is_cheesy_intent && intent.price_constraint == PriceConstraint::Cheap {
        "Ohhh, cheesy AND budget-friendly? 🧀💛\nYou're speaking my love language!\n\nI've found the best cheese-loaded spots that won't break the bank! All Italian, French, Mexican & Continental goodness 👇"
    } else if intent.is_cheesy_intent {
        "Someone's got a cheese craving! 🧀✨\nI totally get it – cheese makes everything better.\n\nHere are my top cheesy picks from Italian, French & Mexican spots 👇"
    } else if has("comfort") {
        "Comfort food coming right up! 🤗🍲\nSometimes we just need food that feels like a warm hug.\n\nLet me find you the coziest spots 👇"
    } else if has("spicy") || has("hot") {
        "Feeling adventurous? 🌶️🔥\nLet's turn up the heat!\n\nHere are spots that'll light you up 👇"
    } else if has("healthy") || has("light") {
        "Keeping it fresh and light! 🥗💚\nYour body will thank you for this.\n\nHere are my healthiest picks 👇"
    } else if has("sweet") {
        "Sweet tooth calling! 🍰🍫\nLife is short, eat dessert first!\n\nHere are my sweetest recommendations 👇"
    } else {
        match mood {
            Mood::Tired => "Hey, I can tell you're running low on energy 🔋💙\nLet's get you something that'll recharge those batteries.\n\nHere's some comfort coming your way 👇",
            Mood::Stressed => "Take a deep breath... 💆✨\nFood is my favorite form of therapy.\n\nLet me find you something calming 👇",
            Mood::Sad => "Hey, sending you a warm foodie hug 🤗💛\nFood can't fix everything, but it helps!\n\nHere's some soul-soothing goodness 👇",
            Mood::Happy => "Love your energy today! 🌟🎉\nLet's celebrate with something delicious!\n\nHere are my top picks for you 👇",
            Mood::Anxious => "It's okay, let's find you something soothing 🌊💙\nGood food has a way of calming the mind.\n\nHere are some peaceful options 👇",
            _ => "I've got just the thing for you! 🍽️✨\nLet me work my magic...\n\nHere are my recommendations 👇",
        }
    };
    message.to_string()
}
