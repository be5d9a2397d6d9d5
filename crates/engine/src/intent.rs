//! Keyword-based query classification.
//!
//! A query maps to every category whose keyword list matches it, in fixed
//! enumeration order. A query matching nothing gets the general fallback.

use serde::Serialize;

/// Topical bucket a query is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Weather,
    Temperature,
    Traffic,
    Shopping,
    /// Fallback when no category keyword matches.
    General,
}

/// Category keyword lists, in the order categories are evaluated and
/// answers are composed.
const KEYWORDS: [(Intent, &[&str]); 4] = [
    (
        Intent::Weather,
        &[
            "weather", "rain", "sunny", "cloudy", "wind", "humidity", "pressure",
        ],
    ),
    (
        Intent::Temperature,
        &["temperature", "temp", "hot", "cold", "warm", "cool"],
    ),
    (
        Intent::Traffic,
        &["traffic", "road", "route", "congestion", "delay", "commute"],
    ),
    (
        Intent::Shopping,
        &[
            "shop", "store", "offer", "deal", "discount", "sale", "buy", "shopping",
        ],
    ),
];

/// Classify a free-text query into matched categories.
///
/// Case-insensitive substring matching; categories are independent and
/// non-exclusive, so a query can match several. The result is
/// duplicate-free and ordered weather → temperature → traffic → shopping.
pub fn classify(query: &str) -> Vec<Intent> {
    let lowered = query.to_lowercase();

    let mut intents: Vec<Intent> = KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(intent, _)| *intent)
        .collect();

    if intents.is_empty() {
        intents.push(Intent::General);
    }
    intents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_category() {
        assert_eq!(classify("How's the traffic today?"), vec![Intent::Traffic]);
        assert_eq!(classify("Will it rain tomorrow?"), vec![Intent::Weather]);
    }

    #[test]
    fn test_multi_category_in_fixed_order() {
        assert_eq!(
            classify("Is it hot and are there deals?"),
            vec![Intent::Temperature, Intent::Shopping]
        );
        // Order follows the table, not the query.
        assert_eq!(
            classify("any deals? also how hot is it"),
            vec![Intent::Temperature, Intent::Shopping]
        );
    }

    #[test]
    fn test_general_fallback() {
        assert_eq!(classify("Tell me about the city"), vec![Intent::General]);
        assert_eq!(classify(""), vec![Intent::General]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("WEATHER please"), vec![Intent::Weather]);
    }

    #[test]
    fn test_substring_matching() {
        // "temp" matches inside "temperature"; "shop" inside "shopping".
        assert_eq!(
            classify("temperature for shopping trips"),
            vec![Intent::Temperature, Intent::Shopping]
        );
    }

    #[test]
    fn test_no_duplicates_from_multiple_keywords() {
        assert_eq!(
            classify("rain, wind and humidity"),
            vec![Intent::Weather]
        );
    }
}
