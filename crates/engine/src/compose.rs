//! Answer composition.
//!
//! Builds one templated sentence per matched category from literal
//! snapshot fields, plus a structured `relevant_data` payload. Pure:
//! repeated calls with the same inputs yield identical output.

use chrono::{DateTime, Utc};
use common::{AnswerResult, CategoryFragment, RelevantData, Snapshot};

use crate::intent::Intent;

const FALLBACK_ANSWER: &str = "I couldn't find specific information for your query.";

fn fmt_f64(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn fmt_i64(value: Option<i64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn fmt_str(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

fn weather_sentence(snapshot: &Snapshot) -> String {
    let w = &snapshot.weather;
    format!(
        "Weather in {}: {}, Temperature: {}°C, Humidity: {}%",
        w.city,
        fmt_str(&w.description),
        fmt_f64(w.temperature),
        fmt_i64(w.humidity)
    )
}

fn temperature_sentence(snapshot: &Snapshot) -> String {
    let t = &snapshot.temperature;
    format!(
        "Current temperature: {}°C. {}",
        t.current_temperature, t.recommendation
    )
}

fn traffic_sentence(snapshot: &Snapshot) -> String {
    let t = &snapshot.traffic;
    format!(
        "Traffic level: {}. {}",
        t.overall_traffic_level, t.recommendation
    )
}

fn shopping_sentence(snapshot: &Snapshot) -> String {
    let offers = &snapshot.shop_offers;
    if offers.best_deals.is_empty() {
        return format!(
            "Found {} offers available in the city.",
            offers.total_offers
        );
    }

    let deals: Vec<String> = offers
        .best_deals
        .iter()
        .take(3)
        .map(|deal| format!("{} - {}", deal.store, deal.offer))
        .collect();
    format!("Best deals available: {}", deals.join(", "))
}

fn general_sentence(snapshot: &Snapshot) -> String {
    format!(
        "City conditions for {}: Weather: {}, Temperature: {}°C, Traffic: {}, Available offers: {}",
        snapshot.metadata.city,
        fmt_str(&snapshot.weather.description),
        snapshot.temperature.current_temperature,
        snapshot.traffic.overall_traffic_level,
        snapshot.shop_offers.total_offers
    )
}

/// Compose the answer for the matched intents from the current snapshot.
///
/// Sentences are joined with a single space in category order. The
/// timestamp is supplied by the caller so composition stays clock-free.
pub fn compose(
    snapshot: &Snapshot,
    intents: &[Intent],
    query: &str,
    timestamp: DateTime<Utc>,
) -> AnswerResult {
    let mut sentences: Vec<String> = Vec::new();
    let mut fragments: Vec<CategoryFragment> = Vec::new();
    let mut full_snapshot = false;

    for intent in intents {
        match intent {
            Intent::Weather => {
                sentences.push(weather_sentence(snapshot));
                fragments.push(CategoryFragment::Weather(snapshot.weather.clone()));
            }
            Intent::Temperature => {
                sentences.push(temperature_sentence(snapshot));
                fragments.push(CategoryFragment::Temperature(snapshot.temperature.clone()));
            }
            Intent::Traffic => {
                sentences.push(traffic_sentence(snapshot));
                fragments.push(CategoryFragment::Traffic(snapshot.traffic.clone()));
            }
            Intent::Shopping => {
                sentences.push(shopping_sentence(snapshot));
                fragments.push(CategoryFragment::ShopOffers(snapshot.shop_offers.clone()));
            }
            Intent::General => {
                sentences.push(general_sentence(snapshot));
                full_snapshot = true;
            }
        }
    }

    let answer = if sentences.is_empty() {
        FALLBACK_ANSWER.to_string()
    } else {
        sentences.join(" ")
    };

    let relevant_data = if full_snapshot {
        RelevantData::FullSnapshot(snapshot.clone())
    } else {
        RelevantData::Selected(fragments)
    };

    AnswerResult {
        query: query.to_string(),
        answer,
        relevant_data,
        timestamp,
        city: snapshot.metadata.city.clone(),
        country: snapshot.metadata.country.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use common::SnapshotMetadata;

    fn snapshot() -> Snapshot {
        Snapshot {
            weather: testutil::weather_fragment("London", "GB"),
            temperature: testutil::temperature_fragment("London", "GB"),
            traffic: testutil::traffic_fragment("London", "GB"),
            shop_offers: testutil::shop_offers_fragment("London", "GB"),
            metadata: SnapshotMetadata {
                city: "London".into(),
                country: "GB".into(),
                fetched_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_weather_answer() {
        let snap = snapshot();
        let result = compose(&snap, &[Intent::Weather], "weather?", Utc::now());

        assert_eq!(
            result.answer,
            "Weather in London: partly cloudy, Temperature: 15.5°C, Humidity: 65%"
        );
        match &result.relevant_data {
            RelevantData::Selected(frags) => {
                assert_eq!(frags.len(), 1);
                assert!(matches!(frags[0], CategoryFragment::Weather(_)));
            }
            RelevantData::FullSnapshot(_) => panic!("expected selected fragments"),
        }
    }

    #[test]
    fn test_multi_intent_joins_in_order() {
        let snap = snapshot();
        let result = compose(
            &snap,
            &[Intent::Temperature, Intent::Shopping],
            "hot deals",
            Utc::now(),
        );

        let temp_pos = result
            .answer
            .find("Current temperature:")
            .expect("temperature sentence present");
        let deals_pos = result
            .answer
            .find("Best deals available:")
            .expect("shopping sentence present");
        assert!(temp_pos < deals_pos);

        match &result.relevant_data {
            RelevantData::Selected(frags) => assert_eq!(frags.len(), 2),
            RelevantData::FullSnapshot(_) => panic!("expected selected fragments"),
        }
    }

    #[test]
    fn test_shopping_lists_top_three_deals() {
        let snap = snapshot();
        let result = compose(&snap, &[Intent::Shopping], "deals", Utc::now());

        assert_eq!(
            result.answer,
            "Best deals available: City Bistro - Buy 1 Get 1 Free, \
             Gadget Hub - 40% OFF, SuperMart - 20% OFF"
        );
    }

    #[test]
    fn test_shopping_falls_back_to_count() {
        let mut snap = snapshot();
        snap.shop_offers.best_deals.clear();
        let result = compose(&snap, &[Intent::Shopping], "deals", Utc::now());

        assert_eq!(result.answer, "Found 3 offers available in the city.");
    }

    #[test]
    fn test_general_answer_covers_all_fragments() {
        let snap = snapshot();
        let result = compose(&snap, &[Intent::General], "", Utc::now());

        assert_eq!(
            result.answer,
            "City conditions for London: Weather: partly cloudy, Temperature: 15.5°C, \
             Traffic: moderate, Available offers: 3"
        );
        assert!(matches!(
            result.relevant_data,
            RelevantData::FullSnapshot(_)
        ));
    }

    #[test]
    fn test_empty_intents_yields_fallback() {
        let snap = snapshot();
        let result = compose(&snap, &[], "???", Utc::now());
        assert_eq!(result.answer, FALLBACK_ANSWER);
    }

    #[test]
    fn test_missing_values_render_na() {
        let mut snap = snapshot();
        snap.weather.temperature = None;
        snap.weather.humidity = None;
        snap.weather.description = String::new();

        let result = compose(&snap, &[Intent::Weather], "weather?", Utc::now());
        assert_eq!(
            result.answer,
            "Weather in London: N/A, Temperature: N/A°C, Humidity: N/A%"
        );
    }

    #[test]
    fn test_compose_is_deterministic() {
        let snap = snapshot();
        let ts = Utc::now();
        let a = compose(&snap, &[Intent::Weather, Intent::Traffic], "q", ts);
        let b = compose(&snap, &[Intent::Weather, Intent::Traffic], "q", ts);

        assert_eq!(a.answer, b.answer);
        assert_eq!(
            serde_json::to_string(&a.relevant_data).unwrap(),
            serde_json::to_string(&b.relevant_data).unwrap()
        );
    }
}
