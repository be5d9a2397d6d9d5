//! Domain types shared across the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Source fragments ──────────────────────────────────────────────────

/// Current-conditions fragment produced by the weather source.
///
/// Numeric fields are optional: a degraded fragment may omit them and
/// downstream rendering substitutes "N/A".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherFragment {
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub humidity: Option<i64>,
    #[serde(default)]
    pub pressure: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub main_condition: String,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub wind_direction: Option<i64>,
    #[serde(default)]
    pub visibility: Option<i64>,
    #[serde(default)]
    pub cloudiness: Option<i64>,
}

/// Derived temperature fragment with comfort bands and advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureFragment {
    pub city: String,
    pub country: String,
    pub current_temperature: f64,
    pub feels_like_temperature: f64,
    pub temperature_unit: String,
    pub temperature_range: TemperatureRange,
    pub recommendation: String,
    #[serde(default)]
    pub humidity: Option<i64>,
    pub wind_chill_factor: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub comfortable: bool,
    pub too_cold: bool,
    pub too_hot: bool,
}

/// Overall congestion level reported by the traffic source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Low,
    Moderate,
    Heavy,
    Severe,
}

impl TrafficLevel {
    pub const ALL: [TrafficLevel; 4] = [
        TrafficLevel::Low,
        TrafficLevel::Moderate,
        TrafficLevel::Heavy,
        TrafficLevel::Severe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficLevel::Low => "low",
            TrafficLevel::Moderate => "moderate",
            TrafficLevel::Heavy => "heavy",
            TrafficLevel::Severe => "severe",
        }
    }

    /// Canned travel advice for this congestion level.
    pub fn recommendation(&self) -> &'static str {
        match self {
            TrafficLevel::Low => "Traffic is light. Good time to travel.",
            TrafficLevel::Moderate => "Moderate traffic expected. Allow some extra time.",
            TrafficLevel::Heavy => {
                "Heavy traffic detected. Consider alternative routes or public transport."
            }
            TrafficLevel::Severe => {
                "Severe traffic congestion. Strongly recommend public transport or delay travel."
            }
        }
    }
}

impl std::fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one monitored route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStatus {
    pub name: String,
    pub status: TrafficLevel,
    pub delay_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakHours {
    pub morning: String,
    pub evening: String,
}

/// Traffic fragment produced by the traffic source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficFragment {
    pub city: String,
    pub country: String,
    pub overall_traffic_level: TrafficLevel,
    pub average_delay_minutes: i64,
    pub routes: Vec<RouteStatus>,
    pub recommendation: String,
    pub peak_hours: PeakHours,
}

/// A single shop offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopOffer {
    pub category: String,
    pub store: String,
    pub offer: String,
    pub description: String,
    pub valid_until: String,
    pub location: String,
    pub distance_km: f64,
}

impl ShopOffer {
    /// Discount magnitude used to rank deals. "Buy 1 Get 1 Free" counts
    /// as 50; "NN% OFF" counts as NN.
    pub fn discount_value(&self) -> f64 {
        if self.offer.eq_ignore_ascii_case("Buy 1 Get 1 Free") {
            return 50.0;
        }
        self.offer
            .trim_end_matches("% OFF")
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0)
    }
}

/// Shop offers fragment produced by the shop-offers source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopOffersFragment {
    pub city: String,
    pub country: String,
    pub total_offers: usize,
    pub featured_offers: Vec<ShopOffer>,
    pub category_offers: Vec<ShopOffer>,
    pub all_offers: Vec<ShopOffer>,
    /// Top 3 offers by discount magnitude.
    pub best_deals: Vec<ShopOffer>,
}

// ── Snapshot ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub city: String,
    pub country: String,
    pub fetched_at: DateTime<Utc>,
}

/// One consistent, atomically-refreshed bundle of all four fragments
/// for a single city. Built only by the orchestrator; never partial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub weather: WeatherFragment,
    pub temperature: TemperatureFragment,
    pub traffic: TrafficFragment,
    pub shop_offers: ShopOffersFragment,
    pub metadata: SnapshotMetadata,
}

// ── Query answering ───────────────────────────────────────────────────

/// One fragment tagged with the category it answers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "category", content = "data", rename_all = "snake_case")]
pub enum CategoryFragment {
    Weather(WeatherFragment),
    Temperature(TemperatureFragment),
    Traffic(TrafficFragment),
    ShopOffers(ShopOffersFragment),
}

/// The slice of the snapshot a query was routed to.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RelevantData {
    /// Fragments for the matched categories, in category order.
    Selected(Vec<CategoryFragment>),
    /// The whole snapshot, for general queries.
    FullSnapshot(Snapshot),
}

/// Composed answer to one query.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub query: String,
    pub answer: String,
    pub relevant_data: RelevantData,
    pub timestamp: DateTime<Utc>,
    pub city: String,
    pub country: String,
}

// ── Monitoring summary ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    NoData,
    DataAvailable,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AvailableData {
    pub weather: bool,
    pub traffic: bool,
    pub temperature: bool,
    pub shop_offers: bool,
}

/// Cache status report for monitoring/UI; not used by the answering path.
#[derive(Debug, Clone, Serialize)]
pub struct ContextSummary {
    pub status: SummaryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    pub cache_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_data: Option<AvailableData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(text: &str) -> ShopOffer {
        ShopOffer {
            category: "Groceries".into(),
            store: "SuperMart".into(),
            offer: text.into(),
            description: String::new(),
            valid_until: "2026-09-01".into(),
            location: "London City Center".into(),
            distance_km: 1.0,
        }
    }

    #[test]
    fn test_discount_value_percent() {
        assert_eq!(offer("35% OFF").discount_value(), 35.0);
        assert_eq!(offer("10% OFF").discount_value(), 10.0);
    }

    #[test]
    fn test_discount_value_bogof() {
        assert_eq!(offer("Buy 1 Get 1 Free").discount_value(), 50.0);
    }

    #[test]
    fn test_discount_value_unparseable() {
        assert_eq!(offer("Free gift").discount_value(), 0.0);
    }

    #[test]
    fn test_traffic_level_serializes_lowercase() {
        let json = serde_json::to_string(&TrafficLevel::Heavy).unwrap();
        assert_eq!(json, "\"heavy\"");
    }

    #[test]
    fn test_category_fragment_is_tagged() {
        let frag = CategoryFragment::Traffic(TrafficFragment {
            city: "London".into(),
            country: "GB".into(),
            overall_traffic_level: TrafficLevel::Low,
            average_delay_minutes: 3,
            routes: vec![],
            recommendation: TrafficLevel::Low.recommendation().into(),
            peak_hours: PeakHours {
                morning: "07:00 - 09:00".into(),
                evening: "17:00 - 19:00".into(),
            },
        });
        let json = serde_json::to_value(&frag).unwrap();
        assert_eq!(json["category"], "traffic");
        assert_eq!(json["data"]["overall_traffic_level"], "low");
    }
}
