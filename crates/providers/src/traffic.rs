//! Synthetic traffic source.
//!
//! Real traffic feeds sit behind paid APIs, so this source generates a
//! plausible random picture of the city's major routes each refresh.

use common::{PeakHours, RouteStatus, TrafficFragment, TrafficLevel};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{ContextSource, SourceCache, SOURCE_TTL_SECS};

const ROUTE_NAMES: [&str; 5] = [
    "City Center - Airport",
    "City Center - North District",
    "City Center - South District",
    "City Center - East District",
    "City Center - West District",
];

pub struct TrafficSource {
    cache: SourceCache<TrafficFragment>,
}

impl TrafficSource {
    pub fn new() -> Self {
        Self {
            cache: SourceCache::new(SOURCE_TTL_SECS),
        }
    }
}

impl Default for TrafficSource {
    fn default() -> Self {
        Self::new()
    }
}

fn random_level<R: Rng>(rng: &mut R) -> TrafficLevel {
    *TrafficLevel::ALL.choose(rng).unwrap_or(&TrafficLevel::Low)
}

fn generate_fragment(city: &str, country: &str) -> TrafficFragment {
    let mut rng = rand::thread_rng();

    let overall = random_level(&mut rng);

    // The airport route always reflects the overall level; the district
    // routes vary independently.
    let mut routes = vec![RouteStatus {
        name: ROUTE_NAMES[0].into(),
        status: overall,
        delay_minutes: rng.gen_range(5..=30),
    }];
    for (name, max_delay) in ROUTE_NAMES[1..].iter().zip([20, 25, 15, 20]) {
        routes.push(RouteStatus {
            name: (*name).into(),
            status: random_level(&mut rng),
            delay_minutes: rng.gen_range(0..=max_delay),
        });
    }

    let average_delay_minutes =
        routes.iter().map(|r| r.delay_minutes).sum::<i64>() / routes.len() as i64;

    TrafficFragment {
        city: city.to_string(),
        country: country.to_string(),
        overall_traffic_level: overall,
        average_delay_minutes,
        routes,
        recommendation: overall.recommendation().into(),
        peak_hours: PeakHours {
            morning: "07:00 - 09:00".into(),
            evening: "17:00 - 19:00".into(),
        },
    }
}

impl ContextSource for TrafficSource {
    type Fragment = TrafficFragment;

    const NAME: &'static str = "traffic";

    async fn fetch(&self, city: &str, country: &str) -> common::Result<TrafficFragment> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let fragment = generate_fragment(city, country);
        self.cache.put(fragment.clone());
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_fragment_shape() {
        let frag = generate_fragment("London", "GB");

        assert_eq!(frag.city, "London");
        assert_eq!(frag.routes.len(), 5);
        assert_eq!(frag.routes[0].name, "City Center - Airport");
        assert_eq!(frag.routes[0].status, frag.overall_traffic_level);
        assert_eq!(
            frag.recommendation,
            frag.overall_traffic_level.recommendation()
        );
        assert_eq!(frag.peak_hours.morning, "07:00 - 09:00");
    }

    #[test]
    fn test_average_delay_is_integer_mean() {
        let frag = generate_fragment("London", "GB");
        let expected =
            frag.routes.iter().map(|r| r.delay_minutes).sum::<i64>() / frag.routes.len() as i64;
        assert_eq!(frag.average_delay_minutes, expected);
    }

    #[tokio::test]
    async fn test_fetch_serves_local_cache_within_ttl() {
        let source = TrafficSource::new();
        let first = source.fetch("London", "GB").await.expect("never fails");
        let second = source.fetch("London", "GB").await.expect("never fails");

        // Randomized payload, so identical delays prove a cache hit.
        let delays =
            |f: &TrafficFragment| f.routes.iter().map(|r| r.delay_minutes).collect::<Vec<_>>();
        assert_eq!(delays(&first), delays(&second));
    }
}
