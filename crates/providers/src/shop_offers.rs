//! Synthetic shop-offers source.
//!
//! Offer feeds are proprietary, so this source fabricates one offer per
//! category plus two fixed featured deals, and ranks the top discounts.

use chrono::{Duration, Utc};
use common::{ShopOffer, ShopOffersFragment};
use rand::Rng;

use crate::{ContextSource, SourceCache, SOURCE_TTL_SECS};

const CATEGORIES: [&str; 5] = [
    "Groceries",
    "Electronics",
    "Fashion",
    "Restaurants",
    "Entertainment",
];

pub struct ShopOffersSource {
    cache: SourceCache<ShopOffersFragment>,
}

impl ShopOffersSource {
    pub fn new() -> Self {
        Self {
            cache: SourceCache::new(SOURCE_TTL_SECS),
        }
    }
}

impl Default for ShopOffersSource {
    fn default() -> Self {
        Self::new()
    }
}

fn valid_until(days_ahead: i64) -> String {
    (Utc::now() + Duration::days(days_ahead))
        .format("%Y-%m-%d")
        .to_string()
}

fn category_offers(city: &str) -> Vec<ShopOffer> {
    let mut rng = rand::thread_rng();

    CATEGORIES
        .iter()
        .map(|category| {
            let discount: i64 = rng.gen_range(10..=50);
            ShopOffer {
                category: (*category).into(),
                store: format!("{} Store {}", category, rng.gen_range(1..=5)),
                offer: format!("{}% OFF", discount),
                description: format!("Special {}% discount on selected items", discount),
                valid_until: valid_until(rng.gen_range(1..=7)),
                location: format!("{} City Center", city),
                distance_km: (rng.gen_range(0.5_f64..=5.0) * 10.0).round() / 10.0,
            }
        })
        .collect()
}

fn featured_offers(city: &str) -> Vec<ShopOffer> {
    vec![
        ShopOffer {
            category: "Restaurants".into(),
            store: "City Bistro".into(),
            offer: "Buy 1 Get 1 Free".into(),
            description: "Lunch special - Buy one main course, get one free".into(),
            valid_until: valid_until(3),
            location: format!("{} Downtown", city),
            distance_km: 1.2,
        },
        ShopOffer {
            category: "Groceries".into(),
            store: "SuperMart".into(),
            offer: "20% OFF".into(),
            description: "Weekly grocery special - 20% off on all fresh produce".into(),
            valid_until: valid_until(2),
            location: format!("{} Shopping District", city),
            distance_km: 2.5,
        },
    ]
}

/// Top deals by discount magnitude, largest first.
fn best_deals(offers: &[ShopOffer], limit: usize) -> Vec<ShopOffer> {
    let mut ranked: Vec<ShopOffer> = offers.to_vec();
    ranked.sort_by(|a, b| {
        b.discount_value()
            .partial_cmp(&a.discount_value())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

fn generate_fragment(city: &str, country: &str) -> ShopOffersFragment {
    let featured = featured_offers(city);
    let by_category = category_offers(city);

    let mut all_offers = featured.clone();
    all_offers.extend(by_category.iter().cloned());

    ShopOffersFragment {
        city: city.to_string(),
        country: country.to_string(),
        total_offers: all_offers.len(),
        featured_offers: featured,
        category_offers: by_category,
        best_deals: best_deals(&all_offers, 3),
        all_offers,
    }
}

impl ContextSource for ShopOffersSource {
    type Fragment = ShopOffersFragment;

    const NAME: &'static str = "shop_offers";

    async fn fetch(&self, city: &str, country: &str) -> common::Result<ShopOffersFragment> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let fragment = generate_fragment(city, country);
        self.cache.put(fragment.clone());
        Ok(fragment)
    }
}
