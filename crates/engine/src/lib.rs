//! Aggregation, caching, and query-routing engine.
//!
//! Fans out the four source fetches, keeps one atomically-refreshed
//! snapshot behind a TTL, classifies free-text queries into topical
//! intents, and composes answers from the cached snapshot.

pub mod cache;
pub mod compose;
pub mod engine;
pub mod intent;
pub mod orchestrator;

pub use cache::{Freshness, SnapshotCache};
pub use compose::compose;
pub use engine::ContextEngine;
pub use intent::{classify, Intent};
pub use orchestrator::FetchOrchestrator;
