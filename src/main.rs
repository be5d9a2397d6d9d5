//! City-context: per-city environmental context aggregator.
//!
//! Single-binary Tokio application that:
//! 1. Fans out concurrent fetches to the four data sources
//! 2. Caches the aggregated snapshot for a bounded window
//! 3. Routes free-text questions to the relevant snapshot slice(s)
//! 4. Composes a textual answer plus structured relevant data

mod config;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use common::EngineConfig;
use engine::{ContextEngine, FetchOrchestrator};
use providers::{ShopOffersSource, TemperatureSource, TrafficSource, WeatherSource};

type Engine =
    ContextEngine<WeatherSource, TemperatureSource, TrafficSource, ShopOffersSource>;

/// City context aggregator and query console
#[derive(Parser)]
#[command(name = "city-context", about = "City context aggregator and query console")]
struct Cli {
    /// City to ask about (overrides the configured default).
    #[arg(long)]
    city: Option<String>,

    /// Country code to ask about (overrides the configured default).
    #[arg(long)]
    country: Option<String>,

    /// Answer a single query and exit.
    #[arg(long)]
    query: Option<String>,

    /// Print the cached-context summary as JSON and exit.
    #[arg(long)]
    summary: bool,

    /// Force a full refresh, print the snapshot fetch time, and exit.
    #[arg(long)]
    refresh: bool,
}

fn build_engine(cfg: &EngineConfig) -> Engine {
    let orchestrator = FetchOrchestrator::new(
        WeatherSource::new(&cfg.sources),
        TemperatureSource::new(&cfg.sources),
        TrafficSource::new(),
        ShopOffersSource::new(),
        cfg.cache.refresh_timeout_secs,
    );
    ContextEngine::new(orchestrator, &cfg.cache)
}

async fn print_answer(engine: &Engine, query: &str, city: &str, country: &str) {
    match engine.answer_query(query, city, country).await {
        Ok(result) => {
            println!("{}", result.answer);
        }
        Err(e) => {
            error!("Query failed: {}", e);
        }
    }
}

async fn print_summary(engine: &Engine) {
    let summary = engine.context_summary().await;
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to render summary: {}", e),
    }
}

/// Interactive console: free text answers a query; `city`, `refresh`,
/// `summary`, and `quit` control the session.
async fn run_console(engine: &Engine, mut city: String, mut country: String) {
    println!("Ask about weather, traffic, temperature, or shop offers in {city},{country}.");
    println!("Commands: city <name> [country] | refresh | summary | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        if stdout.write_all(b"> ").await.is_err() || stdout.flush().await.is_err() {
            break;
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("stdin error: {}", e);
                break;
            }
        };
        let input = line.trim();

        match input.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["summary"] => print_summary(engine).await,
            ["refresh"] => match engine.fetch_all(&city, &country).await {
                Ok(snapshot) => {
                    println!(
                        "Refreshed {} at {}",
                        snapshot.metadata.city, snapshot.metadata.fetched_at
                    );
                }
                Err(e) => error!("Refresh failed: {}", e),
            },
            ["city", name @ ..] if !name.is_empty() => {
                // Last token is a country code when it is two letters.
                let (name, code) = match name {
                    [head @ .., last] if last.len() == 2 && !head.is_empty() => {
                        (head.join(" "), Some(last.to_uppercase()))
                    }
                    _ => (name.join(" "), None),
                };
                city = name;
                if let Some(code) = code {
                    country = code;
                }
                println!("Context switched to {city},{country}");
            }
            _ => print_answer(engine, input, &city, &country).await,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "city_context=info,engine=info,providers=info".into()),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let city = cli.city.unwrap_or_else(|| cfg.city.clone());
    let country = cli.country.unwrap_or_else(|| cfg.country.clone());

    info!(
        "City context starting (city={}, country={}, ttl={}s)",
        city, country, cfg.cache.ttl_secs
    );
    if cfg.sources.openweather_api_key.is_empty() {
        info!("No OpenWeather API key configured; weather data will be mocked");
    }

    let engine = build_engine(&cfg);

    // ── One-shot modes ───────────────────────────────────────────────
    if cli.refresh {
        match engine.fetch_all(&city, &country).await {
            Ok(snapshot) => {
                info!(
                    "Snapshot for {} fetched at {}",
                    snapshot.metadata.city, snapshot.metadata.fetched_at
                );
            }
            Err(e) => {
                error!("Refresh failed: {}", e);
                std::process::exit(1);
            }
        }
        if !cli.summary && cli.query.is_none() {
            return;
        }
    }

    if cli.summary {
        print_summary(&engine).await;
        if cli.query.is_none() {
            return;
        }
    }

    if let Some(query) = cli.query {
        print_answer(&engine, &query, &city, &country).await;
        return;
    }

    // ── Interactive console ──────────────────────────────────────────
    run_console(&engine, city, country).await;

    info!("City context shut down.");
}
