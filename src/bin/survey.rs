// src/bin/survey.rs
use anyhow::{bail, Context};
use dotenv::dotenv;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::time::{Duration, Instant};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

// --- Wire types (subset of what the service returns) ---

#[derive(Deserialize, Debug)]
struct CategoryEntry {
    id: String,
    name: String,
}

#[derive(Deserialize, Debug)]
struct Listing {
    name: String,
    rating: String,
    distance: String,
    #[serde(default)]
    synthetic: bool,
}

#[derive(Deserialize, Debug)]
struct DiscoverLocation {
    source: String,
}

#[derive(Deserialize, Debug)]
struct DiscoverResponse {
    source: String,
    generation: u64,
    location: DiscoverLocation,
    #[serde(default)]
    listings: Vec<Listing>,
}

#[derive(Debug)]
struct SurveyResult {
    category: String,
    outcome: Result<SurveyRow, String>,
    duration_secs: f64,
}

#[derive(Debug)]
struct SurveyRow {
    source: String,
    listings: usize,
    synthetic: usize,
}

// --- Runner ---

struct CategorySurvey {
    base_url: String,
    token: String,
    at: Option<(f64, f64)>,
    client: Client,
    results: Vec<SurveyResult>,
}

impl CategorySurvey {
    fn new(base_url: String, token: String, at: Option<(f64, f64)>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url,
            token,
            at,
            client,
            results: Vec::new(),
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn fetch_categories(&self) -> anyhow::Result<Vec<CategoryEntry>> {
        let response = self
            .client
            .get(format!("{}/services/categories", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn discover(&self, category: &str) -> Result<DiscoverResponse, String> {
        let mut query: Vec<(&str, String)> = vec![("category", category.to_string())];
        if let Some((lat, lon)) = self.at {
            query.push(("lat", lat.to_string()));
            query.push(("lon", lon.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/services/discover", self.base_url))
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            response
                .json::<DiscoverResponse>()
                .await
                .map_err(|e| format!("Failed to parse response JSON: {}", e))
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(format!("HTTP {} - {}", status, body))
        }
    }

    async fn run(&mut self) -> anyhow::Result<()> {
        println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
        if !self.check_service_health().await {
            println!("{}❌ Service unavailable at {}{}", RED, self.base_url, RESET);
            bail!("homefix-services is not reachable");
        }
        println!("{}✅ Service available{}\n", GREEN, RESET);

        let categories = self.fetch_categories().await?;
        println!(
            "{}📊 Surveying {} categories{}\n",
            BOLD,
            categories.len(),
            RESET
        );

        let total = categories.len();
        for (i, category) in categories.iter().enumerate() {
            println!(
                "{}[{}/{}] {} ({}){}",
                CYAN,
                i + 1,
                total,
                category.name,
                category.id,
                RESET
            );

            let start = Instant::now();
            let outcome = self.discover(&category.id).await;
            let duration_secs = start.elapsed().as_secs_f64();

            let outcome = match outcome {
                Ok(resp) => {
                    let synthetic = resp.listings.iter().filter(|l| l.synthetic).count();
                    let color = if resp.source == "live" { GREEN } else { YELLOW };
                    println!(
                        "{}  {} listings from {} (generation {}, location: {}){}",
                        color,
                        resp.listings.len(),
                        resp.source,
                        resp.generation,
                        resp.location.source,
                        RESET
                    );
                    if let Some(top) = resp.listings.first() {
                        println!(
                            "  first: {} ★{} {}",
                            top.name, top.rating, top.distance
                        );
                    }
                    Ok(SurveyRow {
                        source: resp.source,
                        listings: resp.listings.len(),
                        synthetic,
                    })
                }
                Err(err) => {
                    println!("{}  ❌ {}{}", RED, err, RESET);
                    Err(err)
                }
            };

            self.results.push(SurveyResult {
                category: category.name.clone(),
                outcome,
                duration_secs,
            });
        }

        self.print_summary();
        Ok(())
    }

    fn print_summary(&self) {
        println!("\n{}📋 Survey Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────────────────────────");
        println!(
            "{:<20} {:<10} {:>10} {:>10} {:>10}",
            "Category", "Source", "Listings", "Synthetic", "Duration"
        );
        println!("──────────────────────────────────────────────────────────────────");

        let mut fallbacks = 0;
        let mut failures = 0;

        for res in &self.results {
            match &res.outcome {
                Ok(row) => {
                    if row.source != "live" {
                        fallbacks += 1;
                    }
                    println!(
                        "{:<20} {:<10} {:>10} {:>10} {:>9.2}s",
                        res.category, row.source, row.listings, row.synthetic, res.duration_secs
                    );
                }
                Err(_) => {
                    failures += 1;
                    println!(
                        "{:<20} {:<10} {:>10} {:>10} {:>9.2}s",
                        res.category, "error", "-", "-", res.duration_secs
                    );
                }
            }
        }

        println!("──────────────────────────────────────────────────────────────────");
        if fallbacks > 0 {
            println!(
                "{}⚠️  {} categories served fallback data - check the places provider{}",
                YELLOW, fallbacks, RESET
            );
        }
        if failures > 0 {
            println!("{}❌ {} categories failed{}", RED, failures, RESET);
        } else {
            println!("{}✨ Survey completed{}", GREEN, RESET);
        }
    }
}

fn coordinates_from_env() -> Option<(f64, f64)> {
    let lat = env::var("SURVEY_LAT").ok()?.parse().ok()?;
    let lon = env::var("SURVEY_LON").ok()?.parse().ok()?;
    Some((lat, lon))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let token = env::var("SURVEY_TOKEN").context("SURVEY_TOKEN must be set in .env")?;
    let base_url =
        env::var("HOMEFIX_URL").unwrap_or_else(|_| "http://localhost:8003".to_string());

    if env::var("HERE_API_KEY").is_err() {
        println!(
            "{}⚠️  HERE_API_KEY not found in .env. If the server shares this .env, expect fallback data.{}",
            YELLOW, RESET
        );
    }

    let mut survey = CategorySurvey::new(base_url, token, coordinates_from_env())?;
    survey.run().await
}
