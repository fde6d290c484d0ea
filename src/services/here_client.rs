// src/services/here_client.rs
// DOCUMENTATION: HERE Discover API client
// PURPOSE: Query the places provider and map its items to service listings

use crate::errors::DiscoveryError;
use crate::models::{
    Category, Coordinates, ServiceListing, NO_CONTACT, PRICE_VARIES, UNKNOWN_DISTANCE,
    UNKNOWN_LOCATION, UNNAMED_PLACE,
};
use crate::services::fallback::{synthesize_rating, synthesize_review_count, synthetic_id};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

/// Jitter applied to items the provider returns without a position
const MISSING_POSITION_JITTER_DEGREES: f64 = 0.01;

/// HERE Discover API client
/// DOCUMENTATION: Handles authentication, outbound rate limiting and
/// response parsing for the places provider
pub struct HerePlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// HERE API key
    api_key: String,
    /// Base URL, e.g. https://discover.search.hereapi.com/v1
    base_url: String,
    /// Outbound request budget
    limiter: DefaultDirectRateLimiter,
}

/// Response from HERE Discover
/// DOCUMENTATION: `items` is optional so that a response without it can be
/// reported as malformed instead of failing deserialization
#[derive(Debug, Deserialize, Serialize)]
pub struct HereDiscoverResponse {
    pub items: Option<Vec<HerePlace>>,
}

/// Individual place item; every field may be missing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HerePlace {
    pub id: Option<String>,
    pub title: Option<String>,
    pub address: Option<HereAddress>,
    /// Distance from the search point in meters
    pub distance: Option<f64>,
    pub contacts: Option<Vec<HereContactBlock>>,
    pub position: Option<HerePosition>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HereAddress {
    pub label: Option<String>,
}

/// One block of contact channels
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HereContactBlock {
    pub mobile: Option<Vec<HereContactValue>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HereContactValue {
    pub value: Option<String>,
}

/// Item position; a partial or out-of-range one is ignored, not rejected
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct HerePosition {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl HerePosition {
    /// Usable coordinates, if both halves are present and in range
    pub fn coordinates(&self) -> Option<Coordinates> {
        let coords = Coordinates::new(self.lat?, self.lng?);
        coords.is_valid().then_some(coords)
    }
}

/// Provider text with blank values treated as absent
fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty()).cloned()
}

/// "X.X km" from meters, "Unknown" when absent
pub fn format_distance(meters: Option<f64>) -> String {
    match meters {
        Some(m) if m.is_finite() => format!("{:.1} km", m / 1000.0),
        _ => UNKNOWN_DISTANCE.to_string(),
    }
}

/// Mobile numbers of the first contact block, comma separated
pub fn format_contacts(contacts: Option<&[HereContactBlock]>) -> String {
    let numbers: Vec<&str> = contacts
        .and_then(|blocks| blocks.first())
        .and_then(|block| block.mobile.as_deref())
        .unwrap_or_default()
        .iter()
        .filter_map(|c| c.value.as_deref())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();

    if numbers.is_empty() {
        NO_CONTACT.to_string()
    } else {
        numbers.join(", ")
    }
}

impl HerePlace {
    /// Convert a provider item into a ServiceListing
    /// DOCUMENTATION: Copies what the provider supplied and synthesizes
    /// rating and review count, which HERE does not return.
    ///
    /// # Arguments
    /// * `origin` - Search coordinates, used to place items with no position
    /// * `rng` - Random source for the synthesized fields
    pub fn to_listing<R: Rng>(&self, origin: Coordinates, rng: &mut R) -> ServiceListing {
        let position = match self.position.and_then(|p| p.coordinates()) {
            Some(coords) => coords,
            None => Coordinates::new(
                origin.latitude + (rng.random::<f64>() - 0.5) * MISSING_POSITION_JITTER_DEGREES,
                origin.longitude + (rng.random::<f64>() - 0.5) * MISSING_POSITION_JITTER_DEGREES,
            ),
        };

        ServiceListing {
            id: non_blank(self.id.as_ref()).unwrap_or_else(|| synthetic_id(rng)),
            name: non_blank(self.title.as_ref()).unwrap_or_else(|| UNNAMED_PLACE.to_string()),
            location: non_blank(self.address.as_ref().and_then(|a| a.label.as_ref()))
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            rating: synthesize_rating(rng),
            reviews: synthesize_review_count(rng),
            price: PRICE_VARIES.to_string(),
            distance: format_distance(self.distance),
            contacts: format_contacts(self.contacts.as_deref()),
            position: Some(position),
            synthetic: false,
        }
    }
}

impl HerePlacesClient {
    /// Create new HERE Discover client
    ///
    /// # Arguments
    /// * `api_key` - HERE API key (may be empty; every call then fails)
    /// * `base_url` - API root without the `/discover` path
    /// * `timeout` - Per-request timeout
    /// * `rate_per_sec` - Outbound requests allowed per second (0 is treated as 1)
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: Duration,
        rate_per_sec: u32,
    ) -> Result<Self, DiscoveryError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            log::error!("Failed to build HTTP client: {}", e);
            DiscoveryError::InternalError
        })?;

        let rate = NonZeroU32::new(rate_per_sec).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::direct(Quota::per_second(rate)),
        })
    }

    /// Discover places near a point
    /// DOCUMENTATION: Single GET against `{base_url}/discover`
    ///
    /// # Arguments
    /// * `at` - Search center
    /// * `category` - Optional filter; `None` sends no `q` parameter at all
    /// * `limit` - Maximum number of items requested
    ///
    /// # Returns
    /// Raw provider items; an empty vector when the provider found nothing
    pub async fn discover(
        &self,
        at: Coordinates,
        category: Option<Category>,
        limit: u32,
    ) -> Result<Vec<HerePlace>, DiscoveryError> {
        if self.api_key.is_empty() {
            return Err(DiscoveryError::ExternalApiError(
                "HERE API key not configured".to_string(),
            ));
        }

        if self.limiter.check().is_err() {
            log::warn!("Outbound rate limit reached for places provider");
            return Err(DiscoveryError::RateLimitExceeded);
        }

        let url = format!("{}/discover", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("at", format!("{},{}", at.latitude, at.longitude)),
            ("limit", limit.to_string()),
        ];
        if let Some(category) = category {
            params.push(("q", category.search_term().to_string()));
        }
        params.push(("apiKey", self.api_key.clone()));

        log::debug!(
            "HERE discover: at={},{} limit={} category={:?}",
            at.latitude,
            at.longitude,
            limit,
            category.map(|c| c.search_term())
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("HERE discover request failed: {}", e);
                DiscoveryError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            log::error!("HERE discover quota exceeded");
            return Err(DiscoveryError::RateLimitExceeded);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("HERE discover error {}: {}", status, body);
            return Err(DiscoveryError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let body = response.text().await.map_err(|e| {
            DiscoveryError::ExternalApiError(format!("Failed to read body: {}", e))
        })?;

        let parsed: HereDiscoverResponse = serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to parse HERE discover response: {}", e);
            DiscoveryError::MalformedResponse(format!("Parse error: {}", e))
        })?;

        match parsed.items {
            Some(items) => {
                log::info!("HERE discover returned {} items", items.len());
                Ok(items)
            }
            None => Err(DiscoveryError::MalformedResponse(
                "response missing items array".to_string(),
            )),
        }
    }
}
