// src/services/discovery_service.rs
// DOCUMENTATION: Provider discovery business logic
// PURPOSE: Resolve location, query the provider, normalize or fall back

use crate::config::{Config, FallbackPolicy};
use crate::errors::DiscoveryError;
use crate::models::{
    Category, Coordinates, DiscoverResponse, ListingSource, ServiceListing, SessionContext,
};
use crate::services::{
    CacheStats, FallbackGenerator, HerePlace, HerePlacesClient, LocationAcquirer,
    RequestTracker, ResponseCache,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// One discovery as requested by a caller
#[derive(Debug, Clone, Default)]
pub struct DiscoveryRequest {
    /// Coordinates the device reported, if any
    pub reported: Option<Coordinates>,
    pub category: Option<Category>,
    /// Overrides the configured result limit
    pub limit: Option<u32>,
}

/// Discovery service
/// DOCUMENTATION: Owns the provider client and the fallback policy.
/// Shared state (cache, tracker) is injected so the HTTP layer and
/// background tasks see the same instances.
pub struct DiscoveryService {
    client: HerePlacesClient,
    cache: Arc<ResponseCache>,
    tracker: Arc<RequestTracker>,
    locator: LocationAcquirer,
    policy: FallbackPolicy,
    fallback_count: usize,
    result_limit: u32,
}

impl DiscoveryService {
    /// Build the service from configuration
    pub fn from_config(
        config: &Config,
        cache: Arc<ResponseCache>,
        tracker: Arc<RequestTracker>,
    ) -> Result<Self, DiscoveryError> {
        let client = HerePlacesClient::new(
            config.here_api_key.clone(),
            config.here_base_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
            config.outbound_rate_per_sec,
        )?;

        Ok(Self {
            client,
            cache,
            tracker,
            locator: LocationAcquirer::new(Coordinates::new(
                config.default_latitude,
                config.default_longitude,
            )),
            policy: config.fallback_policy,
            fallback_count: config.fallback_count,
            result_limit: config.result_limit,
        })
    }

    /// Run one discovery for a session
    /// DOCUMENTATION: Resolves location, queries the provider (or cache),
    /// then applies the fallback policy. If another discovery for the same
    /// session started meanwhile, this one resolves to `Superseded`.
    ///
    /// Under `FallbackPolicy::Mask` only `Superseded` can be returned as an
    /// error; provider failures always become synthetic listings.
    pub async fn discover(
        &self,
        session: &SessionContext,
        request: DiscoveryRequest,
    ) -> Result<DiscoverResponse, DiscoveryError> {
        let request_id = Uuid::new_v4();
        let location = self.locator.resolve(request.reported);
        let ticket = self.tracker.begin(session).await;
        let limit = request.limit.unwrap_or(self.result_limit);

        log::debug!(
            "Discovery {} (generation {}): category={:?} at={:?}",
            request_id,
            ticket.generation,
            request.category,
            location
        );

        let fetched = self
            .fetch_places(location.coordinates, request.category, limit)
            .await;

        if !self.tracker.is_current(&ticket).await {
            log::info!(
                "Discovery {} superseded, dropping response (generation {})",
                request_id,
                ticket.generation
            );
            return Err(DiscoveryError::Superseded {
                generation: ticket.generation,
            });
        }

        let (source, listings) =
            self.resolve_listings(fetched, location.coordinates, request.category)?;

        log::info!(
            "Discovery {} returned {} {:?} listings",
            request_id,
            listings.len(),
            source
        );

        Ok(DiscoverResponse {
            request_id,
            generation: ticket.generation,
            source,
            category: request.category,
            location,
            listings,
            generated_at: Utc::now(),
        })
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Provider items for an area, from cache when possible
    async fn fetch_places(
        &self,
        at: Coordinates,
        category: Option<Category>,
        limit: u32,
    ) -> Result<Vec<HerePlace>, DiscoveryError> {
        let cache_key = ResponseCache::generate_key(at, category, limit);
        if let Some(items) = self.cache.get(&cache_key).await {
            return Ok(items);
        }

        let items = self.client.discover(at, category, limit).await?;
        if !items.is_empty() {
            self.cache.set(cache_key, items.clone()).await;
        }
        Ok(items)
    }

    /// Turn a provider outcome into listings according to the fallback policy
    fn resolve_listings(
        &self,
        fetched: Result<Vec<HerePlace>, DiscoveryError>,
        origin: Coordinates,
        category: Option<Category>,
    ) -> Result<(ListingSource, Vec<ServiceListing>), DiscoveryError> {
        let mut rng = rand::rng();

        match fetched {
            Ok(items) if !items.is_empty() => {
                let listings = items
                    .iter()
                    .map(|item| item.to_listing(origin, &mut rng))
                    .collect();
                Ok((ListingSource::Live, listings))
            }
            Ok(_) => match self.policy {
                FallbackPolicy::Mask => {
                    log::warn!("Places provider returned no items, using fallback listings");
                    Ok((ListingSource::Fallback, self.fallback(origin, category)))
                }
                FallbackPolicy::Surface => Ok((ListingSource::Live, Vec::new())),
            },
            Err(e) if e.is_upstream() => match self.policy {
                FallbackPolicy::Mask => {
                    log::warn!("Places provider failed ({}), using fallback listings", e);
                    Ok((ListingSource::Fallback, self.fallback(origin, category)))
                }
                FallbackPolicy::Surface => {
                    log::warn!("Places provider failed ({}), surfacing error", e);
                    Err(e)
                }
            },
            Err(e) => Err(e),
        }
    }

    fn fallback(&self, origin: Coordinates, category: Option<Category>) -> Vec<ServiceListing> {
        FallbackGenerator::generate(&mut rand::rng(), origin, category, self.fallback_count)
    }
}
