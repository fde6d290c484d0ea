// src/services/location.rs
// DOCUMENTATION: Location acquisition
// PURPOSE: Resolve the coordinates a discovery runs against

use crate::models::{Coordinates, LocationSource, ResolvedLocation};

/// Resolves reported device coordinates, falling back to a fixed default
pub struct LocationAcquirer {
    default: Coordinates,
}

impl LocationAcquirer {
    pub fn new(default: Coordinates) -> Self {
        Self { default }
    }

    /// Resolve coordinates for one discovery
    /// DOCUMENTATION: Missing, non-finite, or out-of-range coordinates are
    /// treated like a denied geolocation prompt and replaced by the default.
    pub fn resolve(&self, reported: Option<Coordinates>) -> ResolvedLocation {
        match reported {
            Some(coordinates) if coordinates.is_valid() => ResolvedLocation {
                coordinates,
                source: LocationSource::Device,
            },
            Some(coordinates) => {
                log::warn!(
                    "Reported coordinates {},{} are unusable, using default location",
                    coordinates.latitude,
                    coordinates.longitude
                );
                self.fallback()
            }
            None => {
                log::warn!("No device location reported, using default location");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> ResolvedLocation {
        ResolvedLocation {
            coordinates: self.default,
            source: LocationSource::Default,
        }
    }
}
