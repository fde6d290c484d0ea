// src/models/listing.rs
// DOCUMENTATION: Core data structures for service discovery
// PURPOSE: Normalized listing shape, query DTO, and discovery responses

use chrono::{DateTime, Utc};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::Category;

/// Placeholder values used when the provider omits a field
pub const UNNAMED_PLACE: &str = "Unnamed Place";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const UNKNOWN_DISTANCE: &str = "Unknown";
pub const NO_CONTACT: &str = "No contact";
pub const PRICE_VARIES: &str = "Varies";

/// Prefix marking synthesized identifiers
pub const SYNTHETIC_ID_PREFIX: &str = "mock-";

/// Geographic coordinates in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside the latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<Coordinates> for geo_types::Point<f64> {
    fn from(c: Coordinates) -> Self {
        geo_types::Point::new(c.longitude, c.latitude)
    }
}

/// Normalized, display-ready record describing a repair provider
/// DOCUMENTATION: rating, reviews, distance and contacts are always
/// populated, either from the provider or synthesized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListing {
    pub id: String,
    pub name: String,

    /// Address label or distance description
    pub location: String,

    /// One-decimal rating in [3.5, 5.0]
    pub rating: String,

    /// Review count in [50, 250)
    pub reviews: u32,

    pub price: String,

    /// "X.X km" or "Unknown"
    pub distance: String,

    /// Comma-joined phone numbers or "No contact"
    pub contacts: String,

    /// Map placement only
    pub position: Option<Coordinates>,

    /// True for listings produced by the fallback generator
    pub synthetic: bool,
}

/// Where the listings in a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    Live,
    Fallback,
}

/// Where the resolved coordinates came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Device,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub source: LocationSource,
}

/// Query parameters for GET /services/discover
/// DOCUMENTATION: lat/lon are what the device reported; both optional
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DiscoverQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Category search term; absent or blank means unfiltered
    pub category: Option<String>,

    /// Override of the configured result limit
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,

    /// "json" (default) or "geojson"
    pub format: Option<String>,
}

impl DiscoverQuery {
    /// Reported coordinates, only when both halves are present
    pub fn reported_coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

/// Response body of GET /services/discover
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverResponse {
    /// Correlation id for logs
    pub request_id: Uuid,

    /// Generation number of this request within its session
    pub generation: u64,

    pub source: ListingSource,
    pub category: Option<Category>,
    pub location: ResolvedLocation,
    pub listings: Vec<ServiceListing>,
    pub generated_at: DateTime<Utc>,
}

impl DiscoverResponse {
    /// Render listings as map markers
    /// DOCUMENTATION: One Point feature for the user plus one per listing
    /// that has a position. Listings without a position are omitted.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut features = Vec::with_capacity(self.listings.len() + 1);

        let mut user = JsonObject::new();
        user.insert("kind".to_string(), json!("user"));
        user.insert("source".to_string(), json!(self.location.source));
        features.push(marker(
            self.location.coordinates,
            "user-location".to_string(),
            user,
        ));

        for listing in &self.listings {
            let Some(position) = listing.position else {
                continue;
            };

            let mut props = JsonObject::new();
            props.insert("kind".to_string(), json!("service"));
            props.insert("name".to_string(), json!(listing.name));
            props.insert("location".to_string(), json!(listing.location));
            props.insert("rating".to_string(), json!(listing.rating));
            props.insert("reviews".to_string(), json!(listing.reviews));
            props.insert("distance".to_string(), json!(listing.distance));
            props.insert("contacts".to_string(), json!(listing.contacts));
            props.insert("synthetic".to_string(), json!(listing.synthetic));
            features.push(marker(position, listing.id.clone(), props));
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn marker(at: Coordinates, id: String, properties: JsonObject) -> Feature {
    let point: geo_types::Point<f64> = at.into();
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&point))),
        id: Some(Id::String(id)),
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, position: Option<Coordinates>) -> ServiceListing {
        ServiceListing {
            id: id.to_string(),
            name: "CoolAir Technicians".to_string(),
            location: "1.2 km from your location".to_string(),
            rating: "4.2".to_string(),
            reviews: 120,
            price: PRICE_VARIES.to_string(),
            distance: "1.2 km".to_string(),
            contacts: "+1 555-123-4567".to_string(),
            position,
            synthetic: true,
        }
    }

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(40.7128, -74.0060).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -181.0).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_reported_coordinates_requires_both() {
        let query = DiscoverQuery {
            lat: Some(1.0),
            ..Default::default()
        };
        assert!(query.reported_coordinates().is_none());

        let query = DiscoverQuery {
            lat: Some(1.0),
            lon: Some(2.0),
            ..Default::default()
        };
        assert_eq!(query.reported_coordinates(), Some(Coordinates::new(1.0, 2.0)));
    }

    #[test]
    fn test_limit_validation() {
        let query = DiscoverQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let query = DiscoverQuery {
            limit: Some(20),
            ..Default::default()
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_feature_collection_markers() {
        let response = DiscoverResponse {
            request_id: Uuid::new_v4(),
            generation: 1,
            source: ListingSource::Fallback,
            category: Some(Category::AirConditioning),
            location: ResolvedLocation {
                coordinates: Coordinates::new(40.7128, -74.0060),
                source: LocationSource::Default,
            },
            listings: vec![
                listing("mock-a", Some(Coordinates::new(40.71, -74.0))),
                listing("mock-b", None),
            ],
            generated_at: Utc::now(),
        };

        let collection = response.to_feature_collection();
        assert_eq!(collection.features.len(), 2);

        let value = serde_json::to_value(&collection).unwrap();
        let user = &value["features"][0];
        assert_eq!(user["properties"]["kind"], "user");
        // GeoJSON positions are [longitude, latitude]
        assert_eq!(user["geometry"]["coordinates"][0], -74.0060);
        assert_eq!(user["geometry"]["coordinates"][1], 40.7128);
        assert_eq!(value["features"][1]["id"], "mock-a");
    }
}
