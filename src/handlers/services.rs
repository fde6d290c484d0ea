// src/handlers/services.rs
// DOCUMENTATION: HTTP handlers for service discovery
// PURPOSE: Parse requests, call the discovery service, return responses

use crate::errors::DiscoveryError;
use crate::models::{Category, CategoryResponse, DiscoverQuery, SessionContext};
use crate::services::{DiscoveryRequest, DiscoveryService};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Output representation of GET /services/discover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseFormat {
    Json,
    GeoJson,
}

impl ResponseFormat {
    fn parse(raw: Option<&str>) -> Result<Self, DiscoveryError> {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("json") => Ok(ResponseFormat::Json),
            Some("geojson") => Ok(ResponseFormat::GeoJson),
            Some(other) => Err(DiscoveryError::InvalidInput(format!(
                "Unsupported format: {}",
                other
            ))),
        }
    }
}

/// GET /services/discover
/// Discover repair providers near the caller
pub async fn discover(
    service: web::Data<DiscoveryService>,
    session: SessionContext,
    query: web::Query<DiscoverQuery>,
) -> Result<impl Responder, DiscoveryError> {
    if let Err(e) = query.validate() {
        return Err(DiscoveryError::ValidationError(e.to_string()));
    }

    let query = query.into_inner();
    let format = ResponseFormat::parse(query.format.as_deref())?;
    let request = DiscoveryRequest {
        reported: query.reported_coordinates(),
        category: Category::parse_optional(query.category.as_deref())?,
        limit: query.limit,
    };

    let response = service.discover(&session, request).await?;

    Ok(match format {
        ResponseFormat::Json => HttpResponse::Ok().json(response),
        ResponseFormat::GeoJson => HttpResponse::Ok()
            .content_type("application/geo+json")
            .json(response.to_feature_collection()),
    })
}

/// GET /services/categories
/// List the repair categories a caller can pick from
pub async fn list_categories() -> impl Responder {
    let categories: Vec<CategoryResponse> = Category::ALL.into_iter().map(Into::into).collect();
    HttpResponse::Ok().json(categories)
}

/// GET /services/cache/stats
pub async fn cache_stats(service: web::Data<DiscoveryService>) -> impl Responder {
    HttpResponse::Ok().json(service.cache_stats().await)
}

/// Configuration for discovery routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/services")
            .route("/discover", web::get().to(discover))
            .route("/categories", web::get().to(list_categories))
            .route("/cache/stats", web::get().to(cache_stats)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::{RequestTracker, ResponseCache};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;
    use std::sync::Arc;

    fn discovery_data() -> web::Data<DiscoveryService> {
        let config = Config {
            here_api_key: "test-key".to_string(),
            // Nothing listens here, so discovery always falls back
            here_base_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        let service = DiscoveryService::from_config(
            &config,
            Arc::new(ResponseCache::new(60)),
            Arc::new(RequestTracker::new()),
        )
        .unwrap();
        web::Data::new(service)
    }

    #[actix_web::test]
    async fn test_response_format_parsing() {
        assert_eq!(ResponseFormat::parse(None).unwrap(), ResponseFormat::Json);
        assert_eq!(
            ResponseFormat::parse(Some("GeoJSON")).unwrap(),
            ResponseFormat::GeoJson
        );
        assert!(ResponseFormat::parse(Some("xml")).is_err());
    }

    #[actix_web::test]
    async fn test_list_categories() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::get()
            .uri("/services/categories")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.as_array().unwrap().len(), 6);
        assert_eq!(body[1]["id"], "AC repair");
        assert_eq!(body[1]["name"], "Air Conditioning");
    }

    #[actix_web::test]
    async fn test_discover_requires_bearer_token() {
        let app = test::init_service(
            App::new()
                .app_data(discovery_data())
                .configure(config),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/services/discover?lat=40.7128&lon=-74.006")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[actix_web::test]
    async fn test_discover_falls_back_when_provider_unreachable() {
        let app = test::init_service(
            App::new()
                .app_data(discovery_data())
                .configure(config),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/services/discover?lat=40.7128&lon=-74.006&category=AC%20repair")
            .insert_header(("Authorization", "Bearer session-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["source"], "fallback");
        assert_eq!(body["category"], "AC repair");
        assert_eq!(body["location"]["source"], "device");

        let listings = body["listings"].as_array().unwrap();
        assert_eq!(listings.len(), 5);
        assert!(listings.iter().all(|l| l["synthetic"] == true));
        assert!(listings.iter().all(|l| l["price"] == "Varies"));
    }

    #[actix_web::test]
    async fn test_discover_rejects_unknown_category() {
        let app = test::init_service(
            App::new()
                .app_data(discovery_data())
                .configure(config),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/services/discover?category=plumbing")
            .insert_header(("Authorization", "Bearer session-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_discover_rejects_zero_limit() {
        let app = test::init_service(
            App::new()
                .app_data(discovery_data())
                .configure(config),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/services/discover?limit=0")
            .insert_header(("Authorization", "Bearer session-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_discover_geojson_markers() {
        let app = test::init_service(
            App::new()
                .app_data(discovery_data())
                .configure(config),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/services/discover?format=geojson")
            .insert_header(("Authorization", "Bearer session-2"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["type"], "FeatureCollection");
        // user marker plus five fallback listings
        assert_eq!(body["features"].as_array().unwrap().len(), 6);
        assert_eq!(body["features"][0]["properties"]["source"], "default");
    }
}
