// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, shared discovery state, and start HTTP server

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{start_cleanup_task, start_prune_task, DiscoveryService, RequestTracker, ResponseCache};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Sessions idle this long are forgotten by the request tracker
const SESSION_IDLE_SECS: u64 = 1800;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting homefix-services...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );
    log::info!(
        "Fallback policy: {:?} ({} listings)",
        config.fallback_policy,
        config.fallback_count
    );

    // 4. Shared discovery state
    let cache = Arc::new(ResponseCache::new(config.cache_ttl_secs));
    let tracker = Arc::new(RequestTracker::new());

    start_cleanup_task(cache.clone(), config.cache_cleanup_interval_secs);
    start_prune_task(
        tracker.clone(),
        config.cache_cleanup_interval_secs,
        Duration::from_secs(SESSION_IDLE_SECS),
    );
    log::info!(
        "Started cache cleanup and session prune tasks (interval: {}s)",
        config.cache_cleanup_interval_secs
    );

    let discovery = match DiscoveryService::from_config(&config, cache, tracker) {
        Ok(service) => web::Data::new(service),
        Err(e) => {
            log::error!("Failed to initialize discovery service: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);

    HttpServer::new(move || {
        App::new()
            .app_data(discovery.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::services_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
