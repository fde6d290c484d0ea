// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod health;
pub mod services;

pub use health::config as health_config;
pub use services::config as services_config;
