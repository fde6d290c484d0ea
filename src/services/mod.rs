// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod discovery_service;
pub mod fallback;
pub mod here_client;
pub mod location;
pub mod request_tracker;

pub use cache::*;
pub use discovery_service::*;
pub use fallback::*;
pub use here_client::*;
pub use location::*;
pub use request_tracker::*;
