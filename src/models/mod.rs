// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod category;
pub mod listing;
pub mod session;

pub use category::*;
pub use listing::*;
pub use session::*;
