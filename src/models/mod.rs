// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod geocode;
pub mod location;
pub mod place;
pub mod request;

pub use geocode::*;
pub use location::*;
pub use place::*;
pub use request::*;
