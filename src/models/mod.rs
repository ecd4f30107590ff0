//! Data models for the aurora engine
//!
//! This module contains the input records the engine consumes:
//! - Location: geographic and geomagnetic coordinates, hemispheres
//! - Space weather: a single solar-wind telemetry sample

pub mod location;
pub mod space_weather;

// Re-export all public types for convenient access
pub use location::{GeographicPoint, GeomagneticPoint, Hemisphere};
pub use space_weather::SpaceWeatherSample;
