//! Aurora Engine - aurora visibility prediction from solar-wind telemetry
//!
//! This library turns a space-weather sample (Kp, Bz, Bt, speed, density) and an
//! optional observer position into an intensity verdict, a physics plausibility check,
//! and location-specific viewing guidance.

pub mod appearance;
pub mod config;
pub mod engine;
pub mod error;
pub mod geomagnetic;
pub mod intensity;
pub mod models;
pub mod oval;
pub mod physics;
pub mod reference_cities;
pub mod visibility;

// Re-export core types for public API
pub use appearance::{
    ApparentBrightness, AuroraColor, AuroraStructure, CameraGuidance, LocationPrediction,
    LookingToward, ViewingScenario,
};
pub use config::EngineConfig;
pub use engine::{AuroraEngine, LocationReport};
pub use error::AuroraError;
pub use geomagnetic::MagneticPole;
pub use intensity::{IntensityScore, IntensityVerdict, ScoreBreakdown, StrengthCategory};
pub use models::{GeographicPoint, GeomagneticPoint, Hemisphere, SpaceWeatherSample};
pub use oval::{AuroralOvalGeometry, OvalCoefficients};
pub use physics::{PhysicsCheck, PhysicsFlag};
pub use reference_cities::{CityRating, ReferenceCities, ReferenceCity};
pub use visibility::{QualityTier, VisibilityAssessment};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AuroraError>;
