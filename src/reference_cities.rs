//! Reference-city dataset
//!
//! A read-only list of well-known aurora viewing spots used to populate the
//! `exampleCities` field of a verdict. The default list is compiled into the binary;
//! a replacement can be loaded from a JSON file with the same shape.

use crate::geomagnetic::{MagneticPole, to_geomagnetic};
use crate::models::GeographicPoint;
use crate::oval::{AuroralOvalGeometry, OvalCoefficients, oval_geometry};
use crate::visibility::{QualityTier, classify};
use crate::{AuroraError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

const EMBEDDED_CITIES: &str = include_str!("reference_cities.json");

/// How often a city sees aurora
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CityRating {
    Excellent,
    Good,
    Occasional,
    Rare,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCity {
    pub name: String,
    pub geographic_latitude: f64,
    pub geographic_longitude: f64,
    pub note: String,
    /// Lowest Kp with good viewing from this city
    pub min_kp: f64,
    pub rating: CityRating,
}

impl ReferenceCity {
    #[must_use]
    pub fn point(&self) -> GeographicPoint {
        GeographicPoint::new(self.geographic_latitude, self.geographic_longitude)
    }

    /// Visibility tier of this city against an oval
    #[must_use]
    pub fn tier(&self, oval: &AuroralOvalGeometry, pole: &MagneticPole) -> QualityTier {
        let geomagnetic = to_geomagnetic(&self.point(), pole);
        classify(geomagnetic.abs_latitude(), oval)
    }
}

/// Loaded, validated city list in dataset order
#[derive(Debug, Clone)]
pub struct ReferenceCities {
    cities: Vec<ReferenceCity>,
}

impl ReferenceCities {
    /// The list compiled into the crate
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CITIES)
    }

    /// Load a replacement list from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let cities = Self::from_json(&json)?;
        info!(path = %path.display(), count = cities.len(), "Loaded reference cities");
        Ok(cities)
    }

    /// Parse and validate a JSON array of cities
    pub fn from_json(json: &str) -> Result<Self> {
        let cities: Vec<ReferenceCity> = serde_json::from_str(json)
            .map_err(|e| AuroraError::dataset(format!("Invalid city list: {e}")))?;
        Self::new(cities)
    }

    pub fn new(cities: Vec<ReferenceCity>) -> Result<Self> {
        if cities.is_empty() {
            return Err(AuroraError::dataset("City list is empty"));
        }
        for city in &cities {
            city.point().validate().map_err(|e| {
                AuroraError::dataset(format!("City '{}' has invalid coordinates: {e}", city.name))
            })?;
            if !(0.0..=9.0).contains(&city.min_kp) {
                return Err(AuroraError::dataset(format!(
                    "City '{}' has minKp {} outside [0, 9]",
                    city.name, city.min_kp
                )));
            }
        }
        Ok(Self { cities })
    }

    #[must_use]
    pub fn cities(&self) -> &[ReferenceCity] {
        &self.cities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Names of cities whose tier at `kp` reaches `threshold`.
    ///
    /// Best tier first, dataset order within a tier, at most `limit` names.
    #[must_use]
    pub fn select_examples(
        &self,
        kp: f64,
        threshold: QualityTier,
        limit: usize,
        pole: &MagneticPole,
        coefficients: &OvalCoefficients,
    ) -> Vec<String> {
        let oval = oval_geometry(kp, coefficients);
        let mut candidates: Vec<(QualityTier, &ReferenceCity)> = self
            .cities
            .iter()
            .map(|city| (city.tier(&oval, pole), city))
            .filter(|(tier, _)| *tier != QualityTier::None && *tier >= threshold)
            .collect();

        // Stable sort keeps dataset order within a tier
        candidates.sort_by(|a, b| b.0.cmp(&a.0));

        debug!(kp, %threshold, matches = candidates.len(), "Selected example cities");

        candidates
            .into_iter()
            .take(limit)
            .map(|(_, city)| city.name.clone())
            .collect()
    }
}
