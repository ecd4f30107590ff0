//! Location models for geographic and geomagnetic coordinates

use crate::{AuroraError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observer position in geographic coordinates (WGS84 decimal degrees)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeographicPoint {
    /// Latitude in decimal degrees, -90 to 90
    pub latitude: f64,
    /// Longitude in decimal degrees, -180 to 180
    pub longitude: f64,
}

/// Position in the tilted-dipole geomagnetic frame
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeomagneticPoint {
    /// Geomagnetic latitude in degrees, signed (negative south)
    pub latitude: f64,
    /// Geomagnetic longitude in degrees, -180 to 180
    pub longitude: f64,
}

/// Hemisphere of an observer, decides which way "poleward" points
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Northern,
    Southern,
}

impl GeographicPoint {
    /// Create a new geographic point
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Reject coordinates outside [-90, 90] x [-180, 180] or non-finite values
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AuroraError::input_range(
                "latitude",
                self.latitude,
                "[-90, 90] degrees",
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AuroraError::input_range(
                "longitude",
                self.longitude,
                "[-180, 180] degrees",
            ));
        }
        Ok(())
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl GeomagneticPoint {
    /// Hemisphere the point lies in; the geomagnetic equator counts as northern
    #[must_use]
    pub fn hemisphere(&self) -> Hemisphere {
        Hemisphere::from_latitude(self.latitude)
    }

    /// Unsigned geomagnetic latitude
    #[must_use]
    pub fn abs_latitude(&self) -> f64 {
        self.latitude.abs()
    }
}

impl Hemisphere {
    #[must_use]
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude < 0.0 {
            Hemisphere::Southern
        } else {
            Hemisphere::Northern
        }
    }

    /// Compass word for the direction of the nearer magnetic pole
    #[must_use]
    pub fn poleward(self) -> &'static str {
        match self {
            Hemisphere::Northern => "north",
            Hemisphere::Southern => "south",
        }
    }

    /// Compass word for the direction of the equator
    #[must_use]
    pub fn equatorward(self) -> &'static str {
        match self {
            Hemisphere::Northern => "south",
            Hemisphere::Southern => "north",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hemisphere::Northern => write!(f, "northern"),
            Hemisphere::Southern => write!(f, "southern"),
        }
    }
}
