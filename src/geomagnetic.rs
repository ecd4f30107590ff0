//! Geographic to geomagnetic coordinate transform
//!
//! Uses a tilted-dipole approximation: the magnetic pole is treated as a fixed point
//! on the sphere and the observer's geomagnetic latitude is 90° minus the great-circle
//! distance to that pole. Longitude is the azimuth of the observer seen from the pole.
//!
//! The pole position drifts by tens of kilometres per year, so it is injected as a
//! [`MagneticPole`] value (see `config`) rather than hard-wired into the math.

use crate::models::{GeographicPoint, GeomagneticPoint};
use serde::{Deserialize, Serialize};

/// Decimal places kept on transformed coordinates
const OUTPUT_DECIMALS: i32 = 2;

/// Below this sine of colatitude the observer sits on the pole and longitude is undefined
const POLE_EPSILON: f64 = 1e-6;

/// Position of the northern magnetic pole used by the dipole approximation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagneticPole {
    /// Geographic latitude of the pole in degrees
    pub latitude: f64,
    /// Geographic longitude of the pole in degrees (negative west)
    pub longitude: f64,
    /// Year by which the position should be reviewed against a current field model
    pub review_year: u16,
}

impl MagneticPole {
    /// Pole position at 86.1°N 156.8°W
    pub const CURRENT: MagneticPole = MagneticPole {
        latitude: 86.1,
        longitude: -156.8,
        review_year: 2030,
    };

    /// True when the configured review year is earlier than `year`
    #[must_use]
    pub fn is_review_overdue(&self, year: u16) -> bool {
        year > self.review_year
    }
}

impl Default for MagneticPole {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Convert a geographic position to geomagnetic coordinates.
///
/// The caller validates the input range; the function itself never fails.
#[must_use]
pub fn to_geomagnetic(point: &GeographicPoint, pole: &MagneticPole) -> GeomagneticPoint {
    let pole_lat = pole.latitude.to_radians();
    let lat = point.latitude.to_radians();
    let delta_lon = (point.longitude - pole.longitude).to_radians();

    // Spherical law of cosines: angular distance observer <-> pole
    let cos_distance =
        pole_lat.sin() * lat.sin() + pole_lat.cos() * lat.cos() * delta_lon.cos();
    let colatitude = cos_distance.clamp(-1.0, 1.0).acos();
    let latitude = 90.0 - colatitude.to_degrees();

    let sin_colatitude = colatitude.sin();
    let longitude = if sin_colatitude.abs() < POLE_EPSILON {
        0.0
    } else {
        // Azimuth components of the observer as seen from the pole
        let sin_az = lat.cos() * delta_lon.sin() / sin_colatitude;
        let cos_az =
            (pole_lat.cos() * lat.sin() - pole_lat.sin() * lat.cos() * delta_lon.cos())
                / sin_colatitude;
        normalize_longitude(sin_az.atan2(cos_az).to_degrees())
    };

    GeomagneticPoint {
        latitude: round_to(latitude, OUTPUT_DECIMALS),
        longitude: round_to(longitude, OUTPUT_DECIMALS),
    }
}

/// Wrap a longitude into (-180, 180]
fn normalize_longitude(degrees: f64) -> f64 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let multiplier = 10_f64.powi(decimals);
    let rounded = (value * multiplier).round() / multiplier;
    // avoid emitting -0.0
    if rounded == 0.0 { 0.0 } else { rounded }
}
