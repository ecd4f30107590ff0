//! Space-weather telemetry sample

use crate::{AuroraError, Result};
use serde::{Deserialize, Serialize};

/// Upper bound of the planetary Kp scale
pub const KP_MAX: f64 = 9.0;

/// One solar-wind and geomagnetic sample, supplied per call
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpaceWeatherSample {
    /// Planetary Kp index (0-9)
    pub kp: f64,
    /// IMF north-south component in nT, negative is southward
    pub bz: f64,
    /// IMF total magnitude in nT
    pub bt: f64,
    /// Solar wind bulk speed in km/s
    pub speed: f64,
    /// Solar wind proton density in particles/cm³
    pub density: f64,
}

impl SpaceWeatherSample {
    #[must_use]
    pub fn new(kp: f64, bz: f64, bt: f64, speed: f64, density: f64) -> Self {
        Self {
            kp,
            bz,
            bt,
            speed,
            density,
        }
    }

    /// Fail fast on telemetry that is outside its physical range.
    ///
    /// Nothing is clamped here: clamping would hide a broken upstream feed.
    pub fn validate(&self) -> Result<()> {
        validate_kp(self.kp)?;
        if !self.bz.is_finite() {
            return Err(AuroraError::input_range("bz", self.bz, "a finite value in nT"));
        }
        non_negative("bt", self.bt, "a value >= 0 nT")?;
        non_negative("speed", self.speed, "a value >= 0 km/s")?;
        non_negative("density", self.density, "a value >= 0 p/cm³")?;
        Ok(())
    }

    /// True when the IMF points south, the orientation that couples to the magnetosphere
    #[must_use]
    pub fn is_bz_southward(&self) -> bool {
        self.bz < 0.0
    }

    /// Format IMF information
    #[must_use]
    pub fn format_imf(&self) -> String {
        let direction = if self.is_bz_southward() { "south" } else { "north" };
        format!("Bz {:.1} nT ({direction}), Bt {:.1} nT", self.bz, self.bt)
    }

    /// Format solar wind plasma information
    #[must_use]
    pub fn format_plasma(&self) -> String {
        format!("{:.0} km/s, {:.1} p/cm³", self.speed, self.density)
    }
}

/// Reject a Kp value outside [0, 9]
pub fn validate_kp(kp: f64) -> Result<()> {
    if !kp.is_finite() || !(0.0..=KP_MAX).contains(&kp) {
        return Err(AuroraError::input_range("kp", kp, "[0, 9]"));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64, expected: &str) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AuroraError::input_range(field, value, expected));
    }
    Ok(())
}
