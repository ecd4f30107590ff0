//! Empirical auroral oval model
//!
//! Maps the planetary Kp index to three boundary latitudes of the auroral oval.
//! The oval contracts toward the pole as activity drops and expands toward the
//! equator as it rises.
//!
//! The fit coefficients were calibrated together against an external reference model.
//! They live in one [`OvalCoefficients`] value so a recalibration replaces all of them
//! at once.

use serde::{Deserialize, Serialize};

/// Linear fit coefficients for the oval boundaries (degrees geomagnetic)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvalCoefficients {
    /// Equatorward edge at Kp 0
    pub base_latitude: f64,
    /// Equatorward movement per Kp unit
    pub kp_slope: f64,
    /// Lowest latitude the equatorward edge may reach
    pub min_equatorward: f64,
    /// Distance from equatorward edge to oval center
    pub center_offset: f64,
    /// Highest latitude the center may reach
    pub max_center: f64,
    /// Distance from equatorward edge to poleward edge
    pub poleward_offset: f64,
    /// Highest latitude the poleward edge may reach
    pub max_poleward: f64,
}

impl OvalCoefficients {
    pub const CALIBRATED: OvalCoefficients = OvalCoefficients {
        base_latitude: 67.0,
        kp_slope: 2.5,
        min_equatorward: 45.0,
        center_offset: 6.0,
        max_center: 73.0,
        poleward_offset: 11.0,
        max_poleward: 78.0,
    };
}

impl Default for OvalCoefficients {
    fn default() -> Self {
        Self::CALIBRATED
    }
}

/// Oval boundary latitudes for one Kp value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuroralOvalGeometry {
    pub equatorward_edge: f64,
    pub center_latitude: f64,
    pub poleward_edge: f64,
}

/// Oval geometry at `kp`.
///
/// Kp is expected to be validated to [0, 9] upstream; it is not clamped here.
#[must_use]
pub fn oval_geometry(kp: f64, coefficients: &OvalCoefficients) -> AuroralOvalGeometry {
    let equatorward_edge = (coefficients.base_latitude - coefficients.kp_slope * kp)
        .max(coefficients.min_equatorward);
    let center_latitude =
        (equatorward_edge + coefficients.center_offset).min(coefficients.max_center);
    let poleward_edge =
        (equatorward_edge + coefficients.poleward_offset).min(coefficients.max_poleward);

    AuroralOvalGeometry {
        equatorward_edge,
        center_latitude,
        poleward_edge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn geometry(kp: f64) -> AuroralOvalGeometry {
        oval_geometry(kp, &OvalCoefficients::CALIBRATED)
    }

    #[rstest]
    #[case(0.0, 67.0, 73.0, 78.0)]
    #[case(3.0, 59.5, 65.5, 70.5)]
    #[case(5.0, 54.5, 60.5, 65.5)]
    #[case(8.0, 47.0, 53.0, 58.0)]
    #[case(9.0, 45.0, 51.0, 56.0)]
    fn test_reference_points(
        #[case] kp: f64,
        #[case] edge: f64,
        #[case] center: f64,
        #[case] poleward: f64,
    ) {
        let oval = geometry(kp);
        assert_eq!(oval.equatorward_edge, edge);
        assert_eq!(oval.center_latitude, center);
        assert_eq!(oval.poleward_edge, poleward);
    }

    #[test]
    fn test_edge_is_monotonic_and_bounded() {
        let mut previous = f64::INFINITY;
        for step in 0..=90 {
            let kp = f64::from(step) / 10.0;
            let oval = geometry(kp);
            assert!(oval.equatorward_edge <= previous);
            assert!((45.0..=67.0).contains(&oval.equatorward_edge));
            assert!(oval.center_latitude >= oval.equatorward_edge);
            assert!(oval.poleward_edge >= oval.center_latitude);
            assert!(oval.center_latitude <= 73.0);
            assert!(oval.poleward_edge <= 78.0);
            previous = oval.equatorward_edge;
        }
    }

    #[test]
    fn test_recalibrated_coefficients_apply_together() {
        let coefficients = OvalCoefficients {
            base_latitude: 66.0,
            ..OvalCoefficients::CALIBRATED
        };
        let oval = oval_geometry(0.0, &coefficients);
        assert_eq!(oval.equatorward_edge, 66.0);
        assert_eq!(oval.center_latitude, 72.0);
        assert_eq!(oval.poleward_edge, 77.0);
    }
}
