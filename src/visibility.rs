//! Visibility classifier
//!
//! Places an observer's geomagnetic latitude relative to the auroral oval and returns a
//! discrete quality tier. Works on the unsigned latitude, so both hemispheres classify
//! the same way; only the wording ("look north" / "look south") depends on the sign.

use crate::models::Hemisphere;
use crate::oval::{AuroralOvalGeometry, OvalCoefficients, oval_geometry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Degrees equatorward of the oval edge from which a display can still be seen low on the horizon
pub const HORIZON_REACH: f64 = 3.0;
/// Degrees poleward of the oval still considered under its glow
pub const POLEWARD_REACH: f64 = 3.0;
/// Width of the fair band just inside the equatorward edge
const EDGE_BAND: f64 = 2.0;
/// Half-width margin around the center and poleward edge
const CENTER_MARGIN: f64 = 2.0;

/// Viewing quality tiers, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    None,
    Poor,
    Fair,
    Good,
    Excellent,
    Overhead,
}

/// Visibility verdict for one observer latitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityAssessment {
    pub is_visible: bool,
    pub quality_tier: QualityTier,
    pub message: String,
}

/// Classify an unsigned geomagnetic latitude against an oval
#[must_use]
pub fn classify(abs_latitude: f64, oval: &AuroralOvalGeometry) -> QualityTier {
    let edge = oval.equatorward_edge;
    let center = oval.center_latitude;
    let poleward = oval.poleward_edge;

    if abs_latitude < edge - HORIZON_REACH {
        QualityTier::None
    } else if abs_latitude < edge {
        QualityTier::Poor
    } else if abs_latitude < edge + EDGE_BAND {
        QualityTier::Fair
    } else if abs_latitude < center - CENTER_MARGIN {
        QualityTier::Good
    } else if abs_latitude < poleward - CENTER_MARGIN {
        QualityTier::Excellent
    } else if abs_latitude < poleward + POLEWARD_REACH {
        QualityTier::Good
    } else {
        QualityTier::None
    }
}

/// Assess visibility at a signed geomagnetic latitude for the given Kp
#[must_use]
pub fn assess_visibility(
    geomagnetic_latitude: f64,
    kp: f64,
    coefficients: &OvalCoefficients,
) -> VisibilityAssessment {
    let oval = oval_geometry(kp, coefficients);
    assess_against_oval(geomagnetic_latitude, &oval)
}

/// Same as [`assess_visibility`] with a precomputed oval
#[must_use]
pub fn assess_against_oval(
    geomagnetic_latitude: f64,
    oval: &AuroralOvalGeometry,
) -> VisibilityAssessment {
    let abs_latitude = geomagnetic_latitude.abs();
    let hemisphere = Hemisphere::from_latitude(geomagnetic_latitude);
    let quality_tier = classify(abs_latitude, oval);
    let message = visibility_message(quality_tier, abs_latitude, oval, hemisphere);

    VisibilityAssessment {
        is_visible: quality_tier != QualityTier::None,
        quality_tier,
        message,
    }
}

fn visibility_message(
    tier: QualityTier,
    abs_latitude: f64,
    oval: &AuroralOvalGeometry,
    hemisphere: Hemisphere,
) -> String {
    let pole = hemisphere.poleward();
    let equator = hemisphere.equatorward();
    let beyond_oval = abs_latitude > oval.poleward_edge;

    match tier {
        QualityTier::None if beyond_oval => format!(
            "Too far poleward for a naked-eye display: the oval lies {:.0}° toward the equator, low on your {equator}ern horizon.",
            abs_latitude - oval.poleward_edge
        ),
        QualityTier::None => format!(
            "Not visible to the naked eye: the oval edge is {:.0}° further {pole}.",
            oval.equatorward_edge - abs_latitude
        ),
        QualityTier::Poor => format!(
            "Possible low on the {pole}ern horizon during peaks. Look {pole} from a dark site."
        ),
        QualityTier::Fair => {
            format!("Visible on the {pole}ern horizon. Look {pole}.")
        }
        QualityTier::Good if beyond_oval => format!(
            "Good chance: you are poleward of the oval, so the aurora lies toward the equator. Look {equator}."
        ),
        QualityTier::Good => {
            format!("Good chance of aurora. Look {pole}; it may climb well above the horizon.")
        }
        QualityTier::Excellent | QualityTier::Overhead => format!(
            "Excellent: you are under the oval. Expect aurora overhead and across the {pole}ern sky."
        ),
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityTier::None => write!(f, "none"),
            QualityTier::Poor => write!(f, "poor"),
            QualityTier::Fair => write!(f, "fair"),
            QualityTier::Good => write!(f, "good"),
            QualityTier::Excellent => write!(f, "excellent"),
            QualityTier::Overhead => write!(f, "overhead"),
        }
    }
}
