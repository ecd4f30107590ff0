//! Location-aware appearance predictor
//!
//! Turns an observer position, the oval geometry and Kp into viewing guidance:
//! which colors to expect, what structure the display will take, where to look and
//! how bright it will appear, plus camera exposure settings for that brightness.
//!
//! The observer is first bucketed into a [`ViewingScenario`] by unsigned geomagnetic
//! latitude relative to the oval. Each scenario has rows in [`APPEARANCE_TABLE`] keyed by
//! a minimum Kp and by whether the visibility classifier rates the observer visible.
//! Naked-eye rows serve visible observers; camera rows (brightness `very_faint`) serve the
//! storm-only and polar-cap zones the classifier rates not visible. A zone with no
//! qualifying row resolves to `not_visible`, so the prediction never promises more than
//! the visibility assessment.
//!
//! Color rationale follows emission altitude: green atomic oxygen at ~100-300 km, red
//! atomic oxygen above ~300 km, purple/blue molecular nitrogen at the low edge.

use crate::geomagnetic::{MagneticPole, to_geomagnetic};
use crate::models::{GeographicPoint, Hemisphere, SpaceWeatherSample};
use crate::oval::{AuroralOvalGeometry, OvalCoefficients, oval_geometry};
use crate::visibility::{QualityTier, classify};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-width of the band around the oval center counted as "under the center"
const CENTER_BAND: f64 = 3.0;
/// How far equatorward of the edge the close zone extends
const CLOSE_REACH: f64 = 5.0;
/// Latitude below which only great storms reach
const LOW_LATITUDE_LIMIT: f64 = 45.0;

/// Southward Bz beyond which sudden brightenings are likely
const SURGE_BZ: f64 = -10.0;
/// Solar wind speed above which pulsating aurora is likely
const FAST_WIND: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuroraColor {
    Green,
    Red,
    Purple,
    Pink,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuroraStructure {
    Corona,
    Rays,
    Curtains,
    Arcs,
    DiffuseGlow,
    SarArc,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookingToward {
    Overhead,
    NorthernHorizon,
    SouthernHorizon,
    NotVisible,
}

/// Apparent brightness tiers, brightest first.
///
/// `VeryFaint` is below the naked-eye threshold: a camera may record it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApparentBrightness {
    Brilliant,
    Bright,
    Moderate,
    Faint,
    VeryFaint,
    NotVisible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewingScenario {
    UnderOvalCenter,
    UnderOvalEdge,
    BelowOvalClose,
    BelowOvalFar,
    ExtremeLowLat,
    PolarCap,
    NotVisible,
}

/// Exposure starting point for one brightness tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraGuidance {
    pub iso: String,
    pub shutter: String,
    pub aperture: String,
    pub tip: String,
}

/// Viewing guidance for one observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPrediction {
    pub scenario: ViewingScenario,
    pub geomagnetic_latitude: f64,
    pub hemisphere: Hemisphere,
    pub expected_colors: Vec<AuroraColor>,
    pub dominant_color: Option<AuroraColor>,
    pub color_explanation: String,
    pub structure: AuroraStructure,
    pub structure_description: String,
    pub viewing_direction: String,
    pub elevation_range: String,
    pub looking_toward: LookingToward,
    pub apparent_brightness: ApparentBrightness,
    pub camera_guidance: CameraGuidance,
    pub summary: String,
    pub viewing_tip: String,
}

/// One row of the appearance decision table
#[derive(Debug, Clone, Copy)]
pub struct AppearanceRow {
    pub scenario: ViewingScenario,
    pub min_kp: f64,
    /// Row applies only to observers the visibility classifier rates visible
    pub naked_eye: bool,
    pub colors: &'static [AuroraColor],
    pub dominant: Option<AuroraColor>,
    pub color_explanation: &'static str,
    pub structure: AuroraStructure,
    pub structure_description: &'static str,
    pub brightness: ApparentBrightness,
    pub elevation: &'static str,
}

/// Per-scenario rows, highest Kp band first within each scenario
pub const APPEARANCE_TABLE: [AppearanceRow; 16] = [
    AppearanceRow {
        scenario: ViewingScenario::UnderOvalCenter,
        min_kp: 5.0,
        naked_eye: true,
        colors: &[
            AuroraColor::Green,
            AuroraColor::Purple,
            AuroraColor::Red,
            AuroraColor::Pink,
        ],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Green oxygen emission at 100-300 km dominates. Red oxygen above 300 km tops the rays, and nitrogen adds purple and pink fringes to the fast-moving lower edges.",
        structure: AuroraStructure::Corona,
        structure_description: "Rays converge overhead into a corona while curtains ripple across the whole sky.",
        brightness: ApparentBrightness::Brilliant,
        elevation: "60°-90° (zenith)",
    },
    AppearanceRow {
        scenario: ViewingScenario::UnderOvalCenter,
        min_kp: 3.0,
        naked_eye: true,
        colors: &[AuroraColor::Green, AuroraColor::Purple],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Green oxygen emission at 100-300 km dominates; purple nitrogen shows along the lower edge when curtains brighten.",
        structure: AuroraStructure::Curtains,
        structure_description: "Folded curtains drift overhead and across the sky.",
        brightness: ApparentBrightness::Bright,
        elevation: "45°-90°",
    },
    AppearanceRow {
        scenario: ViewingScenario::UnderOvalCenter,
        min_kp: 0.0,
        naked_eye: true,
        colors: &[AuroraColor::Green],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Green oxygen emission at 100-300 km. Activity is too low to excite the nitrogen colors.",
        structure: AuroraStructure::Arcs,
        structure_description: "Quiet arcs stretch across the sky, now and then breaking into rays.",
        brightness: ApparentBrightness::Moderate,
        elevation: "45°-90°",
    },
    AppearanceRow {
        scenario: ViewingScenario::UnderOvalEdge,
        min_kp: 5.0,
        naked_eye: true,
        colors: &[
            AuroraColor::Green,
            AuroraColor::Red,
            AuroraColor::Purple,
            AuroraColor::Blue,
        ],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Green oxygen at 100-300 km with red oxygen crowns above 300 km; purple and blue nitrogen flicker at the base of active rays.",
        structure: AuroraStructure::Rays,
        structure_description: "Tall rayed curtains stand over the poleward sky and surge overhead during substorms.",
        brightness: ApparentBrightness::Bright,
        elevation: "30°-70°",
    },
    AppearanceRow {
        scenario: ViewingScenario::UnderOvalEdge,
        min_kp: 0.0,
        naked_eye: true,
        colors: &[AuroraColor::Green],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Green oxygen emission at 100-300 km.",
        structure: AuroraStructure::Arcs,
        structure_description: "One or two arcs span the poleward sky, slowly brightening and fading.",
        brightness: ApparentBrightness::Moderate,
        elevation: "20°-50°",
    },
    AppearanceRow {
        scenario: ViewingScenario::BelowOvalClose,
        min_kp: 7.0,
        naked_eye: true,
        colors: &[AuroraColor::Green, AuroraColor::Red, AuroraColor::Purple],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Storm-height rays lift green 100-300 km emission and their red tops above 300 km well clear of the horizon.",
        structure: AuroraStructure::Rays,
        structure_description: "Rays rise from a bright band along the horizon.",
        brightness: ApparentBrightness::Bright,
        elevation: "15°-45°",
    },
    AppearanceRow {
        scenario: ViewingScenario::BelowOvalClose,
        min_kp: 5.0,
        naked_eye: true,
        colors: &[AuroraColor::Green, AuroraColor::Red],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Green lower curtains with red upper portions above 300 km, seen from a distance.",
        structure: AuroraStructure::Arcs,
        structure_description: "A glowing arc sits above the horizon with occasional rays.",
        brightness: ApparentBrightness::Moderate,
        elevation: "10°-30°",
    },
    AppearanceRow {
        scenario: ViewingScenario::BelowOvalClose,
        min_kp: 5.0,
        naked_eye: false,
        colors: &[AuroraColor::Red, AuroraColor::Green],
        dominant: Some(AuroraColor::Red),
        color_explanation: "Only the tops of the display reach above the horizon: red oxygen above 300 km, with green showing in long exposures during surges.",
        structure: AuroraStructure::DiffuseGlow,
        structure_description: "A glow on the horizon below naked-eye threshold that long exposures pick up.",
        brightness: ApparentBrightness::VeryFaint,
        elevation: "0°-10°",
    },
    AppearanceRow {
        scenario: ViewingScenario::BelowOvalClose,
        min_kp: 0.0,
        naked_eye: true,
        colors: &[AuroraColor::Green],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Only the green 100-300 km layer reaches above the horizon.",
        structure: AuroraStructure::DiffuseGlow,
        structure_description: "A low greenish glow hugs the horizon.",
        brightness: ApparentBrightness::Faint,
        elevation: "0°-15°",
    },
    AppearanceRow {
        scenario: ViewingScenario::BelowOvalFar,
        min_kp: 6.0,
        naked_eye: false,
        colors: &[AuroraColor::Red],
        dominant: Some(AuroraColor::Red),
        color_explanation: "Only red oxygen emission above 300 km is high enough to clear the horizon from this far away.",
        structure: AuroraStructure::DiffuseGlow,
        structure_description: "A red glow low on the horizon, recorded by long exposures before the eye.",
        brightness: ApparentBrightness::VeryFaint,
        elevation: "0°-10°",
    },
    AppearanceRow {
        scenario: ViewingScenario::ExtremeLowLat,
        min_kp: 8.0,
        naked_eye: false,
        colors: &[AuroraColor::Red],
        dominant: Some(AuroraColor::Red),
        color_explanation: "Red oxygen emission above 300 km, often from a Stable Auroral Red arc heated from the ring current.",
        structure: AuroraStructure::SarArc,
        structure_description: "A steady red band that does not dance, usually revealed by long exposures before the eye.",
        brightness: ApparentBrightness::VeryFaint,
        elevation: "0°-10°",
    },
    AppearanceRow {
        scenario: ViewingScenario::PolarCap,
        min_kp: 5.0,
        naked_eye: true,
        colors: &[AuroraColor::Green, AuroraColor::Red],
        dominant: Some(AuroraColor::Green),
        color_explanation: "The poleward part of the expanded oval stands over the equatorward sky: green oxygen at 100-300 km with red tops above 300 km.",
        structure: AuroraStructure::Rays,
        structure_description: "Rayed curtains hang over the equatorward sky; their tops climb toward the zenith during surges.",
        brightness: ApparentBrightness::Bright,
        elevation: "30°-60°",
    },
    AppearanceRow {
        scenario: ViewingScenario::PolarCap,
        min_kp: 5.0,
        naked_eye: false,
        colors: &[AuroraColor::Green, AuroraColor::Red],
        dominant: Some(AuroraColor::Green),
        color_explanation: "The oval has expanded far equatorward; its green and red oxygen emission sits low on the horizon.",
        structure: AuroraStructure::DiffuseGlow,
        structure_description: "A distant glow toward the equator; faint sun-aligned polar arcs may cross overhead.",
        brightness: ApparentBrightness::VeryFaint,
        elevation: "0°-15°",
    },
    AppearanceRow {
        scenario: ViewingScenario::PolarCap,
        min_kp: 0.0,
        naked_eye: true,
        colors: &[AuroraColor::Green],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Green oxygen emission at 100-300 km from the poleward border of the oval.",
        structure: AuroraStructure::Arcs,
        structure_description: "Arcs span the equatorward sky, slowly brightening and fading.",
        brightness: ApparentBrightness::Moderate,
        elevation: "20°-45°",
    },
    AppearanceRow {
        scenario: ViewingScenario::PolarCap,
        min_kp: 0.0,
        naked_eye: false,
        colors: &[AuroraColor::Green],
        dominant: Some(AuroraColor::Green),
        color_explanation: "Green oxygen emission from the distant oval and from faint polar-cap arcs.",
        structure: AuroraStructure::Arcs,
        structure_description: "Arcs low toward the equator, sometimes with faint sun-aligned arcs overhead.",
        brightness: ApparentBrightness::VeryFaint,
        elevation: "5°-25°",
    },
    AppearanceRow {
        scenario: ViewingScenario::NotVisible,
        min_kp: 0.0,
        naked_eye: false,
        colors: &[],
        dominant: None,
        color_explanation: "No auroral emission reaches above your horizon.",
        structure: AuroraStructure::None,
        structure_description: "Nothing expected tonight.",
        brightness: ApparentBrightness::NotVisible,
        elevation: "N/A",
    },
];

/// Exposure table keyed by brightness: (brightness, iso, shutter, aperture, tip)
const CAMERA_TABLE: [(ApparentBrightness, &str, &str, &str, &str); 6] = [
    (
        ApparentBrightness::Brilliant,
        "800",
        "1-4 s",
        "f/2.8",
        "Short exposures keep fast corona and ray detail sharp; watch the histogram for clipping.",
    ),
    (
        ApparentBrightness::Bright,
        "1600",
        "4-8 s",
        "f/2.8",
        "Shorten the exposure when curtains start to move quickly.",
    ),
    (
        ApparentBrightness::Moderate,
        "1600-3200",
        "8-15 s",
        "f/2.8 or wider",
        "Use a tripod and focus manually on a bright star.",
    ),
    (
        ApparentBrightness::Faint,
        "3200",
        "15-20 s",
        "f/2.0-2.8",
        "The camera will show color your eyes cannot; take a test frame toward the horizon.",
    ),
    (
        ApparentBrightness::VeryFaint,
        "3200-6400",
        "20-30 s",
        "f/1.4-2.0",
        "Too faint for the eye; use the widest aperture you have and stack several frames to pull out the glow.",
    ),
    (
        ApparentBrightness::NotVisible,
        "N/A",
        "N/A",
        "N/A",
        "No aurora expected; save the battery for another night.",
    ),
];

/// Predict how the aurora will look from `observer`.
///
/// Inputs must already be range-checked. `sample`, when given, only enriches the
/// viewing tip.
#[must_use]
pub fn predict_appearance(
    observer: &GeographicPoint,
    kp: f64,
    sample: Option<&SpaceWeatherSample>,
    pole: &MagneticPole,
    coefficients: &OvalCoefficients,
) -> LocationPrediction {
    let geomagnetic = to_geomagnetic(observer, pole);
    let oval = oval_geometry(kp, coefficients);
    let abs_latitude = geomagnetic.abs_latitude();
    let hemisphere = geomagnetic.hemisphere();
    let naked_eye = classify(abs_latitude, &oval) != QualityTier::None;

    let (scenario, row) = resolve_row(classify_scenario(abs_latitude, &oval), kp, naked_eye);
    let looking_toward = looking_toward(scenario, hemisphere);
    let viewing_direction = viewing_direction(scenario, hemisphere);
    let camera_guidance = camera_guidance(row.brightness);

    let summary = compose_summary(scenario, row, &viewing_direction, kp);
    let viewing_tip = compose_viewing_tip(scenario, &viewing_direction, &camera_guidance, sample);

    LocationPrediction {
        scenario,
        geomagnetic_latitude: geomagnetic.latitude,
        hemisphere,
        expected_colors: row.colors.to_vec(),
        dominant_color: row.dominant,
        color_explanation: row.color_explanation.to_string(),
        structure: row.structure,
        structure_description: row.structure_description.to_string(),
        viewing_direction,
        elevation_range: row.elevation.to_string(),
        looking_toward,
        apparent_brightness: row.brightness,
        camera_guidance,
        summary,
        viewing_tip,
    }
}

/// Bucket an unsigned geomagnetic latitude into a latitude zone.
///
/// Everything poleward of the oval is the polar cap; the table decides whether the
/// display there is a naked-eye one (just beyond the edge) or camera-only.
#[must_use]
pub fn classify_scenario(abs_latitude: f64, oval: &AuroralOvalGeometry) -> ViewingScenario {
    let edge = oval.equatorward_edge;

    if abs_latitude > oval.poleward_edge {
        ViewingScenario::PolarCap
    } else if abs_latitude >= oval.center_latitude - CENTER_BAND {
        ViewingScenario::UnderOvalCenter
    } else if abs_latitude >= edge {
        ViewingScenario::UnderOvalEdge
    } else if abs_latitude >= edge - CLOSE_REACH {
        ViewingScenario::BelowOvalClose
    } else if abs_latitude >= LOW_LATITUDE_LIMIT {
        ViewingScenario::BelowOvalFar
    } else {
        ViewingScenario::ExtremeLowLat
    }
}

/// First table row for the zone whose Kp band is reached and whose naked-eye flag
/// matches the observer, else the not-visible row
fn resolve_row(
    scenario: ViewingScenario,
    kp: f64,
    naked_eye: bool,
) -> (ViewingScenario, &'static AppearanceRow) {
    let not_visible = &APPEARANCE_TABLE[APPEARANCE_TABLE.len() - 1];
    APPEARANCE_TABLE
        .iter()
        .find(|row| row.scenario == scenario && row.naked_eye == naked_eye && kp >= row.min_kp)
        .map_or((ViewingScenario::NotVisible, not_visible), |row| (scenario, row))
}

fn looking_toward(scenario: ViewingScenario, hemisphere: Hemisphere) -> LookingToward {
    let poleward = match hemisphere {
        Hemisphere::Northern => LookingToward::NorthernHorizon,
        Hemisphere::Southern => LookingToward::SouthernHorizon,
    };
    let equatorward = match hemisphere {
        Hemisphere::Northern => LookingToward::SouthernHorizon,
        Hemisphere::Southern => LookingToward::NorthernHorizon,
    };

    match scenario {
        ViewingScenario::UnderOvalCenter => LookingToward::Overhead,
        ViewingScenario::UnderOvalEdge
        | ViewingScenario::BelowOvalClose
        | ViewingScenario::BelowOvalFar
        | ViewingScenario::ExtremeLowLat => poleward,
        ViewingScenario::PolarCap => equatorward,
        ViewingScenario::NotVisible => LookingToward::NotVisible,
    }
}

fn viewing_direction(scenario: ViewingScenario, hemisphere: Hemisphere) -> String {
    let pole = hemisphere.poleward();
    let equator = hemisphere.equatorward();
    match scenario {
        ViewingScenario::UnderOvalCenter => "Overhead and across the whole sky".to_string(),
        ViewingScenario::UnderOvalEdge => format!("Look {pole}, up toward overhead"),
        ViewingScenario::BelowOvalClose => format!("Look {pole}"),
        ViewingScenario::BelowOvalFar | ViewingScenario::ExtremeLowLat => {
            format!("Look due {pole}, low on the horizon")
        }
        ViewingScenario::PolarCap => format!("Look {equator}, toward the equator"),
        ViewingScenario::NotVisible => "None".to_string(),
    }
}

/// Exposure guidance for a brightness tier
#[must_use]
pub fn camera_guidance(brightness: ApparentBrightness) -> CameraGuidance {
    let (_, iso, shutter, aperture, tip) = CAMERA_TABLE
        .iter()
        .find(|(tier, ..)| *tier == brightness)
        .copied()
        .unwrap_or(CAMERA_TABLE[CAMERA_TABLE.len() - 1]);
    CameraGuidance {
        iso: iso.to_string(),
        shutter: shutter.to_string(),
        aperture: aperture.to_string(),
        tip: tip.to_string(),
    }
}

fn compose_summary(
    scenario: ViewingScenario,
    row: &AppearanceRow,
    viewing_direction: &str,
    kp: f64,
) -> String {
    if scenario == ViewingScenario::NotVisible {
        return format!("No aurora expected from this location at Kp {kp:.1}.");
    }
    format!(
        "{}: expect {} {} in {}. {}, {} above the horizon.",
        scenario,
        row.brightness,
        row.structure,
        join_colors(row.colors),
        viewing_direction,
        row.elevation
    )
}

fn compose_viewing_tip(
    scenario: ViewingScenario,
    viewing_direction: &str,
    camera: &CameraGuidance,
    sample: Option<&SpaceWeatherSample>,
) -> String {
    if scenario == ViewingScenario::NotVisible {
        return camera.tip.clone();
    }

    let mut tip = format!("{viewing_direction} from a dark site. {}", camera.tip);
    if let Some(sample) = sample {
        if sample.bz < SURGE_BZ {
            tip.push_str(&format!(
                " Southward IMF (Bz {:.0} nT) favours sudden brightenings; stay out for the next hour.",
                sample.bz
            ));
        }
        if sample.speed > FAST_WIND {
            tip.push_str(" Fast solar wind makes rapid pulsations likely.");
        }
    }
    tip
}

fn join_colors(colors: &[AuroraColor]) -> String {
    let names: Vec<String> = colors.iter().map(ToString::to_string).collect();
    match names.as_slice() {
        [] => "no color".to_string(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} and {last}", rest.join(", ")),
    }
}

impl fmt::Display for AuroraColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuroraColor::Green => write!(f, "green"),
            AuroraColor::Red => write!(f, "red"),
            AuroraColor::Purple => write!(f, "purple"),
            AuroraColor::Pink => write!(f, "pink"),
            AuroraColor::Blue => write!(f, "blue"),
        }
    }
}

impl fmt::Display for AuroraStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuroraStructure::Corona => write!(f, "corona"),
            AuroraStructure::Rays => write!(f, "rays"),
            AuroraStructure::Curtains => write!(f, "curtains"),
            AuroraStructure::Arcs => write!(f, "arcs"),
            AuroraStructure::DiffuseGlow => write!(f, "diffuse glow"),
            AuroraStructure::SarArc => write!(f, "SAR arc"),
            AuroraStructure::None => write!(f, "nothing"),
        }
    }
}

impl fmt::Display for ApparentBrightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApparentBrightness::Brilliant => write!(f, "brilliant"),
            ApparentBrightness::Bright => write!(f, "bright"),
            ApparentBrightness::Moderate => write!(f, "moderate"),
            ApparentBrightness::Faint => write!(f, "faint"),
            ApparentBrightness::VeryFaint => write!(f, "very faint"),
            ApparentBrightness::NotVisible => write!(f, "no"),
        }
    }
}

impl fmt::Display for ViewingScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewingScenario::UnderOvalCenter => write!(f, "Under the oval"),
            ViewingScenario::UnderOvalEdge => write!(f, "Under the oval edge"),
            ViewingScenario::BelowOvalClose => write!(f, "Just equatorward of the oval"),
            ViewingScenario::BelowOvalFar => write!(f, "Far equatorward of the oval"),
            ViewingScenario::ExtremeLowLat => write!(f, "Low latitude"),
            ViewingScenario::PolarCap => write!(f, "Poleward of the oval"),
            ViewingScenario::NotVisible => write!(f, "Out of range"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::assess_against_oval;
    use rstest::rstest;

    fn oval(kp: f64) -> AuroralOvalGeometry {
        oval_geometry(kp, &OvalCoefficients::CALIBRATED)
    }

    fn predict(lat: f64, lon: f64, kp: f64) -> LocationPrediction {
        predict_appearance(
            &GeographicPoint::new(lat, lon),
            kp,
            None,
            &MagneticPole::CURRENT,
            &OvalCoefficients::CALIBRATED,
        )
    }

    #[test]
    fn test_tromso_like_latitude_is_under_center() {
        // Kp 3: edge 59.5, center 65.5, poleward 70.5
        assert_eq!(
            classify_scenario(69.6, &oval(3.0)),
            ViewingScenario::UnderOvalCenter
        );
    }

    // Kp 3: edge 59.5, center 65.5, poleward 70.5
    #[rstest]
    #[case::polar_cap(74.0, 3.0, ViewingScenario::PolarCap)]
    #[case::poleward_fringe(71.0, 3.0, ViewingScenario::PolarCap)]
    #[case::poleward_edge(70.5, 3.0, ViewingScenario::UnderOvalCenter)]
    #[case::center_band(62.5, 3.0, ViewingScenario::UnderOvalCenter)]
    #[case::edge(59.5, 3.0, ViewingScenario::UnderOvalEdge)]
    #[case::close_inner(57.0, 3.0, ViewingScenario::BelowOvalClose)]
    #[case::close_outer(55.0, 3.0, ViewingScenario::BelowOvalClose)]
    #[case::far(46.0, 6.0, ViewingScenario::BelowOvalFar)]
    #[case::far_quiet(48.0, 3.0, ViewingScenario::BelowOvalFar)]
    #[case::low(40.0, 9.0, ViewingScenario::ExtremeLowLat)]
    fn test_scenario_buckets(
        #[case] lat: f64,
        #[case] kp: f64,
        #[case] expected: ViewingScenario,
    ) {
        assert_eq!(classify_scenario(lat, &oval(kp)), expected);
    }

    #[test]
    fn test_far_zone_needs_storm() {
        let (scenario, row) = resolve_row(ViewingScenario::BelowOvalFar, 3.0, false);
        assert_eq!(scenario, ViewingScenario::NotVisible);
        assert_eq!(row.brightness, ApparentBrightness::NotVisible);

        let (scenario, row) = resolve_row(ViewingScenario::BelowOvalFar, 6.0, false);
        assert_eq!(scenario, ViewingScenario::BelowOvalFar);
        assert_eq!(row.dominant, Some(AuroraColor::Red));
        assert_eq!(row.brightness, ApparentBrightness::VeryFaint);
    }

    #[test]
    fn test_close_outer_band_is_camera_only_in_storms() {
        // Kp 3: 55.0 sits beyond horizon reach (56.5)
        let (scenario, _) = resolve_row(ViewingScenario::BelowOvalClose, 3.0, false);
        assert_eq!(scenario, ViewingScenario::NotVisible);

        let (scenario, row) = resolve_row(ViewingScenario::BelowOvalClose, 5.0, false);
        assert_eq!(scenario, ViewingScenario::BelowOvalClose);
        assert_eq!(row.brightness, ApparentBrightness::VeryFaint);
    }

    #[test]
    fn test_kp_bands_within_scenario() {
        let (_, quiet) = resolve_row(ViewingScenario::UnderOvalCenter, 1.0, true);
        let (_, active) = resolve_row(ViewingScenario::UnderOvalCenter, 3.0, true);
        let (_, storm) = resolve_row(ViewingScenario::UnderOvalCenter, 6.0, true);
        assert_eq!(quiet.brightness, ApparentBrightness::Moderate);
        assert_eq!(active.brightness, ApparentBrightness::Bright);
        assert_eq!(storm.brightness, ApparentBrightness::Brilliant);
        assert_eq!(storm.structure, AuroraStructure::Corona);
    }

    #[test]
    fn test_poleward_fringe_looks_toward_equator() {
        // Kp 5: poleward edge 65.5, horizon reach ends at 68.5
        let (scenario, row) = resolve_row(classify_scenario(66.51, &oval(5.0)), 5.0, true);
        assert_eq!(scenario, ViewingScenario::PolarCap);
        assert_eq!(row.structure, AuroraStructure::Rays);
        assert_eq!(row.elevation, "30°-60°");
        assert!(!row.elevation.contains("zenith"));
        assert!(row.structure_description.contains("equatorward sky"));
        assert_eq!(
            looking_toward(scenario, Hemisphere::Northern),
            LookingToward::SouthernHorizon
        );
    }

    #[test]
    fn test_prediction_agrees_with_visibility() {
        for kp in [0.0, 2.0, 3.0, 5.0, 6.0, 7.0, 8.0, 9.0] {
            let oval = oval(kp);
            for tenth in 300..=900 {
                let lat = f64::from(tenth) / 10.0;
                let visibility = assess_against_oval(lat, &oval);
                let naked_eye = classify(lat, &oval) != QualityTier::None;
                let (scenario, row) = resolve_row(classify_scenario(lat, &oval), kp, naked_eye);

                if visibility.is_visible {
                    assert_ne!(scenario, ViewingScenario::NotVisible, "lat {lat} kp {kp}");
                    assert!(row.brightness <= ApparentBrightness::Faint, "lat {lat} kp {kp}");
                } else {
                    assert!(row.brightness >= ApparentBrightness::VeryFaint, "lat {lat} kp {kp}");
                }
            }
        }
    }

    #[test]
    fn test_fairbanks_overhead() {
        // Fairbanks sits at ~68.7° geomagnetic; Kp 3 puts the center band over it
        let prediction = predict(64.84, -147.72, 3.0);
        assert_eq!(prediction.scenario, ViewingScenario::UnderOvalCenter);
        assert_eq!(prediction.looking_toward, LookingToward::Overhead);
        assert_eq!(prediction.dominant_color, Some(AuroraColor::Green));
    }

    #[test]
    fn test_london_in_great_storm() {
        // London ~47.9° geomagnetic; Kp 8 edge is 47.0
        let prediction = predict(51.51, -0.13, 8.0);
        assert_eq!(prediction.scenario, ViewingScenario::UnderOvalEdge);

        // Kp 6 edge is 52.0: London is 4.1° equatorward, beyond horizon reach
        let prediction = predict(51.51, -0.13, 6.0);
        assert_eq!(prediction.scenario, ViewingScenario::BelowOvalClose);
        assert_eq!(prediction.looking_toward, LookingToward::NorthernHorizon);
        assert_eq!(prediction.apparent_brightness, ApparentBrightness::VeryFaint);
    }

    #[test]
    fn test_southern_observer_looks_south() {
        // Ushuaia ~-54.5°; Kp 6 edge is 52.0
        let prediction = predict(-54.80, -68.30, 6.0);
        assert_eq!(prediction.scenario, ViewingScenario::UnderOvalEdge);
        assert_eq!(prediction.hemisphere, Hemisphere::Southern);
        assert_eq!(prediction.looking_toward, LookingToward::SouthernHorizon);
        assert!(prediction.viewing_direction.contains("south"));
        assert!(prediction.expected_colors.contains(&AuroraColor::Blue));
    }

    #[test]
    fn test_deep_polar_cap_is_camera_only() {
        // Longyearbyen ~74.4° geomagnetic; Kp 5 poleward edge is 65.5
        let prediction = predict(78.22, 15.65, 5.0);
        assert_eq!(prediction.scenario, ViewingScenario::PolarCap);
        assert_eq!(prediction.looking_toward, LookingToward::SouthernHorizon);
        assert_eq!(prediction.apparent_brightness, ApparentBrightness::VeryFaint);
    }

    #[test]
    fn test_not_visible_prediction() {
        // Madrid, quiet night
        let prediction = predict(40.42, -3.70, 2.0);
        assert_eq!(prediction.scenario, ViewingScenario::NotVisible);
        assert_eq!(prediction.looking_toward, LookingToward::NotVisible);
        assert!(prediction.expected_colors.is_empty());
        assert!(prediction.dominant_color.is_none());
        assert_eq!(prediction.camera_guidance.iso, "N/A");
        assert!(prediction.summary.contains("No aurora expected"));
    }

    #[test]
    fn test_camera_table_covers_every_brightness() {
        for brightness in [
            ApparentBrightness::Brilliant,
            ApparentBrightness::Bright,
            ApparentBrightness::Moderate,
            ApparentBrightness::Faint,
            ApparentBrightness::VeryFaint,
            ApparentBrightness::NotVisible,
        ] {
            assert!(CAMERA_TABLE.iter().any(|(tier, ..)| *tier == brightness));
        }
        assert_eq!(camera_guidance(ApparentBrightness::Brilliant).iso, "800");
        assert_eq!(camera_guidance(ApparentBrightness::VeryFaint).shutter, "20-30 s");
    }

    #[test]
    fn test_summary_is_template_of_fields() {
        // Reykjavík ~61.3° geomagnetic; Kp 6 center band is 55-63
        let prediction = predict(64.15, -21.94, 6.0);
        assert_eq!(prediction.scenario, ViewingScenario::UnderOvalCenter);
        assert!(prediction.summary.contains("brilliant corona"));
        assert!(prediction.summary.contains("green, purple, red and pink"));
        assert!(prediction.summary.contains(&prediction.elevation_range));
    }

    #[test]
    fn test_sample_enriches_tip() {
        let sample = SpaceWeatherSample::new(6.0, -15.0, 18.0, 700.0, 10.0);
        let prediction = predict_appearance(
            &GeographicPoint::new(64.84, -147.72),
            6.0,
            Some(&sample),
            &MagneticPole::CURRENT,
            &OvalCoefficients::CALIBRATED,
        );
        assert!(prediction.viewing_tip.contains("Bz -15 nT"));
        assert!(prediction.viewing_tip.contains("pulsations"));
    }

    #[test]
    fn test_table_rows_descend_within_scenario() {
        for pair in APPEARANCE_TABLE.windows(2) {
            if pair[0].scenario == pair[1].scenario {
                assert!(pair[0].min_kp >= pair[1].min_kp);
            }
        }
    }

    #[test]
    fn test_camera_rows_are_very_faint() {
        for row in &APPEARANCE_TABLE {
            if row.naked_eye {
                assert!(row.brightness <= ApparentBrightness::Faint);
            } else {
                assert!(row.brightness >= ApparentBrightness::VeryFaint);
            }
        }
    }

    #[test]
    fn test_join_colors() {
        assert_eq!(join_colors(&[]), "no color");
        assert_eq!(join_colors(&[AuroraColor::Red]), "red");
        assert_eq!(
            join_colors(&[AuroraColor::Green, AuroraColor::Red]),
            "green and red"
        );
    }

    #[test]
    fn test_enum_names_serialize() {
        assert_eq!(
            serde_json::to_string(&LookingToward::NorthernHorizon).unwrap(),
            "\"northern_horizon\""
        );
        assert_eq!(
            serde_json::to_string(&ApparentBrightness::VeryFaint).unwrap(),
            "\"very_faint\""
        );
        assert_eq!(
            serde_json::to_string(&ViewingScenario::BelowOvalClose).unwrap(),
            "\"below_oval_close\""
        );
    }
}
