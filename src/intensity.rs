//! Intensity Scoring Engine
//!
//! Combines five solar-wind parameters into a 0-100 intensity score and a strength
//! category. Each parameter contributes an integer number of points from a threshold
//! table; southward Bz carries the largest share because it drives reconnection at the
//! dayside magnetopause.
//!
//! Term order matters for the northward-IMF penalty: the penalty is applied to the running
//! total as soon as Bz is evaluated (after Kp, before speed, Bt and density), then the
//! remaining terms are added and the sum is clamped to [0, 100].

use crate::appearance::AuroraColor;
use crate::models::SpaceWeatherSample;
use crate::oval::AuroralOvalGeometry;
use crate::physics::{PhysicsCheck, PhysicsFlag};
use crate::visibility::QualityTier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kp points, threshold is inclusive (kp >= threshold)
const KP_POINTS: [(f64, u8); 5] = [(8.0, 30), (6.0, 25), (5.0, 20), (4.0, 15), (3.0, 10)];
const KP_FLOOR: u8 = 5;

/// Southward Bz points, threshold is exclusive (bz < threshold)
const BZ_POINTS: [(f64, u8); 5] = [(-20.0, 40), (-10.0, 35), (-5.0, 25), (0.0, 15), (5.0, 5)];
/// Subtracted from the running total when Bz is northward (bz >= 5 nT)
const NORTHWARD_PENALTY: u8 = 20;

/// Speed points, threshold is exclusive (speed > threshold)
const SPEED_POINTS: [(f64, u8); 4] = [(800.0, 15), (650.0, 12), (500.0, 8), (400.0, 5)];
const SPEED_FLOOR: u8 = 2;

const BT_POINTS: [(f64, u8); 4] = [(20.0, 10), (15.0, 8), (10.0, 6), (5.0, 4)];
const BT_FLOOR: u8 = 2;

const DENSITY_POINTS: [(f64, u8); 3] = [(25.0, 5), (15.0, 4), (7.0, 3)];
const DENSITY_FLOOR: u8 = 1;

pub const MAX_SCORE: u8 = 100;

/// Aurora strength categories, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrengthCategory {
    None,
    Weak,
    Minor,
    Moderate,
    Strong,
    Major,
    Extreme,
}

/// Fixed, product-facing description of a strength category
#[derive(Debug, Clone, Copy)]
pub struct CategoryProfile {
    pub category: StrengthCategory,
    /// Lowest clamped score that reaches this category
    pub min_score: u8,
    pub colors: &'static [AuroraColor],
    pub structure: &'static str,
    pub duration: &'static str,
    pub alert_level: &'static str,
    /// Cities need at least this tier at the current Kp to be listed as examples
    pub example_city_tier: Option<QualityTier>,
    pub viewing_tip: &'static str,
}

/// Category table, strongest first. Matching is first row whose `min_score` is reached.
pub const CATEGORY_PROFILES: [CategoryProfile; 7] = [
    CategoryProfile {
        category: StrengthCategory::Extreme,
        min_score: 90,
        colors: &[
            AuroraColor::Red,
            AuroraColor::Green,
            AuroraColor::Purple,
            AuroraColor::Pink,
        ],
        structure: "Sky-filling corona with pulsating curtains; deep red aurora visible far from the oval",
        duration: "6-12+ hours",
        alert_level: "EXTREME",
        example_city_tier: Some(QualityTier::Poor),
        viewing_tip: "Once-in-a-decade conditions. Get away from city lights now and look in every direction.",
    },
    CategoryProfile {
        category: StrengthCategory::Major,
        min_score: 75,
        colors: &[AuroraColor::Green, AuroraColor::Red, AuroraColor::Purple],
        structure: "Bright, fast-moving curtains and rays reaching high overhead",
        duration: "4-8 hours",
        alert_level: "MAJOR",
        example_city_tier: Some(QualityTier::Fair),
        viewing_tip: "Head out as soon as it is dark; displays can peak suddenly and fade within minutes.",
    },
    CategoryProfile {
        category: StrengthCategory::Strong,
        min_score: 60,
        colors: &[AuroraColor::Green, AuroraColor::Purple, AuroraColor::Red],
        structure: "Active curtains with ray structure and occasional corona",
        duration: "3-6 hours",
        alert_level: "HIGH",
        example_city_tier: Some(QualityTier::Fair),
        viewing_tip: "Good night to travel to a dark site with a clear view toward the pole.",
    },
    CategoryProfile {
        category: StrengthCategory::Moderate,
        min_score: 45,
        colors: &[AuroraColor::Green, AuroraColor::Purple],
        structure: "Defined arcs with some rays and movement",
        duration: "2-4 hours",
        alert_level: "MODERATE",
        example_city_tier: Some(QualityTier::Good),
        viewing_tip: "Watch the poleward horizon around local midnight.",
    },
    CategoryProfile {
        category: StrengthCategory::Minor,
        min_score: 30,
        colors: &[AuroraColor::Green],
        structure: "Quiet arcs low to moderately high on the horizon",
        duration: "1-3 hours",
        alert_level: "WATCH",
        example_city_tier: Some(QualityTier::Good),
        viewing_tip: "Visible mainly from high latitudes; a camera will show more than the eye.",
    },
    CategoryProfile {
        category: StrengthCategory::Weak,
        min_score: 15,
        colors: &[AuroraColor::Green],
        structure: "Faint diffuse glow, clearer to a camera than to the eye",
        duration: "Under 1 hour",
        alert_level: "LOW",
        example_city_tier: Some(QualityTier::Excellent),
        viewing_tip: "Only worth a look from under the oval with dark, clear skies.",
    },
    CategoryProfile {
        category: StrengthCategory::None,
        min_score: 0,
        colors: &[],
        structure: "No aurora expected",
        duration: "N/A",
        alert_level: "NONE",
        example_city_tier: None,
        viewing_tip: "Conditions are quiet. Check again when the solar wind changes.",
    },
];

/// Points contributed by each parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub kp_points: u8,
    /// Points added for southward Bz, zero when the northward penalty applied
    pub bz_points: u8,
    pub northward_penalty: bool,
    pub speed_points: u8,
    pub bt_points: u8,
    pub density_points: u8,
}

/// Raw scoring result before physics validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityScore {
    pub intensity_score: u8,
    pub strength_category: StrengthCategory,
    pub breakdown: ScoreBreakdown,
}

/// Complete verdict handed to presentation code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityVerdict {
    pub intensity_score: u8,
    pub strength_category: StrengthCategory,
    pub certainty: u8,
    pub confidence_label: String,
    pub physics_flag: PhysicsFlag,
    pub physics_explanation: String,
    /// Advisory appended by timing-dependent rules
    pub note: Option<String>,
    pub example_cities: Vec<String>,
    pub colors: Vec<AuroraColor>,
    pub structure: String,
    pub duration: String,
    pub alert_level: String,
    pub viewing_tip: String,
    pub breakdown: ScoreBreakdown,
    pub oval: AuroralOvalGeometry,
}

/// Score a sample. The sample must already be range-checked.
#[must_use]
pub fn score_intensity(sample: &SpaceWeatherSample) -> IntensityScore {
    let kp_points = points_at_least(sample.kp, &KP_POINTS, KP_FLOOR);
    let mut total = i32::from(kp_points);

    let (bz_points, northward_penalty) = match points_below(sample.bz, &BZ_POINTS) {
        Some(points) => (points, false),
        None => (0, true),
    };
    if northward_penalty {
        total = (total - i32::from(NORTHWARD_PENALTY)).max(0);
    } else {
        total += i32::from(bz_points);
    }

    let speed_points = points_above(sample.speed, &SPEED_POINTS, SPEED_FLOOR);
    let bt_points = points_above(sample.bt, &BT_POINTS, BT_FLOOR);
    let density_points = points_above(sample.density, &DENSITY_POINTS, DENSITY_FLOOR);
    total += i32::from(speed_points) + i32::from(bt_points) + i32::from(density_points);

    let intensity_score = u8::try_from(total.clamp(0, i32::from(MAX_SCORE))).unwrap_or(MAX_SCORE);

    IntensityScore {
        intensity_score,
        strength_category: StrengthCategory::from_score(intensity_score),
        breakdown: ScoreBreakdown {
            kp_points,
            bz_points,
            northward_penalty,
            speed_points,
            bt_points,
            density_points,
        },
    }
}

fn points_at_least(value: f64, table: &[(f64, u8)], floor: u8) -> u8 {
    table
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(floor, |&(_, points)| points)
}

fn points_above(value: f64, table: &[(f64, u8)], floor: u8) -> u8 {
    table
        .iter()
        .find(|(threshold, _)| value > *threshold)
        .map_or(floor, |&(_, points)| points)
}

/// `None` means no row matched: northward Bz
fn points_below(value: f64, table: &[(f64, u8)]) -> Option<u8> {
    table
        .iter()
        .find(|(threshold, _)| value < *threshold)
        .map(|&(_, points)| points)
}

impl StrengthCategory {
    /// Category for a clamped score
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        CATEGORY_PROFILES
            .iter()
            .find(|profile| score >= profile.min_score)
            .map_or(StrengthCategory::None, |profile| profile.category)
    }

    /// Descriptive metadata for this category
    #[must_use]
    pub fn profile(self) -> &'static CategoryProfile {
        CATEGORY_PROFILES
            .iter()
            .find(|profile| profile.category == self)
            .unwrap_or(&CATEGORY_PROFILES[CATEGORY_PROFILES.len() - 1])
    }
}

impl IntensityVerdict {
    /// Build the verdict from a physics-checked score
    #[must_use]
    pub fn assemble(
        score: IntensityScore,
        check: &PhysicsCheck,
        example_cities: Vec<String>,
        oval: AuroralOvalGeometry,
    ) -> Self {
        let profile = score.strength_category.profile();
        Self {
            intensity_score: score.intensity_score,
            strength_category: score.strength_category,
            certainty: check.certainty,
            confidence_label: check.confidence_label().to_string(),
            physics_flag: check.flag,
            physics_explanation: check.explanation.to_string(),
            note: check.note.map(str::to_string),
            example_cities,
            colors: profile.colors.to_vec(),
            structure: profile.structure.to_string(),
            duration: profile.duration.to_string(),
            alert_level: profile.alert_level.to_string(),
            viewing_tip: profile.viewing_tip.to_string(),
            breakdown: score.breakdown,
            oval,
        }
    }

    /// Score to show to users; withheld when the data is physically impossible
    #[must_use]
    pub fn display_score(&self) -> Option<u8> {
        match self.physics_flag {
            PhysicsFlag::Impossible => None,
            _ => Some(self.intensity_score),
        }
    }

    /// One-line headline for presentation code
    #[must_use]
    pub fn headline(&self) -> String {
        match self.physics_flag {
            PhysicsFlag::Impossible => "NO AURORA - check data quality".to_string(),
            _ => format!(
                "{} aurora ({}/100, {})",
                self.strength_category, self.intensity_score, self.confidence_label
            ),
        }
    }
}

impl fmt::Display for StrengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthCategory::None => write!(f, "NONE"),
            StrengthCategory::Weak => write!(f, "WEAK"),
            StrengthCategory::Minor => write!(f, "MINOR"),
            StrengthCategory::Moderate => write!(f, "MODERATE"),
            StrengthCategory::Strong => write!(f, "STRONG"),
            StrengthCategory::Major => write!(f, "MAJOR"),
            StrengthCategory::Extreme => write!(f, "EXTREME"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn score(kp: f64, bz: f64, bt: f64, speed: f64, density: f64) -> IntensityScore {
        score_intensity(&SpaceWeatherSample::new(kp, bz, bt, speed, density))
    }

    #[test]
    fn test_reference_sample_scores_62() {
        let result = score(5.0, -8.0, 12.0, 550.0, 8.0);
        assert_eq!(result.intensity_score, 62);
        assert_eq!(result.strength_category, StrengthCategory::Strong);
        assert_eq!(
            result.breakdown,
            ScoreBreakdown {
                kp_points: 20,
                bz_points: 25,
                northward_penalty: false,
                speed_points: 8,
                bt_points: 6,
                density_points: 3,
            }
        );
    }

    #[test]
    fn test_maximum_sample_is_100() {
        let result = score(9.0, -30.0, 30.0, 900.0, 30.0);
        assert_eq!(result.intensity_score, 100);
        assert_eq!(result.strength_category, StrengthCategory::Extreme);
    }

    #[test]
    fn test_penalty_applies_before_remaining_terms() {
        // Kp 0 gives 5 points; the penalty floors the total at 0 before
        // speed (2) + bt (2) + density (1) are added.
        let result = score(0.0, 8.0, 2.0, 300.0, 2.0);
        assert!(result.breakdown.northward_penalty);
        assert_eq!(result.breakdown.bz_points, 0);
        assert_eq!(result.intensity_score, 5);
        // Penalizing after the sum would have given max(0, 10 - 20) = 0
        assert_ne!(result.intensity_score, 0);
    }

    #[test]
    fn test_penalty_subtracts_from_high_kp() {
        // 25 - 20 + 12 + 8 + 4 = 29
        let result = score(6.0, 5.0, 16.0, 700.0, 16.0);
        assert_eq!(result.intensity_score, 29);
        assert_eq!(result.strength_category, StrengthCategory::Weak);
    }

    #[rstest]
    #[case(-25.0, 40)]
    #[case(-20.0, 35)]
    #[case(-10.0, 25)]
    #[case(-5.0, 15)]
    #[case(0.0, 5)]
    #[case(4.9, 5)]
    fn test_bz_thresholds(#[case] bz: f64, #[case] expected: u8) {
        let result = score(0.0, bz, 0.0, 0.0, 0.0);
        assert_eq!(result.breakdown.bz_points, expected);
        assert!(!result.breakdown.northward_penalty);
    }

    #[rstest]
    #[case(9.0, 30)]
    #[case(8.0, 30)]
    #[case(7.9, 25)]
    #[case(6.0, 25)]
    #[case(5.0, 20)]
    #[case(4.0, 15)]
    #[case(3.0, 10)]
    #[case(2.9, 5)]
    fn test_kp_thresholds(#[case] kp: f64, #[case] expected: u8) {
        assert_eq!(score(kp, 0.0, 0.0, 0.0, 0.0).breakdown.kp_points, expected);
    }

    #[rstest]
    #[case(801.0, 15)]
    #[case(800.0, 12)]
    #[case(651.0, 12)]
    #[case(501.0, 8)]
    #[case(401.0, 5)]
    #[case(400.0, 2)]
    fn test_speed_thresholds(#[case] speed: f64, #[case] expected: u8) {
        assert_eq!(score(0.0, 0.0, 0.0, speed, 0.0).breakdown.speed_points, expected);
    }

    #[test]
    fn test_bt_and_density_thresholds() {
        assert_eq!(score(0.0, 0.0, 21.0, 0.0, 0.0).breakdown.bt_points, 10);
        assert_eq!(score(0.0, 0.0, 15.5, 0.0, 0.0).breakdown.bt_points, 8);
        assert_eq!(score(0.0, 0.0, 5.0, 0.0, 0.0).breakdown.bt_points, 2);
        assert_eq!(score(0.0, 0.0, 0.0, 0.0, 26.0).breakdown.density_points, 5);
        assert_eq!(score(0.0, 0.0, 0.0, 0.0, 16.0).breakdown.density_points, 4);
        assert_eq!(score(0.0, 0.0, 0.0, 0.0, 7.0).breakdown.density_points, 1);
    }

    #[rstest]
    #[case(100, StrengthCategory::Extreme)]
    #[case(90, StrengthCategory::Extreme)]
    #[case(89, StrengthCategory::Major)]
    #[case(75, StrengthCategory::Major)]
    #[case(60, StrengthCategory::Strong)]
    #[case(45, StrengthCategory::Moderate)]
    #[case(30, StrengthCategory::Minor)]
    #[case(15, StrengthCategory::Weak)]
    #[case(14, StrengthCategory::None)]
    #[case(0, StrengthCategory::None)]
    fn test_category_thresholds(#[case] value: u8, #[case] expected: StrengthCategory) {
        assert_eq!(StrengthCategory::from_score(value), expected);
    }

    #[test]
    fn test_score_always_in_range() {
        for kp in [0.0, 3.0, 6.0, 9.0] {
            for bz in [-30.0, -7.0, 0.0, 4.0, 15.0] {
                for speed in [250.0, 450.0, 900.0] {
                    let result = score(kp, bz, 12.0, speed, 10.0);
                    assert!(result.intensity_score <= MAX_SCORE);
                }
            }
        }
    }

    #[test]
    fn test_profiles_are_ordered_and_complete() {
        for pair in CATEGORY_PROFILES.windows(2) {
            assert!(pair[0].min_score > pair[1].min_score);
            assert!(pair[0].category > pair[1].category);
        }
        assert_eq!(StrengthCategory::Major.profile().alert_level, "MAJOR");
        assert!(StrengthCategory::None.profile().example_city_tier.is_none());
    }

    #[test]
    fn test_category_serializes_upper_case() {
        let json = serde_json::to_string(&StrengthCategory::Moderate).unwrap();
        assert_eq!(json, "\"MODERATE\"");
    }
}
