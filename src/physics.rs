//! Physics plausibility validator
//!
//! Cross-checks the five telemetry parameters for combinations that cannot happen
//! or rarely happen in the real solar wind. Rules are evaluated top to bottom and the
//! first match wins. Only the two `impossible` rules change the numeric verdict; the rest
//! adjust certainty and attach an explanation.

use crate::intensity::{IntensityScore, StrengthCategory};
use crate::models::SpaceWeatherSample;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome class of the plausibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhysicsFlag {
    Valid,
    Impossible,
    Unlikely,
    Rare,
    TimingDependent,
}

/// One row of the rule table
#[derive(Debug, Clone, Copy)]
pub struct PhysicsRule {
    pub name: &'static str,
    pub flag: PhysicsFlag,
    pub certainty: u8,
    pub matches: fn(&SpaceWeatherSample) -> bool,
    pub explanation: &'static str,
    pub note: Option<&'static str>,
}

/// Result of running the rule table over one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsCheck {
    pub flag: PhysicsFlag,
    pub certainty: u8,
    /// Name of the rule that fired, `None` when the sample is consistent
    pub rule: Option<&'static str>,
    pub explanation: &'static str,
    pub note: Option<&'static str>,
}

/// Ordered rule table, first match wins
pub const PHYSICS_RULES: [PhysicsRule; 7] = [
    PhysicsRule {
        name: "storm-with-northward-imf",
        flag: PhysicsFlag::Impossible,
        certainty: 0,
        matches: |s| s.kp >= 8.0 && s.bz > 0.0,
        explanation: "Severe storm levels (Kp 8+) cannot be driven by a northward IMF. The feed is likely stale or corrupted.",
        note: None,
    },
    PhysicsRule {
        name: "storm-without-driver",
        flag: PhysicsFlag::Impossible,
        certainty: 0,
        matches: |s| s.kp >= 8.0 && s.speed < 400.0 && s.density < 3.0,
        explanation: "Severe storm levels (Kp 8+) with slow, thin solar wind have no energy source. The feed is likely stale or corrupted.",
        note: None,
    },
    PhysicsRule {
        name: "strong-storm-quiet-wind",
        flag: PhysicsFlag::Unlikely,
        certainty: 30,
        matches: |s| s.kp >= 6.0 && s.bz > 10.0 && s.speed < 500.0,
        explanation: "Kp 6+ alongside strongly northward IMF and slow wind is physically unlikely; treat the forecast with caution.",
        note: None,
    },
    PhysicsRule {
        name: "coronal-hole-stream",
        flag: PhysicsFlag::Rare,
        certainty: 75,
        matches: |s| s.speed > 800.0 && s.density < 3.0,
        explanation: "Very fast, very thin wind is typical of a coronal-hole high-speed stream. Rare but real.",
        note: None,
    },
    PhysicsRule {
        name: "compression-region",
        flag: PhysicsFlag::Rare,
        certainty: 75,
        matches: |s| s.speed < 400.0 && s.density > 25.0,
        explanation: "Slow, very dense wind points to a compression region ahead of a faster stream. Rare but real.",
        note: None,
    },
    PhysicsRule {
        name: "kp-lag",
        flag: PhysicsFlag::TimingDependent,
        certainty: 90,
        matches: |s| s.kp < 4.0 && s.bz < -10.0 && s.speed > 600.0,
        explanation: "Solar wind is already storm-strength but Kp has not caught up yet; the storm is likely starting.",
        note: Some("Conditions may intensify over the next hours."),
    },
    PhysicsRule {
        name: "kp-persistence",
        flag: PhysicsFlag::TimingDependent,
        certainty: 85,
        matches: |s| s.kp >= 7.0 && s.bz > 0.0,
        explanation: "Kp is still high from earlier driving while the IMF has turned north; the storm is likely ending.",
        note: Some("Activity declining: the display may fade soon."),
    },
];

/// Run the rule table over a sample
#[must_use]
pub fn validate(sample: &SpaceWeatherSample) -> PhysicsCheck {
    PHYSICS_RULES
        .iter()
        .find(|rule| (rule.matches)(sample))
        .map_or_else(PhysicsCheck::valid, |rule| PhysicsCheck {
            flag: rule.flag,
            certainty: rule.certainty,
            rule: Some(rule.name),
            explanation: rule.explanation,
            note: rule.note,
        })
}

impl PhysicsCheck {
    /// Check result for a consistent sample
    #[must_use]
    pub fn valid() -> Self {
        Self {
            flag: PhysicsFlag::Valid,
            certainty: 100,
            rule: None,
            explanation: "Parameters are physically consistent.",
            note: None,
        }
    }

    /// Whether this result forces the verdict to zero
    #[must_use]
    pub fn overrides_score(&self) -> bool {
        self.flag == PhysicsFlag::Impossible
    }

    /// Apply the check to a score: impossible data is forced to 0 / NONE
    #[must_use]
    pub fn apply(&self, score: IntensityScore) -> IntensityScore {
        if self.overrides_score() {
            IntensityScore {
                intensity_score: 0,
                strength_category: StrengthCategory::None,
                ..score
            }
        } else {
            score
        }
    }

    /// Coarse display label for the certainty value
    #[must_use]
    pub fn confidence_label(&self) -> &'static str {
        confidence_label(self.certainty)
    }
}

/// Map a certainty percentage to a display label
#[must_use]
pub fn confidence_label(certainty: u8) -> &'static str {
    match certainty {
        95.. => "Very certain",
        80..=94 => "Confident",
        60..=79 => "Moderately confident",
        30..=59 => "Low confidence",
        _ => "Very low confidence",
    }
}

impl fmt::Display for PhysicsFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsFlag::Valid => write!(f, "valid"),
            PhysicsFlag::Impossible => write!(f, "impossible"),
            PhysicsFlag::Unlikely => write!(f, "unlikely"),
            PhysicsFlag::Rare => write!(f, "rare"),
            PhysicsFlag::TimingDependent => write!(f, "timing-dependent"),
        }
    }
}
