//! Engine facade
//!
//! [`AuroraEngine`] owns the injected constants (pole position, oval coefficients,
//! reference cities) and exposes every operation behind input validation. The pure
//! module functions never see out-of-range values.
//!
//! The engine holds no mutable state; one instance can be shared across threads.

use crate::appearance::{self, LocationPrediction};
use crate::config::EngineConfig;
use crate::geomagnetic::{self, MagneticPole};
use crate::intensity::{self, IntensityScore, IntensityVerdict, StrengthCategory};
use crate::models::space_weather::validate_kp;
use crate::models::{GeographicPoint, GeomagneticPoint, SpaceWeatherSample};
use crate::oval::{self, AuroralOvalGeometry, OvalCoefficients};
use crate::physics::{self, PhysicsCheck, PhysicsFlag};
use crate::reference_cities::ReferenceCities;
use crate::visibility::{self, VisibilityAssessment};
use crate::{AuroraError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, instrument, warn};

/// Mean Gregorian year in seconds
const SECONDS_PER_YEAR: u64 = 31_556_952;

/// Verdict plus location-specific guidance for one observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    pub observer: GeographicPoint,
    pub geomagnetic: GeomagneticPoint,
    pub verdict: IntensityVerdict,
    pub visibility: VisibilityAssessment,
    pub prediction: LocationPrediction,
}

#[derive(Debug, Clone)]
pub struct AuroraEngine {
    pole: MagneticPole,
    coefficients: OvalCoefficients,
    cities: ReferenceCities,
    max_examples: usize,
}

impl AuroraEngine {
    /// Build an engine from a validated configuration and a loaded city list
    #[must_use]
    pub fn new(config: &EngineConfig, cities: ReferenceCities) -> Self {
        let pole = config.magnetic_pole.to_pole();
        if let Some(year) = current_year() {
            if pole.is_review_overdue(year) {
                warn!(
                    review_year = pole.review_year,
                    year, "Magnetic pole position is due for review against a current field model"
                );
            }
        }

        Self {
            pole,
            coefficients: config.oval.to_coefficients(),
            cities,
            max_examples: config.cities.max_examples,
        }
    }

    /// Build an engine, loading the city list named in the configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let cities = match config.cities.path.as_deref() {
            Some(path) => ReferenceCities::load(Path::new(path))?,
            None => ReferenceCities::embedded()?,
        };
        info!(cities = cities.len(), "Aurora engine ready");
        Ok(Self::new(config, cities))
    }

    /// Engine with built-in constants and the embedded city list
    pub fn with_defaults() -> Result<Self> {
        Self::from_config(&EngineConfig::default())
    }

    #[must_use]
    pub fn pole(&self) -> &MagneticPole {
        &self.pole
    }

    #[must_use]
    pub fn coefficients(&self) -> &OvalCoefficients {
        &self.coefficients
    }

    #[must_use]
    pub fn cities(&self) -> &ReferenceCities {
        &self.cities
    }

    /// Geographic to geomagnetic coordinates
    pub fn to_geomagnetic(&self, point: &GeographicPoint) -> Result<GeomagneticPoint> {
        point.validate()?;
        Ok(geomagnetic::to_geomagnetic(point, &self.pole))
    }

    /// Oval boundaries at `kp`
    pub fn oval_geometry(&self, kp: f64) -> Result<AuroralOvalGeometry> {
        validate_kp(kp)?;
        Ok(oval::oval_geometry(kp, &self.coefficients))
    }

    /// Visibility tier for a signed geomagnetic latitude
    pub fn assess_visibility(
        &self,
        geomagnetic_latitude: f64,
        kp: f64,
    ) -> Result<VisibilityAssessment> {
        validate_geomagnetic_latitude(geomagnetic_latitude)?;
        validate_kp(kp)?;
        Ok(visibility::assess_visibility(
            geomagnetic_latitude,
            kp,
            &self.coefficients,
        ))
    }

    /// Raw intensity score, before physics validation
    pub fn score_intensity(&self, sample: &SpaceWeatherSample) -> Result<IntensityScore> {
        sample.validate()?;
        Ok(intensity::score_intensity(sample))
    }

    /// Plausibility check of a sample
    pub fn validate_physics(&self, sample: &SpaceWeatherSample) -> Result<PhysicsCheck> {
        sample.validate()?;
        Ok(physics::validate(sample))
    }

    /// Full verdict: score, physics check, category metadata and example cities
    #[instrument(skip(self), fields(kp = sample.kp, bz = sample.bz))]
    pub fn evaluate(&self, sample: &SpaceWeatherSample) -> Result<IntensityVerdict> {
        sample.validate()?;

        let raw = intensity::score_intensity(sample);
        let check = physics::validate(sample);
        log_physics_check(&check);

        let score = check.apply(raw);
        let oval = oval::oval_geometry(sample.kp, &self.coefficients);
        let example_cities = self.select_examples(sample.kp, score.strength_category);

        debug!(
            score = score.intensity_score,
            category = %score.strength_category,
            raw_score = raw.intensity_score,
            imf = %sample.format_imf(),
            plasma = %sample.format_plasma(),
            "Scored sample"
        );

        Ok(IntensityVerdict::assemble(score, &check, example_cities, oval))
    }

    /// Cities where a display of `category` strength would be worth watching at `kp`
    pub fn example_cities(&self, kp: f64, category: StrengthCategory) -> Result<Vec<String>> {
        validate_kp(kp)?;
        Ok(self.select_examples(kp, category))
    }

    /// Viewing guidance for one observer
    #[instrument(skip(self, sample))]
    pub fn predict_appearance(
        &self,
        observer: &GeographicPoint,
        kp: f64,
        sample: Option<&SpaceWeatherSample>,
    ) -> Result<LocationPrediction> {
        observer.validate()?;
        validate_kp(kp)?;
        if let Some(sample) = sample {
            sample.validate()?;
        }

        let prediction =
            appearance::predict_appearance(observer, kp, sample, &self.pole, &self.coefficients);
        debug!(scenario = %prediction.scenario, "Predicted appearance");
        Ok(prediction)
    }

    /// Verdict and appearance guidance for an observer in one call
    #[instrument(skip(self), fields(kp = sample.kp))]
    pub fn evaluate_location(
        &self,
        sample: &SpaceWeatherSample,
        observer: &GeographicPoint,
    ) -> Result<LocationReport> {
        observer.validate()?;
        let verdict = self.evaluate(sample)?;

        let geomagnetic = geomagnetic::to_geomagnetic(observer, &self.pole);
        let visibility = visibility::assess_against_oval(geomagnetic.latitude, &verdict.oval);
        let prediction = appearance::predict_appearance(
            observer,
            sample.kp,
            Some(sample),
            &self.pole,
            &self.coefficients,
        );

        info!(
            observer = %observer.format_coordinates(),
            geomagnetic_latitude = geomagnetic.latitude,
            tier = %visibility.quality_tier,
            "Evaluated location"
        );

        Ok(LocationReport {
            observer: *observer,
            geomagnetic,
            verdict,
            visibility,
            prediction,
        })
    }

    fn select_examples(&self, kp: f64, category: StrengthCategory) -> Vec<String> {
        match category.profile().example_city_tier {
            Some(threshold) => self.cities.select_examples(
                kp,
                threshold,
                self.max_examples,
                &self.pole,
                &self.coefficients,
            ),
            None => Vec::new(),
        }
    }
}

fn log_physics_check(check: &PhysicsCheck) {
    match check.flag {
        PhysicsFlag::Impossible => warn!(
            rule = check.rule,
            "Physically impossible sample, forcing verdict to zero"
        ),
        PhysicsFlag::Unlikely => warn!(
            rule = check.rule,
            certainty = check.certainty,
            "Physically unlikely sample"
        ),
        PhysicsFlag::Rare | PhysicsFlag::TimingDependent => debug!(
            rule = check.rule,
            flag = %check.flag,
            certainty = check.certainty,
            "Physics rule matched"
        ),
        PhysicsFlag::Valid => {}
    }
}

fn validate_geomagnetic_latitude(latitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(AuroraError::input_range(
            "geomagneticLatitude",
            latitude,
            "[-90, 90]",
        ));
    }
    Ok(())
}

fn current_year() -> Option<u16> {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    u16::try_from(1970 + elapsed.as_secs() / SECONDS_PER_YEAR).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::{ApparentBrightness, ViewingScenario};
    use crate::visibility::QualityTier;
    use rstest::rstest;

    fn engine() -> AuroraEngine {
        AuroraEngine::with_defaults().unwrap()
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuroraEngine>();
    }

    #[test]
    fn test_evaluate_strong_storm() {
        let verdict = engine()
            .evaluate(&SpaceWeatherSample::new(6.0, -15.0, 18.0, 650.0, 20.0))
            .unwrap();
        // 25 + 35 + 8 + 8 + 4
        assert_eq!(verdict.intensity_score, 80);
        assert_eq!(verdict.strength_category, StrengthCategory::Major);
        assert_eq!(verdict.physics_flag, PhysicsFlag::Valid);
        assert!(!verdict.example_cities.is_empty());
        assert!(verdict.example_cities.len() <= 5);
        assert_eq!(verdict.oval.equatorward_edge, 52.0);
    }

    #[test]
    fn test_evaluate_impossible_sample() {
        let verdict = engine()
            .evaluate(&SpaceWeatherSample::new(8.0, 5.0, 20.0, 700.0, 10.0))
            .unwrap();
        assert_eq!(verdict.intensity_score, 0);
        assert_eq!(verdict.strength_category, StrengthCategory::None);
        assert_eq!(verdict.certainty, 0);
        assert!(verdict.example_cities.is_empty());
        assert_eq!(verdict.display_score(), None);
        assert_eq!(verdict.headline(), "NO AURORA - check data quality");
    }

    #[rstest]
    #[case::kp_high(SpaceWeatherSample::new(9.5, -5.0, 10.0, 500.0, 5.0), "kp")]
    #[case::negative_speed(SpaceWeatherSample::new(3.0, -5.0, 10.0, -1.0, 5.0), "speed")]
    #[case::nan_bz(SpaceWeatherSample::new(3.0, f64::NAN, 10.0, 500.0, 5.0), "bz")]
    fn test_evaluate_rejects_out_of_range(
        #[case] sample: SpaceWeatherSample,
        #[case] field: &str,
    ) {
        match engine().evaluate(&sample).unwrap_err() {
            AuroraError::InputRange { field: got, .. } => assert_eq!(got, field),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_operations_validate_inputs() {
        let engine = engine();
        assert!(engine.oval_geometry(-0.1).unwrap_err().is_input_range());
        assert!(engine.assess_visibility(91.0, 3.0).unwrap_err().is_input_range());
        assert!(engine.assess_visibility(65.0, 10.0).unwrap_err().is_input_range());
        assert!(engine.to_geomagnetic(&GeographicPoint::new(0.0, 181.0)).is_err());
        assert!(engine.example_cities(f64::NAN, StrengthCategory::Minor).is_err());
        assert!(
            engine
                .predict_appearance(&GeographicPoint::new(95.0, 0.0), 3.0, None)
                .is_err()
        );
    }

    #[test]
    fn test_example_cities_for_none_category_are_empty() {
        let cities = engine().example_cities(5.0, StrengthCategory::None).unwrap();
        assert!(cities.is_empty());
    }

    #[test]
    fn test_evaluate_location_combines_outputs() {
        let report = engine()
            .evaluate_location(
                &SpaceWeatherSample::new(3.0, -6.0, 8.0, 450.0, 5.0),
                &GeographicPoint::new(69.65, 18.96),
            )
            .unwrap();
        // Tromsø ~65.8° geomagnetic, inside the Kp 3 center band
        assert_eq!(report.visibility.quality_tier, QualityTier::Excellent);
        assert_eq!(report.prediction.scenario, ViewingScenario::UnderOvalCenter);
        assert_eq!(report.geomagnetic.latitude, report.prediction.geomagnetic_latitude);
        assert_eq!(report.verdict.oval, engine().oval_geometry(3.0).unwrap());
    }

    #[rstest]
    #[case(2.0)]
    #[case(5.0)]
    #[case(6.0)]
    #[case(8.0)]
    fn test_report_visibility_matches_prediction(#[case] kp: f64) {
        let engine = engine();
        let sample = SpaceWeatherSample::new(kp, -10.0, 15.0, 600.0, 10.0);
        for lon in [-100.0, 20.0] {
            for half in 60..=170 {
                let observer = GeographicPoint::new(f64::from(half) / 2.0, lon);
                let report = engine.evaluate_location(&sample, &observer).unwrap();
                let brightness = report.prediction.apparent_brightness;
                if report.visibility.is_visible {
                    assert_ne!(report.prediction.scenario, ViewingScenario::NotVisible);
                    assert!(brightness <= ApparentBrightness::Faint, "{observer:?} kp {kp}");
                } else {
                    assert!(brightness >= ApparentBrightness::VeryFaint, "{observer:?} kp {kp}");
                    assert!(report.visibility.message.contains("naked"));
                }
            }
        }
    }

    #[test]
    fn test_custom_coefficients_flow_through() {
        let mut config = EngineConfig::default();
        config.oval.base_latitude = 65.0;
        let engine = AuroraEngine::new(&config, ReferenceCities::embedded().unwrap());
        assert_eq!(engine.oval_geometry(0.0).unwrap().equatorward_edge, 65.0);
    }

    #[test]
    fn test_current_year_is_plausible() {
        let year = current_year().unwrap();
        assert!(year >= 2024);
    }
}
