//! Configuration management for the aurora engine
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AuroraError;
use crate::geomagnetic::MagneticPole;
use crate::oval::OvalCoefficients;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Latitude band every oval boundary must stay within
const MIN_OVAL_LATITUDE: f64 = 45.0;
const MAX_OVAL_LATITUDE: f64 = 78.0;

/// Root configuration structure for the aurora engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Geomagnetic pole used by the coordinate transform
    pub magnetic_pole: MagneticPoleConfig,
    /// Oval fit coefficients
    pub oval: OvalConfig,
    /// Reference-city dataset settings
    pub cities: CitiesConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Geomagnetic pole position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticPoleConfig {
    /// North geomagnetic pole latitude in degrees
    pub latitude: f64,
    /// North geomagnetic pole longitude in degrees
    pub longitude: f64,
    /// Year after which the pole position should be refreshed
    pub review_year: u16,
}

/// Oval coefficients, kept together so a recalibration replaces all of them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OvalConfig {
    pub base_latitude: f64,
    pub kp_slope: f64,
    pub min_equatorward: f64,
    pub center_offset: f64,
    pub max_center: f64,
    pub poleward_offset: f64,
    pub max_poleward: f64,
}

/// Reference-city dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CitiesConfig {
    /// Replacement city list; the embedded list is used when unset
    pub path: Option<String>,
    /// Maximum number of example cities in a verdict
    pub max_examples: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_max_examples() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for MagneticPoleConfig {
    fn default() -> Self {
        let pole = MagneticPole::CURRENT;
        Self {
            latitude: pole.latitude,
            longitude: pole.longitude,
            review_year: pole.review_year,
        }
    }
}

impl Default for OvalConfig {
    fn default() -> Self {
        let c = OvalCoefficients::CALIBRATED;
        Self {
            base_latitude: c.base_latitude,
            kp_slope: c.kp_slope,
            min_equatorward: c.min_equatorward,
            center_offset: c.center_offset,
            max_center: c.max_center,
            poleward_offset: c.poleward_offset,
            max_poleward: c.max_poleward,
        }
    }
}

impl Default for CitiesConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_examples: default_max_examples(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl MagneticPoleConfig {
    #[must_use]
    pub fn to_pole(&self) -> MagneticPole {
        MagneticPole {
            latitude: self.latitude,
            longitude: self.longitude,
            review_year: self.review_year,
        }
    }
}

impl OvalConfig {
    #[must_use]
    pub fn to_coefficients(&self) -> OvalCoefficients {
        OvalCoefficients {
            base_latitude: self.base_latitude,
            kp_slope: self.kp_slope,
            min_equatorward: self.min_equatorward,
            center_offset: self.center_offset,
            max_center: self.max_center,
            poleward_offset: self.poleward_offset,
            max_poleward: self.max_poleward,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. AURORA_OVAL__KP_SLOPE=2.4
        builder = builder.add_source(
            Environment::with_prefix("AURORA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: EngineConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aurora-engine").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.cities.max_examples == 0 {
            self.cities.max_examples = default_max_examples();
        }
        if self.cities.path.as_deref().is_some_and(str::is_empty) {
            self.cities.path = None;
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_magnetic_pole()?;
        self.validate_oval()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_magnetic_pole(&self) -> Result<()> {
        let pole = &self.magnetic_pole;
        if !(60.0..=90.0).contains(&pole.latitude) {
            return Err(AuroraError::config(format!(
                "Magnetic pole latitude {} must be between 60 and 90",
                pole.latitude
            ))
            .into());
        }

        if !(-180.0..=180.0).contains(&pole.longitude) {
            return Err(AuroraError::config(format!(
                "Magnetic pole longitude {} must be between -180 and 180",
                pole.longitude
            ))
            .into());
        }

        Ok(())
    }

    fn validate_oval(&self) -> Result<()> {
        let oval = &self.oval;
        let all_finite = [
            oval.base_latitude,
            oval.kp_slope,
            oval.min_equatorward,
            oval.center_offset,
            oval.max_center,
            oval.poleward_offset,
            oval.max_poleward,
        ]
        .iter()
        .all(|value| value.is_finite());

        if !all_finite {
            return Err(AuroraError::config("Oval coefficients must be finite numbers").into());
        }

        if oval.kp_slope <= 0.0 {
            return Err(AuroraError::config("Oval kp_slope must be positive").into());
        }

        for (name, value) in [
            ("base_latitude", oval.base_latitude),
            ("min_equatorward", oval.min_equatorward),
            ("max_center", oval.max_center),
            ("max_poleward", oval.max_poleward),
        ] {
            if !(MIN_OVAL_LATITUDE..=MAX_OVAL_LATITUDE).contains(&value) {
                return Err(AuroraError::config(format!(
                    "Oval {name} must be between {MIN_OVAL_LATITUDE} and {MAX_OVAL_LATITUDE} degrees, got {value}"
                ))
                .into());
            }
        }

        if oval.min_equatorward > oval.base_latitude {
            return Err(AuroraError::config(
                "Oval min_equatorward cannot exceed base_latitude",
            )
            .into());
        }

        if oval.center_offset < 0.0 {
            return Err(AuroraError::config("Oval center_offset cannot be negative").into());
        }

        if oval.center_offset >= oval.poleward_offset {
            return Err(AuroraError::config(
                "Oval center_offset must be smaller than poleward_offset",
            )
            .into());
        }

        if oval.max_center > oval.max_poleward {
            return Err(AuroraError::config("Oval max_center cannot exceed max_poleward").into());
        }

        if oval.max_center < oval.base_latitude {
            return Err(AuroraError::config(
                "Oval max_center cannot be below base_latitude",
            )
            .into());
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=20).contains(&self.cities.max_examples) {
            return Err(AuroraError::config(
                "Maximum example cities must be between 1 and 20",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AuroraError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AuroraError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
