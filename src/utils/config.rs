use crate::algorithms::motion::OriginMode;
use crate::core::{Beacon, Point, BEACON_COUNT, DEFAULT_REFERENCE_SIGNAL_STRENGTH, ORIGIN};
use crate::utils::logging::LogConfig;
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Minimum triangle area (square units) below which anchors count as collinear
const MIN_ANCHOR_AREA: f64 = 1e-6;

/// Minimum spacing between two anchors before a warning is raised
const MIN_ANCHOR_SPACING: f64 = 0.1;

/// Complete engine configuration, loaded once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositioningConfig {
    /// Exactly three beacons, in anchor order
    pub beacons: Vec<BeaconConfig>,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

/// Individual beacon configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconConfig {
    /// Unique beacon identifier, e.g. its MAC address
    pub identifier: String,
    /// Fixed beacon position
    pub position: Point,
    /// Signal strength measured at 1 unit distance
    #[serde(default = "default_reference_signal_strength")]
    pub reference_signal_strength: f64,
}

/// Motion tracking settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Previous position assumed before the first fix
    pub initial_position: Point,
    pub origin_mode: OriginMode,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("exactly {expected} beacons required, found {found}")]
    BeaconCount { expected: usize, found: usize },
    #[error("duplicate beacon identifier '{identifier}'")]
    DuplicateBeacon { identifier: String },
    #[error("failed to access config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to (de)serialize configuration: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn default_reference_signal_strength() -> f64 {
    DEFAULT_REFERENCE_SIGNAL_STRENGTH
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            initial_position: ORIGIN,
            origin_mode: OriginMode::Origin,
        }
    }
}

impl Default for PositioningConfig {
    /// The stock three-beacon deployment
    fn default() -> Self {
        Self {
            beacons: vec![
                BeaconConfig::new("C3:00:00:19:2F:4B", Point::new(0.0, 0.0)),
                BeaconConfig::new("C3:00:00:19:2F:33", Point::new(5.0, 0.0)),
                BeaconConfig::new("C3:00:00:19:2F:34", Point::new(2.5, 5.0)),
            ],
            motion: MotionConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl BeaconConfig {
    pub fn new(identifier: impl Into<String>, position: Point) -> Self {
        Self {
            identifier: identifier.into(),
            position,
            reference_signal_strength: DEFAULT_REFERENCE_SIGNAL_STRENGTH,
        }
    }

    pub fn with_reference_signal_strength(mut self, reference_signal_strength: f64) -> Self {
        self.reference_signal_strength = reference_signal_strength;
        self
    }

    pub fn to_beacon(&self) -> Beacon {
        Beacon::new(self.identifier.clone(), self.position, self.reference_signal_strength)
    }
}

impl PositioningConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration. Errors make it unusable; warnings flag
    /// geometry for which the centroid fallback will apply.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.beacons.len() != BEACON_COUNT {
            result.errors.push(ConfigError::BeaconCount {
                expected: BEACON_COUNT,
                found: self.beacons.len(),
            });
        }

        let mut seen = HashSet::new();
        for beacon in &self.beacons {
            if beacon.identifier.trim().is_empty() {
                result.errors.push(ConfigError::InvalidParameter {
                    parameter: "identifier".to_string(),
                    value: format!("{:?}", beacon.identifier),
                    reason: "Beacon identifier must not be empty".to_string(),
                });
            }
            if !seen.insert(beacon.identifier.as_str()) {
                result.errors.push(ConfigError::DuplicateBeacon {
                    identifier: beacon.identifier.clone(),
                });
            }
            if !beacon.position.is_finite() {
                result.errors.push(ConfigError::InvalidParameter {
                    parameter: format!("{}.position", beacon.identifier),
                    value: format!("({}, {})", beacon.position.x, beacon.position.y),
                    reason: "Beacon position must be finite".to_string(),
                });
            }
            let reference = beacon.reference_signal_strength;
            if reference == 0.0 || !reference.is_finite() {
                result.errors.push(ConfigError::InvalidParameter {
                    parameter: format!("{}.reference_signal_strength", beacon.identifier),
                    value: reference.to_string(),
                    reason: "Reference signal strength must be finite and non-zero".to_string(),
                });
            }
        }

        if !self.motion.initial_position.is_finite() {
            result.errors.push(ConfigError::InvalidParameter {
                parameter: "motion.initial_position".to_string(),
                value: format!("({}, {})", self.motion.initial_position.x, self.motion.initial_position.y),
                reason: "Initial position must be finite".to_string(),
            });
        }

        if result.errors.is_empty() {
            result.warnings.extend(self.geometry_warnings());
        }

        result
    }

    fn geometry_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let positions: Vec<Point> = self.beacons.iter().map(|b| b.position).collect();

        if triangle_area(positions[0], positions[1], positions[2]) < MIN_ANCHOR_AREA {
            warnings.push(
                "Beacons are collinear; positions will fall back to the beacon centroid".to_string(),
            );
        }

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let spacing = (positions[i].to_vector() - positions[j].to_vector()).norm();
                if spacing < MIN_ANCHOR_SPACING {
                    warnings.push(format!(
                        "Beacons '{}' and '{}' are only {:.3} apart",
                        self.beacons[i].identifier, self.beacons[j].identifier, spacing
                    ));
                }
            }
        }

        warnings
    }

    /// Beacons in anchor order
    pub fn beacon_array(&self) -> Result<[Beacon; BEACON_COUNT], ConfigError> {
        let beacons: Vec<Beacon> = self.beacons.iter().map(BeaconConfig::to_beacon).collect();
        let found = beacons.len();
        beacons
            .try_into()
            .map_err(|_| ConfigError::BeaconCount { expected: BEACON_COUNT, found })
    }
}

/// Area of the triangle spanned by three points
fn triangle_area(p1: Point, p2: Point, p3: Point) -> f64 {
    let edges = Matrix2::from_columns(&[
        p2.to_vector() - p1.to_vector(),
        p3.to_vector() - p1.to_vector(),
    ]);
    edges.determinant().abs() / 2.0
}

/// Loads, validates and persists the positioning configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigurationManager {
    config: PositioningConfig,
    config_file_path: Option<String>,
}

impl ConfigurationManager {
    /// Create a manager holding the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager from an already built configuration
    pub fn with_config(config: PositioningConfig) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.apply(config)?;
        Ok(manager)
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &PositioningConfig {
        &self.config
    }

    pub fn config_file_path(&self) -> Option<&str> {
        self.config_file_path.as_deref()
    }

    /// Load configuration from a JSON file, rejecting invalid content
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        let config = PositioningConfig::from_json(&content)?;
        self.apply(config)?;

        tracing::info!(path = %path_str, "loaded positioning configuration");
        self.config_file_path = Some(path_str);
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = self.config.to_json()?;

        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        self.config_file_path = Some(path_str);
        Ok(())
    }

    fn apply(&mut self, config: PositioningConfig) -> Result<(), ConfigError> {
        let validation = config.validate();
        for warning in &validation.warnings {
            tracing::warn!("{}", warning);
        }
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }
        self.config = config;
        Ok(())
    }
}
