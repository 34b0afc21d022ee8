//! Common API types and data structures

use crate::algorithms::motion::MotionStep;
use crate::core::{Beacon, BeaconReading, Point};
use crate::utils::config::ConfigError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Sample for a beacon that is not configured
    #[error("unknown beacon '{identifier}'")]
    UnknownBeacon { identifier: String },
    /// Signal strength that is not a finite number
    #[error("invalid signal strength {value} for beacon '{identifier}'")]
    InvalidSample { identifier: String, value: f64 },
    /// The background evaluator has shut down
    #[error("evaluator is no longer running")]
    EvaluatorStopped,
    /// Invalid configuration
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

/// A signal strength sample delivered by the scanning layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSample {
    pub beacon_identifier: String,
    pub signal_strength: f64,
}

impl SignalSample {
    pub fn new(beacon_identifier: impl Into<String>, signal_strength: f64) -> Self {
        Self {
            beacon_identifier: beacon_identifier.into(),
            signal_strength,
        }
    }
}

/// Output of one successful evaluation cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub position: Point,
    /// Distance moved since the previous estimate
    pub displacement: f64,
    /// Direction of the move, degrees in `[0, 360)`
    pub bearing_degrees: f64,
    /// Anchor centroid was used because the geometry was singular
    pub used_fallback: bool,
    /// Starts at 1 and increments per update
    pub sequence_number: u64,
}

impl PositionUpdate {
    pub(crate) fn new(step: &MotionStep, used_fallback: bool, sequence_number: u64) -> Self {
        Self {
            position: step.to,
            displacement: step.displacement,
            bearing_degrees: step.bearing_degrees,
            used_fallback,
            sequence_number,
        }
    }

    /// `(x, y, displacement, bearing_degrees)` for display
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.position.x, self.position.y, self.displacement, self.bearing_degrees)
    }
}

/// Diagnostic view of one beacon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconDiagnostic {
    pub identifier: String,
    pub last_signal_strength: Option<f64>,
    pub estimated_distance: Option<f64>,
}

impl BeaconDiagnostic {
    pub fn new(beacon: &Beacon, reading: &BeaconReading) -> Self {
        Self {
            identifier: beacon.identifier.clone(),
            last_signal_strength: reading.last_signal_strength,
            estimated_distance: reading.estimated_distance,
        }
    }
}

/// Engine counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub samples_processed: u64,
    pub samples_rejected: u64,
    pub positions_calculated: u64,
    pub fallback_positions: u64,
}
