//! Calibration constants and engine parameters

use crate::core::types::Point;

/// Number of beacons the engine positions against
pub const BEACON_COUNT: usize = 3;

/// Sentinel returned by the distance estimator when no signal was observed
pub const DISTANCE_UNKNOWN: f64 = -1.0;

/// Exponent of the near-field branch (`ratio < 1.0`)
pub const NEAR_FIELD_EXPONENT: f64 = 10.0;

/// Far-field branch: `FAR_FIELD_COEFFICIENT * ratio^FAR_FIELD_EXPONENT + FAR_FIELD_OFFSET`
pub const FAR_FIELD_COEFFICIENT: f64 = 0.89976;
pub const FAR_FIELD_EXPONENT: f64 = 7.7095;
pub const FAR_FIELD_OFFSET: f64 = 0.111;

/// Reference signal strength of the stock beacons (dBm at 1 m)
pub const DEFAULT_REFERENCE_SIGNAL_STRENGTH: f64 = -59.0;

/// Position assumed before the first fix
pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };
