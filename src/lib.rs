//! Beacon Trilateration
//!
//! Indoor 2D positioning from three radio beacons: signal strength samples are
//! converted to distances, the three distances are trilaterated into a
//! position, and successive positions are tracked as displacement and bearing.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod utils;
pub mod hardware;
pub mod api;

// Re-export commonly used types
pub use core::{Beacon, BeaconReading, Point, BEACON_COUNT, DISTANCE_UNKNOWN};
pub use algorithms::distance::{estimate_distance, DistanceEstimator};
pub use algorithms::trilateration::{Solution, Trilaterator};
pub use algorithms::motion::{bearing, distance, MotionState, MotionStep, MotionTracker, OriginMode};
pub use processing::readings::BeaconRegistry;
pub use hardware::{MockSampleSource, SampleSource};
pub use utils::config::{BeaconConfig, ConfigError, ConfigurationManager, MotionConfig, PositioningConfig};
pub use utils::logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use api::{
    ApiError, ApiResult, BeaconDiagnostic, CallbackPositioningApi, NonBlockingPositioningApi, PositionUpdate,
    PositioningEngine, SignalSample, SystemState, CsvFormatter, JsonFormatter, TextFormatter,
};
