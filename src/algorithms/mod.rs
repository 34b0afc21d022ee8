//! Positioning algorithms

pub mod distance;
pub mod trilateration;
pub mod motion;

pub use distance::{estimate_distance, DistanceEstimator};
pub use trilateration::{Solution, Trilaterator};
pub use motion::{bearing, distance, track, MotionState, MotionStep, MotionTracker, OriginMode};
