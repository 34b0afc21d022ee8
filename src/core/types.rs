//! Core data types for the positioning engine

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D position in the local beacon frame (any consistent unit, usually meters)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Mean of the given points
    pub fn centroid(points: &[Point; 3]) -> Self {
        Self {
            x: (points[0].x + points[1].x + points[2].x) / 3.0,
            y: (points[0].y + points[1].y + points[2].y) / 3.0,
        }
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Fixed radio anchor with a known position and calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    /// Unique key, typically the hardware address
    pub identifier: String,
    pub position: Point,
    /// Signal strength expected at 1 unit distance
    pub reference_signal_strength: f64,
}

impl Beacon {
    pub fn new(identifier: impl Into<String>, position: Point, reference_signal_strength: f64) -> Self {
        Self {
            identifier: identifier.into(),
            position,
            reference_signal_strength,
        }
    }
}

/// Latest observation for a single beacon
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeaconReading {
    pub last_signal_strength: Option<f64>,
    /// `None` until a non-zero sample has been seen
    pub estimated_distance: Option<f64>,
    pub samples_seen: u64,
}

impl BeaconReading {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.estimated_distance.is_some()
    }
}

/// Position produced by a single trilateration cycle
pub type PositionEstimate = Point;
