//! Displacement and bearing between successive position estimates
//!
//! The tracker state is an explicit value: [`track`] consumes the previous
//! state and hands back the next one, so whoever drives the evaluation loop
//! owns it.

use crate::core::{Point, ORIGIN};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Euclidean distance between two points
pub fn distance(p1: Point, p2: Point) -> f64 {
    ((p1.x - p2.x).powi(2) + (p1.y - p2.y).powi(2)).sqrt()
}

/// Direction from `p1` to `p2` in degrees, counter-clockwise from +x, in `[0, 360)`
pub fn bearing(p1: Point, p2: Point) -> f64 {
    let angle = (p2.y - p1.y).atan2(p2.x - p1.x).to_degrees();
    if angle >= 0.0 {
        angle
    } else {
        let wrapped = angle + 360.0;
        // Tiny negative angles round up to exactly 360.0
        if wrapped >= 360.0 {
            0.0
        } else {
            wrapped
        }
    }
}

/// How the tracker treats the time before the first fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginMode {
    /// The previous position starts at the configured initial position, so the
    /// first step is measured from there.
    #[default]
    Origin,
    /// No previous position until the first fix; the first step is zero.
    FirstFix,
}

/// Retained previous position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    previous: Option<Point>,
}

impl MotionState {
    /// State anchored at the origin (0, 0)
    pub fn at_origin() -> Self {
        Self::at(ORIGIN)
    }

    pub fn at(previous: Point) -> Self {
        Self { previous: Some(previous) }
    }

    /// State with no prior estimate
    pub fn unset() -> Self {
        Self { previous: None }
    }

    pub fn for_mode(mode: OriginMode, initial_position: Point) -> Self {
        match mode {
            OriginMode::Origin => Self::at(initial_position),
            OriginMode::FirstFix => Self::unset(),
        }
    }

    pub fn previous(&self) -> Option<Point> {
        self.previous
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::at_origin()
    }
}

/// Motion between two successive estimates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    pub from: Point,
    pub to: Point,
    pub displacement: f64,
    pub bearing_degrees: f64,
}

impl MotionStep {
    /// Step vector `to - from`
    pub fn delta(&self) -> Vector2<f64> {
        self.to.to_vector() - self.from.to_vector()
    }
}

/// Compute the step to `new_position` and return the updated state.
///
/// The state always moves to `new_position`; implausible jumps are not rejected.
pub fn track(state: MotionState, new_position: Point) -> (MotionStep, MotionState) {
    let from = state.previous.unwrap_or(new_position);
    let step = MotionStep {
        from,
        to: new_position,
        displacement: distance(from, new_position),
        bearing_degrees: bearing(from, new_position),
    };
    (step, MotionState::at(new_position))
}

/// Owned wrapper around [`MotionState`] for drivers that keep it in a struct
#[derive(Debug, Clone, Default)]
pub struct MotionTracker {
    state: MotionState,
}

impl MotionTracker {
    pub fn new(state: MotionState) -> Self {
        Self { state }
    }

    pub fn update(&mut self, new_position: Point) -> MotionStep {
        let (step, next) = track(self.state, new_position);
        self.state = next;
        step
    }

    pub fn state(&self) -> MotionState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Point::new(2.5, -7.25);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_distance_pythagorean() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let o = ORIGIN;
        assert_relative_eq!(bearing(o, Point::new(1.0, 0.0)), 0.0);
        assert_relative_eq!(bearing(o, Point::new(0.0, 1.0)), 90.0);
        assert_relative_eq!(bearing(o, Point::new(-1.0, 0.0)), 180.0);
        assert_relative_eq!(bearing(o, Point::new(0.0, -1.0)), 270.0);
    }

    #[test]
    fn test_bearing_of_no_movement_is_zero() {
        let p = Point::new(4.0, 4.0);
        assert_eq!(bearing(p, p), 0.0);
    }

    #[test]
    fn test_bearing_just_below_zero_wraps_to_zero() {
        // -5.7e-19 degrees, which rounds to exactly 360.0 once wrapped
        let b = bearing(Point::new(0.0, 0.0), Point::new(1.0, -1e-20));
        assert_eq!(b, 0.0);
    }

    #[test]
    fn test_first_step_is_measured_from_origin() {
        let (step, next) = track(MotionState::default(), Point::new(3.0, 4.0));
        assert_eq!(step.from, ORIGIN);
        assert_eq!(step.displacement, 5.0);
        assert_relative_eq!(step.bearing_degrees, 4.0f64.atan2(3.0).to_degrees());
        assert_eq!(next.previous(), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_first_fix_mode_reports_no_movement() {
        let state = MotionState::for_mode(OriginMode::FirstFix, ORIGIN);
        let (step, next) = track(state, Point::new(3.0, 4.0));
        assert_eq!(step.displacement, 0.0);
        assert_eq!(step.bearing_degrees, 0.0);

        let (step, _) = track(next, Point::new(3.0, 2.0));
        assert_eq!(step.displacement, 2.0);
        assert_relative_eq!(step.bearing_degrees, 270.0);
    }

    #[test]
    fn test_tracker_always_advances() {
        let mut tracker = MotionTracker::default();
        tracker.update(Point::new(1000.0, 1000.0));
        let step = tracker.update(Point::new(1.0, 1.0));
        assert_eq!(step.from, Point::new(1000.0, 1000.0));
        assert_eq!(tracker.state().previous(), Some(Point::new(1.0, 1.0)));
        assert_eq!(step.delta(), Vector2::new(-999.0, -999.0));
    }

    proptest! {
        #[test]
        fn prop_bearing_in_range(
            x1 in -1e3f64..1e3, y1 in -1e3f64..1e3,
            x2 in -1e3f64..1e3, y2 in -1e3f64..1e3,
        ) {
            let b = bearing(Point::new(x1, y1), Point::new(x2, y2));
            prop_assert!((0.0..360.0).contains(&b));
        }

        #[test]
        fn prop_distance_symmetric(
            x1 in -1e3f64..1e3, y1 in -1e3f64..1e3,
            x2 in -1e3f64..1e3, y2 in -1e3f64..1e3,
        ) {
            let p1 = Point::new(x1, y1);
            let p2 = Point::new(x2, y2);
            prop_assert_eq!(distance(p1, p2), distance(p2, p1));
            prop_assert!(distance(p1, p2) >= 0.0);
        }
    }
}
