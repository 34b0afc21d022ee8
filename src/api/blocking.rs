//! Synchronous positioning engine
//!
//! [`PositioningEngine`] owns every piece of mutable state: the beacon
//! readings and the motion tracker's previous position. Each call to
//! [`PositioningEngine::on_signal_sample`] runs the whole update, readiness
//! check, solve and track sequence under one `&mut self` borrow, so a single
//! owner (or a mutex around the engine) is all the serialization required.

use crate::algorithms::motion::{track, MotionState};
use crate::algorithms::trilateration::Trilaterator;
use crate::api::types::{ApiError, ApiResult, BeaconDiagnostic, PositionUpdate, SignalSample, SystemState};
use crate::core::{Beacon, BEACON_COUNT};
use crate::processing::readings::BeaconRegistry;
use crate::utils::config::PositioningConfig;

/// Three-beacon positioning engine
#[derive(Debug, Clone)]
pub struct PositioningEngine {
    registry: BeaconRegistry,
    trilaterator: Trilaterator,
    motion: MotionState,
    initial_motion: MotionState,
    state: SystemState,
    sequence_counter: u64,
}

impl PositioningEngine {
    /// Engine whose previous position starts at the origin.
    ///
    /// Beacons are not validated here; hosts build engines through
    /// [`PositioningEngine::from_config`].
    pub(crate) fn new(beacons: [Beacon; BEACON_COUNT]) -> Self {
        Self {
            registry: BeaconRegistry::new(beacons),
            trilaterator: Trilaterator::new(),
            motion: MotionState::at_origin(),
            initial_motion: MotionState::at_origin(),
            state: SystemState::default(),
            sequence_counter: 0,
        }
    }

    /// Validate `config` and build an engine from it
    pub fn from_config(config: &PositioningConfig) -> ApiResult<Self> {
        let validation = config.validate();
        for warning in &validation.warnings {
            tracing::warn!("{}", warning);
        }
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error.into());
        }

        let beacons = config.beacon_array()?;
        let motion = MotionState::for_mode(config.motion.origin_mode, config.motion.initial_position);
        Ok(Self::new(beacons).with_motion_state(motion))
    }

    /// Replace the initial motion state
    pub fn with_motion_state(mut self, motion: MotionState) -> Self {
        self.motion = motion;
        self.initial_motion = motion;
        self
    }

    /// Process one sample and, if every beacon is ready, produce a position.
    ///
    /// Unknown identifiers and non-finite values are rejected and leave every
    /// beacon reading untouched.
    pub fn on_signal_sample(&mut self, beacon_identifier: &str, signal_strength: f64) -> ApiResult<Option<PositionUpdate>> {
        if !signal_strength.is_finite() {
            self.state.samples_rejected += 1;
            return Err(ApiError::InvalidSample {
                identifier: beacon_identifier.to_string(),
                value: signal_strength,
            });
        }

        if self.registry.record_sample(beacon_identifier, signal_strength).is_none() {
            self.state.samples_rejected += 1;
            tracing::warn!(beacon = beacon_identifier, "ignoring sample from unknown beacon");
            return Err(ApiError::UnknownBeacon {
                identifier: beacon_identifier.to_string(),
            });
        }
        self.state.samples_processed += 1;

        Ok(self.evaluate())
    }

    /// Convenience wrapper for [`SignalSample`] values
    pub fn process_sample(&mut self, sample: &SignalSample) -> ApiResult<Option<PositionUpdate>> {
        self.on_signal_sample(&sample.beacon_identifier, sample.signal_strength)
    }

    /// Run the readiness gate and, when open, solve and track
    fn evaluate(&mut self) -> Option<PositionUpdate> {
        let [(p1, d1), (p2, d2), (p3, d3)] = self.registry.ready_anchors()?;

        let solution = self.trilaterator.solve_detailed(p1, d1, p2, d2, p3, d3);
        let (step, next) = track(self.motion, solution.position);
        self.motion = next;

        self.sequence_counter += 1;
        self.state.positions_calculated += 1;
        if solution.used_fallback {
            self.state.fallback_positions += 1;
        }

        let update = PositionUpdate::new(&step, solution.used_fallback, self.sequence_counter);
        tracing::info!(
            x = update.position.x,
            y = update.position.y,
            displacement = update.displacement,
            bearing = update.bearing_degrees,
            sequence = update.sequence_number,
            "updated position"
        );
        Some(update)
    }

    /// Per-beacon diagnostics in configuration order
    pub fn diagnostics(&self) -> Vec<BeaconDiagnostic> {
        self.registry
            .iter()
            .map(|(beacon, reading)| BeaconDiagnostic::new(beacon, reading))
            .collect()
    }

    pub fn is_ready(&self) -> bool {
        self.registry.is_ready()
    }

    pub fn motion_state(&self) -> MotionState {
        self.motion
    }

    pub fn system_state(&self) -> SystemState {
        self.state
    }

    pub fn registry(&self) -> &BeaconRegistry {
        &self.registry
    }

    /// Clear readings, counters and the motion state
    pub fn reset(&mut self) {
        self.registry.reset();
        self.motion = self.initial_motion;
        self.state = SystemState::default();
        self.sequence_counter = 0;
    }
}

impl TryFrom<&PositioningConfig> for PositioningEngine {
    type Error = ApiError;

    fn try_from(config: &PositioningConfig) -> ApiResult<Self> {
        Self::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::motion::OriginMode;
    use crate::core::Point;
    use crate::utils::config::ConfigError;
    use approx::assert_relative_eq;

    const A: &str = "C3:00:00:19:2F:4B";
    const B: &str = "C3:00:00:19:2F:33";
    const C: &str = "C3:00:00:19:2F:34";

    fn engine() -> PositioningEngine {
        PositioningEngine::from_config(&PositioningConfig::default()).unwrap()
    }

    #[test]
    fn test_no_update_until_all_beacons_seen() {
        let mut engine = engine();
        assert!(engine.on_signal_sample(A, -60.0).unwrap().is_none());
        assert!(engine.on_signal_sample(A, -61.0).unwrap().is_none());
        assert!(engine.on_signal_sample(B, -62.0).unwrap().is_none());

        let update = engine.on_signal_sample(C, -63.0).unwrap();
        assert!(update.is_some());
        assert_eq!(update.unwrap().sequence_number, 1);
    }

    #[test]
    fn test_unknown_beacon_rejected() {
        let mut engine = engine();
        let err = engine.on_signal_sample("FF:FF", -50.0).unwrap_err();
        assert!(matches!(err, ApiError::UnknownBeacon { .. }));
        assert_eq!(engine.system_state().samples_rejected, 1);
        assert_eq!(engine.system_state().samples_processed, 0);
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let mut engine = engine();
        let err = engine.on_signal_sample(A, f64::NAN).unwrap_err();
        assert!(matches!(err, ApiError::InvalidSample { .. }));
        assert_eq!(engine.diagnostics()[0].last_signal_strength, None);
    }

    #[test]
    fn test_every_ready_sample_produces_update() {
        let mut engine = engine();
        for id in [A, B, C] {
            engine.on_signal_sample(id, -59.0).unwrap();
        }
        let update = engine.on_signal_sample(B, -70.0).unwrap().unwrap();
        assert_eq!(update.sequence_number, 2);
        assert_eq!(engine.system_state().positions_calculated, 2);
    }

    #[test]
    fn test_zero_signal_closes_gate() {
        let mut engine = engine();
        for id in [A, B, C] {
            engine.on_signal_sample(id, -59.0).unwrap();
        }
        assert!(engine.on_signal_sample(C, 0.0).unwrap().is_none());
        assert!(!engine.is_ready());
        assert!(engine.on_signal_sample(C, -59.0).unwrap().is_some());
    }

    #[test]
    fn test_equal_distances_give_circumcenter() {
        let mut engine = engine();
        let mut last = None;
        for id in [A, B, C] {
            last = engine.on_signal_sample(id, -59.0).unwrap();
        }
        let update = last.unwrap();

        // Point equidistant from (0,0), (5,0) and (2.5,5)
        assert_relative_eq!(update.position.x, 2.5, epsilon = 1e-9);
        assert_relative_eq!(update.position.y, 1.875, epsilon = 1e-9);
        assert_relative_eq!(update.displacement, (2.5f64.powi(2) + 1.875f64.powi(2)).sqrt(), epsilon = 1e-9);
        assert!(!update.used_fallback);
    }

    #[test]
    fn test_first_fix_mode_from_config() {
        let mut config = PositioningConfig::default();
        config.motion.origin_mode = OriginMode::FirstFix;
        let mut engine = PositioningEngine::try_from(&config).unwrap();

        let mut last = None;
        for id in [A, B, C] {
            last = engine.on_signal_sample(id, -59.0).unwrap();
        }
        assert_eq!(last.unwrap().displacement, 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PositioningConfig::default();
        config.beacons.pop();
        assert!(matches!(
            PositioningEngine::from_config(&config),
            Err(ApiError::Configuration(ConfigError::BeaconCount { .. }))
        ));
    }

    #[test]
    fn test_duplicate_beacons_rejected() {
        let mut config = PositioningConfig::default();
        config.beacons[2].identifier = config.beacons[0].identifier.clone();
        assert!(matches!(
            PositioningEngine::from_config(&config),
            Err(ApiError::Configuration(ConfigError::DuplicateBeacon { .. }))
        ));
    }

    #[test]
    fn test_zero_reference_strength_rejected() {
        let mut config = PositioningConfig::default();
        config.beacons[1].reference_signal_strength = 0.0;
        assert!(matches!(
            PositioningEngine::from_config(&config),
            Err(ApiError::Configuration(ConfigError::InvalidParameter { .. }))
        ));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut engine = PositioningEngine::from_config(&PositioningConfig::default())
            .unwrap()
            .with_motion_state(MotionState::at(Point::new(1.0, 1.0)));
        for id in [A, B, C] {
            engine.on_signal_sample(id, -59.0).unwrap();
        }
        engine.reset();

        assert!(!engine.is_ready());
        assert_eq!(engine.motion_state().previous(), Some(Point::new(1.0, 1.0)));
        assert_eq!(engine.system_state(), SystemState::default());
    }
}
