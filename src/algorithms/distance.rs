//! Signal strength to distance conversion
//!
//! Uses a fixed empirical path-loss curve. The curve is piecewise in the ratio
//! between the observed and the reference signal strength; its constants come
//! from field calibration and must not be altered.

use crate::core::{
    DISTANCE_UNKNOWN, FAR_FIELD_COEFFICIENT, FAR_FIELD_EXPONENT, FAR_FIELD_OFFSET,
    NEAR_FIELD_EXPONENT,
};

/// Estimate the distance to a beacon from a single signal strength sample.
///
/// Returns [`DISTANCE_UNKNOWN`] when `observed_signal_strength` is zero.
pub fn estimate_distance(reference_signal_strength: f64, observed_signal_strength: f64) -> f64 {
    if observed_signal_strength == 0.0 {
        return DISTANCE_UNKNOWN;
    }

    // Both values are negative dBm, compare magnitudes
    let ratio = observed_signal_strength.abs() / reference_signal_strength.abs();
    if ratio < 1.0 {
        ratio.powf(NEAR_FIELD_EXPONENT)
    } else {
        FAR_FIELD_COEFFICIENT * ratio.powf(FAR_FIELD_EXPONENT) + FAR_FIELD_OFFSET
    }
}

/// Per-beacon distance estimator bound to one calibration value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceEstimator {
    pub reference_signal_strength: f64,
}

impl DistanceEstimator {
    pub fn new(reference_signal_strength: f64) -> Self {
        Self { reference_signal_strength }
    }

    /// Distance for `observed_signal_strength`, or `None` when no signal was seen
    pub fn estimate(&self, observed_signal_strength: f64) -> Option<f64> {
        let distance = estimate_distance(self.reference_signal_strength, observed_signal_strength);
        tracing::trace!(
            reference = self.reference_signal_strength,
            observed = observed_signal_strength,
            distance,
            "estimated distance"
        );
        if distance == DISTANCE_UNKNOWN {
            None
        } else {
            Some(distance)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_zero_signal_is_unknown() {
        assert_eq!(estimate_distance(-59.0, 0.0), DISTANCE_UNKNOWN);
        assert_eq!(DistanceEstimator::new(-59.0).estimate(0.0), None);
    }

    #[test]
    fn test_unit_ratio_uses_far_field_branch() {
        let distance = estimate_distance(-59.0, -59.0);
        assert_relative_eq!(distance, 1.01076, epsilon = 1e-12);
    }

    #[test]
    fn test_stronger_signal_uses_near_field_branch() {
        let distance = estimate_distance(-59.0, -30.0);
        let ratio: f64 = 30.0 / 59.0;
        assert_relative_eq!(distance, ratio.powf(10.0), epsilon = 1e-15);
        assert_relative_eq!(distance, 0.0011553, epsilon = 1e-7);
    }

    #[test]
    fn test_weaker_signal_grows_quickly() {
        let near = estimate_distance(-59.0, -65.0);
        let far = estimate_distance(-59.0, -80.0);
        assert!(near > 1.01076);
        assert!(far > near);

        let ratio: f64 = 80.0 / 59.0;
        assert_relative_eq!(far, 0.89976 * ratio.powf(7.7095) + 0.111, epsilon = 1e-12);
    }

    #[test]
    fn test_sign_of_inputs_is_ignored() {
        assert_eq!(estimate_distance(-59.0, -70.0), estimate_distance(59.0, 70.0));
    }

    proptest! {
        #[test]
        fn prop_zero_observation_always_unknown(reference in -100.0f64..-1.0) {
            prop_assert_eq!(estimate_distance(reference, 0.0), DISTANCE_UNKNOWN);
        }

        #[test]
        fn prop_nonzero_observation_is_positive(
            reference in -100.0f64..-1.0,
            observed in -120.0f64..-1.0,
        ) {
            let distance = DistanceEstimator::new(reference).estimate(observed);
            prop_assert!(matches!(distance, Some(d) if d > 0.0));
        }
    }
}
