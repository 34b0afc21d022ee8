//! Per-beacon reading registry and readiness gate

use crate::algorithms::distance::DistanceEstimator;
use crate::core::{Beacon, BeaconReading, Point, BEACON_COUNT};
use std::collections::HashMap;

/// Owned collection of the configured beacons and their latest readings.
///
/// Beacons keep their configuration order; that order defines which anchor is
/// `p1`, `p2` and `p3` in the trilateration.
#[derive(Debug, Clone)]
pub struct BeaconRegistry {
    beacons: [Beacon; BEACON_COUNT],
    readings: [BeaconReading; BEACON_COUNT],
    index: HashMap<String, usize>,
}

impl BeaconRegistry {
    /// Build the registry. Identifiers must be unique; the configuration layer
    /// validates that before construction.
    pub(crate) fn new(beacons: [Beacon; BEACON_COUNT]) -> Self {
        let index = beacons
            .iter()
            .enumerate()
            .map(|(i, beacon)| (beacon.identifier.clone(), i))
            .collect();

        Self {
            beacons,
            readings: Default::default(),
            index,
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Record a sample for `identifier`. Returns `None` for unknown beacons.
    ///
    /// A zero sample clears the estimated distance; the beacon is not ready
    /// again until a non-zero sample arrives.
    pub fn record_sample(&mut self, identifier: &str, signal_strength: f64) -> Option<&BeaconReading> {
        let i = *self.index.get(identifier)?;
        let estimator = DistanceEstimator::new(self.beacons[i].reference_signal_strength);

        let reading = &mut self.readings[i];
        reading.last_signal_strength = Some(signal_strength);
        reading.estimated_distance = estimator.estimate(signal_strength);
        reading.samples_seen += 1;

        tracing::debug!(
            beacon = identifier,
            rssi = signal_strength,
            distance = ?reading.estimated_distance,
            "updated beacon reading"
        );

        Some(&self.readings[i])
    }

    pub fn is_ready(&self) -> bool {
        self.readings.iter().all(BeaconReading::is_ready)
    }

    /// Anchor positions with their distances, once every beacon has one
    pub fn ready_anchors(&self) -> Option<[(Point, f64); BEACON_COUNT]> {
        let mut anchors = [(Point::default(), 0.0); BEACON_COUNT];
        for (slot, (beacon, reading)) in anchors.iter_mut().zip(self.iter()) {
            *slot = (beacon.position, reading.estimated_distance?);
        }
        Some(anchors)
    }

    pub fn reading(&self, identifier: &str) -> Option<&BeaconReading> {
        self.index.get(identifier).map(|&i| &self.readings[i])
    }

    pub fn beacons(&self) -> &[Beacon; BEACON_COUNT] {
        &self.beacons
    }

    /// Beacons with their readings, in configuration order
    pub fn iter(&self) -> impl Iterator<Item = (&Beacon, &BeaconReading)> {
        self.beacons.iter().zip(self.readings.iter())
    }

    /// Forget all readings, keeping the beacon configuration
    pub fn reset(&mut self) {
        self.readings = Default::default();
    }
}
