//! Seam between the radio scanning layer and the engine

use crate::api::types::SignalSample;

/// Producer of signal strength samples.
///
/// Implementations wrap whatever delivers advertisements (a BLE scanner, a
/// recorded trace, a test script). Samples for beacons that are not
/// configured may be returned; the engine rejects them.
pub trait SampleSource {
    /// Next available sample, or `None` when nothing is pending
    fn next_sample(&mut self) -> Option<SignalSample>;
}

impl<I> SampleSource for I
where
    I: Iterator<Item = SignalSample>,
{
    fn next_sample(&mut self) -> Option<SignalSample> {
        self.next()
    }
}
