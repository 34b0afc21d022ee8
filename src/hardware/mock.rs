//! Scripted sample source for testing and demos

use crate::api::types::SignalSample;
use crate::hardware::source::SampleSource;
use std::collections::VecDeque;

/// Queue of samples replayed in insertion order
#[derive(Debug, Clone, Default)]
pub struct MockSampleSource {
    queue: VecDeque<SignalSample>,
    delivered: usize,
}

impl MockSampleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a sample
    pub fn push(&mut self, beacon_identifier: impl Into<String>, signal_strength: f64) {
        self.queue.push_back(SignalSample::new(beacon_identifier, signal_strength));
    }

    /// Queue one sample per beacon, in order
    pub fn push_round(&mut self, samples: &[(&str, f64)]) {
        for (identifier, signal_strength) in samples {
            self.push(*identifier, *signal_strength);
        }
    }

    pub fn queued_sample_count(&self) -> usize {
        self.queue.len()
    }

    pub fn delivered_sample_count(&self) -> usize {
        self.delivered
    }
}

impl SampleSource for MockSampleSource {
    fn next_sample(&mut self) -> Option<SignalSample> {
        let sample = self.queue.pop_front()?;
        self.delivered += 1;
        Some(sample)
    }
}
