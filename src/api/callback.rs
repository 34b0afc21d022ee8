//! Callback-based API for event-driven hosts
//!
//! The scanning layer calls [`CallbackPositioningApi::on_signal_sample`] from
//! its receive handler. Diagnostic callbacks fire for every accepted sample;
//! position callbacks fire only when the readiness gate opens.

use crate::api::blocking::PositioningEngine;
use crate::api::types::{ApiResult, BeaconDiagnostic, PositionUpdate, SignalSample, SystemState};
use crate::hardware::source::SampleSource;
use std::collections::HashMap;

/// Callback function type for position updates
pub type PositionCallback = Box<dyn Fn(&PositionUpdate) + Send>;

/// Callback function type for per-beacon diagnostics
pub type DiagnosticCallback = Box<dyn Fn(&[BeaconDiagnostic]) + Send>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    fn new(id: u32) -> Self {
        CallbackHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Callback-based positioning API
pub struct CallbackPositioningApi {
    engine: PositioningEngine,
    callback_counter: u32,
    position_callbacks: HashMap<CallbackHandle, PositionCallback>,
    diagnostic_callbacks: HashMap<CallbackHandle, DiagnosticCallback>,
}

impl CallbackPositioningApi {
    pub fn new(engine: PositioningEngine) -> Self {
        Self {
            engine,
            callback_counter: 0,
            position_callbacks: HashMap::new(),
            diagnostic_callbacks: HashMap::new(),
        }
    }

    /// Register a position callback
    pub fn register_position_callback(&mut self, callback: PositionCallback) -> CallbackHandle {
        let handle = self.next_handle();
        self.position_callbacks.insert(handle, callback);
        handle
    }

    /// Register a diagnostic callback
    pub fn register_diagnostic_callback(&mut self, callback: DiagnosticCallback) -> CallbackHandle {
        let handle = self.next_handle();
        self.diagnostic_callbacks.insert(handle, callback);
        handle
    }

    /// Unregister a callback. Returns false for unknown handles.
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> bool {
        self.position_callbacks.remove(&handle).is_some()
            || self.diagnostic_callbacks.remove(&handle).is_some()
    }

    fn next_handle(&mut self) -> CallbackHandle {
        self.callback_counter += 1;
        CallbackHandle::new(self.callback_counter)
    }

    /// Feed one sample through the engine and notify listeners
    pub fn on_signal_sample(&mut self, beacon_identifier: &str, signal_strength: f64) -> ApiResult<Option<PositionUpdate>> {
        let update = self.engine.on_signal_sample(beacon_identifier, signal_strength)?;

        let diagnostics = self.engine.diagnostics();
        for callback in self.diagnostic_callbacks.values() {
            callback(&diagnostics);
        }

        if let Some(ref update) = update {
            for callback in self.position_callbacks.values() {
                callback(update);
            }
        }

        Ok(update)
    }

    /// Drain every sample currently available from `source`.
    ///
    /// Rejected samples are logged and skipped. Returns the number of samples
    /// read.
    pub fn process<S: SampleSource + ?Sized>(&mut self, source: &mut S) -> usize {
        let mut processed = 0;
        while let Some(SignalSample { beacon_identifier, signal_strength }) = source.next_sample() {
            processed += 1;
            if let Err(e) = self.on_signal_sample(&beacon_identifier, signal_strength) {
                tracing::debug!(error = %e, "skipping sample");
            }
        }
        processed
    }

    pub fn engine(&self) -> &PositioningEngine {
        &self.engine
    }

    pub fn system_state(&self) -> SystemState {
        self.engine.system_state()
    }

    /// Get number of registered callbacks
    pub fn callback_count(&self) -> (usize, usize) {
        (self.position_callbacks.len(), self.diagnostic_callbacks.len())
    }
}
