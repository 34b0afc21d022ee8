//! Non-blocking API for hosts that deliver samples from several threads
//!
//! Samples are sent over a channel to one evaluator thread that owns the
//! [`PositioningEngine`]. The channel serializes the update, readiness and
//! solve sequence, so producers never share mutable state.

use crate::api::blocking::PositioningEngine;
use crate::api::types::{ApiError, ApiResult, BeaconDiagnostic, PositionUpdate, SignalSample};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Updates buffered for the host before new ones are dropped
pub const DEFAULT_UPDATE_CAPACITY: usize = 64;

enum EvaluatorMessage {
    Sample(SignalSample),
    Diagnostics(Sender<Vec<BeaconDiagnostic>>),
    Shutdown,
}

/// Cloneable handle used by producers to submit samples
#[derive(Clone)]
pub struct SampleSender {
    tx: Sender<EvaluatorMessage>,
}

impl SampleSender {
    /// Queue a sample for evaluation
    pub fn on_signal_sample(&self, beacon_identifier: impl Into<String>, signal_strength: f64) -> ApiResult<()> {
        self.send(SignalSample::new(beacon_identifier, signal_strength))
    }

    pub fn send(&self, sample: SignalSample) -> ApiResult<()> {
        self.tx
            .send(EvaluatorMessage::Sample(sample))
            .map_err(|_| ApiError::EvaluatorStopped)
    }
}

/// Evaluator thread plus the channels around it
pub struct NonBlockingPositioningApi {
    sender: SampleSender,
    updates: Receiver<PositionUpdate>,
    worker: Option<JoinHandle<PositioningEngine>>,
}

impl NonBlockingPositioningApi {
    /// Move `engine` onto a new evaluator thread
    pub fn spawn(engine: PositioningEngine) -> ApiResult<Self> {
        Self::spawn_with_capacity(engine, DEFAULT_UPDATE_CAPACITY)
    }

    /// Like [`NonBlockingPositioningApi::spawn`], buffering at most `capacity`
    /// unread updates. Updates produced while the buffer is full are dropped.
    pub fn spawn_with_capacity(engine: PositioningEngine, capacity: usize) -> ApiResult<Self> {
        let (tx, rx) = mpsc::channel();
        let (update_tx, updates) = mpsc::sync_channel(capacity);

        let worker = thread::Builder::new()
            .name("beacon-evaluator".to_string())
            .spawn(move || run_evaluator(engine, rx, update_tx))
            .map_err(|_| ApiError::EvaluatorStopped)?;

        Ok(Self {
            sender: SampleSender { tx },
            updates,
            worker: Some(worker),
        })
    }

    /// Handle for producers; clone freely
    pub fn sender(&self) -> SampleSender {
        self.sender.clone()
    }

    /// Next update if one is already available
    pub fn try_recv_update(&self) -> Option<PositionUpdate> {
        self.updates.try_recv().ok()
    }

    /// Wait up to `timeout` for the next update
    pub fn recv_update_timeout(&self, timeout: Duration) -> ApiResult<Option<PositionUpdate>> {
        match self.updates.recv_timeout(timeout) {
            Ok(update) => Ok(Some(update)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(ApiError::EvaluatorStopped),
        }
    }

    /// Current diagnostics, taken after every sample queued so far
    pub fn diagnostics(&self) -> ApiResult<Vec<BeaconDiagnostic>> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.sender
            .tx
            .send(EvaluatorMessage::Diagnostics(reply_tx))
            .map_err(|_| ApiError::EvaluatorStopped)?;
        reply_rx.recv().map_err(|_| ApiError::EvaluatorStopped)
    }

    /// Stop the evaluator after it drains queued samples and return the engine
    pub fn shutdown(mut self) -> ApiResult<PositioningEngine> {
        let _ = self.sender.tx.send(EvaluatorMessage::Shutdown);
        let worker = self.worker.take().ok_or(ApiError::EvaluatorStopped)?;
        worker.join().map_err(|_| ApiError::EvaluatorStopped)
    }
}

impl Drop for NonBlockingPositioningApi {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.sender.tx.send(EvaluatorMessage::Shutdown);
            let _ = worker.join();
        }
    }
}

fn run_evaluator(
    mut engine: PositioningEngine,
    rx: Receiver<EvaluatorMessage>,
    updates: SyncSender<PositionUpdate>,
) -> PositioningEngine {
    tracing::debug!("evaluator started");
    while let Ok(message) = rx.recv() {
        match message {
            EvaluatorMessage::Sample(sample) => match engine.process_sample(&sample) {
                Ok(Some(update)) => match updates.try_send(update) {
                    Ok(()) => {}
                    Err(TrySendError::Full(update)) => {
                        tracing::debug!(sequence = update.sequence_number, "update buffer full, dropping update");
                    }
                    // Nobody listening; keep tracking
                    Err(TrySendError::Disconnected(_)) => {}
                },
                Ok(None) => {}
                Err(e) => tracing::debug!(error = %e, "skipping sample"),
            },
            EvaluatorMessage::Diagnostics(reply) => {
                let _ = reply.send(engine.diagnostics());
            }
            EvaluatorMessage::Shutdown => break,
        }
    }
    tracing::debug!("evaluator stopped");
    engine
}
