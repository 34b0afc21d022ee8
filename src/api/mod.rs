//! Host-facing positioning APIs
//!
//! Blocking, callback-driven and channel-fed front ends over the same
//! [`PositioningEngine`], plus output formatting.

pub mod blocking;
pub mod nonblocking;
pub mod callback;
pub mod types;
pub mod formatting;

// Re-export commonly used API types
pub use types::{ApiError, ApiResult, BeaconDiagnostic, PositionUpdate, SignalSample, SystemState};
pub use blocking::PositioningEngine;
pub use nonblocking::{NonBlockingPositioningApi, SampleSender};
pub use callback::{CallbackHandle, CallbackPositioningApi, DiagnosticCallback, PositionCallback};
pub use formatting::{CsvFormatter, JsonFormatter, TextFormatter};
