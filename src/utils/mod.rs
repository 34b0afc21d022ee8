//! Configuration and logging utilities

pub mod config;
pub mod logging;

pub use config::{BeaconConfig, ConfigError, ConfigurationManager, MotionConfig, PositioningConfig};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
