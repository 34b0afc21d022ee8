//! Sample acquisition abstraction
//!
//! Radio scanning itself lives outside this crate; this module defines the
//! trait a scanner implements and a scripted source for tests.

pub mod source;
pub mod mock;

pub use source::SampleSource;
pub use mock::MockSampleSource;
