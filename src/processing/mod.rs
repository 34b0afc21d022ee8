//! Reading bookkeeping between the sample source and the solver

pub mod readings;

pub use readings::BeaconRegistry;
