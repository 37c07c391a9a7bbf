//! Tuple classification and the batched enumeration driver (§4.2-§4.7).

pub mod combinations;
pub mod driver;
pub mod filter;
pub mod histogram;
pub mod modes;
pub mod rules;
pub mod tuple;

pub use histogram::Histogram;
pub use modes::{CategoryHistograms, ProbingOutcome, RpeOutcome};
pub use tuple::Tuple;
