//! Crate-wide error type.
//!
//! A security failure in t-probing mode is *not* represented here: it is a
//! normal, successful [`crate::verify::modes::ProbingOutcome`] carrying a
//! witness tuple, because the verifier is a total function over valid input.
//! Only configuration mistakes, malformed circuit files, and classifier
//! invariant violations are errors.

use thiserror::Error;

/// Errors that can abort a verification run before it produces a result.
#[derive(Debug, Error)]
pub enum VerifierError {
    /// The requested verifier configuration is unsatisfiable (e.g. `t >= n`,
    /// an unsupported input arity, or `coeff_max <= 0`).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The gadget DSL file could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The classifier encountered a state its invariants say cannot occur
    /// (e.g. a derived wire referencing an unknown variable). This is a
    /// program bug, not a user-facing condition, but it is reported rather
    /// than panicking so the CLI can exit cleanly with a diagnostic.
    #[error("internal invariant violated: {0}")]
    Internal(String),

    /// Reading the circuit file from disk failed.
    #[error("failed to read circuit file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, VerifierError>;
