//! Explicit verifier configuration.
//!
//! The original tool this crate's design is indebted to kept batch size and
//! similar knobs as process-wide mutable globals. Here `VerifierConfig` is
//! built once and passed by reference through every layer of the driver, so
//! there is no hidden shared state between verification runs.

use crate::error::VerifierError;

/// Immutable configuration threaded through the enumeration driver.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Number of tuples processed per enumeration batch.
    pub batch_size: usize,
    /// 0 = silent except for the final result, 1 = per-level progress,
    /// 2 = per-rule tuple counts.
    pub verbosity: u8,
    /// Number of worker threads for batch-level parallelism. `1` disables
    /// concurrency entirely.
    pub threads: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig {
            batch_size: crate::constants::DEFAULT_BATCH_SIZE,
            verbosity: crate::constants::DEFAULT_VERBOSITY,
            threads: crate::constants::DEFAULT_THREADS,
        }
    }
}

impl VerifierConfig {
    pub fn new(batch_size: usize, verbosity: u8, threads: usize) -> crate::error::Result<Self> {
        if batch_size == 0 {
            return Err(VerifierError::Config("batch-size must be > 0".into()));
        }
        if threads == 0 {
            return Err(VerifierError::Config("threads must be > 0".into()));
        }
        if verbosity > 2 {
            return Err(VerifierError::Config(
                "verbosity must be one of 0, 1, 2".into(),
            ));
        }
        Ok(VerifierConfig {
            batch_size,
            verbosity,
            threads,
        })
    }

    pub fn log_progress(&self) -> bool {
        self.verbosity >= 1
    }

    pub fn log_rule_detail(&self) -> bool {
        self.verbosity >= 2
    }
}

/// Validates the `(t, n, input_arity, coeff_max)` combination shared by all
/// five verification modes, per §7's configuration error kind.
pub fn validate_order(t: usize, n: usize) -> crate::error::Result<()> {
    if n == 0 {
        return Err(VerifierError::Config("SHARES must be > 0".into()));
    }
    if n > crate::constants::MAX_SHARES {
        return Err(VerifierError::Config(format!(
            "SHARES={n} exceeds the supported maximum of {}",
            crate::constants::MAX_SHARES
        )));
    }
    if t >= n {
        return Err(VerifierError::Config(format!(
            "order t={t} must be strictly less than the share count n={n}"
        )));
    }
    Ok(())
}

pub fn validate_arity(arity: usize) -> crate::error::Result<()> {
    if arity == 0 || arity > crate::constants::MAX_INPUT_ARITY {
        return Err(VerifierError::Config(format!(
            "unsupported input arity {arity}: only 1 or 2 secret inputs are supported"
        )));
    }
    Ok(())
}

pub fn validate_coeff_max(coeff_max: i64) -> crate::error::Result<usize> {
    if coeff_max <= 0 {
        return Err(VerifierError::Config(
            "coeff_max must be a positive integer".into(),
        ));
    }
    Ok(coeff_max as usize)
}
