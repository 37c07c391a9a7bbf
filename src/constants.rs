//! Defaults and DSL keyword constants, centralized here rather than
//! scattered as magic numbers through the implementation.

/// Default number of tuples processed per enumeration batch (2^20, per the
/// resource model). Small gadgets in tests use far smaller values.
pub const DEFAULT_BATCH_SIZE: usize = 1 << 20;

/// Default verbosity: silent except for the final result.
pub const DEFAULT_VERBOSITY: u8 = 0;

/// Default number of worker threads for batch-level parallelism.
pub const DEFAULT_THREADS: usize = 1;

/// Maximum number of shares supported per secret input. `secret_dep` masks
/// are stored as `u64`, so `n` must not exceed this.
pub const MAX_SHARES: usize = 64;

/// Maximum supported input arity (number of distinct secret inputs).
pub const MAX_INPUT_ARITY: usize = 2;

/// Number of Rule 3 passes attempted per outer fixed-point iteration before
/// moving on to re-checking Rules 1/2.
pub const RULE3_MAX_PASSES: usize = 3;

/// DSL keyword for the share-count declaration line.
pub const KW_SHARES: &str = "SHARES";
/// DSL keyword for the secret-input declaration line.
pub const KW_IN: &str = "IN";
/// DSL keyword for the fresh-randomness declaration line.
pub const KW_RANDOMS: &str = "RANDOMS";
/// DSL keyword for the output-share declaration line.
pub const KW_OUT: &str = "OUT";
/// Assignment token separating an instruction's LHS from its RHS.
pub const TOK_ASSIGN: &str = "=";
/// XOR operator token.
pub const TOK_XOR: &str = "+";
/// AND operator token.
pub const TOK_AND: &str = "*";
