//! The Wire Table: canonical per-wire records and the bitmask signature
//! machinery the classifier and filter build on.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::algebra::{Polynomial, VarId};
use crate::error::{Result, VerifierError};

/// One wire's classifier-relevant record.
#[derive(Debug, Clone)]
pub struct Wire {
    pub name: String,
    pub expr: Polynomial,
    /// Per-secret occurrence mask; bit k set iff share k of that secret
    /// appears in `expr`. Indexed by secret position (0 or 1).
    pub secret_dep: Vec<u64>,
    /// Per-random classification (0/1/2), indexed by random position.
    pub random_dep: Vec<u8>,
    /// Number of downstream uses in the original circuit.
    pub nb_occ: usize,
    /// One-hot identifier; the table assigns `bit_sig = 1 << index`.
    pub bit_sig: BigUint,
}

/// Canonical per-wire records plus the derived-wire scratch region used by
/// the rule engine within one enumeration batch.
#[derive(Debug, Clone)]
pub struct WireTable {
    wires: Vec<Wire>,
    /// Size of the parse-time, immutable prefix. Anything at or past this
    /// index is a derived wire, ephemeral to the current batch.
    base_len: usize,
    num_secrets: usize,
    num_randoms: usize,
    shares_per_secret: usize,
    /// `secret_layout[v]` is `Some((secret_index, share_index))` when
    /// variable `v` names a share, else `None` (it's a random).
    secret_layout: Vec<Option<(usize, usize)>>,
    /// `random_vars[r]` is the [`VarId`] of the r-th declared random.
    random_vars: Vec<VarId>,
}

impl WireTable {
    /// Builds an empty table whose dependency-mask machinery is wired up
    /// from an already-populated [`crate::gadget::variable::VariableTable`].
    pub fn new(vartab: &crate::gadget::variable::VariableTable) -> Self {
        use crate::gadget::variable::VariableKind;

        let num_secrets = vartab.num_secrets();
        let num_randoms = vartab.num_randoms();
        let total_vars = num_secrets * vartab.shares_per_secret() + num_randoms;
        let mut secret_layout = vec![None; total_vars];
        let mut random_vars = vec![0 as VarId; num_randoms];
        for v in 0..total_vars as VarId {
            match vartab.kind(v) {
                VariableKind::Share { secret_index, share_index } => {
                    secret_layout[v as usize] = Some((secret_index, share_index));
                }
                VariableKind::Random { random_index } => {
                    random_vars[random_index] = v;
                }
            }
        }
        WireTable {
            wires: Vec::new(),
            base_len: 0,
            num_secrets,
            num_randoms,
            shares_per_secret: vartab.shares_per_secret(),
            secret_layout,
            random_vars,
        }
    }

    pub fn shares_per_secret(&self) -> usize {
        self.shares_per_secret
    }

    /// The "all shares of one secret present" pattern, `2^n - 1`.
    pub fn val_max(&self) -> u64 {
        if self.shares_per_secret >= 64 {
            u64::MAX
        } else {
            (1u64 << self.shares_per_secret) - 1
        }
    }

    /// Adds a parse-time wire and recomputes its secret/random dependency
    /// masks from `expr`. Only valid before [`WireTable::seal`] is called.
    pub fn push_base(&mut self, name: String, expr: Polynomial, nb_occ: usize) -> Result<usize> {
        if self.base_len != self.wires.len() {
            return Err(VerifierError::Internal(
                "push_base called after the table was sealed".into(),
            ));
        }
        let id = self.add_internal(name, expr, nb_occ)?;
        self.base_len = self.wires.len();
        Ok(id)
    }

    /// Marks the end of parse-time wires; everything added after this is
    /// derived and subject to truncation.
    pub fn seal(&mut self) {
        self.base_len = self.wires.len();
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn base_len(&self) -> usize {
        self.base_len
    }

    pub fn wire(&self, id: usize) -> &Wire {
        &self.wires[id]
    }

    /// `add_derived` per §4.2: recomputes dependency masks from `expr` and
    /// assigns the next one-hot bit_sig; returns an index `>= base_len()`.
    pub fn add_derived(&mut self, expr: Polynomial, nb_occ: usize) -> Result<usize> {
        let name = format!("$t{}", self.wires.len());
        self.add_internal(name, expr, nb_occ)
    }

    fn add_internal(&mut self, name: String, expr: Polynomial, nb_occ: usize) -> Result<usize> {
        let id = self.wires.len();
        let mut secret_dep = vec![0u64; self.num_secrets];
        for m in expr.monomials() {
            for &v in m.vars() {
                if let Some((secret_index, share_index)) = self.share_of(v) {
                    secret_dep[secret_index] |= 1u64 << share_index;
                }
            }
        }
        let mut random_dep = vec![0u8; self.num_randoms];
        for r in 0..self.num_randoms {
            random_dep[r] = expr.random_dep(self.random_var(r));
        }
        let bit_sig = BigUint::one() << id;
        self.wires.push(Wire { name, expr, secret_dep, random_dep, nb_occ, bit_sig });
        Ok(id)
    }

    /// Restores the table to its pre-derivation size, discarding every wire
    /// appended since the last call to [`WireTable::seal`] (§4.5 step 3 /
    /// §9 derived-wire garbage).
    pub fn truncate_to_base(&mut self) {
        self.wires.truncate(self.base_len);
    }

    /// Bitwise-OR of `secret_dep` across the tuple's member wires.
    pub fn secret_union(&self, tuple: &[usize]) -> Vec<u64> {
        let mut acc = vec![0u64; self.num_secrets];
        for &w in tuple {
            for s in 0..self.num_secrets {
                acc[s] |= self.wires[w].secret_dep[s];
            }
        }
        acc
    }

    /// Arithmetic sum of `random_dep[r]` across the tuple's member wires.
    pub fn random_sum(&self, tuple: &[usize], r: usize) -> u32 {
        tuple.iter().map(|&w| self.wires[w].random_dep[r] as u32).sum()
    }

    /// Bitwise-OR of the tuple members' `bit_sig`s.
    pub fn signature(&self, tuple: &[usize]) -> BigUint {
        tuple.iter().fold(BigUint::zero(), |acc, &w| acc | &self.wires[w].bit_sig)
    }

    pub fn num_secrets(&self) -> usize {
        self.num_secrets
    }

    pub fn num_randoms(&self) -> usize {
        self.num_randoms
    }

    /// Adds (or re-adds) a derived wire whose expression is the bare
    /// variable `r` — the substitution target of Rule 2.
    pub fn random_wire(&mut self, r: usize) -> Result<usize> {
        let var = self.random_var(r);
        self.add_derived(crate::algebra::Polynomial::from_var(var), 0)
    }

    fn share_of(&self, v: VarId) -> Option<(usize, usize)> {
        self.secret_layout.get(v as usize).copied().flatten()
    }

    pub(crate) fn random_var(&self, r: usize) -> VarId {
        self.random_vars[r]
    }
}
