//! Incompressibility Filter (§4.4): remembers only the immediately-prior
//! size level's minimal failure signatures, since any failure whose
//! signature is a superset of a prior incompressible failure is already
//! known to fail and need not be re-derived.

use num_bigint::BigUint;

#[derive(Debug, Clone, Default)]
pub struct IncompressibilityFilter {
    prior: Vec<BigUint>,
}

impl IncompressibilityFilter {
    pub fn new() -> Self {
        IncompressibilityFilter::default()
    }

    /// `true` iff some remembered prior-level signature is a subset of
    /// `sig` — i.e. `sig` is a superset of an already-known failure.
    pub fn is_pruned(&self, sig: &BigUint) -> bool {
        self.prior.iter().any(|p| (p & sig) == *p)
    }

    /// Replaces the remembered set wholesale with this level's
    /// incompressible failures, for the next level to consult.
    pub fn replace(&mut self, next: Vec<BigUint>) {
        self.prior = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prunes_supersets_of_prior_failures() {
        let mut f = IncompressibilityFilter::new();
        f.replace(vec![BigUint::from(0b0011u32)]);
        assert!(f.is_pruned(&BigUint::from(0b1011u32)));
        assert!(!f.is_pruned(&BigUint::from(0b1000u32)));
    }
}
