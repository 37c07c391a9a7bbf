use std::cmp::Ordering;
use std::collections::HashSet;

/// Identifier of a share or random symbol. Dense and assigned once at parse
/// time; never reused across a verification run.
pub type VarId = u32;

/// A product of distinct variables. Boolean variables are idempotent
/// (`x*x = x`), so a monomial is represented as a sorted, deduplicated list
/// of variable ids. The empty monomial is the constant `1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(Vec<VarId>);

impl Monomial {
    pub fn one() -> Self {
        Monomial(Vec::new())
    }

    pub fn var(v: VarId) -> Self {
        Monomial(vec![v])
    }

    pub fn from_vars(vars: &[VarId]) -> Self {
        let mut v = vars.to_vec();
        v.sort_unstable();
        v.dedup();
        Monomial(v)
    }

    pub fn degree(&self) -> usize {
        self.0.len()
    }

    pub fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    pub fn vars(&self) -> &[VarId] {
        &self.0
    }

    pub fn contains(&self, v: VarId) -> bool {
        self.0.binary_search(&v).is_ok()
    }

    /// If `self` has degree 2 and contains `v`, returns the other variable.
    pub fn other_var(&self, v: VarId) -> Option<VarId> {
        if self.0.len() != 2 {
            return None;
        }
        if self.0[0] == v {
            Some(self.0[1])
        } else if self.0[1] == v {
            Some(self.0[0])
        } else {
            None
        }
    }

    /// Product of two monomials, modulo `x*x = x`.
    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut v: Vec<VarId> = self.0.iter().chain(other.0.iter()).copied().collect();
        v.sort_unstable();
        v.dedup();
        Monomial(v)
    }
}

/// A sum of monomials over GF(2): addition is symmetric difference
/// (`x + x = 0`), so a polynomial is a sorted, deduplicated list of
/// monomials. The empty list is the constant `0`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polynomial(Vec<Monomial>);

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial(Vec::new())
    }

    pub fn one() -> Self {
        Polynomial(vec![Monomial::one()])
    }

    pub fn from_var(v: VarId) -> Self {
        Polynomial(vec![Monomial::var(v)])
    }

    pub fn from_monomial(m: Monomial) -> Self {
        Polynomial(vec![m])
    }

    pub fn monomials(&self) -> &[Monomial] {
        &self.0
    }

    pub fn num_monomials(&self) -> usize {
        self.0.len()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_var(&self, v: VarId) -> bool {
        self.0.iter().any(|m| m.contains(v))
    }

    /// Symmetric-difference merge of two already-sorted monomial lists.
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let mut out = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                Ordering::Less => {
                    out.push(self.0[i].clone());
                    i += 1;
                }
                Ordering::Greater => {
                    out.push(other.0[j].clone());
                    j += 1;
                }
                Ordering::Equal => {
                    // x + x cancels.
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&self.0[i..]);
        out.extend_from_slice(&other.0[j..]);
        Polynomial(out)
    }

    /// Removes a single monomial via XOR (adding it again cancels it if
    /// present, inserts it if absent — used by Rule 4 to strip a masked
    /// block whose monomials are already known to be present).
    pub fn xor_monomial(&self, m: &Monomial) -> Polynomial {
        self.add(&Polynomial(vec![m.clone()]))
    }

    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        let mut acc = Polynomial::zero();
        for m1 in &self.0 {
            for m2 in &other.0 {
                acc = acc.add(&Polynomial(vec![m1.mul(m2)]));
            }
        }
        acc
    }

    /// Classifies how random variable `r` occurs in `self`, per the wire
    /// invariant in §3: 0 absent, 1 linear in exactly one monomial with no
    /// co-factor, 2 otherwise (non-linear or split across ≥2 monomials).
    pub fn random_dep(&self, r: VarId) -> u8 {
        let mut occurrences = self.0.iter().filter(|m| m.contains(r));
        match occurrences.next() {
            None => 0,
            Some(first) => {
                if occurrences.next().is_some() {
                    2
                } else if first.degree() == 1 {
                    1
                } else {
                    2
                }
            }
        }
    }

    /// Attempts the Rule 4 masked-random factorization test (§4.1). Every
    /// `r*v_k` term's companion `v_k` is paired, among the non-`r` terms,
    /// with its single other variable (the term's *cofactor*); if every
    /// companion pairs with the *same* cofactor `w` (i.e. each `v_k` also
    /// appears as `w*v_k` elsewhere in the expression), that redundant
    /// `w*v_k` coupling is dropped from the result — it is implied by the
    /// masking identity, not independent secret dependence. The `r*v_k`
    /// terms themselves are left in place; only the matched external
    /// cofactor terms are removed. Requires at least two companion
    /// variables and a cofactor common to all of them: a single `r*v` term
    /// has nothing to certify uniformity against, and a companion with no
    /// matching cofactor (or with a cofactor no other companion shares)
    /// blocks the factorization entirely.
    pub fn factorize_masked_random(&self, r: VarId) -> Option<Polynomial> {
        let mut companions = Vec::new();
        let mut non_r = Vec::new();
        for m in &self.0 {
            if m.contains(r) {
                match m.other_var(r) {
                    Some(v) => companions.push(v),
                    // A monomial coupling r with more than one other
                    // variable (or r alone) isn't a supported factorization
                    // shape; bail rather than guess.
                    None => return None,
                }
            } else {
                non_r.push(m.clone());
            }
        }
        if companions.len() < 2 {
            return None;
        }

        let mut intersection: Option<HashSet<VarId>> = None;
        for v in &companions {
            let cofactors: HashSet<VarId> =
                non_r.iter().filter_map(|m| m.other_var(*v)).collect();
            intersection = Some(match intersection {
                None => cofactors,
                Some(prev) => prev.intersection(&cofactors).cloned().collect(),
            });
        }
        let common = match intersection {
            Some(s) if !s.is_empty() => s,
            _ => return None,
        };
        let w = *common.iter().next().expect("checked non-empty above");

        let mut residual = self.clone();
        for v in &companions {
            residual = residual.xor_monomial(&Monomial::from_vars(&[w, *v]));
        }
        Some(residual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: u32) -> VarId {
        id
    }

    #[test]
    fn addition_cancels_shared_monomials() {
        let a = Polynomial::from_var(v(0)).add(&Polynomial::from_var(v(1)));
        let b = Polynomial::from_var(v(1)).add(&Polynomial::from_var(v(2)));
        let sum = a.add(&b);
        // (0+1) + (1+2) = 0+2
        assert_eq!(sum.num_monomials(), 2);
        assert!(sum.contains_var(v(0)));
        assert!(sum.contains_var(v(2)));
        assert!(!sum.contains_var(v(1)));
    }

    #[test]
    fn random_dep_classifies_linear_use() {
        let r = v(10);
        let a0 = v(0);
        let e = Polynomial::from_var(a0).add(&Polynomial::from_var(r));
        assert_eq!(e.random_dep(r), 1);
    }

    #[test]
    fn random_dep_classifies_nonlinear_use() {
        let r = v(10);
        let a0 = v(0);
        let b0 = v(1);
        let e = Polynomial::from_monomial(Monomial::from_vars(&[r, a0]));
        assert_eq!(e.random_dep(r), 2);
        let two_monomials = Polynomial::from_var(r).add(&Polynomial::from_monomial(
            Monomial::from_vars(&[r, b0]),
        ));
        assert_eq!(two_monomials.random_dep(r), 2);
    }

    #[test]
    fn rule4_refuses_classic_masked_product() {
        // a0*b0 + a0*r + r*b0: the two companions a0 and b0 each pair with
        // only each other (a0's cofactor is b0, b0's cofactor is a0), not
        // with a shared third variable, so there is no common external
        // cofactor to certify against. This must stay unfactored.
        let a0 = v(0);
        let b0 = v(1);
        let r = v(2);
        let e = Polynomial::from_monomial(Monomial::from_vars(&[a0, b0]))
            .add(&Polynomial::from_monomial(Monomial::from_vars(&[a0, r])))
            .add(&Polynomial::from_monomial(Monomial::from_vars(&[r, b0])));

        assert!(e.factorize_masked_random(r).is_none());
    }

    #[test]
    fn rule4_factorizes_shared_external_cofactor() {
        // a0*x + a1*x + a0*r + a1*r: both companions a0 and a1 pair with
        // the same external cofactor x, so the x-coupling is redundant and
        // drops out, leaving only the r*a0 + r*a1 terms.
        let a0 = v(0);
        let a1 = v(1);
        let r = v(2);
        let x = v(3);
        let e = Polynomial::from_monomial(Monomial::from_vars(&[a0, x]))
            .add(&Polynomial::from_monomial(Monomial::from_vars(&[a1, x])))
            .add(&Polynomial::from_monomial(Monomial::from_vars(&[a0, r])))
            .add(&Polynomial::from_monomial(Monomial::from_vars(&[a1, r])));

        let residual = e.factorize_masked_random(r).expect("should factorize");
        let expected = Polynomial::from_monomial(Monomial::from_vars(&[a0, r]))
            .add(&Polynomial::from_monomial(Monomial::from_vars(&[a1, r])));
        assert_eq!(residual, expected);
        assert!(!residual.contains_var(x));
        // The r*a0 and r*a1 terms survive the factorization: only the
        // external x-coupling was redundant, not the randomness itself.
        assert_eq!(residual.random_dep(r), 2);
    }

    #[test]
    fn rule4_refuses_single_companion() {
        let a0 = v(0);
        let r = v(2);
        let e = Polynomial::from_monomial(Monomial::from_vars(&[a0, r]));
        assert!(e.factorize_masked_random(r).is_none());
    }
}
