//! The secret-saturation test and the three disproof rules that together
//! form the fixed-point loop of §4.3.
//!
//! Rule 1 is a *candidate filter*, not a final verdict: it starts from
//! every tuple that currently looks saturated (an over-approximation,
//! since a wire's raw expression can syntactically touch a share that
//! later cancels against randomness carried elsewhere in the tuple) and
//! the loop repeatedly tries to disprove membership by substituting
//! wires for cheaper algebraic equivalents via Rules 2/3/4, re-running
//! Rule 1 after each substitution. A tuple that is never successfully
//! disproven is a confirmed failure; anything Rule 1 rejects up front, or
//! that the loop disproves along the way, is permanently safe and
//! dropped for good.

use crate::constants::RULE3_MAX_PASSES;
use crate::error::Result;
use crate::gadget::WireTable;
use crate::verify::tuple::Tuple;

/// Which form of the secret-saturation test Rule 1 runs.
#[derive(Debug, Clone, Copy)]
pub enum Rule1Variant {
    /// t-probing / RP: a tuple is a candidate iff it contains every share
    /// of some secret.
    Saturated,
    /// RPC / RPE at order `t`: a tuple is a candidate iff it covers more
    /// than `t` shares of some secret.
    Bounded(usize),
}

fn saturates(union: &[u64], val_max: u64, variant: Rule1Variant) -> bool {
    match variant {
        Rule1Variant::Saturated => union.iter().any(|&u| u == val_max),
        Rule1Variant::Bounded(t) => union.iter().any(|&u| u.count_ones() as usize > t),
    }
}

/// Keeps only the tuples whose current `slots` still saturate a secret;
/// everything else is disproven and discarded for good.
pub fn rule1_filter(tuples: Vec<Tuple>, wire_table: &WireTable, variant: Rule1Variant) -> Vec<Tuple> {
    let val_max = wire_table.val_max();
    tuples
        .into_iter()
        .filter(|tuple| saturates(&wire_table.secret_union(&tuple.slots), val_max, variant))
        .collect()
}

/// For each random `r` carried linearly by exactly one tuple member,
/// rewrites that member's slot to the bare-random wire, eliminating its
/// secret dependence.
pub fn apply_rule2(tuples: &mut [Tuple], wire_table: &mut WireTable) -> Result<()> {
    for tuple in tuples.iter_mut() {
        for r in 0..wire_table.num_randoms() {
            if wire_table.random_sum(&tuple.slots, r) != 1 {
                continue;
            }
            let pos = tuple
                .slots
                .iter()
                .position(|&w| wire_table.wire(w).random_dep[r] == 1);
            if let Some(pos) = pos {
                let rw = wire_table.random_wire(r)?;
                tuple.slots[pos] = rw;
            }
        }
    }
    Ok(())
}

/// Finds the first pair of tuple members whose sum has fewer monomials
/// than one of them and replaces the cheaper side with the sum; at most
/// one substitution per tuple per call.
pub fn apply_rule3(tuples: &mut [Tuple], wire_table: &mut WireTable) -> Result<()> {
    for tuple in tuples.iter_mut() {
        let n = tuple.slots.len();
        let mut substitution: Option<(usize, usize)> = None; // (slot, new_wire)
        'search: for i in 0..n {
            for j in (i + 1)..n {
                let wa = tuple.slots[i];
                let wb = tuple.slots[j];
                let ea = wire_table.wire(wa).expr.clone();
                let eb = wire_table.wire(wb).expr.clone();
                let deg_a = ea.num_monomials();
                let deg_b = eb.num_monomials();
                let sum = ea.add(&eb);
                if sum.num_monomials() < deg_a {
                    let id = wire_table.add_derived(sum, 0)?;
                    substitution = Some((i, id));
                    break 'search;
                } else if sum.num_monomials() < deg_b {
                    let id = wire_table.add_derived(sum, 0)?;
                    substitution = Some((j, id));
                    break 'search;
                }
            }
        }
        if let Some((slot, id)) = substitution {
            tuple.slots[slot] = id;
        }
    }
    Ok(())
}

/// For each random `r` carried non-linearly by exactly one tuple member,
/// attempts the Rule 4 factorization test and, on success, substitutes the
/// residual wire for that member.
pub fn apply_rule4(tuples: &mut [Tuple], wire_table: &mut WireTable) -> Result<()> {
    for tuple in tuples.iter_mut() {
        for r in 0..wire_table.num_randoms() {
            if wire_table.random_sum(&tuple.slots, r) != 2 {
                continue;
            }
            let twos: Vec<usize> = tuple
                .slots
                .iter()
                .enumerate()
                .filter(|&(_, &w)| wire_table.wire(w).random_dep[r] == 2)
                .map(|(i, _)| i)
                .collect();
            if twos.len() != 1 {
                // Two wires each linear in r (both value 1) also sum to
                // two, but that shape belongs to Rule 2, not Rule 4.
                continue;
            }
            let pos = twos[0];
            let wid = tuple.slots[pos];
            let var_r = wire_table.random_var(r);
            let expr = wire_table.wire(wid).expr.clone();
            if let Some(residual) = expr.factorize_masked_random(var_r) {
                let id = wire_table.add_derived(residual, 0)?;
                tuple.slots[pos] = id;
            }
        }
    }
    Ok(())
}

/// Runs the full fixed-point loop of §4.3 and returns the tuples that
/// remain saturated after every disproof attempt — the confirmed
/// failures for this batch.
pub fn run_fixed_point(
    initial: Vec<Tuple>,
    wire_table: &mut WireTable,
    variant: Rule1Variant,
) -> Result<Vec<Tuple>> {
    let mut candidates = rule1_filter(initial, wire_table, variant);

    while !candidates.is_empty() {
        let len0 = candidates.len();

        loop {
            let before = candidates.len();
            apply_rule2(&mut candidates, wire_table)?;
            candidates = rule1_filter(candidates, wire_table, variant);
            if candidates.is_empty() || candidates.len() == before {
                break;
            }
        }
        if candidates.is_empty() {
            break;
        }

        apply_rule4(&mut candidates, wire_table)?;
        apply_rule2(&mut candidates, wire_table)?;
        candidates = rule1_filter(candidates, wire_table, variant);
        if candidates.is_empty() {
            break;
        }

        for _ in 0..RULE3_MAX_PASSES {
            apply_rule3(&mut candidates, wire_table)?;
        }
        apply_rule2(&mut candidates, wire_table)?;
        candidates = rule1_filter(candidates, wire_table, variant);

        if candidates.len() == len0 {
            break;
        }
    }

    for tuple in &mut candidates {
        tuple.freeze_witness(wire_table);
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gadget;

    fn gadget_wires(src: &str) -> (WireTable, Vec<usize>) {
        let g = gadget::parse(src).unwrap();
        (g.wire_table, g.probeable)
    }

    #[test]
    fn saturating_pair_survives_when_nothing_disproves_it() {
        // Broken refresh: c1 is a raw share, no rule can mask it.
        let (wt, probeable) = gadget_wires("SHARES 2\nIN a\nRANDOMS r\nOUT c\nc0 = a0 + r\nc1 = a1\n");
        let mut wt = wt;
        let tuple = Tuple::new(&probeable, &[], &wt);
        let failures = run_fixed_point(vec![tuple], &mut wt, Rule1Variant::Saturated).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].witness_names, vec!["c0".to_string(), "c1".to_string()]);
    }

    #[test]
    fn rule2_disproves_syntactically_saturated_isw_output() {
        // The classic 2-share ISW AND output wire: syntactically touches
        // every share of both inputs, but the lone random appears exactly
        // once, so Rule 2 rewrites it to a bare random and disproves it.
        let src = "SHARES 2\nIN a b\nRANDOMS r\nOUT c\n\
                   c0 = a0 * b0 + r\n\
                   c1 = a1 * b1 + r + a0 * b1 + a1 * b0\n";
        let (wt, probeable) = gadget_wires(src);
        let mut wt = wt;
        let single = vec![probeable[1]];
        let tuple = Tuple::new(&single, &[], &wt);
        let failures = run_fixed_point(vec![tuple], &mut wt, Rule1Variant::Saturated).unwrap();
        assert!(failures.is_empty());
    }

    #[test]
    fn full_output_tuple_trivially_saturates() {
        let src = "SHARES 3\nIN a\nRANDOMS r0 r1\nOUT c\n\
                   c0 = a0 + r0\nc1 = a1 + r0 + r1\nc2 = a2 + r1\n";
        let (wt, probeable) = gadget_wires(src);
        let mut wt = wt;
        let tuple = Tuple::new(&probeable, &[], &wt);
        let failures = run_fixed_point(vec![tuple], &mut wt, Rule1Variant::Saturated).unwrap();
        assert_eq!(failures.len(), 1);
    }
}
