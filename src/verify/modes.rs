//! The five verification-mode entry points (§4.6).

use std::collections::HashMap;

use num_bigint::BigUint;

use crate::config::{self, VerifierConfig};
use crate::error::{Result, VerifierError};
use crate::gadget::ParsedGadget;
use crate::verify::combinations::combinations_of;
use crate::verify::driver;
use crate::verify::filter::IncompressibilityFilter;
use crate::verify::histogram::Histogram;
use crate::verify::rules::Rule1Variant;
use crate::verify::tuple::Tuple;

/// Result of a t-probing run.
#[derive(Debug, Clone)]
pub enum ProbingOutcome {
    Secure,
    Insecure { witness: Vec<String> },
}

/// Per-secret breakdown of RPE failures, when the gadget has two inputs.
#[derive(Debug, Clone, Default)]
pub struct CategoryHistograms {
    pub i1: Histogram,
    pub i2: Histogram,
    pub i1_and_i2: Histogram,
    pub i1_or_i2: Histogram,
}

#[derive(Debug, Clone)]
pub enum RpeOutcome {
    Plain(Histogram),
    Categorized(CategoryHistograms),
}

impl RpeOutcome {
    /// Elementwise-maxes `self` with `other`, in place. Both sides always
    /// come from the same gadget, so they agree on `Plain` vs.
    /// `Categorized` by construction.
    fn elementwise_max(&mut self, other: &RpeOutcome) {
        match (self, other) {
            (RpeOutcome::Plain(a), RpeOutcome::Plain(b)) => a.elementwise_max(b),
            (RpeOutcome::Categorized(a), RpeOutcome::Categorized(b)) => {
                a.i1.elementwise_max(&b.i1);
                a.i2.elementwise_max(&b.i2);
                a.i1_and_i2.elementwise_max(&b.i1_and_i2);
                a.i1_or_i2.elementwise_max(&b.i1_or_i2);
            }
            _ => unreachable!("rpe2 never mixes Plain and Categorized outcomes for one gadget"),
        }
    }
}

/// t-probing (§4.6): a single size level, Rule 1 saturated variant, early
/// exit with the first witness tuple.
pub fn t_probing(gadget: &ParsedGadget, t: usize, config: &VerifierConfig) -> Result<ProbingOutcome> {
    config::validate_order(t, gadget.n)?;
    let mut wire_table = gadget.wire_table.clone();
    let mut filter = IncompressibilityFilter::new();
    let failures = driver::enumerate_level(
        &gadget.probeable,
        t,
        &mut wire_table,
        Rule1Variant::Saturated,
        config,
        &mut filter,
        &[],
    )?;
    match failures.into_iter().next() {
        Some(first) => Ok(ProbingOutcome::Insecure { witness: first.witness_names }),
        None => Ok(ProbingOutcome::Secure),
    }
}

/// Random probing (§4.6): all levels `1..=c_max`, Rule 1 saturated variant.
pub fn random_probing(gadget: &ParsedGadget, c_max: usize, config: &VerifierConfig) -> Result<Histogram> {
    let mut wire_table = gadget.wire_table.clone();
    let failures = driver::run_levels(
        &gadget.probeable,
        c_max,
        &mut wire_table,
        Rule1Variant::Saturated,
        config,
        &[],
    )?;
    Ok(Histogram::from_failures(&failures))
}

/// RPC / composability (§4.6): Rule 1 bounded at order `t`; the
/// worst-case histogram across every size-`t_output` subset of the
/// (single) output.
pub fn rpc(
    gadget: &ParsedGadget,
    t: usize,
    t_output: usize,
    c_max: usize,
    config: &VerifierConfig,
) -> Result<Histogram> {
    config::validate_order(t, gadget.n)?;
    let out = single_output(gadget)?;

    let mut worst = Histogram::new();
    let mut any_subset = false;
    for subset in combinations_of(out, t_output) {
        any_subset = true;
        let mut wire_table = gadget.wire_table.clone();
        let failures = driver::run_levels(
            &gadget.probeable,
            c_max,
            &mut wire_table,
            Rule1Variant::Bounded(t),
            config,
            &subset,
        )?;
        worst.elementwise_max(&Histogram::from_failures(&failures));
    }
    if !any_subset {
        return Err(VerifierError::Config(format!(
            "--t-output {t_output} exceeds the output's share count {}",
            out.len()
        )));
    }
    Ok(worst)
}

/// RPE1 (§4.6): like RPC, but over every size-`(n-1)` subset of the
/// output, intersecting failures — a tuple counts only if it fails for
/// *every* such subset. With `copy`, the declassified set is instead the
/// Cartesian-paired concatenation of a size-`(n-1)` subset from each of
/// the gadget's two outputs, still combined by a single intersection
/// (unlike `rpe2`, this mode has no outer max/inner intersect split).
pub fn rpe1(
    gadget: &ParsedGadget,
    t: usize,
    c_max: usize,
    copy: bool,
    config: &VerifierConfig,
) -> Result<RpeOutcome> {
    config::validate_order(t, gadget.n)?;
    let n = gadget.n;

    let subsets: Vec<Vec<usize>> = if copy {
        if gadget.output_wires.len() < 2 {
            return Err(VerifierError::Config(
                "rpe1 --copy requires a gadget with two OUT names".into(),
            ));
        }
        let out1 = &gadget.output_wires[0];
        let out2 = &gadget.output_wires[1];
        let mut pairs = Vec::new();
        for o1 in combinations_of(out1, n.saturating_sub(1)) {
            for o2 in combinations_of(out2, n.saturating_sub(1)) {
                let mut combined = o1.clone();
                combined.extend_from_slice(&o2);
                pairs.push(combined);
            }
        }
        pairs
    } else {
        let out = single_output(gadget)?;
        combinations_of(out, n.saturating_sub(1)).collect()
    };
    if subsets.is_empty() {
        return Err(VerifierError::Config(
            "rpe1 found no valid output-share subset for the given order".into(),
        ));
    }

    let intersected = intersect_over_subsets(subsets.into_iter(), |subset| {
        let mut wire_table = gadget.wire_table.clone();
        driver::run_levels(
            &gadget.probeable,
            c_max,
            &mut wire_table,
            Rule1Variant::Bounded(t),
            config,
            subset,
        )
    })?;

    categorize(gadget, intersected, t)
}

/// RPE2 (§4.6): nested subsets — size `t` of one output, size `n-1` of
/// the other (or the same output with `--copy` off) — intersected across
/// every combination of the two.
pub fn rpe2(
    gadget: &ParsedGadget,
    t: usize,
    c_max: usize,
    copy: bool,
    config: &VerifierConfig,
) -> Result<RpeOutcome> {
    config::validate_order(t, gadget.n)?;
    let n = gadget.n;

    let (list_a, list_b): (&[usize], &[usize]) = if copy {
        if gadget.output_wires.len() < 2 {
            return Err(VerifierError::Config(
                "rpe2 --copy requires a gadget with two OUT names".into(),
            ));
        }
        (&gadget.output_wires[0], &gadget.output_wires[1])
    } else {
        let out = single_output(gadget)?;
        (out, out)
    };

    // Two-tier search: the outer loop (size-t subsets of `list_a`) combines
    // by elementwise max across its per-subset worst case, while the inner
    // loop (size-(n-1) subsets of `list_b`, for a fixed outer subset)
    // combines by intersection — a tuple only counts for this outer subset
    // if it fails under *every* inner declassification. This mirrors the
    // outer-max/inner-intersect split in `verification_random_probing_exp_
    // copy_12` (§4.6), not a single flat intersection over every pairing.
    let mut outer_subsets = combinations_of(list_a, t).peekable();
    if outer_subsets.peek().is_none() {
        return Err(VerifierError::Config(format!(
            "rpe2 found no size-{t} output-share subset to iterate over"
        )));
    }

    let mut worst: Option<RpeOutcome> = None;
    for subset_a in outer_subsets {
        let inner_subsets: Vec<Vec<usize>> = combinations_of(list_b, n.saturating_sub(1))
            .filter(|subset_b| copy || !subset_a.iter().any(|w| subset_b.contains(w)))
            .map(|subset_b| {
                let mut extra = subset_a.clone();
                extra.extend_from_slice(&subset_b);
                extra
            })
            .collect();
        if inner_subsets.is_empty() {
            return Err(VerifierError::Config(
                "rpe2 found no valid output-share subset pairing for the given order".into(),
            ));
        }

        let intersected = intersect_over_subsets(inner_subsets.into_iter(), |extra| {
            let mut wire_table = gadget.wire_table.clone();
            driver::run_levels(
                &gadget.probeable,
                c_max,
                &mut wire_table,
                Rule1Variant::Bounded(t),
                config,
                extra,
            )
        })?;

        let outcome = categorize(gadget, intersected, t)?;
        worst = Some(match worst {
            None => outcome,
            Some(mut prev) => {
                prev.elementwise_max(&outcome);
                prev
            }
        });
    }

    Ok(worst.expect("outer_subsets was checked non-empty above"))
}

fn single_output(gadget: &ParsedGadget) -> Result<&[usize]> {
    gadget
        .output_wires
        .first()
        .map(|v| v.as_slice())
        .ok_or_else(|| VerifierError::Config("gadget declares no OUT wires".into()))
}

/// Runs `run` over every item of `subsets`, keyed by each failure's
/// `probe_key`, and returns the tuples that failed under *every* subset.
fn intersect_over_subsets<I, F>(subsets: I, mut run: F) -> Result<Vec<Tuple>>
where
    I: Iterator<Item = Vec<usize>>,
    F: FnMut(&[usize]) -> Result<Vec<Tuple>>,
{
    let mut intersection: Option<HashMap<BigUint, Tuple>> = None;
    for subset in subsets {
        let failures = run(&subset)?;
        let map: HashMap<BigUint, Tuple> =
            failures.into_iter().map(|f| (f.probe_key.clone(), f)).collect();
        intersection = Some(match intersection {
            None => map,
            Some(prev) => prev.into_iter().filter(|(k, _)| map.contains_key(k)).collect(),
        });
    }
    Ok(intersection.unwrap_or_default().into_values().collect())
}

/// Splits failures into I1/I2/I1∧I2/I1∨I2 by which secret(s) exceed the
/// order-`t` saturation bound, when the gadget declares exactly two
/// secrets; otherwise returns the plain pooled histogram.
fn categorize(gadget: &ParsedGadget, failures: Vec<Tuple>, t: usize) -> Result<RpeOutcome> {
    if gadget.secret_names.len() != 2 {
        return Ok(RpeOutcome::Plain(Histogram::from_failures(&failures)));
    }
    let mut cats = CategoryHistograms::default();
    for f in &failures {
        let weight_1 = f.secret_union.first().copied().unwrap_or(0).count_ones() as usize;
        let weight_2 = f.secret_union.get(1).copied().unwrap_or(0).count_ones() as usize;
        let over1 = weight_1 > t;
        let over2 = weight_2 > t;
        if over1 && over2 {
            cats.i1_and_i2.update(&f.occ);
        } else if over1 {
            cats.i1.update(&f.occ);
        } else if over2 {
            cats.i2.update(&f.occ);
        }
        if over1 || over2 {
            cats.i1_or_i2.update(&f.occ);
        }
    }
    Ok(RpeOutcome::Categorized(cats))
}
