//! Enumeration Driver (§4.5): streams i-combinations of probeable wires in
//! batches, applies the Incompressibility Filter, runs the rule engine,
//! and truncates the Wire Table back to its base size after every batch.

use rayon::prelude::*;

use crate::config::VerifierConfig;
use crate::error::Result;
use crate::gadget::WireTable;
use crate::verify::combinations::combinations_of;
use crate::verify::filter::IncompressibilityFilter;
use crate::verify::rules::{run_fixed_point, Rule1Variant};
use crate::verify::tuple::Tuple;

/// Runs the fixed-point loop over `batch`, splitting it into
/// `config.threads` independent chunks processed concurrently when that's
/// `> 1` (§5). Each chunk gets its own clone of `wire_table` as scratch
/// space for its derived wires — the Wire Table's derived region isn't
/// shared across threads, only the immutable parse-time prefix each clone
/// starts from. `wire_table` itself is left untouched; only the
/// single-threaded path mutates it directly and needs the caller to
/// truncate afterward.
fn run_fixed_point_concurrent(
    batch: Vec<Tuple>,
    wire_table: &mut WireTable,
    variant: Rule1Variant,
    threads: usize,
) -> Result<Vec<Tuple>> {
    if threads <= 1 || batch.len() <= 1 {
        return run_fixed_point(batch, wire_table, variant);
    }

    let chunk_size = ((batch.len() + threads - 1) / threads).max(1);
    let chunks: Vec<Vec<Tuple>> = batch
        .chunks(chunk_size)
        .map(|c| c.to_vec())
        .collect();

    let results: Result<Vec<Vec<Tuple>>> = chunks
        .into_par_iter()
        .map(|chunk| {
            let mut scratch = wire_table.clone();
            run_fixed_point(chunk, &mut scratch, variant)
        })
        .collect();

    Ok(results?.into_iter().flatten().collect())
}

/// Runs one size level `i` to completion and returns its declared
/// failures. `extra` is concatenated onto every tuple before
/// classification (the output-share selection of RPC/RPE games).
pub fn enumerate_level(
    probeable: &[usize],
    i: usize,
    wire_table: &mut WireTable,
    variant: Rule1Variant,
    config: &VerifierConfig,
    filter: &mut IncompressibilityFilter,
    extra: &[usize],
) -> Result<Vec<Tuple>> {
    let mut level_failures: Vec<Tuple> = Vec::new();
    let mut next_signatures = Vec::new();

    let mut combos = combinations_of(probeable, i);
    loop {
        let batch_indices: Vec<Vec<usize>> = (&mut combos).take(config.batch_size).collect();
        if batch_indices.is_empty() {
            break;
        }

        let mut batch = Vec::with_capacity(batch_indices.len());
        for main in &batch_indices {
            let tuple = Tuple::new(main, extra, wire_table);
            if filter.is_pruned(&tuple.probe_key) {
                continue;
            }
            batch.push(tuple);
        }

        if config.log_progress() {
            log::info!("level {i}: batch of {} tuples after filtering", batch.len());
        }

        if !batch.is_empty() {
            let failures = run_fixed_point_concurrent(batch, wire_table, variant, config.threads)?;
            if config.log_rule_detail() {
                log::debug!("level {i}: {} failures in this batch", failures.len());
            }
            for f in &failures {
                next_signatures.push(f.probe_key.clone());
            }
            level_failures.extend(failures);
        }

        wire_table.truncate_to_base();
    }

    filter.replace(next_signatures);
    Ok(level_failures)
}

/// Runs every size level `1..=c_max` and concatenates their failures.
pub fn run_levels(
    probeable: &[usize],
    c_max: usize,
    wire_table: &mut WireTable,
    variant: Rule1Variant,
    config: &VerifierConfig,
    extra: &[usize],
) -> Result<Vec<Tuple>> {
    let mut all_failures = Vec::new();
    let mut filter = IncompressibilityFilter::new();
    for i in 1..=c_max {
        let failures =
            enumerate_level(probeable, i, wire_table, variant, config, &mut filter, extra)?;
        all_failures.extend(failures);
    }
    Ok(all_failures)
}
