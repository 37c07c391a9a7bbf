//! A probed tuple of wires, as it flows through the rule engine.

use num_bigint::BigUint;

use crate::gadget::WireTable;

/// A multiset of probed wires, plus the output-share wires (if any) that
/// the composability/expandability games declassify alongside it.
///
/// `slots` is the live working view the rule engine rewrites in place as
/// Rules 2/3/4 substitute wires for cheaper algebraic equivalents, trying
/// to disprove that this tuple still saturates a secret. `probed` is the
/// original, untouched wire-id list the adversary actually named — it
/// never changes, so it remains valid for witness reporting even after
/// the batch that produced `slots`' derived wires truncates the Wire
/// Table back to its base size.
#[derive(Debug, Clone, Default)]
pub struct Tuple {
    pub slots: Vec<usize>,
    pub probed: Vec<usize>,
    /// `nb_occ` of each originally-probed wire (excludes any appended
    /// output-share wires), frozen at construction.
    pub occ: Vec<usize>,
    /// Bit signature of the originally-probed wires only, frozen at
    /// construction — a stable identity for this tuple across the
    /// different output-share selections an RPE outer loop tries.
    pub probe_key: BigUint,
    /// Per-secret occurrence union as of the last Rule 1 filter pass.
    /// Empty until the tuple has been through at least one such pass.
    pub secret_union: Vec<u64>,
    /// Wire names of the originally-probed members, filled in once this
    /// tuple survives to be a confirmed failure.
    pub witness_names: Vec<String>,
}

impl Tuple {
    /// `main` are the adversary-probed wires; `extra` are output-share
    /// wires concatenated on for composability/expandability games
    /// (§4.5 step b). Both contribute to the joint distribution the rule
    /// engine analyzes, but only `main` counts toward histogram weight or
    /// witness naming.
    pub fn new(main: &[usize], extra: &[usize], wire_table: &WireTable) -> Self {
        let occ = main.iter().map(|&w| wire_table.wire(w).nb_occ).collect();
        let probe_key = wire_table.signature(main);
        let mut slots = Vec::with_capacity(main.len() + extra.len());
        slots.extend_from_slice(main);
        slots.extend_from_slice(extra);
        Tuple {
            slots,
            probed: main.to_vec(),
            occ,
            probe_key,
            secret_union: Vec::new(),
            witness_names: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Freezes `secret_union`/`witness_names` from the tuple's current
    /// state — called once a tuple has survived the fixed-point loop as a
    /// confirmed failure.
    pub fn freeze_witness(&mut self, wire_table: &WireTable) {
        self.secret_union = wire_table.secret_union(&self.slots);
        self.witness_names =
            self.probed.iter().map(|&w| wire_table.wire(w).name.clone()).collect();
    }
}
