//! Name resolution for share and random symbols.
//!
//! Variable ids are dense `u32`s assigned once, at declaration time, in
//! declaration order: all shares of the first secret, then the second (if
//! any), then all randoms. The table never grows after parsing a gadget's
//! header lines.

use std::collections::HashMap;

use crate::algebra::VarId;

/// What a variable id denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Share `k` of secret input `secret_index`.
    Share { secret_index: usize, share_index: usize },
    /// A declared fresh-randomness symbol.
    Random { random_index: usize },
}

/// Maps symbol names to ids and back, and records which secret/random each
/// id belongs to.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    names: Vec<String>,
    kinds: Vec<VariableKind>,
    by_name: HashMap<String, VarId>,
    num_secrets: usize,
    shares_per_secret: usize,
    num_randoms: usize,
}

impl VariableTable {
    pub fn new() -> Self {
        VariableTable::default()
    }

    /// Declares one secret input's `n` shares, named `"{prefix}{k}"`.
    /// Must be called before [`VariableTable::declare_randoms`].
    pub fn declare_secret(&mut self, prefix: &str, n: usize) -> crate::error::Result<()> {
        let secret_index = self.num_secrets;
        for share_index in 0..n {
            let name = format!("{prefix}{share_index}");
            self.insert(name, VariableKind::Share { secret_index, share_index })?;
        }
        self.num_secrets += 1;
        self.shares_per_secret = n;
        Ok(())
    }

    pub fn declare_randoms(&mut self, names: &[String]) -> crate::error::Result<()> {
        for name in names {
            let random_index = self.num_randoms;
            self.insert(name.clone(), VariableKind::Random { random_index })?;
            self.num_randoms += 1;
        }
        Ok(())
    }

    fn insert(&mut self, name: String, kind: VariableKind) -> crate::error::Result<()> {
        if self.by_name.contains_key(&name) {
            return Err(crate::error::VerifierError::Parse {
                line: 0,
                message: format!("duplicate variable name '{name}'"),
            });
        }
        let id = self.names.len() as VarId;
        self.by_name.insert(name.clone(), id);
        self.names.push(name);
        self.kinds.push(kind);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<VarId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: VarId) -> &str {
        &self.names[id as usize]
    }

    pub fn kind(&self, id: VarId) -> VariableKind {
        self.kinds[id as usize]
    }

    pub fn num_secrets(&self) -> usize {
        self.num_secrets
    }

    pub fn shares_per_secret(&self) -> usize {
        self.shares_per_secret
    }

    pub fn num_randoms(&self) -> usize {
        self.num_randoms
    }

    pub fn random_ids(&self) -> impl Iterator<Item = VarId> + '_ {
        self.kinds.iter().enumerate().filter_map(|(id, k)| match k {
            VariableKind::Random { .. } => Some(id as VarId),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_shares_in_order() {
        let mut vt = VariableTable::new();
        vt.declare_secret("a", 3).unwrap();
        assert_eq!(vt.lookup("a0"), Some(0));
        assert_eq!(vt.lookup("a2"), Some(2));
        assert_eq!(vt.shares_per_secret(), 3);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut vt = VariableTable::new();
        vt.declare_secret("a", 2).unwrap();
        assert!(vt.declare_randoms(&["a0".to_string()]).is_err());
    }
}
