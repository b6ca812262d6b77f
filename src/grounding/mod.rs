//! The grounding map: the bijection between the propositional symbols used
//! on DFA edges and the predicate-plus-arguments atoms of the PDDL domain.

mod symbol;

pub use symbol::{decode_hyphens, encode_hyphens, propositional_symbol, HYPHEN_MARKER};

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One grounded propositional atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundedAtom {
    pub predicate: String,
    pub args: Vec<String>,
}

/// The arity record of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateArity {
    pub arity: usize,
}

/// The grounding-map document:
///
/// ```json
/// {
///   "atoms": { "on_a_b": { "predicate": "on", "args": ["a", "b"] } },
///   "predicates": { "on": { "arity": 2 } },
///   "objects": ["a", "b"]
/// }
/// ```
///
/// Constants containing the ASCII hyphen are encoded in symbols by replacing
/// each hyphen with the marker [`HYPHEN_MARKER`], so that every symbol stays
/// a single identifier; the atom entries store the decoded spellings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingMap {
    pub atoms: BTreeMap<String, GroundedAtom>,
    pub predicates: BTreeMap<String, PredicateArity>,
    pub objects: Vec<String>,
}

impl GroundingMap {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| PlannerError::io(path, source))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("grounding map serializes")
    }

    /// Registers an atom under its derived symbol and keeps the predicate
    /// and object registries in sync. Returns the symbol.
    pub fn add_atom(&mut self, predicate: &str, args: &[&str]) -> String {
        let symbol = propositional_symbol(predicate, args);
        self.atoms.insert(
            symbol.clone(),
            GroundedAtom {
                predicate: predicate.to_string(),
                args: args.iter().map(|arg| arg.to_string()).collect(),
            },
        );
        self.predicates
            .entry(predicate.to_string())
            .or_insert(PredicateArity { arity: args.len() });
        for arg in args {
            if !self.objects.iter().any(|o| o == arg) {
                self.objects.push(arg.to_string());
            }
        }
        symbol
    }

    /// Resolves a propositional symbol; a missing entry is a
    /// [`PlannerError::GroundingMapMismatch`].
    pub fn lookup(&self, symbol: &str) -> Result<&GroundedAtom> {
        self.atoms
            .get(symbol)
            .ok_or_else(|| PlannerError::GroundingMapMismatch {
                symbol: symbol.to_string(),
            })
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }
}
