//! Equivalence checking between an original and a refined DFA.
//!
//! This is a test-time contract, not a runtime prerequisite: for every
//! valuation of the alphabet (up to a cap) and every state, the refined
//! automaton must enable exactly the same successor multiset as the
//! original.

use crate::automata::{parse_label, Dfa, LabelExpr};
use crate::error::Result;
use std::collections::BTreeMap;

/// A state and valuation at which the two automata disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disagreement {
    pub state: String,
    pub valuation: Vec<(String, bool)>,
    pub original_successors: Vec<String>,
    pub refined_successors: Vec<String>,
}

/// Exercises both automata on every valuation of the original's alphabet,
/// capped at `max_valuations`, and collects all disagreements. An empty
/// result means the refinement is language-preserving on the checked range.
pub fn check_equivalence(
    original: &Dfa,
    refined: &Dfa,
    max_valuations: usize,
) -> Result<Vec<Disagreement>> {
    let mut atoms: Vec<String> = Vec::new();
    let mut original_labels: Vec<LabelExpr> = Vec::new();
    for transition in original.transitions() {
        let expr = parse_label(&transition.label)?;
        expr.collect_atoms(&mut atoms);
        original_labels.push(expr);
    }
    let refined_labels: Vec<LabelExpr> = refined
        .transitions()
        .iter()
        .map(|t| parse_label(&t.label))
        .collect::<Result<_>>()?;

    let total = 1u64
        .checked_shl(atoms.len() as u32)
        .unwrap_or(u64::MAX)
        .min(max_valuations as u64);

    let mut disagreements = Vec::new();
    for mask in 0..total {
        let valuation: BTreeMap<String, bool> = atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| (atom.clone(), mask >> i & 1 == 1))
            .collect();

        for state in original.states() {
            let mut original_successors: Vec<String> = original
                .transitions()
                .iter()
                .zip(&original_labels)
                .filter(|(t, expr)| &t.source == state && expr.evaluate(&valuation))
                .map(|(t, _)| t.target.clone())
                .collect();
            let mut refined_successors: Vec<String> = refined
                .transitions()
                .iter()
                .zip(&refined_labels)
                .filter(|(t, expr)| &t.source == state && expr.evaluate(&valuation))
                .map(|(t, _)| t.target.clone())
                .collect();

            original_successors.sort();
            refined_successors.sort();
            if original_successors != refined_successors {
                disagreements.push(Disagreement {
                    state: state.clone(),
                    valuation: valuation
                        .iter()
                        .map(|(atom, &value)| (atom.clone(), value))
                        .collect(),
                    original_successors,
                    refined_successors,
                });
            }
        }
    }

    Ok(disagreements)
}
