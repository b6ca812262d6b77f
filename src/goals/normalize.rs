//! Goal normalization: renaming every distinct constant in a conjunctive
//! goal to a fresh variable, so that goals differing only in object identity
//! share one exploration.

use crate::parsed_types::Name;
use crate::search::{Atom, Term};
use std::collections::BTreeMap;

/// A parameterized goal schema together with its constant-to-variable
/// substitution. `on(a, b) & clear(c)` normalizes to
/// `on(?v1, ?v2) & clear(?v3)` with bindings `a → v1, b → v2, c → v3`.
#[derive(Debug, Clone)]
pub struct NormalizedGoal {
    /// Schema atoms, in the disjunct's original order.
    pub atoms: Vec<Atom>,
    /// Constant-to-variable substitution, in first-appearance order.
    pub bindings: Vec<(Name, Name)>,
}

impl NormalizedGoal {
    /// The canonical cache serialization of a schema: its atoms rendered in
    /// sorted order.
    pub fn cache_key(&self) -> String {
        let mut rendered: Vec<String> = self.atoms.iter().map(Atom::to_string).collect();
        rendered.sort();
        rendered.join(" & ")
    }
}

/// Renames each distinct constant to `?v1`, `?v2`, … in first-appearance
/// order across the conjunction. Variables already present are left alone.
pub fn normalize_goal(goal: &[Atom]) -> NormalizedGoal {
    let mut mapping: BTreeMap<Name, Name> = BTreeMap::new();
    let mut bindings = Vec::new();
    let mut next = 1u32;

    let mut atoms = Vec::with_capacity(goal.len());
    for atom in goal {
        let arguments = atom
            .arguments()
            .iter()
            .map(|term| match term {
                Term::Constant(constant) => {
                    let variable = mapping.entry(constant.clone()).or_insert_with(|| {
                        let fresh = Name::new(format!("v{next}"));
                        next += 1;
                        bindings.push((constant.clone(), fresh.clone()));
                        fresh
                    });
                    Term::Variable(variable.clone())
                }
                Term::Variable(_) => term.clone(),
            })
            .collect();
        atoms.push(Atom::new(
            atom.predicate().clone(),
            arguments,
            atom.is_negated(),
        ));
    }

    NormalizedGoal { atoms, bindings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn ground(pred: &str, args: &[&str]) -> Atom {
        Atom::positive(pred, args.iter().map(|a| Term::constant(*a)).collect())
    }

    #[test]
    fn constants_become_fresh_variables() {
        let normalized = normalize_goal(&[ground("on", &["a", "b"])]);
        assert_eq!(normalized.atoms[0].to_string(), "on(?v1, ?v2)");
        assert_eq!(normalized.bindings.len(), 2);
    }

    #[test]
    fn shared_constants_share_variables() {
        let normalized = normalize_goal(&[ground("on", &["a", "b"]), ground("on", &["b", "c"])]);
        assert_eq!(normalized.atoms[0].to_string(), "on(?v1, ?v2)");
        assert_eq!(normalized.atoms[1].to_string(), "on(?v2, ?v3)");
    }

    #[test]
    fn goals_differing_only_in_objects_share_a_schema() {
        let a = normalize_goal(&[ground("on", &["a", "b"])]);
        let b = normalize_goal(&[ground("on", &["c", "d"])]);
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn negation_is_preserved() {
        let atom = Atom::negative(
            "on",
            smallvec![Term::constant("a"), Term::constant("b")],
        );
        let normalized = normalize_goal(&[atom]);
        assert_eq!(normalized.atoms[0].to_string(), "~on(?v1, ?v2)");
    }

    #[test]
    fn multi_atom_example_from_the_pipeline() {
        let normalized = normalize_goal(&[
            ground("on", &["a", "b"]),
            ground("clear", &["c"]),
        ]);
        assert_eq!(normalized.atoms[0].to_string(), "on(?v1, ?v2)");
        assert_eq!(normalized.atoms[1].to_string(), "clear(?v3)");
    }
}
