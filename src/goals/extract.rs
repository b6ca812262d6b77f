//! Parsing a transition label into a disjunctive normal form of conjunctive
//! ground goals.

use crate::automata::parse_label;
use crate::error::Result;
use crate::grounding::GroundingMap;
use crate::search::{Atom, Term};

/// Parses a refined transition label into one conjunctive goal per DNF
/// disjunct. Each atom is expanded from its propositional symbol back to
/// `(predicate, arguments)` via the grounding map; an unknown symbol is a
/// [`crate::PlannerError::GroundingMapMismatch`]. Empty disjuncts (from
/// `true` labels) are dropped.
pub fn extract_goals(label: &str, grounding: &GroundingMap) -> Result<Vec<Vec<Atom>>> {
    let expr = parse_label(label)?;

    let mut goals = Vec::new();
    for disjunct in expr.dnf() {
        let mut atoms = Vec::with_capacity(disjunct.len());
        for (symbol, negated) in disjunct {
            let grounded = grounding.lookup(&symbol)?;
            let arguments = grounded
                .args
                .iter()
                .map(|object| Term::constant(object.as_str()))
                .collect();
            atoms.push(Atom::new(grounded.predicate.as_str(), arguments, negated));
        }
        if !atoms.is_empty() {
            goals.push(atoms);
        }
    }

    Ok(goals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    fn grounding() -> GroundingMap {
        let mut map = GroundingMap::default();
        map.add_atom("on", &["a", "b"]);
        map.add_atom("clear", &["c"]);
        map
    }

    #[test]
    fn conjunction_becomes_one_goal() {
        let goals = extract_goals("on_a_b & clear_c", &grounding()).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].len(), 2);
        assert_eq!(goals[0][0].to_string(), "on(a, b)");
        assert_eq!(goals[0][1].to_string(), "clear(c)");
    }

    #[test]
    fn disjunction_splits_goals() {
        let goals = extract_goals("on_a_b | clear_c", &grounding()).unwrap();
        assert_eq!(goals.len(), 2);
    }

    #[test]
    fn negated_symbols_become_negated_atoms() {
        let goals = extract_goals("~on_a_b", &grounding()).unwrap();
        assert_eq!(goals[0][0].to_string(), "~on(a, b)");
    }

    #[test]
    fn true_labels_yield_no_goals() {
        assert!(extract_goals("true", &grounding()).unwrap().is_empty());
    }

    #[test]
    fn unknown_symbols_fail_fast() {
        assert!(matches!(
            extract_goals("holding_a", &grounding()),
            Err(PlannerError::GroundingMapMismatch { .. })
        ));
    }
}
