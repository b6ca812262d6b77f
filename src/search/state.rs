//! Regression states and their canonical form.

use crate::parsed_types::Name;
use crate::search::{Atom, InequalityPair, Term};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// An unordered set of open subgoals plus pairwise variable inequality
/// constraints, a depth counter, and the largest fresh-variable index
/// introduced along the path from the goal. States are immutable once built;
/// atoms and constraints are stored sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegressionState {
    atoms: Vec<Atom>,
    constraints: Vec<InequalityPair>,
    depth: u32,
    high_water: u32,
}

impl RegressionState {
    pub fn new(
        mut atoms: Vec<Atom>,
        mut constraints: Vec<InequalityPair>,
        depth: u32,
        high_water: u32,
    ) -> Self {
        atoms.sort();
        atoms.dedup();
        constraints.sort();
        constraints.dedup();
        Self {
            atoms,
            constraints,
            depth,
            high_water,
        }
    }

    /// The root state of a search: the goal atoms themselves, no
    /// constraints, and a high-water mark taken from the largest `?v<N>`
    /// already present in the goal.
    pub fn goal(atoms: Vec<Atom>) -> Self {
        let high_water = atoms
            .iter()
            .flat_map(|atom| atom.arguments().iter())
            .filter_map(|term| term.fresh_index())
            .max()
            .unwrap_or(0);
        Self::new(atoms, Vec::new(), 0, high_water)
    }

    #[inline(always)]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline(always)]
    pub fn constraints(&self) -> &[InequalityPair] {
        &self.constraints
    }

    #[inline(always)]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline(always)]
    pub fn high_water(&self) -> u32 {
        self.high_water
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.atoms.binary_search(atom).is_ok()
    }

    /// Every term occurring in an atom or a constraint.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.atoms
            .iter()
            .flat_map(|atom| atom.arguments().iter())
            .chain(self.constraints.iter().flat_map(|pair| {
                let (a, b) = pair.endpoints();
                [a, b]
            }))
    }

    /// The canonical renaming of this state's variables: traversing atoms in
    /// sorted order (then constraints), the first variable seen becomes
    /// `?c1`, the next `?c2`, and so on. Constants are unchanged. Returns the
    /// renamed state together with the applied mapping.
    pub fn canonical(&self) -> (RegressionState, BTreeMap<Name, Name>) {
        let mut mapping: BTreeMap<Name, Name> = BTreeMap::new();
        let mut next = 1u32;

        let mut visit = |name: &Name, mapping: &mut BTreeMap<Name, Name>| {
            if !mapping.contains_key(name) {
                mapping.insert(name.clone(), Name::new(format!("c{next}")));
                next += 1;
            }
        };

        for atom in &self.atoms {
            for variable in atom.variables() {
                visit(variable, &mut mapping);
            }
        }
        for pair in &self.constraints {
            let (a, b) = pair.endpoints();
            for term in [a, b] {
                if let Term::Variable(name) = term {
                    visit(name, &mut mapping);
                }
            }
        }

        let rename = |name: &Name| mapping.get(name).cloned();
        let atoms = self
            .atoms
            .iter()
            .map(|atom| atom.rename_variables(&rename))
            .collect();
        let constraints = self
            .constraints
            .iter()
            .map(|pair| pair.rename_variables(&rename))
            .collect();

        (
            RegressionState::new(atoms, constraints, self.depth, self.high_water),
            mapping,
        )
    }

    /// The visited-map key: two states share a key iff they are isomorphic
    /// under a consistent renaming of variables.
    pub fn canonical_key(&self) -> String {
        self.canonical().0.to_string()
    }
}

impl Display for RegressionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.atoms.is_empty() {
            write!(f, "true")?;
        }
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, " & ")?;
            }
            write!(f, "{atom}")?;
        }
        if !self.constraints.is_empty() {
            write!(f, " | ")?;
            for (i, pair) in self.constraints.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{pair}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Term;
    use smallvec::smallvec;

    fn atom(pred: &str, args: &[Term]) -> Atom {
        Atom::positive(pred, args.iter().cloned().collect())
    }

    #[test]
    fn goal_state_picks_up_high_water() {
        let state = RegressionState::goal(vec![atom(
            "on",
            &[Term::fresh_variable(1), Term::fresh_variable(2)],
        )]);
        assert_eq!(state.high_water(), 2);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn isomorphic_states_share_a_key() {
        let a = RegressionState::goal(vec![
            atom("on", &[Term::variable("v9"), Term::variable("v1")]),
            atom("clear", &[Term::variable("v1")]),
        ]);
        let b = RegressionState::goal(vec![
            atom("on", &[Term::variable("v2"), Term::variable("v7")]),
            atom("clear", &[Term::variable("v7")]),
        ]);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn distinct_structures_have_distinct_keys() {
        let a = RegressionState::goal(vec![atom(
            "on",
            &[Term::variable("v1"), Term::variable("v2")],
        )]);
        let b = RegressionState::goal(vec![atom(
            "on",
            &[Term::variable("v1"), Term::variable("v1")],
        )]);
        assert_ne!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn canonicalizing_twice_is_a_fixed_point() {
        let state = RegressionState::new(
            vec![
                atom("on", &[Term::variable("v4"), Term::constant("a")]),
                atom("clear", &[Term::variable("v2")]),
            ],
            vec![InequalityPair::new(
                Term::variable("v4"),
                Term::variable("v2"),
            )],
            3,
            4,
        );
        let (once, _) = state.canonical();
        let (twice, _) = once.canonical();
        assert_eq!(once, twice);
    }

    #[test]
    fn constants_survive_canonicalization() {
        let state = RegressionState::goal(vec![atom(
            "on",
            &[Term::constant("a"), Term::variable("v3")],
        )]);
        let (canonical, _) = state.canonical();
        assert_eq!(canonical.to_string(), "on(a, ?c1)");
    }
}
