//! Inequality constraints and the transient constraint graph used by the
//! feasibility prune.

use crate::parsed_types::Name;
use crate::search::Term;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// An unordered inequality between two terms, stored with its endpoints
/// sorted so that `(x, y)` and `(y, x)` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InequalityPair {
    lo: Term,
    hi: Term,
}

impl InequalityPair {
    pub fn new(a: Term, b: Term) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn endpoints(&self) -> (&Term, &Term) {
        (&self.lo, &self.hi)
    }

    /// `t != t` can never be satisfied.
    pub fn is_trivially_false(&self) -> bool {
        self.lo == self.hi
    }

    /// Two distinct constants are definitionally unequal.
    pub fn is_trivially_true(&self) -> bool {
        self.lo.is_constant() && self.hi.is_constant() && self.lo != self.hi
    }

    /// Rewrites both endpoints through `rename`, leaving unmapped variables
    /// untouched.
    pub fn rename_variables(&self, rename: &impl Fn(&Name) -> Option<Name>) -> Self {
        let map = |term: &Term| match term {
            Term::Variable(name) => match rename(name) {
                Some(new) => Term::Variable(new),
                None => term.clone(),
            },
            Term::Constant(_) => term.clone(),
        };
        Self::new(map(&self.lo), map(&self.hi))
    }
}

impl Display for InequalityPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} != {}", self.lo, self.hi)
    }
}

/// The undirected graph whose nodes are the terms of a regression state and
/// whose edges are (i) the state's inequality constraints and (ii) every pair
/// of distinct constants. A clique is a set of terms that must all denote
/// distinct objects, so the maximum clique size is a lower bound on the
/// number of objects any grounding of the state requires.
#[derive(Debug)]
pub struct ConstraintGraph {
    adjacency: BTreeMap<Term, BTreeSet<Term>>,
}

impl ConstraintGraph {
    pub fn new<'a>(
        terms: impl IntoIterator<Item = &'a Term>,
        constraints: &[InequalityPair],
    ) -> Self {
        let mut adjacency: BTreeMap<Term, BTreeSet<Term>> = BTreeMap::new();
        let mut constants = Vec::new();

        for term in terms {
            adjacency.entry(term.clone()).or_default();
            if term.is_constant() && !constants.contains(term) {
                constants.push(term.clone());
            }
        }

        let mut add_edge = |a: &Term, b: &Term, adj: &mut BTreeMap<Term, BTreeSet<Term>>| {
            if a == b {
                return;
            }
            adj.entry(a.clone()).or_default().insert(b.clone());
            adj.entry(b.clone()).or_default().insert(a.clone());
        };

        for pair in constraints {
            let (a, b) = pair.endpoints();
            add_edge(a, b, &mut adjacency);
        }

        for i in 0..constants.len() {
            for j in (i + 1)..constants.len() {
                add_edge(&constants[i].clone(), &constants[j].clone(), &mut adjacency);
            }
        }

        Self { adjacency }
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// A greedy maximal clique, seeded from the ten highest-degree nodes.
    /// Not necessarily maximum, but a sound lower bound for pruning.
    pub fn max_clique_lower_bound(&self) -> usize {
        if self.adjacency.is_empty() {
            return 0;
        }

        let mut by_degree: Vec<&Term> = self.adjacency.keys().collect();
        by_degree.sort_by(|a, b| {
            self.adjacency[*b]
                .len()
                .cmp(&self.adjacency[*a].len())
                .then_with(|| a.cmp(b))
        });

        let mut best = 1;
        for &start in by_degree.iter().take(10) {
            let mut clique: BTreeSet<&Term> = BTreeSet::new();
            clique.insert(start);
            let mut candidates: BTreeSet<&Term> = self.adjacency[start].iter().collect();

            while !candidates.is_empty() {
                // Pick the candidate keeping the most future candidates.
                let mut chosen: Option<(&Term, usize)> = None;
                for &candidate in &candidates {
                    let neighbours = &self.adjacency[candidate];
                    if !clique.iter().all(|&member| neighbours.contains(member)) {
                        continue;
                    }
                    let future = candidates
                        .iter()
                        .filter(|&&other| neighbours.contains(other))
                        .count();
                    match chosen {
                        Some((_, best_future)) if future <= best_future => {}
                        _ => chosen = Some((candidate, future)),
                    }
                }

                let Some((next, _)) = chosen else { break };
                clique.insert(next);
                let neighbours = &self.adjacency[next];
                candidates = candidates
                    .into_iter()
                    .filter(|&c| neighbours.contains(c) && c != next)
                    .collect();
            }

            best = best.max(clique.len());
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_unordered() {
        let a = InequalityPair::new(Term::variable("v1"), Term::variable("v2"));
        let b = InequalityPair::new(Term::variable("v2"), Term::variable("v1"));
        assert_eq!(a, b);
    }

    #[test]
    fn triviality_checks() {
        assert!(InequalityPair::new(Term::variable("v1"), Term::variable("v1"))
            .is_trivially_false());
        assert!(
            InequalityPair::new(Term::constant("a"), Term::constant("b")).is_trivially_true()
        );
        assert!(!InequalityPair::new(Term::variable("v1"), Term::constant("a"))
            .is_trivially_true());
    }

    #[test]
    fn distinct_constants_form_a_clique() {
        let terms = [
            Term::constant("a"),
            Term::constant("b"),
            Term::constant("c"),
        ];
        let graph = ConstraintGraph::new(terms.iter(), &[]);
        assert_eq!(graph.max_clique_lower_bound(), 3);
    }

    #[test]
    fn variables_without_constraints_do_not_grow_the_clique() {
        let terms = [
            Term::variable("v1"),
            Term::variable("v2"),
            Term::variable("v3"),
        ];
        let graph = ConstraintGraph::new(terms.iter(), &[]);
        assert_eq!(graph.max_clique_lower_bound(), 1);
    }

    #[test]
    fn constrained_triangle_is_found() {
        let terms = [
            Term::variable("v1"),
            Term::variable("v2"),
            Term::constant("a"),
        ];
        let constraints = [
            InequalityPair::new(Term::variable("v1"), Term::variable("v2")),
            InequalityPair::new(Term::variable("v1"), Term::constant("a")),
            InequalityPair::new(Term::variable("v2"), Term::constant("a")),
        ];
        let graph = ConstraintGraph::new(terms.iter(), &constraints);
        assert_eq!(graph.max_clique_lower_bound(), 3);
    }
}
