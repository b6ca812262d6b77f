//! Invariants synthesized from the domain before search: h² mutex pairs and
//! exactly-one groups. Both are computed once per domain and are read-only
//! afterwards.

use crate::parsed_types::Name;
use crate::search::{Atom, PlanningDomain};
use itertools::Itertools;
use std::collections::BTreeSet;
use tracing::debug;

/// Name-level invariants that back the consistency check on every candidate
/// predecessor.
#[derive(Debug, Clone)]
pub struct DomainInvariants {
    /// Unordered predicate-name pairs that can never co-occur, stored with
    /// the smaller name first.
    mutex_pairs: BTreeSet<(Name, Name)>,
    /// Predicate groups of which exactly one member holds in any reachable
    /// state; members may occur at most once.
    exactly_one_groups: Vec<BTreeSet<Name>>,
    singletons: BTreeSet<Name>,
}

fn ordered(a: &Name, b: &Name) -> (Name, Name) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl DomainInvariants {
    pub fn synthesize(domain: &PlanningDomain) -> Self {
        let mutex_pairs = Self::h2_mutex_pairs(domain);
        let exactly_one_groups = Self::compute_exactly_one_groups(domain);
        let singletons = exactly_one_groups.iter().flatten().cloned().collect();

        debug!(
            mutex_pairs = mutex_pairs.len(),
            groups = exactly_one_groups.len(),
            "synthesized invariants"
        );

        Self {
            mutex_pairs,
            exactly_one_groups,
            singletons,
        }
    }

    /// h² mutex approximation: start with every predicate pair mutex, then
    /// repeatedly remove pairs an action can make simultaneously true, either
    /// as two add effects or as an add effect next to a positive precondition
    /// the action does not delete. Stops at the fixpoint. The result is an
    /// over-approximation of mutexes on the add-generated fragment; it never
    /// removes a pair that some action can realise together.
    fn h2_mutex_pairs(domain: &PlanningDomain) -> BTreeSet<(Name, Name)> {
        let names: Vec<&Name> = domain.predicates().iter().map(|(name, _)| name).collect();

        let mut mutex: BTreeSet<(Name, Name)> = names
            .iter()
            .copied()
            .tuple_combinations::<(_, _)>()
            .map(|(a, b)| ordered(a, b))
            .collect();

        loop {
            let mut changed = false;
            for schema in domain.schemas() {
                let adds: BTreeSet<&Name> =
                    schema.add_effects().iter().map(Atom::predicate).collect();
                let deletes: BTreeSet<&Name> =
                    schema.delete_effects().iter().map(Atom::predicate).collect();
                let survivors: BTreeSet<&Name> = schema
                    .positive_preconditions()
                    .iter()
                    .map(Atom::predicate)
                    .filter(|name| !deletes.contains(name))
                    .collect();

                for &a in &adds {
                    for &b in &adds {
                        if a != b {
                            changed |= mutex.remove(&ordered(a, b));
                        }
                    }
                    for &s in &survivors {
                        if a != s {
                            changed |= mutex.remove(&ordered(a, s));
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }

        mutex
    }

    /// Exactly-one groups from toggle actions: an action that deletes exactly
    /// one atom and adds exactly one atom couples the two predicates in a
    /// latent slot (`handempty` ↔ `holding(?x)`). Pairs sharing a member are
    /// merged transitively.
    fn compute_exactly_one_groups(domain: &PlanningDomain) -> Vec<BTreeSet<Name>> {
        let mut groups: Vec<BTreeSet<Name>> = Vec::new();

        for schema in domain.schemas() {
            if schema.add_effects().len() != 1 || schema.delete_effects().len() != 1 {
                continue;
            }
            let added = schema.add_effects()[0].predicate();
            let deleted = schema.delete_effects()[0].predicate();
            if added == deleted {
                continue;
            }

            let pair: BTreeSet<Name> = [added.clone(), deleted.clone()].into_iter().collect();
            let mut merged = pair;
            groups.retain(|group| {
                if group.is_disjoint(&merged) {
                    true
                } else {
                    merged.extend(group.iter().cloned());
                    false
                }
            });
            groups.push(merged);
        }

        groups
    }

    pub fn mutex_pairs(&self) -> &BTreeSet<(Name, Name)> {
        &self.mutex_pairs
    }

    pub fn is_mutex(&self, a: &Name, b: &Name) -> bool {
        self.mutex_pairs.contains(&ordered(a, b))
    }

    pub fn exactly_one_groups(&self) -> &[BTreeSet<Name>] {
        &self.exactly_one_groups
    }

    /// No two positive atoms with mutex predicate names, and no singleton
    /// predicate instantiated more than once.
    pub fn admits(&self, atoms: &[Atom]) -> bool {
        let positive: Vec<&Name> = atoms
            .iter()
            .filter(|atom| !atom.is_negated())
            .map(Atom::predicate)
            .collect();

        for (i, &a) in positive.iter().enumerate() {
            for &b in positive.iter().skip(i + 1) {
                if a != b && self.is_mutex(a, b) {
                    return false;
                }
            }
        }

        for singleton in &self.singletons {
            if positive.iter().filter(|&&name| name == singleton).count() > 1 {
                return false;
            }
        }

        true
    }
}
