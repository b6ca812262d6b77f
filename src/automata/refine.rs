//! Label refinement: rewriting each transition's Boolean label into one or
//! more disjoint partitions, preserving language equivalence.

use crate::automata::{parse_label, Dfa, DfaTransition, LabelExpr};
use crate::error::{PlannerError, Result};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// The alphabet cap of the enumerative fallback; beyond it the `2^|A|`
/// valuation sweep is refused.
pub const ENUMERATIVE_ATOM_CAP: usize = 12;

/// How transition labels are partitioned.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[clap(rename_all = "kebab-case")]
pub enum RefineMethod {
    /// Symbolic if the BDD engine is compiled in, enumerative otherwise.
    #[default]
    Auto,
    /// BDD-based symbolic partitioning.
    Bdd,
    /// Explicit sweep over all `2^|A|` valuations.
    Enumerative,
}

#[derive(Debug, Clone, Default)]
pub struct RefinementStats {
    pub method: &'static str,
    pub num_atoms: usize,
    pub num_partitions: usize,
    /// Labels kept verbatim because their partition extraction ran out of
    /// budget.
    pub retained_labels: usize,
}

/// The rewritten automaton plus statistics.
#[derive(Debug)]
pub struct RefinedDfa {
    pub dfa: Dfa,
    pub stats: RefinementStats,
}

/// A partition of a label: literals over the alphabet as
/// `(atom index, value)` pairs in alphabet order. The symbolic extractor
/// leaves don't-care atoms out; the enumerative fallback always assigns the
/// whole alphabet.
type Cube = Vec<(usize, bool)>;

/// Rewrites every transition label into partitions whose labels are single
/// literals or conjunctions of literals, mutually disjoint per source label.
#[derive(Debug)]
pub struct LabelRefiner {
    method: RefineMethod,
    minterm_budget: usize,
}

impl LabelRefiner {
    pub fn new(method: RefineMethod, minterm_budget: usize) -> Self {
        Self {
            method,
            minterm_budget,
        }
    }

    pub fn refine(&self, dfa: &Dfa) -> Result<RefinedDfa> {
        // Parse every label once; the alphabet is collected in first-sight
        // order over the transitions, which also fixes the BDD variable
        // order.
        let mut atoms: Vec<String> = Vec::new();
        let mut parsed: Vec<LabelExpr> = Vec::new();
        for transition in dfa.transitions() {
            let expr = parse_label(&transition.label)?;
            expr.collect_atoms(&mut atoms);
            parsed.push(expr);
        }

        if atoms.is_empty() {
            return Ok(RefinedDfa {
                dfa: dfa.clone(),
                stats: RefinementStats {
                    method: "none",
                    ..RefinementStats::default()
                },
            });
        }

        let use_bdd = match self.method {
            RefineMethod::Auto | RefineMethod::Bdd => {
                if cfg!(feature = "bdd") {
                    true
                } else {
                    if self.method == RefineMethod::Bdd {
                        warn!("BDD engine not compiled in, falling back to enumeration");
                    }
                    false
                }
            }
            RefineMethod::Enumerative => false,
        };

        let mut stats = RefinementStats {
            method: if use_bdd { "bdd" } else { "enumerative" },
            num_atoms: atoms.len(),
            num_partitions: 0,
            retained_labels: 0,
        };

        // Partition each unique label once; identical labels share their
        // result. `None` marks a label retained verbatim after running out
        // of budget.
        let mut cubes_by_label: BTreeMap<&str, Option<Vec<Cube>>> = BTreeMap::new();
        for (transition, expr) in dfa.transitions().iter().zip(&parsed) {
            if cubes_by_label.contains_key(transition.label.as_str()) {
                continue;
            }
            let cubes = if use_bdd {
                self.bdd_cubes(expr, &atoms)
            } else {
                Some(self.enumerate_minterms(expr, &atoms)?)
            };
            if cubes.is_none() {
                warn!(
                    label = %transition.label,
                    budget = self.minterm_budget,
                    "partition budget exhausted, keeping label verbatim"
                );
                stats.retained_labels += 1;
            }
            cubes_by_label.insert(transition.label.as_str(), cubes);
        }

        let mut transitions = Vec::new();
        for transition in dfa.transitions() {
            match &cubes_by_label[transition.label.as_str()] {
                None => transitions.push(transition.clone()),
                Some(cubes) => {
                    for cube in cubes {
                        let symbol = partition_symbol(cube, &atoms, !use_bdd);
                        debug!(
                            source = %transition.source,
                            target = %transition.target,
                            %symbol,
                            "partitioned transition"
                        );
                        transitions.push(DfaTransition {
                            source: transition.source.clone(),
                            target: transition.target.clone(),
                            label: symbol,
                        });
                    }
                    stats.num_partitions += cubes.len();
                }
            }
        }

        info!(
            atoms = stats.num_atoms,
            partitions = stats.num_partitions,
            retained = stats.retained_labels,
            method = stats.method,
            "refined DFA labels"
        );

        Ok(RefinedDfa {
            dfa: dfa.with_transitions(transitions),
            stats,
        })
    }

    /// Symbolic extraction: build the label's BDD, then repeatedly take one
    /// satisfying path, materialize it as a conjunctive cube, and subtract
    /// it from the remainder until the false terminal is reached. The cubes
    /// are mutually disjoint and their union is the label. Returns `None`
    /// when the per-label budget is exhausted.
    #[cfg(feature = "bdd")]
    fn bdd_cubes(&self, expr: &LabelExpr, atoms: &[String]) -> Option<Vec<Cube>> {
        use biodivine_lib_bdd::{
            Bdd, BddPathIterator, BddVariable, BddVariableSet, BddVariableSetBuilder,
        };

        fn to_bdd(
            expr: &LabelExpr,
            set: &BddVariableSet,
            variables: &BTreeMap<&str, BddVariable>,
        ) -> Bdd {
            match expr {
                LabelExpr::True => set.mk_true(),
                LabelExpr::False => set.mk_false(),
                LabelExpr::Atom(name) => set.mk_var(variables[name.as_str()]),
                LabelExpr::Not(inner) => to_bdd(inner, set, variables).not(),
                LabelExpr::And(a, b) => to_bdd(a, set, variables).and(&to_bdd(b, set, variables)),
                LabelExpr::Or(a, b) => to_bdd(a, set, variables).or(&to_bdd(b, set, variables)),
            }
        }

        let mut builder = BddVariableSetBuilder::new();
        let handles: Vec<BddVariable> = atoms
            .iter()
            .map(|atom| builder.make_variable(atom))
            .collect();
        let set = builder.build();
        let variables: BTreeMap<&str, BddVariable> = atoms
            .iter()
            .map(String::as_str)
            .zip(handles.iter().copied())
            .collect();

        let mut remaining = to_bdd(expr, &set, &variables);
        let mut cubes = Vec::new();

        while let Some(path) = BddPathIterator::new(&remaining).next() {
            if cubes.len() >= self.minterm_budget {
                return None;
            }
            remaining = remaining.and_not(&set.mk_conjunctive_clause(&path));
            let cube: Cube = handles
                .iter()
                .enumerate()
                .filter_map(|(index, &var)| path.get_value(var).map(|value| (index, value)))
                .collect();
            cubes.push(cube);
        }

        Some(cubes)
    }

    #[cfg(not(feature = "bdd"))]
    fn bdd_cubes(&self, _expr: &LabelExpr, _atoms: &[String]) -> Option<Vec<Cube>> {
        unreachable!("BDD refinement requested without the bdd feature")
    }

    /// Enumerative fallback: sweep all `2^|A|` valuations and keep the
    /// satisfying ones as complete minterms.
    fn enumerate_minterms(&self, expr: &LabelExpr, atoms: &[String]) -> Result<Vec<Cube>> {
        if atoms.len() > ENUMERATIVE_ATOM_CAP {
            return Err(PlannerError::TooManyPredicates {
                count: atoms.len(),
                cap: ENUMERATIVE_ATOM_CAP,
            });
        }

        let mut minterms = Vec::new();
        for mask in 0u64..(1u64 << atoms.len()) {
            let cube: Cube = (0..atoms.len()).map(|i| (i, mask >> i & 1 == 1)).collect();
            let valuation: BTreeMap<String, bool> = cube
                .iter()
                .map(|&(index, value)| (atoms[index].clone(), value))
                .collect();
            if expr.evaluate(&valuation) {
                minterms.push(cube);
            }
        }

        Ok(minterms)
    }
}

/// The partition symbol of a cube. A lone positive literal is just the atom
/// name; everything else is the conjunctive expression over the assigned
/// literals. With `collapse_minterms` (the enumerative fallback), a complete
/// minterm whose only positive literal is one atom also collapses to that
/// atom name, mirroring the exactly-one-true naming of minterm enumeration.
fn partition_symbol(cube: &Cube, atoms: &[String], collapse_minterms: bool) -> String {
    if cube.is_empty() {
        // An unconstrained path: the label was a tautology.
        return "true".to_string();
    }

    let positives: Vec<usize> = cube
        .iter()
        .filter(|(_, value)| *value)
        .map(|&(index, _)| index)
        .collect();

    if positives.len() == 1
        && (cube.len() == 1 || (collapse_minterms && cube.len() == atoms.len()))
    {
        return atoms[positives[0]].clone();
    }

    cube.iter()
        .map(|&(index, value)| {
            if value {
                atoms[index].clone()
            } else {
                format!("~{}", atoms[index])
            }
        })
        .collect::<Vec<_>>()
        .join(" & ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_dfa(label: &str) -> Dfa {
        let dot = format!(
            "digraph G {{\n\
             node [shape = doublecircle]; 2;\n\
             node [shape = circle]; 1;\n\
             init -> 1;\n\
             1 -> 2 [label=\"{label}\"];\n\
             }}"
        );
        Dfa::from_dot(&dot).unwrap()
    }

    fn refiner() -> LabelRefiner {
        LabelRefiner::new(RefineMethod::Auto, 1000)
    }

    #[test]
    fn single_atom_label_is_unchanged() {
        let refined = refiner().refine(&two_state_dfa("on_a_b")).unwrap();
        assert_eq!(refined.dfa.transitions().len(), 1);
        assert_eq!(refined.dfa.transitions()[0].label, "on_a_b");
    }

    #[test]
    fn negated_label_keeps_its_negation() {
        let refined = refiner().refine(&two_state_dfa("~on_a_b")).unwrap();
        assert_eq!(refined.dfa.transitions().len(), 1);
        assert_eq!(refined.dfa.transitions()[0].label, "~on_a_b");
    }

    #[test]
    fn partitions_are_disjoint_and_cover_the_label() {
        let original = two_state_dfa("(on_a_b & clear_c) | on_d_e");
        let refined = refiner().refine(&original).unwrap();
        assert!(refined.dfa.transitions().len() >= 2);

        let atoms = ["on_a_b", "clear_c", "on_d_e"];
        let label = parse_label("(on_a_b & clear_c) | on_d_e").unwrap();
        let partitions: Vec<LabelExpr> = refined
            .dfa
            .transitions()
            .iter()
            .map(|t| parse_label(&t.label).unwrap())
            .collect();

        for mask in 0u8..8 {
            let valuation: BTreeMap<String, bool> = atoms
                .iter()
                .enumerate()
                .map(|(i, atom)| (atom.to_string(), mask >> i & 1 == 1))
                .collect();
            let enabled = partitions
                .iter()
                .filter(|p| p.evaluate(&valuation))
                .count();
            if cfg!(feature = "bdd") {
                assert_eq!(
                    enabled > 0,
                    label.evaluate(&valuation),
                    "coverage mismatch at {valuation:?}"
                );
                assert!(enabled <= 1, "partitions overlap at {valuation:?}");
            }
        }
    }

    #[test]
    fn enumerative_cap_is_enforced() {
        let label = (0..=ENUMERATIVE_ATOM_CAP)
            .map(|i| format!("p{i}"))
            .collect::<Vec<_>>()
            .join(" | ");
        let refiner = LabelRefiner::new(RefineMethod::Enumerative, 100_000);
        assert!(matches!(
            refiner.refine(&two_state_dfa(&label)),
            Err(PlannerError::TooManyPredicates { .. })
        ));
    }

    #[test]
    fn exhausted_budget_retains_the_label() {
        if !cfg!(feature = "bdd") {
            return;
        }
        let refiner = LabelRefiner::new(RefineMethod::Bdd, 1);
        let refined = refiner.refine(&two_state_dfa("a | (b & c)")).unwrap();
        assert_eq!(refined.stats.retained_labels, 1);
        assert_eq!(refined.dfa.transitions()[0].label, "a | (b & c)");
    }

    #[test]
    fn true_label_over_a_larger_alphabet_is_partitioned() {
        let dot = "digraph G {\n\
                   node [shape = doublecircle]; 2;\n\
                   init -> 1;\n\
                   1 -> 2 [label=\"on_a_b\"];\n\
                   2 -> 2 [label=\"true\"];\n\
                   }";
        let dfa = Dfa::from_dot(dot).unwrap();
        let refined = refiner().refine(&dfa).unwrap();
        // The `true` self-loop still enables every valuation afterwards.
        let self_loops: Vec<_> = refined
            .dfa
            .transitions()
            .iter()
            .filter(|t| t.source == "2")
            .collect();
        assert!(!self_loops.is_empty());
    }
}
