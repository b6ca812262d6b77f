//! Breadth-first backward regression from a conjunctive goal.

use crate::search::{
    achievers_for, regress, regression, Atom, DomainInvariants, PlanningDomain,
    RegressionOutcome, RegressionState, StateGraph,
};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info};

/// The lifted regression search. The frontier is a FIFO of regression
/// states; the visited map keys states by canonical form, so isomorphic
/// states are explored once. Exploration stops when the frontier is empty or
/// when the visited count reaches `max_states`, in which case the graph is
/// flagged truncated.
#[derive(Debug)]
pub struct RegressionSearch<'a> {
    domain: &'a PlanningDomain,
    invariants: &'a DomainInvariants,
    max_states: usize,
    max_objects: usize,
}

impl<'a> RegressionSearch<'a> {
    pub fn new(
        domain: &'a PlanningDomain,
        invariants: &'a DomainInvariants,
        max_states: usize,
        max_objects: usize,
    ) -> Self {
        Self {
            domain,
            invariants,
            max_states,
            max_objects,
        }
    }

    pub fn run(&self, goal: &[Atom]) -> StateGraph {
        let root_state = RegressionState::goal(goal.to_vec());
        info!(goal = %root_state, "starting regression search");

        let mut graph = StateGraph::new(root_state.clone());

        if regression::consistency_failure(&root_state, self.invariants, self.max_objects)
            .is_some()
        {
            debug!(goal = %root_state, "goal violates a synthesized invariant");
            graph.set_goal_unreachable();
            graph.statistics_mut().report();
            return graph;
        }

        let mut visited: HashMap<String, petgraph::graph::NodeIndex> = HashMap::new();
        visited.insert(root_state.canonical_key(), graph.root());
        graph.statistics_mut().generated_states += 1;

        let mut frontier = VecDeque::new();
        frontier.push_back(graph.root());

        while let Some(current) = frontier.pop_front() {
            graph.statistics_mut().expanded_states += 1;
            let current_state = graph.state(current).clone();

            for subgoal in current_state.atoms().to_vec() {
                for achiever in achievers_for(&subgoal, self.domain) {
                    match regress(&current_state, &achiever, self.invariants, self.max_objects)
                    {
                        RegressionOutcome::Discarded(reason) => {
                            graph.statistics_mut().discards.record(reason);
                        }
                        RegressionOutcome::Predecessor(predecessor, edge) => {
                            let key = predecessor.canonical_key();
                            if let Some(&existing) = visited.get(&key) {
                                // The rediscovered class keeps its first
                                // instance; the edge carries the binding of
                                // this discovery, which regenerates a state
                                // isomorphic to the stored one.
                                graph.add_transition(existing, current, edge);
                                graph.statistics_mut().deduplicated_states += 1;
                                graph.statistics_mut().transitions += 1;
                            } else {
                                if visited.len() >= self.max_states {
                                    graph.set_truncated();
                                    continue;
                                }
                                let node = graph.add_state(predecessor);
                                visited.insert(key, node);
                                frontier.push_back(node);
                                graph.add_transition(node, current, edge);
                                graph.statistics_mut().generated_states += 1;
                                graph.statistics_mut().transitions += 1;
                            }
                        }
                    }
                }
            }
        }

        graph.statistics_mut().report();
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Achiever, Substitution, Term};
    use smallvec::smallvec;

    const BLOCKS: &str = "
        (define (domain blocksworld)
            (:predicates (on ?x ?y) (ontable ?x) (clear ?x) (handempty) (holding ?x))
            (:action pick-up
                :parameters (?x)
                :precondition (and (clear ?x) (ontable ?x) (handempty))
                :effect (and (not (ontable ?x)) (not (clear ?x)) (not (handempty)) (holding ?x)))
            (:action put-down
                :parameters (?x)
                :precondition (holding ?x)
                :effect (and (not (holding ?x)) (clear ?x) (handempty) (ontable ?x)))
            (:action stack
                :parameters (?x ?y)
                :precondition (and (holding ?x) (clear ?y))
                :effect (and (not (holding ?x)) (not (clear ?y)) (clear ?x) (handempty) (on ?x ?y)))
            (:action unstack
                :parameters (?x ?y)
                :precondition (and (on ?x ?y) (clear ?x) (handempty))
                :effect (and (holding ?x) (clear ?y) (not (clear ?x)) (not (handempty)) (not (on ?x ?y)))))";

    fn setup() -> (PlanningDomain, DomainInvariants) {
        let domain = PlanningDomain::from_text(BLOCKS).unwrap();
        let invariants = DomainInvariants::synthesize(&domain);
        (domain, invariants)
    }

    fn on_goal() -> Vec<Atom> {
        vec![Atom::positive(
            "on",
            smallvec![Term::fresh_variable(1), Term::fresh_variable(2)],
        )]
    }

    #[test]
    fn finds_predecessors_for_on() {
        let (domain, invariants) = setup();
        let search = RegressionSearch::new(&domain, &invariants, 200, 2);
        let graph = search.run(&on_goal());

        assert!(!graph.goal_unreachable());
        assert!(graph.num_states() > 1);
        assert!(graph.num_transitions() >= graph.num_states() - 1);
    }

    #[test]
    fn budget_of_one_keeps_only_the_goal() {
        let (domain, invariants) = setup();
        let search = RegressionSearch::new(&domain, &invariants, 1, 2);
        let graph = search.run(&on_goal());

        assert!(graph.truncated());
        assert_eq!(graph.num_states(), 1);
        assert_eq!(graph.num_transitions(), 0);
    }

    #[test]
    fn mutex_goal_is_unreachable() {
        let (domain, invariants) = setup();
        let search = RegressionSearch::new(&domain, &invariants, 100, 2);
        let graph = search.run(&[
            Atom::positive("handempty", smallvec![]),
            Atom::positive("holding", smallvec![Term::fresh_variable(1)]),
        ]);

        assert!(graph.goal_unreachable());
        assert_eq!(graph.num_states(), 1);
        assert_eq!(graph.num_transitions(), 0);
    }

    #[test]
    fn every_state_passes_the_consistency_predicates() {
        let (domain, invariants) = setup();
        let search = RegressionSearch::new(&domain, &invariants, 300, 3);
        let graph = search.run(&on_goal());

        for (_, state) in graph.states() {
            assert!(
                regression::consistency_failure(state, &invariants, 3).is_none(),
                "inconsistent state in graph: {state}"
            );
        }
    }

    #[test]
    fn stored_edges_regenerate_their_source_states() {
        let (domain, invariants) = setup();
        let search = RegressionSearch::new(&domain, &invariants, 300, 3);
        let graph = search.run(&on_goal());

        for (source, edge, target) in graph.transitions_in_emission_order() {
            let successor = graph.state(target);
            let schema = &domain.schemas()[edge.schema_index];
            let mut binding = Substitution::new();
            for (parameter, argument) in schema.parameters().iter().zip(&edge.arguments) {
                binding.bind(parameter.clone(), argument.clone());
            }
            let achiever = Achiever { schema, binding };
            match regress(successor, &achiever, &invariants, 3) {
                RegressionOutcome::Predecessor(predecessor, _) => {
                    assert_eq!(
                        predecessor.canonical_key(),
                        graph.state(source).canonical_key(),
                        "edge does not regenerate its source"
                    );
                }
                RegressionOutcome::Discarded(reason) => {
                    panic!("stored edge was discarded on replay: {reason:?}")
                }
            }
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let (domain, invariants) = setup();
        let search = RegressionSearch::new(&domain, &invariants, 150, 2);
        let a = search.run(&on_goal());
        let b = search.run(&on_goal());

        let render = |graph: &StateGraph| {
            graph
                .states()
                .map(|(_, state)| state.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(render(&a), render(&b));
        assert_eq!(a.num_transitions(), b.num_transitions());
    }
}
