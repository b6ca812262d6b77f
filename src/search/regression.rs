//! The regression rule: computing the predecessor of a state through a
//! lifted action application.

use crate::parsed_types::Name;
use crate::search::{
    match_atoms, ActionSchema, Atom, BeliefOp, ConstraintGraph, DiscardReason, DomainInvariants,
    InequalityPair, PlanningDomain, RegressionState, Substitution, Term, TransitionEdge,
};
use std::collections::BTreeSet;

/// An action that can achieve a subgoal atom, together with the partial
/// binding obtained by unifying the achieving effect with the subgoal.
#[derive(Debug, Clone)]
pub(crate) struct Achiever<'a> {
    pub schema: &'a ActionSchema,
    pub binding: Substitution,
}

/// Enumerates the achieving actions for one subgoal: for a positive subgoal,
/// every schema whose add effect unifies with it; for a negative subgoal,
/// every schema whose delete effect unifies with its positive form. Order
/// follows the domain's action and effect declaration order.
pub(crate) fn achievers_for<'a>(
    subgoal: &Atom,
    domain: &'a PlanningDomain,
) -> Vec<Achiever<'a>> {
    let target = subgoal.to_positive();
    let mut achievers = Vec::new();

    for schema in domain.schemas() {
        let effects = if subgoal.is_negated() {
            schema.delete_effects()
        } else {
            schema.add_effects()
        };
        for effect in effects {
            if let Some(binding) = match_atoms(effect, &target, &Substitution::new()) {
                achievers.push(Achiever { schema, binding });
            }
        }
    }

    achievers
}

/// The result of regressing a state through one achiever.
#[derive(Debug)]
pub(crate) enum RegressionOutcome {
    Predecessor(RegressionState, TransitionEdge),
    Discarded(DiscardReason),
}

/// Completes a partial binding by introducing fresh variables for every
/// unbound action parameter. Fresh variables are numbered from the parent
/// state's high-water mark plus one, skipping identifiers already used by
/// the binding. Returns the completed binding and the new high-water mark.
fn complete_binding(
    parameters: &[Name],
    binding: &Substitution,
    parent_high_water: u32,
) -> (Substitution, u32) {
    let mut complete = binding.clone();
    let used: BTreeSet<Term> = binding.range().cloned().collect();

    let mut next = parent_high_water + 1;
    let mut high_water = parent_high_water;

    for parameter in parameters {
        if complete.is_bound(parameter) {
            continue;
        }
        let mut fresh = Term::fresh_variable(next);
        while used.contains(&fresh) {
            next += 1;
            fresh = Term::fresh_variable(next);
        }
        complete.bind(parameter.clone(), fresh);
        high_water = next;
        next += 1;
    }

    (complete, high_water)
}

/// Regresses `state` through the achiever, applying the conflict checks, the
/// regression rule proper, constraint collection, and the consistency
/// predicates. Any failure discards the candidate silently; the reason is
/// reported so the caller can count it.
pub(crate) fn regress(
    state: &RegressionState,
    achiever: &Achiever,
    invariants: &DomainInvariants,
    max_objects: usize,
) -> RegressionOutcome {
    let schema = achiever.schema;
    let (binding, high_water) =
        complete_binding(schema.parameters(), &achiever.binding, state.high_water());

    let add_effects: Vec<Atom> = schema
        .add_effects()
        .iter()
        .map(|atom| binding.apply_to_atom(atom))
        .collect();
    let delete_effects: Vec<Atom> = schema
        .delete_effects()
        .iter()
        .map(|atom| binding.apply_to_atom(atom))
        .collect();

    // Conflict phase, against the pre-regressed state: the action may not
    // add the complement of a required atom, nor delete a required atom.
    for added in &add_effects {
        if state.contains(&added.complement()) {
            return RegressionOutcome::Discarded(DiscardReason::AddConflict);
        }
    }
    for deleted in &delete_effects {
        if state.contains(deleted) {
            return RegressionOutcome::Discarded(DiscardReason::DeleteConflict);
        }
    }

    let mut atoms: BTreeSet<Atom> = state.atoms().iter().cloned().collect();

    // Add effects are achieved by the action.
    for added in &add_effects {
        atoms.remove(added);
    }

    // A delete effect either satisfies a negative subgoal or must hold
    // beforehand.
    for deleted in &delete_effects {
        let negative = deleted.complement();
        if atoms.contains(&negative) {
            atoms.remove(&negative);
        } else {
            atoms.insert(deleted.clone());
        }
    }

    // Preconditions must hold beforehand, honoring their sign.
    for precondition in schema.positive_preconditions() {
        atoms.insert(binding.apply_to_atom(precondition));
    }
    for precondition in schema.negative_preconditions() {
        atoms.insert(binding.apply_to_atom(precondition).complement());
    }

    // Collect constraints, dropping trivially true ones; a trivially false
    // one kills the predecessor.
    let mut constraints: Vec<InequalityPair> = state.constraints().to_vec();
    for pair in schema.inequalities() {
        let (a, b) = pair.endpoints();
        let instantiated = InequalityPair::new(binding.apply(a), binding.apply(b));
        if instantiated.is_trivially_false() {
            return RegressionOutcome::Discarded(DiscardReason::InconsistentConstraints);
        }
        if instantiated.is_trivially_true() {
            continue;
        }
        constraints.push(instantiated);
    }

    let predecessor = RegressionState::new(
        atoms.into_iter().collect(),
        constraints,
        state.depth() + 1,
        high_water,
    );

    if let Some(reason) = consistency_failure(&predecessor, invariants, max_objects) {
        return RegressionOutcome::Discarded(reason);
    }

    let arguments: Vec<Term> = schema
        .parameters()
        .iter()
        .map(|parameter| binding.apply(&Term::Variable(parameter.clone())))
        .collect();

    let mut preconditions: Vec<Atom> = schema
        .positive_preconditions()
        .iter()
        .map(|atom| binding.apply_to_atom(atom))
        .collect();
    preconditions.extend(
        schema
            .negative_preconditions()
            .iter()
            .map(|atom| binding.apply_to_atom(atom).complement()),
    );

    let mut delta: Vec<BeliefOp> = add_effects.into_iter().map(BeliefOp::Add).collect();
    delta.extend(delete_effects.into_iter().map(BeliefOp::Remove));

    RegressionOutcome::Predecessor(
        predecessor,
        TransitionEdge {
            schema_index: schema.index(),
            arguments,
            preconditions,
            delta,
        },
    )
}

/// The consistency predicates applied to every candidate predecessor before
/// insertion. `None` means the state is admissible.
pub(crate) fn consistency_failure(
    state: &RegressionState,
    invariants: &DomainInvariants,
    max_objects: usize,
) -> Option<DiscardReason> {
    // No explicit contradiction.
    for atom in state.atoms() {
        if !atom.is_negated() && state.contains(&atom.complement()) {
            return Some(DiscardReason::Contradiction);
        }
    }

    // No mutex co-occurrence, no singleton multiplicity.
    if !invariants.admits(state.atoms()) {
        let positive: Vec<_> = state.atoms().iter().filter(|a| !a.is_negated()).collect();
        let mutex = positive.iter().enumerate().any(|(i, a)| {
            positive[i + 1..]
                .iter()
                .any(|b| a.predicate() != b.predicate() && invariants.is_mutex(a.predicate(), b.predicate()))
        });
        return Some(if mutex {
            DiscardReason::MutexViolation
        } else {
            DiscardReason::SingletonViolation
        });
    }

    // Constraint satisfiability.
    for pair in state.constraints() {
        if pair.is_trivially_false() {
            return Some(DiscardReason::InconsistentConstraints);
        }
    }

    // Feasibility under the object cap: only worth the graph when more
    // distinct terms occur than objects exist.
    let distinct_terms: BTreeSet<&Term> = state.terms().collect();
    if distinct_terms.len() > max_objects {
        let graph = ConstraintGraph::new(distinct_terms.into_iter(), state.constraints());
        if graph.max_clique_lower_bound() > max_objects {
            return Some(DiscardReason::InfeasibleClique);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn domain() -> PlanningDomain {
        PlanningDomain::from_text(BLOCKS).unwrap()
    }

    fn on_goal() -> Atom {
        Atom::positive(
            "on",
            smallvec![Term::fresh_variable(1), Term::fresh_variable(2)],
        )
    }

    #[test]
    fn only_stack_achieves_on() {
        let domain = domain();
        let achievers = achievers_for(&on_goal(), &domain);
        assert_eq!(achievers.len(), 1);
        assert_eq!(
            AsRef::<Name>::as_ref(achievers[0].schema.name()),
            &Name::new("stack")
        );
    }

    #[test]
    fn only_unstack_achieves_not_on() {
        let domain = domain();
        let achievers = achievers_for(&on_goal().complement(), &domain);
        assert_eq!(achievers.len(), 1);
        assert_eq!(
            AsRef::<Name>::as_ref(achievers[0].schema.name()),
            &Name::new("unstack")
        );
    }

    #[test]
    fn regressing_on_through_stack_yields_holding_and_clear() {
        let domain = domain();
        let invariants = DomainInvariants::synthesize(&domain);
        let state = RegressionState::goal(vec![on_goal()]);
        let achiever = &achievers_for(&on_goal(), &domain)[0];

        match regress(&state, achiever, &invariants, 2) {
            RegressionOutcome::Predecessor(predecessor, edge) => {
                assert_eq!(
                    predecessor.to_string(),
                    "clear(?v2) & holding(?v1)"
                );
                assert_eq!(predecessor.depth(), 1);
                assert_eq!(edge.arguments.len(), 2);
                assert_eq!(edge.arguments[0], Term::fresh_variable(1));
                // The delta lists the action's adds before its removes.
                assert_eq!(edge.delta.len(), 5);
                assert!(edge.delta[..3]
                    .iter()
                    .all(|op| matches!(op, crate::search::BeliefOp::Add(_))));
                assert!(edge.delta[3..]
                    .iter()
                    .all(|op| matches!(op, crate::search::BeliefOp::Remove(_))));
            }
            RegressionOutcome::Discarded(reason) => panic!("discarded: {reason:?}"),
        }
    }

    #[test]
    fn unbound_parameters_get_fresh_variables() {
        let domain = domain();
        let invariants = DomainInvariants::synthesize(&domain);
        let clear = Atom::positive("clear", smallvec![Term::fresh_variable(1)]);
        let state = RegressionState::goal(vec![clear.clone()]);

        // unstack adds clear(?y); ?x is unbound and becomes ?v2.
        let achievers = achievers_for(&clear, &domain);
        let unstack = achievers
            .iter()
            .find(|a| AsRef::<Name>::as_ref(a.schema.name()) == &Name::new("unstack"))
            .unwrap();
        match regress(&state, unstack, &invariants, 3) {
            RegressionOutcome::Predecessor(predecessor, _) => {
                assert_eq!(predecessor.high_water(), 2);
                assert!(predecessor
                    .to_string()
                    .contains("on(?v2, ?v1)"));
            }
            RegressionOutcome::Discarded(reason) => panic!("discarded: {reason:?}"),
        }
    }

    #[test]
    fn delete_conflict_discards() {
        let domain = domain();
        let invariants = DomainInvariants::synthesize(&domain);
        // Goal requires handempty; pick-up deletes handempty while achieving
        // holding, so regressing {holding(?v1), handempty} through pick-up
        // must be rejected.
        let state = RegressionState::goal(vec![
            Atom::positive("holding", smallvec![Term::fresh_variable(1)]),
            Atom::positive("handempty", smallvec![]),
        ]);
        let achievers = achievers_for(
            &Atom::positive("holding", smallvec![Term::fresh_variable(1)]),
            &domain,
        );
        for achiever in &achievers {
            match regress(&state, achiever, &invariants, 2) {
                RegressionOutcome::Discarded(DiscardReason::DeleteConflict) => {}
                other => panic!("expected delete conflict, got {other:?}"),
            }
        }
    }
}
