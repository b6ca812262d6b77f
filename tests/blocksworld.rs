//! End-to-end tests on the blocksworld domain: DFA in, plan library out.

use liftedbdi::automata::{verify, Dfa, LabelRefiner, RefineMethod};
use liftedbdi::grounding::GroundingMap;
use liftedbdi::search::PlanningDomain;
use liftedbdi::{PipelineConfig, PlanGenerator};

const BLOCKSWORLD: &str = "
    (define (domain blocksworld)
        (:requirements :strips)
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
    PlanningDomain::from_text(BLOCKSWORLD).unwrap()
}

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

fn config(max_states: usize, max_objects: usize) -> PipelineConfig {
    PipelineConfig {
        max_states,
        max_objects: Some(max_objects),
        ..PipelineConfig::default()
    }
}

#[test]
fn reach_on_produces_a_parameterized_library() {
    let domain = domain();
    let mut grounding = GroundingMap::default();
    grounding.add_atom("on", &["a", "b"]);
    grounding.objects = vec!["a".to_string(), "b".to_string()];

    let generator = PlanGenerator::new(&domain, &grounding, config(5000, 2));
    let library = generator.generate(&two_state_dfa("on_a_b")).unwrap();

    // Initial beliefs and one action rule per schema.
    assert!(library.code.contains("/* Initial Beliefs */"));
    assert!(library.code.contains("object(a)."));
    for action in ["pick_up", "put_down", "stack", "unstack"] {
        assert!(
            library.code.contains(&format!("+!{action}")),
            "missing action rule for {action}"
        );
        assert!(library.code.contains(&format!("{action}_physical")));
    }

    // One parameterized rule schema for the goal, plus its success rule.
    assert!(library.code.contains("+!on(V1, V2) : clear(V2) & holding(V1) <-"));
    assert!(library.code.contains("+!on(V1, V2) : on(V1, V2) <-"));
    assert!(library.code.contains("-!on(V1, V2) : true <-"));

    // Cache statistics: one miss, no hits.
    assert_eq!(library.cache_stats.single_misses, 1);
    assert_eq!(library.cache_stats.total_hits(), 0);
}

#[test]
fn action_rules_apply_the_belief_delta() {
    let domain = domain();
    let mut grounding = GroundingMap::default();
    grounding.add_atom("on", &["a", "b"]);

    let generator = PlanGenerator::new(&domain, &grounding, config(500, 2));
    let library = generator.generate(&two_state_dfa("on_a_b")).unwrap();

    // The stack rule calls the primitive and then applies adds before
    // removes.
    let stack_rule_start = library.code.find("+!stack(X, Y)").unwrap();
    let stack_rule = &library.code[stack_rule_start..]
        [..library.code[stack_rule_start..].find('.').unwrap()];
    assert!(stack_rule.contains("stack_physical(X, Y)"));
    assert!(stack_rule.contains("+on(X, Y)"));
    assert!(stack_rule.contains("-holding(X)"));
    assert!(
        stack_rule.find("+on(X, Y)").unwrap() < stack_rule.find("-holding(X)").unwrap(),
        "adds must precede removes"
    );
}

#[test]
fn shared_constant_conjunction_populates_both_cache_tiers() {
    let domain = domain();
    let mut grounding = GroundingMap::default();
    grounding.add_atom("on", &["a", "b"]);
    grounding.add_atom("clear", &["c"]);

    let dot = "digraph G {\n\
               node [shape = doublecircle]; 3;\n\
               node [shape = circle]; 1; 2;\n\
               init -> 1;\n\
               1 -> 2 [label=\"on_a_b & clear_c\"];\n\
               2 -> 3 [label=\"clear_c\"];\n\
               }";
    let dfa = Dfa::from_dot(dot).unwrap();

    let generator = PlanGenerator::new(&domain, &grounding, config(300, 3));
    let library = generator.generate(&dfa).unwrap();

    // The conjunction missed the full-goal tier once and seeded the
    // single-atom tier with both constituents; the second transition then
    // hit the single-atom tier.
    assert_eq!(library.cache_stats.full_misses, 1);
    assert_eq!(library.cache_stats.full_hits, 0);
    assert_eq!(library.cache_stats.single_hits, 1);
    assert_eq!(library.cache_stats.single_misses, 0);

    // The normalized schema keeps the shared-constant structure.
    assert!(library.code.contains("clear_V3_and_on_V1_V2"));
}

#[test]
fn negated_goal_regresses_through_delete_effects() {
    let domain = domain();
    let mut grounding = GroundingMap::default();
    grounding.add_atom("on", &["a", "b"]);

    let generator = PlanGenerator::new(&domain, &grounding, config(500, 2));
    let library = generator.generate(&two_state_dfa("~on_a_b")).unwrap();

    // Only unstack deletes an `on` atom, and the goal is re-asserted after
    // the action.
    assert!(library.code.contains("+!~on(V1, V2) :"));
    assert!(library.code.contains("!unstack(V1, V2)"));
    assert!(library.code.contains(";\n    !~on(V1, V2)."));
    assert!(library.code.contains("+!~on(V1, V2) : ~on(V1, V2) <-"));
}

#[test]
fn mutex_violating_goal_yields_only_a_failure_rule() {
    let domain = domain();
    let mut grounding = GroundingMap::default();
    grounding.add_atom("handempty", &[]);
    grounding.add_atom("holding", &["a"]);

    let generator = PlanGenerator::new(&domain, &grounding, config(500, 2));
    let library = generator
        .generate(&two_state_dfa("handempty & holding_a"))
        .unwrap();

    assert!(library.code.contains("-!handempty_and_holding_V1 : true <-"));
    assert!(!library.code.contains("+!handempty_and_holding_V1"));
}

#[test]
fn boolean_label_refinement_preserves_the_language() {
    let original = two_state_dfa("(on_a_b & clear_c) | on_d_e");
    let refined = LabelRefiner::new(RefineMethod::Auto, 1000)
        .refine(&original)
        .unwrap();

    assert!(refined.dfa.transitions().len() >= 2);
    if cfg!(feature = "bdd") {
        let disagreements =
            verify::check_equivalence(&original, &refined.dfa, 4096).unwrap();
        assert!(disagreements.is_empty(), "{disagreements:?}");
    }
}

#[test]
fn state_budget_of_one_leaves_only_success_and_failure() {
    let domain = domain();
    let mut grounding = GroundingMap::default();
    grounding.add_atom("on", &["a", "b"]);

    let generator = PlanGenerator::new(&domain, &grounding, config(1, 2));
    let library = generator.generate(&two_state_dfa("on_a_b")).unwrap();

    assert!(library.truncated);
    // No achievement rules: the only explored state is the goal itself.
    assert!(!library.code.contains("!stack(V1, V2)"));
    assert!(library.code.contains("+!on(V1, V2) : on(V1, V2) <-"));
    assert!(library.code.contains("-!on(V1, V2) : true <-"));
}

#[test]
fn budget_truncation_still_emits_success_and_failure() {
    let domain = domain();
    let mut grounding = GroundingMap::default();
    grounding.add_atom("on", &["a", "b"]);

    let generator = PlanGenerator::new(&domain, &grounding, config(10, 2));
    let library = generator.generate(&two_state_dfa("on_a_b")).unwrap();

    assert!(library.truncated);
    assert!(library.code.contains("(truncated)"));
    assert!(library.code.contains("+!on(V1, V2) : on(V1, V2) <-"));
    assert!(library.code.contains("-!on(V1, V2) : true <-"));
}

#[test]
fn generation_is_deterministic() {
    let domain = domain();
    let mut grounding = GroundingMap::default();
    grounding.add_atom("on", &["a", "b"]);
    grounding.add_atom("clear", &["c"]);

    let dfa = two_state_dfa("on_a_b | clear_c");
    let generator = PlanGenerator::new(&domain, &grounding, config(200, 3));
    let first = generator.generate(&dfa).unwrap();
    let second = generator.generate(&dfa).unwrap();
    assert_eq!(first.code, second.code);
}

#[test]
fn empty_grounding_map_fails_fast() {
    let domain = domain();
    let grounding = GroundingMap::default();

    let generator = PlanGenerator::new(&domain, &grounding, config(100, 2));
    let result = generator.generate(&two_state_dfa("on_a_b"));
    assert!(matches!(
        result,
        Err(liftedbdi::PlannerError::GroundingMapMismatch { .. })
    ));
}

#[test]
fn accepting_state_without_exits_adds_no_achievement_rules() {
    let domain = domain();
    let mut grounding = GroundingMap::default();
    grounding.add_atom("on", &["a", "b"]);

    // The single edge reaches the accepting state; the accepting state has
    // no outgoing transitions, so exactly one goal section exists.
    let generator = PlanGenerator::new(&domain, &grounding, config(500, 2));
    let library = generator.generate(&two_state_dfa("on_a_b")).unwrap();
    assert_eq!(library.code.matches("========== Goal:").count(), 1);
}
