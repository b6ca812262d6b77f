//! Translating state graphs into AgentSpeak-style reactive rules.

use crate::goals::NormalizedGoal;
use crate::grounding::GroundingMap;
use crate::search::{ActionSchema, Atom, PlanningDomain, StateGraph, Term};
use std::fmt::Write;

/// Renders plan-library text. One emitter serves a whole generation run; the
/// goal-specific sections are produced per normalized goal schema, the
/// shared sections once.
#[derive(Debug)]
pub struct PlanLibraryEmitter<'a> {
    domain: &'a PlanningDomain,
    grounding: &'a GroundingMap,
}

impl<'a> PlanLibraryEmitter<'a> {
    pub fn new(domain: &'a PlanningDomain, grounding: &'a GroundingMap) -> Self {
        Self { domain, grounding }
    }

    /// The initial-beliefs section. The core has no problem instance, so the
    /// beliefs enumerate the grounding map's objects.
    pub fn initial_beliefs(&self) -> String {
        let mut out = String::from("/* Initial Beliefs */\n");
        for object in &self.grounding.objects {
            let _ = writeln!(out, "object({}).", identifier(object));
        }
        out
    }

    /// One action rule per domain action schema: call the environment's
    /// primitive, then apply the belief delta, add effects before delete
    /// effects.
    pub fn action_rules(&self) -> String {
        let mut out = String::from(
            "/* Domain Action Rules */\n\
             /* Each PDDL action becomes one goal rule with explicit belief updates. */\n",
        );
        for schema in self.domain.schemas() {
            out.push('\n');
            out.push_str(&self.action_rule(schema));
            out.push('\n');
        }
        out
    }

    fn action_rule(&self, schema: &ActionSchema) -> String {
        let name = identifier(schema.name().as_ref());
        let parameters: Vec<String> = schema
            .parameters()
            .iter()
            .map(|p| variable(p.as_ref()))
            .collect();
        let head = if parameters.is_empty() {
            name.clone()
        } else {
            format!("{name}({})", parameters.join(", "))
        };

        let mut context: Vec<String> = schema
            .positive_preconditions()
            .iter()
            .map(belief)
            .collect();
        context.extend(
            schema
                .negative_preconditions()
                .iter()
                .map(|atom| belief(&atom.complement())),
        );
        let context = if context.is_empty() {
            "true".to_string()
        } else {
            context.join(" & ")
        };

        let mut body = vec![if parameters.is_empty() {
            format!("{name}_physical")
        } else {
            format!("{name}_physical({})", parameters.join(", "))
        }];
        for effect in schema.add_effects() {
            body.push(format!("+{}", belief(effect)));
        }
        for effect in schema.delete_effects() {
            body.push(format!("-{}", belief(effect)));
        }

        format!("+!{head} : {context} <-\n    {}.", body.join(";\n    "))
    }

    /// The goal-achievement rules for one explored schema, followed by its
    /// success and failure rules. When the goal itself violates a domain
    /// invariant only the failure rule is produced.
    pub fn goal_section(&self, goal: &NormalizedGoal, graph: &StateGraph) -> (String, usize) {
        let pattern = goal_pattern(&goal.atoms);
        let mut out = String::new();
        let _ = writeln!(out, "/* ========== Goal: {pattern} ========== */");

        if graph.goal_unreachable() {
            out.push('\n');
            out.push_str(&self.failure_rule(&pattern));
            out.push('\n');
            return (out, 1);
        }

        let mut rules = 0;
        for (source, edge, _target) in graph.transitions_in_emission_order() {
            let state = graph.state(source);
            let schema = &self.domain.schemas()[edge.schema_index];

            let context: Vec<String> = state.atoms().iter().map(belief).collect();
            let context = if context.is_empty() {
                "true".to_string()
            } else {
                context.join(" & ")
            };

            let mut body = Vec::new();
            for precondition in &edge.preconditions {
                if !precondition.is_negated() && !state.contains(precondition) {
                    body.push(format!("!{}", belief(precondition)));
                }
            }
            let arguments: Vec<String> = edge.arguments.iter().map(term).collect();
            body.push(if arguments.is_empty() {
                format!("!{}", identifier(schema.name().as_ref()))
            } else {
                format!(
                    "!{}({})",
                    identifier(schema.name().as_ref()),
                    arguments.join(", ")
                )
            });
            body.push(format!("!{pattern}"));

            let _ = write!(
                out,
                "\n+!{pattern} : {context} <-\n    {}.\n",
                body.join(";\n    ")
            );
            rules += 1;
        }

        out.push('\n');
        out.push_str(&self.success_rule(goal, &pattern));
        out.push('\n');
        rules += 1;

        out.push('\n');
        out.push_str(&self.failure_rule(&pattern));
        out.push('\n');
        rules += 1;

        (out, rules)
    }

    fn success_rule(&self, goal: &NormalizedGoal, pattern: &str) -> String {
        let context: Vec<String> = goal.atoms.iter().map(belief).collect();
        format!(
            "+!{pattern} : {} <-\n    .print(\"Goal {pattern} achieved\").",
            context.join(" & ")
        )
    }

    fn failure_rule(&self, pattern: &str) -> String {
        format!(
            "-!{pattern} : true <-\n    .print(\"Failed to achieve goal {pattern}\");\n    .fail."
        )
    }
}

/// Rules and primitives use `_` where PDDL uses `-`.
fn identifier(name: &str) -> String {
    name.replace('-', "_")
}

/// `v1` renders as the AgentSpeak variable `V1`.
fn variable(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn term(t: &Term) -> String {
    match t {
        Term::Variable(name) => variable(name),
        Term::Constant(name) => identifier(name),
    }
}

/// An atom rendered as an agent belief; `~` marks strong negation.
fn belief(atom: &Atom) -> String {
    let negation = if atom.is_negated() { "~" } else { "" };
    let name = identifier(atom.predicate());
    if atom.arguments().is_empty() {
        format!("{negation}{name}")
    } else {
        let arguments: Vec<String> = atom.arguments().iter().map(term).collect();
        format!("{negation}{name}({})", arguments.join(", "))
    }
}

/// The trigger pattern of a goal schema: the atom itself for single-atom
/// goals, a joined name for conjunctions.
pub(crate) fn goal_pattern(atoms: &[Atom]) -> String {
    if atoms.len() == 1 {
        return belief(&atoms[0]);
    }

    let mut rendered: Vec<String> = atoms.iter().map(belief).collect();
    rendered.sort();
    rendered
        .join("_and_")
        .replace(", ", "_")
        .replace('(', "_")
        .replace(')', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn variables_render_uppercase() {
        assert_eq!(term(&Term::variable("v1")), "V1");
        assert_eq!(term(&Term::variable("c2")), "C2");
        assert_eq!(term(&Term::constant("block-1")), "block_1");
    }

    #[test]
    fn beliefs_render_with_strong_negation() {
        let atom = Atom::negative(
            "on",
            smallvec![Term::variable("v1"), Term::variable("v2")],
        );
        assert_eq!(belief(&atom), "~on(V1, V2)");
        assert_eq!(belief(&Atom::positive("handempty", smallvec![])), "handempty");
    }

    #[test]
    fn multi_atom_patterns_flatten() {
        let atoms = vec![
            Atom::positive(
                "on",
                smallvec![Term::variable("v1"), Term::variable("v2")],
            ),
            Atom::positive("clear", smallvec![Term::variable("v3")]),
        ];
        assert_eq!(goal_pattern(&atoms), "clear_V3_and_on_V1_V2");
    }
}
