//! Lifted action schemas, converted from parsed action definitions.

use crate::error::{PlannerError, Result};
use crate::parsed_types::{
    ActionDefinition, ActionName, Atom as ParsedAtom, Name, PropCondition, PropEffect,
    Term as ParsedTerm,
};
use crate::search::{Atom, InequalityPair, Term};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// An action schema: an ordered list of parameter variables, positive and
/// negative precondition atoms, add- and delete-effect atoms, and parameter
/// inequality pairs from explicit `(not (= ?x ?y))` clauses. Negative
/// preconditions and delete effects are stored as positive atoms; the role
/// carries the sign.
#[derive(Debug, Clone)]
pub struct ActionSchema {
    name: ActionName,
    index: usize,
    parameters: Vec<Name>,
    positive_preconditions: Vec<Atom>,
    negative_preconditions: Vec<Atom>,
    add_effects: Vec<Atom>,
    delete_effects: Vec<Atom>,
    inequalities: Vec<InequalityPair>,
}

impl ActionSchema {
    pub fn new(
        index: usize,
        definition: &ActionDefinition,
        predicate_arities: &BTreeMap<Name, usize>,
    ) -> Result<Self> {
        let name = definition.name().clone();
        let parameters: Vec<Name> = definition
            .parameters()
            .iter()
            .map(|param| param.value().name().clone())
            .collect();

        let mut positive_preconditions = Vec::new();
        let mut negative_preconditions = Vec::new();
        let mut inequalities = Vec::new();

        for condition in definition.preconditions() {
            Self::collect_condition(
                &name,
                condition,
                false,
                predicate_arities,
                &mut positive_preconditions,
                &mut negative_preconditions,
                &mut inequalities,
            )?;
        }

        let mut add_effects = Vec::new();
        let mut delete_effects = Vec::new();
        for effect in definition.effects() {
            let atom = Self::convert_atom(&name, effect.atom(), predicate_arities)?;
            match effect {
                PropEffect::Add(_) => add_effects.push(atom),
                PropEffect::Delete(_) => delete_effects.push(atom),
            }
        }

        for added in &add_effects {
            if delete_effects.contains(added) {
                return Err(PlannerError::DomainSyntax(format!(
                    "action `{name}` both adds and deletes `{added}`"
                )));
            }
        }

        let schema = Self {
            name,
            index,
            parameters,
            positive_preconditions,
            negative_preconditions,
            add_effects,
            delete_effects,
            inequalities,
        };

        let parameter_set: BTreeSet<&Name> = schema.parameters.iter().collect();
        for atom in schema
            .positive_preconditions
            .iter()
            .chain(&schema.negative_preconditions)
            .chain(&schema.add_effects)
            .chain(&schema.delete_effects)
        {
            for variable in atom.variables() {
                if !parameter_set.contains(variable) {
                    return Err(PlannerError::DomainSyntax(format!(
                        "action `{}` uses variable `?{variable}` outside its parameter list",
                        schema.name
                    )));
                }
            }
        }

        Ok(schema)
    }

    fn collect_condition(
        action: &ActionName,
        condition: &PropCondition,
        negated: bool,
        predicate_arities: &BTreeMap<Name, usize>,
        positive: &mut Vec<Atom>,
        negative: &mut Vec<Atom>,
        inequalities: &mut Vec<InequalityPair>,
    ) -> Result<()> {
        match condition {
            PropCondition::Atom(atom) => {
                let converted = Self::convert_atom(action, atom, predicate_arities)?;
                if negated {
                    negative.push(converted);
                } else {
                    positive.push(converted);
                }
            }
            PropCondition::And(conditions) => {
                for inner in conditions {
                    Self::collect_condition(
                        action,
                        inner,
                        negated,
                        predicate_arities,
                        positive,
                        negative,
                        inequalities,
                    )?;
                }
            }
            PropCondition::Not(inner) => {
                Self::collect_condition(
                    action,
                    inner,
                    !negated,
                    predicate_arities,
                    positive,
                    negative,
                    inequalities,
                )?;
            }
            PropCondition::Equality(a, b) => {
                if negated {
                    inequalities.push(InequalityPair::new(
                        Self::convert_term(a),
                        Self::convert_term(b),
                    ));
                } else {
                    warn!(action = %action, "positive equality precondition is unsupported, ignoring");
                }
            }
            PropCondition::Or(_) | PropCondition::Imply(_, _) => {
                warn!(action = %action, "disjunctive precondition is unsupported, ignoring");
            }
        }
        Ok(())
    }

    fn convert_term(term: &ParsedTerm) -> Term {
        match term {
            ParsedTerm::Name(name) => Term::Constant(name.clone()),
            ParsedTerm::Variable(variable) => Term::Variable(variable.name().clone()),
        }
    }

    fn convert_atom(
        action: &ActionName,
        atom: &ParsedAtom<ParsedTerm>,
        predicate_arities: &BTreeMap<Name, usize>,
    ) -> Result<Atom> {
        let predicate = atom.predicate_name().name();
        match predicate_arities.get(predicate) {
            None => Err(PlannerError::DomainSyntax(format!(
                "action `{action}` refers to undeclared predicate `{predicate}`"
            ))),
            Some(&arity) if arity != atom.values().len() => {
                Err(PlannerError::DomainSyntax(format!(
                    "action `{action}` uses `{predicate}` with {} arguments, expected {arity}",
                    atom.values().len()
                )))
            }
            Some(_) => Ok(Atom::positive(
                predicate.clone(),
                atom.values().iter().map(Self::convert_term).collect(),
            )),
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &ActionName {
        &self.name
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parameters(&self) -> &[Name] {
        &self.parameters
    }

    pub fn positive_preconditions(&self) -> &[Atom] {
        &self.positive_preconditions
    }

    pub fn negative_preconditions(&self) -> &[Atom] {
        &self.negative_preconditions
    }

    pub fn add_effects(&self) -> &[Atom] {
        &self.add_effects
    }

    pub fn delete_effects(&self) -> &[Atom] {
        &self.delete_effects
    }

    pub fn inequalities(&self) -> &[InequalityPair] {
        &self.inequalities
    }
}

impl PartialEq for ActionSchema {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}
