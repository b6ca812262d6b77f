//! The loaded planning domain.

use crate::error::{PlannerError, Result};
use crate::parsed_types::{Domain, Name};
use crate::parsers::Parser;
use crate::search::ActionSchema;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// A PDDL domain converted into the planner's representation: the predicate
/// table and one [`ActionSchema`] per action, in declaration order.
#[derive(Debug, Clone)]
pub struct PlanningDomain {
    name: Name,
    predicates: Vec<(Name, usize)>,
    predicate_arities: BTreeMap<Name, usize>,
    schemas: Vec<ActionSchema>,
}

impl PlanningDomain {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| PlannerError::io(path, source))?;
        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let domain = Domain::from_str(text)
            .map_err(|err| PlannerError::DomainSyntax(format!("unparseable PDDL: {err}")))?;

        for requirement in domain.requirements().iter() {
            if !requirement.is_supported() {
                warn!(%requirement, "unsupported requirement, continuing anyway");
            }
        }

        let predicates: Vec<(Name, usize)> = domain
            .predicates()
            .iter()
            .map(|definition| (definition.name().clone(), definition.arity()))
            .collect();
        let predicate_arities: BTreeMap<Name, usize> = predicates.iter().cloned().collect();

        let schemas = domain
            .actions()
            .iter()
            .enumerate()
            .map(|(index, action)| ActionSchema::new(index, action, &predicate_arities))
            .collect::<Result<Vec<_>>>()?;

        info!(
            domain = %domain.name(),
            predicates = predicates.len(),
            actions = schemas.len(),
            "loaded domain"
        );

        Ok(Self {
            name: domain.name().clone(),
            predicates,
            predicate_arities,
            schemas,
        })
    }

    #[inline(always)]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Predicate names with arities, in declaration order.
    pub fn predicates(&self) -> &[(Name, usize)] {
        &self.predicates
    }

    pub fn predicate_arity(&self, predicate: &Name) -> Option<usize> {
        self.predicate_arities.get(predicate).copied()
    }

    pub fn schemas(&self) -> &[ActionSchema] {
        &self.schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY: &str = "
        (define (domain toy)
            (:predicates (p ?x) (q ?x))
            (:action flip
                :parameters (?x)
                :precondition (p ?x)
                :effect (and (q ?x) (not (p ?x)))))";

    #[test]
    fn loads_schemas() {
        let domain = PlanningDomain::from_text(TOY).unwrap();
        assert_eq!(domain.schemas().len(), 1);
        assert_eq!(domain.predicate_arity(&"p".into()), Some(1));
        let schema = &domain.schemas()[0];
        assert_eq!(schema.add_effects().len(), 1);
        assert_eq!(schema.delete_effects().len(), 1);
    }

    #[test]
    fn add_delete_conflict_is_rejected() {
        let text = "
            (define (domain broken)
                (:predicates (p ?x))
                (:action nop
                    :parameters (?x)
                    :precondition (p ?x)
                    :effect (and (p ?x) (not (p ?x)))))";
        assert!(matches!(
            PlanningDomain::from_text(text),
            Err(PlannerError::DomainSyntax(_))
        ));
    }

    #[test]
    fn unknown_predicate_is_rejected() {
        let text = "
            (define (domain broken)
                (:predicates (p ?x))
                (:action nop
                    :parameters (?x)
                    :precondition (mystery ?x)
                    :effect (p ?x)))";
        assert!(matches!(
            PlanningDomain::from_text(text),
            Err(PlannerError::DomainSyntax(_))
        ));
    }

    #[test]
    fn free_variable_in_effect_is_rejected() {
        let text = "
            (define (domain broken)
                (:predicates (p ?x))
                (:action nop
                    :parameters (?x)
                    :precondition (p ?x)
                    :effect (p ?y)))";
        assert!(matches!(
            PlanningDomain::from_text(text),
            Err(PlannerError::DomainSyntax(_))
        ));
    }
}
