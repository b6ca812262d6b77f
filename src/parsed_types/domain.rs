//! Contains the [`Domain`] type.

use crate::parsed_types::{
    ActionDefinition, Constants, Name, PredicateDefinition, Requirements, Types,
};

/// The top-level type of a PDDL domain description.
///
/// ## Example
/// ```
/// # use liftedbdi::parsed_types::{Domain, Name};
/// # use liftedbdi::parsers::Parser;
/// let input = r#"
/// (define (domain blocks)
///     (:requirements :strips)
///     (:predicates (on ?x ?y) (clear ?x))
///     (:action stack
///         :parameters (?x ?y)
///         :precondition (and (clear ?y))
///         :effect (and (on ?x ?y) (not (clear ?y)))
///     )
/// )"#;
///
/// let domain = Domain::from_str(input).unwrap();
/// assert_eq!(domain.name(), &Name::new("blocks"));
/// assert_eq!(domain.predicates().len(), 2);
/// assert_eq!(domain.actions().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    name: Name,
    requirements: Requirements,
    types: Types,
    constants: Constants,
    predicates: Vec<PredicateDefinition>,
    actions: Vec<ActionDefinition>,
}

impl Domain {
    /// Creates a builder to easily construct [`Domain`] instances.
    pub fn builder<T: Into<Vec<ActionDefinition>>>(name: Name, actions: T) -> Self {
        Self {
            name,
            requirements: Requirements::default(),
            types: Types::default(),
            constants: Constants::default(),
            predicates: Vec::default(),
            actions: actions.into(),
        }
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_types<T: Into<Types>>(mut self, types: T) -> Self {
        self.types = types.into();
        self
    }

    pub fn with_constants<C: Into<Constants>>(mut self, constants: C) -> Self {
        self.constants = constants.into();
        self
    }

    pub fn with_predicates<P: Into<Vec<PredicateDefinition>>>(mut self, predicates: P) -> Self {
        self.predicates = predicates.into();
        self
    }

    pub const fn name(&self) -> &Name {
        &self.name
    }

    pub const fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub const fn types(&self) -> &Types {
        &self.types
    }

    pub const fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn predicates(&self) -> &[PredicateDefinition] {
        &self.predicates
    }

    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }
}
