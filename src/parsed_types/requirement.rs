//! Contains the PDDL requirement keys.

use std::fmt::{Display, Formatter};
use std::ops::Deref;

/// Requirement keys understood by the parser. The planner itself supports
/// only the STRIPS fragment plus typing, negative preconditions and equality;
/// everything else is reported as a warning by the loader and ignored.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Requirement {
    Strips,
    Typing,
    NegativePreconditions,
    DisjunctivePreconditions,
    Equality,
    ExistentialPreconditions,
    UniversalPreconditions,
    QuantifiedPreconditions,
    ConditionalEffects,
    Fluents,
    NumericFluents,
    ObjectFluents,
    Adl,
    DurativeActions,
    DurationInequalities,
    ContinuousEffects,
    DerivedPredicates,
    TimedInitialLiterals,
    Preferences,
    Constraints,
    ActionCosts,
}

/// The literal requirement keys.
pub mod names {
    pub const STRIPS: &str = ":strips";
    pub const TYPING: &str = ":typing";
    pub const NEGATIVE_PRECONDITIONS: &str = ":negative-preconditions";
    pub const DISJUNCTIVE_PRECONDITIONS: &str = ":disjunctive-preconditions";
    pub const EQUALITY: &str = ":equality";
    pub const EXISTENTIAL_PRECONDITIONS: &str = ":existential-preconditions";
    pub const UNIVERSAL_PRECONDITIONS: &str = ":universal-preconditions";
    pub const QUANTIFIED_PRECONDITIONS: &str = ":quantified-preconditions";
    pub const CONDITIONAL_EFFECTS: &str = ":conditional-effects";
    pub const FLUENTS: &str = ":fluents";
    pub const NUMERIC_FLUENTS: &str = ":numeric-fluents";
    pub const OBJECT_FLUENTS: &str = ":object-fluents";
    pub const ADL: &str = ":adl";
    pub const DURATIVE_ACTIONS: &str = ":durative-actions";
    pub const DURATION_INEQUALITIES: &str = ":duration-inequalities";
    pub const CONTINUOUS_EFFECTS: &str = ":continuous-effects";
    pub const DERIVED_PREDICATES: &str = ":derived-predicates";
    pub const TIMED_INITIAL_LITERALS: &str = ":timed-initial-literals";
    pub const PREFERENCES: &str = ":preferences";
    pub const CONSTRAINTS: &str = ":constraints";
    pub const ACTION_COSTS: &str = ":action-costs";
}

impl Requirement {
    /// Whether the planner can actually honor this requirement.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            Requirement::Strips
                | Requirement::Typing
                | Requirement::NegativePreconditions
                | Requirement::Equality
        )
    }
}

impl TryFrom<&str> for Requirement {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            names::STRIPS => Ok(Requirement::Strips),
            names::TYPING => Ok(Requirement::Typing),
            names::NEGATIVE_PRECONDITIONS => Ok(Requirement::NegativePreconditions),
            names::DISJUNCTIVE_PRECONDITIONS => Ok(Requirement::DisjunctivePreconditions),
            names::EQUALITY => Ok(Requirement::Equality),
            names::EXISTENTIAL_PRECONDITIONS => Ok(Requirement::ExistentialPreconditions),
            names::UNIVERSAL_PRECONDITIONS => Ok(Requirement::UniversalPreconditions),
            names::QUANTIFIED_PRECONDITIONS => Ok(Requirement::QuantifiedPreconditions),
            names::CONDITIONAL_EFFECTS => Ok(Requirement::ConditionalEffects),
            names::FLUENTS => Ok(Requirement::Fluents),
            names::NUMERIC_FLUENTS => Ok(Requirement::NumericFluents),
            names::OBJECT_FLUENTS => Ok(Requirement::ObjectFluents),
            names::ADL => Ok(Requirement::Adl),
            names::DURATIVE_ACTIONS => Ok(Requirement::DurativeActions),
            names::DURATION_INEQUALITIES => Ok(Requirement::DurationInequalities),
            names::CONTINUOUS_EFFECTS => Ok(Requirement::ContinuousEffects),
            names::DERIVED_PREDICATES => Ok(Requirement::DerivedPredicates),
            names::TIMED_INITIAL_LITERALS => Ok(Requirement::TimedInitialLiterals),
            names::PREFERENCES => Ok(Requirement::Preferences),
            names::CONSTRAINTS => Ok(Requirement::Constraints),
            names::ACTION_COSTS => Ok(Requirement::ActionCosts),
            _ => Err(()),
        }
    }
}

impl Display for Requirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Requirement::Strips => names::STRIPS,
            Requirement::Typing => names::TYPING,
            Requirement::NegativePreconditions => names::NEGATIVE_PRECONDITIONS,
            Requirement::DisjunctivePreconditions => names::DISJUNCTIVE_PRECONDITIONS,
            Requirement::Equality => names::EQUALITY,
            Requirement::ExistentialPreconditions => names::EXISTENTIAL_PRECONDITIONS,
            Requirement::UniversalPreconditions => names::UNIVERSAL_PRECONDITIONS,
            Requirement::QuantifiedPreconditions => names::QUANTIFIED_PRECONDITIONS,
            Requirement::ConditionalEffects => names::CONDITIONAL_EFFECTS,
            Requirement::Fluents => names::FLUENTS,
            Requirement::NumericFluents => names::NUMERIC_FLUENTS,
            Requirement::ObjectFluents => names::OBJECT_FLUENTS,
            Requirement::Adl => names::ADL,
            Requirement::DurativeActions => names::DURATIVE_ACTIONS,
            Requirement::DurationInequalities => names::DURATION_INEQUALITIES,
            Requirement::ContinuousEffects => names::CONTINUOUS_EFFECTS,
            Requirement::DerivedPredicates => names::DERIVED_PREDICATES,
            Requirement::TimedInitialLiterals => names::TIMED_INITIAL_LITERALS,
            Requirement::Preferences => names::PREFERENCES,
            Requirement::Constraints => names::CONSTRAINTS,
            Requirement::ActionCosts => names::ACTION_COSTS,
        };
        write!(f, "{name}")
    }
}

/// The `(:requirements …)` section.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Requirements(Vec<Requirement>);

impl Requirements {
    pub fn new<I: IntoIterator<Item = Requirement>>(requirements: I) -> Self {
        Self(requirements.into_iter().collect())
    }
}

impl Deref for Requirements {
    type Target = [Requirement];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}
