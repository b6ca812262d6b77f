//! The lifted regression planner: backward search over goal-regressed state
//! schemas with unbound variables, under inequality constraints and
//! synthesized domain invariants.

mod action_schema;
mod atom;
mod constraints;
mod invariants;
mod planning_domain;
mod regression;
#[allow(clippy::module_inception)]
mod search;
mod state;
mod state_graph;
mod statistics;
mod term;
mod unify;

pub use action_schema::ActionSchema;
pub use atom::{ArgumentTuple, Atom, TYPICAL_NUM_ARGUMENTS};
pub use constraints::{ConstraintGraph, InequalityPair};
pub use invariants::DomainInvariants;
pub use planning_domain::PlanningDomain;
pub(crate) use regression::{achievers_for, regress, Achiever, RegressionOutcome};
pub use search::RegressionSearch;
pub use state::RegressionState;
pub use state_graph::{BeliefOp, StateGraph, TransitionEdge};
pub use statistics::{DiscardCounters, DiscardReason, SearchStatistics};
pub use term::Term;
pub use unify::{match_atoms, Substitution};
