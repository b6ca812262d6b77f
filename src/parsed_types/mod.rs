//! The abstract syntax produced by the PDDL parsers in
//! [`crate::parsers`]. These types are purely structural; the planner-facing
//! representation lives in [`crate::search`].

mod action;
mod atoms;
mod domain;
mod name;
mod predicate;
pub mod requirement;
mod typed;

pub use action::{ActionDefinition, PropCondition, PropEffect};
pub use atoms::{ActionName, Atom, PredicateName, Term, Variable};
pub use domain::Domain;
pub use name::Name;
pub use predicate::PredicateDefinition;
pub use requirement::{Requirement, Requirements};
pub use typed::{
    Constants, PrimitiveType, ToTyped, Type, Typed, TypedList, TypedNames, TypedVariables, Types,
};
