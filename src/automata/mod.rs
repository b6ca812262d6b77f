//! DFA handling: the DOT reader, transition-label expressions, and the
//! label refiner that rewrites arbitrary Boolean labels into disjoint
//! partitions.

mod dfa;
mod label;
mod refine;
pub mod verify;

pub use dfa::{Dfa, DfaTransition};
pub use label::{parse_label, LabelExpr};
pub use refine::{
    LabelRefiner, RefineMethod, RefinedDfa, RefinementStats, ENUMERATIVE_ATOM_CAP,
};
