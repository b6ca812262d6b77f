//! Search-level atoms.

use crate::parsed_types::Name;
use crate::search::Term;
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

/// Most predicates in typical domains have very few arguments; tuples up to
/// this length are stored inline.
pub const TYPICAL_NUM_ARGUMENTS: usize = 4;

pub type ArgumentTuple = SmallVec<[Term; TYPICAL_NUM_ARGUMENTS]>;

/// A named predicate applied to a tuple of terms, plus a negation flag.
/// Atoms with the same name, argument tuple and flag are equal; the derived
/// ordering is `(predicate, arguments, negated)`, which is the sort key the
/// canonical form relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    predicate: Name,
    arguments: ArgumentTuple,
    negated: bool,
}

impl Atom {
    pub fn new(predicate: impl Into<Name>, arguments: ArgumentTuple, negated: bool) -> Self {
        Self {
            predicate: predicate.into(),
            arguments,
            negated,
        }
    }

    pub fn positive(predicate: impl Into<Name>, arguments: ArgumentTuple) -> Self {
        Self::new(predicate, arguments, false)
    }

    pub fn negative(predicate: impl Into<Name>, arguments: ArgumentTuple) -> Self {
        Self::new(predicate, arguments, true)
    }

    #[inline(always)]
    pub fn predicate(&self) -> &Name {
        &self.predicate
    }

    #[inline(always)]
    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }

    #[inline(always)]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// The same atom with the negation flag flipped.
    pub fn complement(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            arguments: self.arguments.clone(),
            negated: !self.negated,
        }
    }

    /// The positive version of this atom.
    pub fn to_positive(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            arguments: self.arguments.clone(),
            negated: false,
        }
    }

    /// The variables occurring in the argument tuple, in argument order.
    pub fn variables(&self) -> impl Iterator<Item = &Name> {
        self.arguments.iter().filter_map(|term| match term {
            Term::Variable(name) => Some(name),
            Term::Constant(_) => None,
        })
    }

    /// Rewrites the argument tuple through `rename`, leaving unmapped terms
    /// untouched.
    pub fn rename_variables(&self, rename: &impl Fn(&Name) -> Option<Name>) -> Self {
        let arguments = self
            .arguments
            .iter()
            .map(|term| match term {
                Term::Variable(name) => match rename(name) {
                    Some(new) => Term::Variable(new),
                    None => term.clone(),
                },
                Term::Constant(_) => term.clone(),
            })
            .collect();
        Self {
            predicate: self.predicate.clone(),
            arguments,
            negated: self.negated,
        }
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "~")?;
        }
        write!(f, "{}", self.predicate)?;
        if !self.arguments.is_empty() {
            write!(f, "(")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn on_ab() -> Atom {
        Atom::positive(
            "on",
            smallvec![Term::constant("a"), Term::constant("b")],
        )
    }

    #[test]
    fn equal_atoms_hash_equal() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(on_ab());
        set.insert(on_ab());
        assert_eq!(set.len(), 1);
        set.insert(on_ab().complement());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_matches_convention() {
        assert_eq!(on_ab().to_string(), "on(a, b)");
        assert_eq!(on_ab().complement().to_string(), "~on(a, b)");
        assert_eq!(Atom::positive("handempty", smallvec![]).to_string(), "handempty");
    }

    #[test]
    fn complement_is_an_involution() {
        assert_eq!(on_ab().complement().complement(), on_ab());
    }
}
