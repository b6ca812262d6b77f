//! Atoms and the identifier wrappers they are made of: [`PredicateName`],
//! [`ActionName`], [`Variable`], [`Term`] and [`Atom`].

use crate::parsed_types::Name;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

macro_rules! name_wrapper {
    ($(#[$doc:meta])* $id:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $id(Name);

        impl $id {
            #[inline(always)]
            pub const fn new(name: Name) -> Self {
                Self(name)
            }

            #[inline(always)]
            pub fn from_str(name: &str) -> Self {
                Self(Name::new(name))
            }

            #[inline(always)]
            pub fn name(&self) -> &Name {
                &self.0
            }
        }

        impl<T> From<T> for $id
        where
            T: Into<Name>,
        {
            #[inline(always)]
            fn from(value: T) -> Self {
                Self(value.into())
            }
        }

        impl AsRef<Name> for $id {
            #[inline(always)]
            fn as_ref(&self) -> &Name {
                &self.0
            }
        }

        impl AsRef<str> for $id {
            #[inline(always)]
            fn as_ref(&self) -> &str {
                self.0.as_ref()
            }
        }

        impl Deref for $id {
            type Target = Name;

            #[inline(always)]
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $id {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

name_wrapper!(
    /// A predicate name.
    PredicateName
);
name_wrapper!(
    /// An action name.
    ActionName
);
name_wrapper!(
    /// A variable name, stored without its `?` sigil.
    Variable
);

/// A term, i.e. a [`Name`] or a [`Variable`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Term {
    Name(Name),
    Variable(Variable),
}

impl Term {
    pub const fn new_name(name: Name) -> Self {
        Self::Name(name)
    }

    pub const fn new_variable(var: Variable) -> Self {
        Self::Variable(var)
    }
}

impl From<Name> for Term {
    fn from(value: Name) -> Self {
        Self::Name(value)
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

/// An atom: a predicate applied to a fixed-arity tuple of values.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Atom<T> {
    predicate_name: PredicateName,
    values: Vec<T>,
}

impl<T> Atom<T> {
    pub const fn new(predicate_name: PredicateName, values: Vec<T>) -> Self {
        Self {
            predicate_name,
            values,
        }
    }

    /// Returns the predicate name.
    pub const fn predicate_name(&self) -> &PredicateName {
        &self.predicate_name
    }

    /// Gets a reference to the values.
    pub fn values(&self) -> &[T] {
        self.values.as_slice()
    }
}

impl<T> From<(PredicateName, Vec<T>)> for Atom<T> {
    fn from(value: (PredicateName, Vec<T>)) -> Self {
        Atom::new(value.0, value.1)
    }
}

impl<T> Deref for Atom<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.values()
    }
}
