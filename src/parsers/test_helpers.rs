//! Assertion helpers for parser tests and doc examples.

use crate::parsers::ParseResult;

/// Checks that a parse succeeded with a given value, ignoring any remaining
/// input.
pub trait UnwrapValue<T> {
    fn is_value(&self, value: T) -> bool;
}

impl<'a, T: PartialEq> UnwrapValue<T> for ParseResult<'a, T> {
    fn is_value(&self, value: T) -> bool {
        match self {
            Ok((_, parsed)) => *parsed == value,
            Err(_) => false,
        }
    }
}

/// Checks that a parse consumed all input and produced a given value.
pub trait Match<T> {
    fn is_exactly(&self, value: T) -> bool;
}

impl<'a, T: PartialEq> Match<T> for ParseResult<'a, T> {
    fn is_exactly(&self, value: T) -> bool {
        match self {
            Ok((remaining, parsed)) => remaining.is_empty() && *parsed == value,
            Err(_) => false,
        }
    }
}
