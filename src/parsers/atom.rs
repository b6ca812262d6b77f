//! Provides parsers for atoms.

use crate::parsed_types::Atom;
use crate::parsers::{leading_whitespace, parens, space_separated_list0};
use crate::parsers::{parse_predicate_name, ParseResult, Span};
use nom::combinator::map;
use nom::sequence::tuple;

/// Parses an atom, i.e. `(<predicate> t*)`.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{atom, parse_name, preamble::*};
/// # use liftedbdi::parsed_types::{Atom, PredicateName};
/// assert!(atom(parse_name)(Span::new("(move a b)")).is_value(
///     Atom::new(PredicateName::from("move"), vec!["a".into(), "b".into()])
/// ));
/// ```
pub fn atom<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Atom<O>>
where
    F: Clone + FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    map(
        parens(tuple((
            parse_predicate_name,
            leading_whitespace(space_separated_list0(inner)),
        ))),
        |(name, values)| Atom::new(name, values),
    )
}
