//! Provides parsers for names, variables and terms.

use crate::parsed_types::{ActionName, Name, PredicateName, Term, Variable};
use crate::parsers::{ParseResult, Span};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, one_of};
use nom::combinator::{map, recognize};
use nom::multi::many0;
use nom::sequence::{pair, preceded};

/// Parses a name, i.e. `<letter> <any char>*` where any char is a letter,
/// digit, `-` or `_`.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_name, preamble::*};
/// assert!(parse_name(Span::new("abcde")).is_value("abcde".into()));
/// assert!(parse_name(Span::new("a-1_2")).is_value("a-1_2".into()));
/// assert!(parse_name(Span::new("Z01")).is_value("Z01".into()));
///
/// assert!(parse_name(Span::new("")).is_err());
/// assert!(parse_name(Span::new("-abc")).is_err());
/// assert!(parse_name(Span::new("0124")).is_err());
/// ```
pub fn parse_name<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Name> {
    map(
        recognize(pair(
            alpha1,
            many0(alt((alphanumeric1, recognize(one_of("-_"))))),
        )),
        |span: Span| Name::new(*span.fragment()),
    )(input.into())
}

/// Parses a variable, i.e. `?<name>`, and returns its name.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_variable, preamble::*};
/// assert!(parse_variable(Span::new("?abcde")).is_value("abcde".into()));
/// assert!(parse_variable(Span::new("?a-1_2")).is_value("a-1_2".into()));
///
/// assert!(parse_variable(Span::new("abcde")).is_err());
/// assert!(parse_variable(Span::new("?1")).is_err());
/// ```
pub fn parse_variable<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Variable> {
    map(preceded(tag("?"), parse_name), Variable::new)(input.into())
}

/// Parses a predicate name, i.e. `<name>`.
pub fn parse_predicate_name<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, PredicateName> {
    map(parse_name, PredicateName::new)(input.into())
}

/// Parses an action name, i.e. `<name>`.
pub fn parse_action_name<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, ActionName> {
    map(parse_name, ActionName::new)(input.into())
}

/// Parses a term, i.e. `<name> | <variable>`.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_term, preamble::*};
/// # use liftedbdi::parsed_types::Term;
/// assert!(parse_term("abcde").is_value(Term::Name("abcde".into())));
/// assert!(parse_term("?abcde").is_value(Term::Variable("abcde".into())));
/// ```
pub fn parse_term<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Term> {
    alt((
        map(parse_variable, Term::Variable),
        map(parse_name, Term::Name),
    ))(input.into())
}

impl crate::parsers::Parser for Name {
    type Item = Name;

    /// See [`parse_name`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_name(input)
    }
}

impl crate::parsers::Parser for Variable {
    type Item = Variable;

    /// See [`parse_variable`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_variable(input)
    }
}

impl crate::parsers::Parser for Term {
    type Item = Term;

    /// See [`parse_term`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_term(input)
    }
}
