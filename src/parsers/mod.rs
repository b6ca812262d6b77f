//! nom-based parsers for PDDL domain files.

mod atom;
mod definitions;
mod domain;
mod name;
mod test_helpers;
mod typed_list;
mod utilities;

pub use test_helpers::{Match, UnwrapValue};

pub trait Parser {
    type Item;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item>;

    /// Parse a string slice into the desired type. Discards any remaining
    /// input.
    fn from_str(input: &str) -> Result<Self::Item, nom::Err<ParseError>> {
        let (_, value) = Self::parse(input)?;
        Ok(value)
    }
}

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;

pub type ParseError<'a> = nom_greedyerror::GreedyError<Span<'a>, nom::error::ErrorKind>;

pub type ParseResult<'a, T, E = ParseError<'a>> = nom::IResult<Span<'a>, T, E>;

/// Re-exports commonly used types.
pub mod preamble {
    pub use crate::parsers::Parser;
    pub use crate::parsers::UnwrapValue;
    pub use crate::parsers::{ParseError, ParseResult, Span};
}

// Parsers
pub use definitions::{
    parse_action_definition, parse_predicate_definition, parse_prop_condition, parse_prop_effect,
};
pub use domain::{
    parse_constants, parse_domain, parse_requirement_key, parse_requirements,
    parse_type_definitions,
};
pub use name::{parse_action_name, parse_name, parse_predicate_name, parse_term, parse_variable};
pub use typed_list::{parse_primitive_type, parse_type};

// Parser combinators
pub use atom::atom;
pub use typed_list::typed_list;
pub use utilities::ignore_single_line_comment;

pub(crate) use utilities::{
    leading_whitespace, parens, prefix_expr, space_separated_list0, space_separated_list1,
    surrounding_whitespace,
};
