//! Provides parsers for domain definitions and the domain-level sections.

use crate::parsed_types::requirement::names;
use crate::parsed_types::{Constants, Domain, Requirement, Requirements, Types};
use crate::parsers::{
    parse_action_definition, parse_name, parse_predicate_definition, prefix_expr,
    space_separated_list1, surrounding_whitespace, typed_list, ParseResult, Span,
};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::multispace1;
use nom::combinator::{map, map_opt, opt};
use nom::sequence::{preceded, tuple};

/// Parses a requirement key, i.e. `:strips`.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_requirement_key, preamble::*};
/// # use liftedbdi::parsed_types::Requirement;
/// assert!(parse_requirement_key(":strips").is_value(Requirement::Strips));
/// assert!(parse_requirement_key(":negative-preconditions")
///     .is_value(Requirement::NegativePreconditions));
/// assert!(parse_requirement_key(":unknown").is_err());
/// ```
pub fn parse_requirement_key<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Requirement> {
    map_opt(
        alt((
            // Longest keys first so that prefixes do not shadow them.
            alt((
                tag(names::NEGATIVE_PRECONDITIONS),
                tag(names::DISJUNCTIVE_PRECONDITIONS),
                tag(names::EXISTENTIAL_PRECONDITIONS),
                tag(names::UNIVERSAL_PRECONDITIONS),
                tag(names::QUANTIFIED_PRECONDITIONS),
                tag(names::CONDITIONAL_EFFECTS),
                tag(names::NUMERIC_FLUENTS),
                tag(names::OBJECT_FLUENTS),
                tag(names::DURATIVE_ACTIONS),
                tag(names::DURATION_INEQUALITIES),
                tag(names::CONTINUOUS_EFFECTS),
                tag(names::DERIVED_PREDICATES),
                tag(names::TIMED_INITIAL_LITERALS),
                tag(names::ACTION_COSTS),
            )),
            alt((
                tag(names::STRIPS),
                tag(names::TYPING),
                tag(names::EQUALITY),
                tag(names::FLUENTS),
                tag(names::ADL),
                tag(names::PREFERENCES),
                tag(names::CONSTRAINTS),
            )),
        )),
        |key: Span| Requirement::try_from(*key.fragment()).ok(),
    )(input.into())
}

/// Parses a requirements definition, i.e. `(:requirements <require-key>⁺)`.
pub fn parse_requirements<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Requirements> {
    map(
        prefix_expr(
            ":requirements",
            space_separated_list1(parse_requirement_key),
        ),
        Requirements::new,
    )(input.into())
}

/// Parses type definitions, i.e. `(:types <typed list (name)>)`.
pub fn parse_type_definitions<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Types> {
    map(prefix_expr(":types", typed_list(parse_name)), Types::new)(input.into())
}

/// Parses constant definitions, i.e. `(:constants <typed list (name)>)`.
pub fn parse_constants<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Constants> {
    map(
        prefix_expr(":constants", typed_list(parse_name)),
        Constants::new,
    )(input.into())
}

/// Parses a domain definition.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_domain, preamble::*};
/// # use liftedbdi::parsed_types::Name;
/// let input = r#"
/// (define (domain blocks)
///     (:requirements :strips :typing)
///     (:types block)
///     (:predicates (on ?x - block ?y - block) (clear ?x - block))
///     (:action stack
///         :parameters (?x - block ?y - block)
///         :precondition (and (clear ?y))
///         :effect (and (on ?x ?y) (not (clear ?y)))
///     )
/// )"#;
///
/// let (remainder, domain) = parse_domain(input).unwrap();
/// assert!(remainder.is_empty());
/// assert_eq!(domain.name(), &Name::new("blocks"));
/// assert_eq!(domain.requirements().len(), 2);
/// assert_eq!(domain.predicates().len(), 2);
/// assert_eq!(domain.actions().len(), 1);
/// ```
pub fn parse_domain<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Domain> {
    map(
        surrounding_whitespace(prefix_expr(
            "define",
            tuple((
                prefix_expr("domain", parse_name),
                opt(preceded(multispace1, parse_requirements)),
                opt(preceded(multispace1, parse_type_definitions)),
                opt(preceded(multispace1, parse_constants)),
                opt(preceded(
                    multispace1,
                    prefix_expr(
                        ":predicates",
                        space_separated_list1(parse_predicate_definition),
                    ),
                )),
                opt(preceded(
                    multispace1,
                    space_separated_list1(parse_action_definition),
                )),
            )),
        )),
        |(name, requirements, types, constants, predicates, actions)| {
            Domain::builder(name, actions.unwrap_or_default())
                .with_requirements(requirements.unwrap_or_default())
                .with_types(types.unwrap_or_default())
                .with_constants(constants.unwrap_or_default())
                .with_predicates(predicates.unwrap_or_default())
        },
    )(input.into())
}

impl crate::parsers::Parser for Requirements {
    type Item = Requirements;

    /// See [`parse_requirements`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_requirements(input)
    }
}

impl crate::parsers::Parser for Domain {
    type Item = Domain;

    /// See [`parse_domain`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_domain(input)
    }
}
