//! Parsers for predicate and action definitions, conditions and effects.

use crate::parsed_types::{ActionDefinition, PredicateDefinition, PropCondition, PropEffect};
use crate::parsers::{
    atom, leading_whitespace, parens, parse_action_name, parse_predicate_name, parse_term,
    parse_variable, prefix_expr, space_separated_list0, typed_list, ParseResult, Span,
};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::multispace1;
use nom::combinator::{map, opt};
use nom::sequence::{preceded, tuple};

/// Parses a predicate definition, i.e. `(<predicate> <typed list (variable)>)`.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_predicate_definition, preamble::*};
/// # use liftedbdi::parsed_types::*;
/// assert!(parse_predicate_definition("(on ?x ?y)").is_value(PredicateDefinition::new(
///     PredicateName::from("on"),
///     TypedList::from_iter([
///         Variable::from_str("x").to_typed(Type::OBJECT),
///         Variable::from_str("y").to_typed(Type::OBJECT),
///     ])
/// )));
/// ```
pub fn parse_predicate_definition<'a, T: Into<Span<'a>>>(
    input: T,
) -> ParseResult<'a, PredicateDefinition> {
    map(
        parens(tuple((
            parse_predicate_name,
            leading_whitespace(typed_list(parse_variable)),
        ))),
        PredicateDefinition::from,
    )(input.into())
}

/// Parses a propositional condition.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_prop_condition, preamble::*};
/// # use liftedbdi::parsed_types::*;
/// assert!(parse_prop_condition("(on ?x b1)").is_value(PropCondition::new_atom(Atom::new(
///     PredicateName::from("on"),
///     vec![Term::Variable("x".into()), Term::Name("b1".into())]
/// ))));
///
/// assert!(parse_prop_condition("(not (= ?x ?y))").is_value(PropCondition::new_not(
///     PropCondition::new_equality(Term::Variable("x".into()), Term::Variable("y".into()))
/// )));
/// ```
pub fn parse_prop_condition<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, PropCondition> {
    let atom = map(atom(parse_term), PropCondition::new_atom);

    let and = map(
        prefix_expr("and", space_separated_list0(parse_prop_condition)),
        PropCondition::new_and,
    );

    // :disjunctive-preconditions
    let or = map(
        prefix_expr("or", space_separated_list0(parse_prop_condition)),
        PropCondition::new_or,
    );

    // :negative-preconditions
    let not = map(
        prefix_expr("not", parse_prop_condition),
        PropCondition::new_not,
    );

    // :disjunctive-preconditions
    let imply = map(
        prefix_expr(
            "imply",
            tuple((
                parse_prop_condition,
                preceded(multispace1, parse_prop_condition),
            )),
        ),
        |(a, b)| PropCondition::new_imply(a, b),
    );

    // :equality
    let equality = map(
        prefix_expr("=", tuple((parse_term, preceded(multispace1, parse_term)))),
        |(a, b)| PropCondition::new_equality(a, b),
    );

    alt((atom, and, or, not, imply, equality))(input.into())
}

/// Parses a propositional effect, i.e. `<atom> | (not <atom>)`.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_prop_effect, preamble::*};
/// # use liftedbdi::parsed_types::*;
/// assert!(parse_prop_effect("(on ?x b1)").is_value(PropEffect::new_add(Atom::new(
///     PredicateName::from("on"),
///     vec![Term::Variable("x".into()), Term::Name("b1".into())]
/// ))));
///
/// assert!(parse_prop_effect("(not (on ?x b1))").is_value(PropEffect::new_delete(Atom::new(
///     PredicateName::from("on"),
///     vec![Term::Variable("x".into()), Term::Name("b1".into())]
/// ))));
/// ```
pub fn parse_prop_effect<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, PropEffect> {
    let add = map(atom(parse_term), PropEffect::new_add);
    let delete = map(prefix_expr("not", atom(parse_term)), PropEffect::new_delete);

    alt((delete, add))(input.into())
}

/// Parses an action definition.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_action_definition, preamble::*};
/// # use liftedbdi::parsed_types::*;
/// let input = r#"(:action putdown
///                    :parameters (?ob)
///                    :precondition (holding ?ob)
///                    :effect (and (clear ?ob) (not (holding ?ob))))"#;
///
/// let (_, action) = parse_action_definition(Span::new(input)).unwrap();
/// assert_eq!(action.name(), &ActionName::from("putdown"));
/// assert_eq!(action.parameters().len(), 1);
/// assert_eq!(action.preconditions().len(), 1);
/// assert_eq!(action.effects().len(), 2);
/// ```
pub fn parse_action_definition<'a, T: Into<Span<'a>>>(
    input: T,
) -> ParseResult<'a, ActionDefinition> {
    let precondition = preceded(
        tag(":precondition"),
        preceded(
            multispace1,
            alt((
                prefix_expr("and", space_separated_list0(parse_prop_condition)),
                map(parse_prop_condition, |cond| vec![cond]),
            )),
        ),
    );
    let effect = preceded(
        tag(":effect"),
        preceded(
            multispace1,
            alt((
                prefix_expr("and", space_separated_list0(parse_prop_effect)),
                map(parse_prop_effect, |effect| vec![effect]),
            )),
        ),
    );
    let action_def_body = tuple((
        map(opt(leading_whitespace(precondition)), |pre| {
            pre.unwrap_or_default()
        }),
        map(opt(leading_whitespace(effect)), |eff| {
            eff.unwrap_or_default()
        }),
    ));
    let parameters = preceded(
        tag(":parameters"),
        preceded(multispace1, parens(typed_list(parse_variable))),
    );
    let action_def = prefix_expr(
        ":action",
        tuple((
            parse_action_name,
            preceded(multispace1, parameters),
            leading_whitespace(action_def_body),
        )),
    );

    map(action_def, |(name, params, (preconditions, effects))| {
        ActionDefinition::new(name, params, preconditions, effects)
    })(input.into())
}

impl crate::parsers::Parser for PredicateDefinition {
    type Item = PredicateDefinition;

    /// See [`parse_predicate_definition`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_predicate_definition(input)
    }
}

impl crate::parsers::Parser for PropCondition {
    type Item = PropCondition;

    /// See [`parse_prop_condition`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_prop_condition(input)
    }
}

impl crate::parsers::Parser for PropEffect {
    type Item = PropEffect;

    /// See [`parse_prop_effect`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_prop_effect(input)
    }
}

impl crate::parsers::Parser for ActionDefinition {
    type Item = ActionDefinition;

    /// See [`parse_action_definition`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_action_definition(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inequality_precondition_parses() {
        let input = "(:action stack
                        :parameters (?x ?y)
                        :precondition (and (holding ?x) (clear ?y) (not (= ?x ?y)))
                        :effect (and (on ?x ?y) (not (holding ?x))))";
        let (_, action) = parse_action_definition(Span::new(input)).unwrap();
        assert_eq!(action.preconditions().len(), 3);
    }
}
