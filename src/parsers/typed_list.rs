//! Provides the [`typed_list`] parser combinator and type parsers.

use crate::parsed_types::{PrimitiveType, Type, Typed, TypedList};
use crate::parsers::{
    leading_whitespace, parse_name, prefix_expr, space_separated_list0, space_separated_list1,
    ParseResult, Span,
};
use nom::branch::alt;
use nom::character::complete::char;
use nom::combinator::map;
use nom::multi::many0;
use nom::sequence::{preceded, tuple};

/// Parses a primitive type, i.e. `object | <name>`.
pub fn parse_primitive_type<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, PrimitiveType> {
    map(parse_name, PrimitiveType::new)(input.into())
}

/// Parses a type, i.e. `<primitive-type> | (either <primitive-type>⁺)`.
pub fn parse_type<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Type> {
    alt((
        map(
            prefix_expr("either", space_separated_list1(parse_primitive_type)),
            Type::EitherOf,
        ),
        map(parse_primitive_type, Type::Exactly),
    ))(input.into())
}

/// Parser combinator that parses a typed list, i.e. `x* | x⁺ - <type>`.
///
/// ## Example
/// ```
/// # use liftedbdi::parsers::{parse_name, typed_list, preamble::*};
/// # use liftedbdi::parsed_types::*;
/// // Implicitly typed elements.
/// assert!(typed_list(parse_name)(Span::new("abc def")).is_value(TypedList::from_iter([
///     Name::new("abc").to_typed(Type::OBJECT),
///     Name::new("def").to_typed(Type::OBJECT),
/// ])));
///
/// // Explicitly typed elements.
/// assert!(typed_list(parse_name)(Span::new("abc def - word kitchen - room")).is_value(
///     TypedList::from_iter([
///         Name::new("abc").to_typed("word"),
///         Name::new("def").to_typed("word"),
///         Name::new("kitchen").to_typed("room"),
///     ])
/// ));
/// ```
pub fn typed_list<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, TypedList<O>>
where
    F: Clone + FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    // `x*`
    let implicitly_typed = map(inner.clone(), Typed::new_object);
    let implicitly_typed_list = space_separated_list0(implicitly_typed);

    // `x⁺ - <type>`
    let explicitly_typed = map(
        tuple((
            space_separated_list1(inner.clone()),
            preceded(leading_whitespace(char('-')), parse_type),
        )),
        |(os, t)| {
            os.into_iter()
                .map(move |o| Typed::new(o, t.clone()))
                .collect::<Vec<_>>()
        },
    );

    let typed_list_choice = tuple((
        map(many0(explicitly_typed), |vec| {
            vec.into_iter().flatten().collect::<Vec<_>>()
        }),
        implicitly_typed_list,
    ));

    map(typed_list_choice, |(mut explicit, mut implicit)| {
        explicit.append(&mut implicit);
        TypedList::new(explicit)
    })
}
