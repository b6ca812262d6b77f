//! Utility parsers.

use nom::{
    bytes::complete::{is_not, tag},
    character::complete::{char, multispace0, multispace1},
    combinator::{opt, value},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use crate::parsers::{ParseResult, Span};

/// Consumes a `;`-to-end-of-line comment, if any, including any comment lines
/// that immediately follow it.
pub fn ignore_single_line_comment<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, ()> {
    value(
        (),
        opt(terminated(
            pair(char(';'), opt(is_not("\r\n"))),
            tuple((multispace0, opt(ignore_single_line_comment))),
        )),
    )(input.into())
}

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes a leading `(name` and trailing `)`, returning the output of
/// `inner`.
pub fn prefix_expr<'a, F, O>(name: &'a str, inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    delimited(
        preceded(leading_whitespace(tag("(")), tag(name)),
        leading_whitespace(inner),
        leading_whitespace(tag(")")),
    )
}

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes leading whitespace and line comments, returning the output of
/// `inner`.
pub fn leading_whitespace<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    preceded(preceded(multispace0, ignore_single_line_comment), inner)
}

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes leading and trailing whitespace and line comments, returning the
/// output of `inner`.
pub fn surrounding_whitespace<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    delimited(
        preceded(multispace0, ignore_single_line_comment),
        inner,
        preceded(multispace0, ignore_single_line_comment),
    )
}

/// A combinator that takes a parser `inner` and produces a parser that
/// consumes a possibly empty whitespace separated list, returning the outputs
/// of `inner`.
pub fn space_separated_list0<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Vec<O>>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    leading_whitespace(separated_list0(
        multispace1,
        preceded(ignore_single_line_comment, inner),
    ))
}

/// A combinator that takes a parser `inner` and produces a parser that
/// consumes a non-empty whitespace separated list, returning the outputs of
/// `inner`.
pub fn space_separated_list1<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Vec<O>>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    leading_whitespace(separated_list1(
        multispace1,
        preceded(ignore_single_line_comment, inner),
    ))
}

/// A combinator that takes a parser `inner` and produces a parser that
/// consumes surrounding parentheses, returning the output of `inner`.
pub fn parens<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    preceded(
        ignore_single_line_comment,
        delimited(char('('), leading_whitespace(inner), char(')')),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Name;
    use crate::parsers::{parse_name, Match};

    #[test]
    fn parens_works() {
        let mut parser = parens(parse_name);
        assert!(parser(Span::new("(content)")).is_exactly(Name::from("content")));
    }

    #[test]
    fn prefix_expr_works() {
        let mut parser = prefix_expr("either", space_separated_list1(parse_name));
        assert!(parser(Span::new("(either x y)"))
            .is_exactly(vec![Name::from("x"), Name::from("y")]));
    }

    #[test]
    fn comments_are_skipped() {
        let input = "; a comment\ncontent";
        let mut parser = leading_whitespace(parse_name);
        assert!(parser(Span::new(input)).is_exactly(Name::from("content")));
    }

    #[test]
    fn space_separated_lists_work() {
        let mut list0 = space_separated_list0(parse_name);
        assert!(list0(Span::new("x y")).is_exactly(vec![Name::from("x"), Name::from("y")]));
        assert!(list0(Span::new("")).is_exactly(vec![]));

        let mut list1 = space_separated_list1(parse_name);
        assert!(list1(Span::new("x")).is_exactly(vec![Name::from("x")]));
        assert!(list1(Span::new("")).is_err());
    }
}
