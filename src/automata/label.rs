//! Boolean transition-label expressions.

use crate::error::{PlannerError, Result};
use crate::parsers::{ParseResult, Span};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, char, multispace0, one_of};
use nom::combinator::{all_consuming, map, opt, recognize, verify};
use nom::multi::{fold_many0, many0};
use nom::sequence::{delimited, pair, preceded};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A Boolean combination of propositional atoms, as found on DFA edges.
/// Precedence is negation over conjunction over disjunction; `&&`, `||` and
/// `~` are accepted as synonyms of `&`, `|` and `!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelExpr {
    True,
    False,
    Atom(String),
    Not(Box<LabelExpr>),
    And(Box<LabelExpr>, Box<LabelExpr>),
    Or(Box<LabelExpr>, Box<LabelExpr>),
}

impl LabelExpr {
    pub fn not(inner: LabelExpr) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn and(a: LabelExpr, b: LabelExpr) -> Self {
        Self::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: LabelExpr, b: LabelExpr) -> Self {
        Self::Or(Box::new(a), Box::new(b))
    }

    /// Appends atom names in first-sight order, skipping duplicates.
    pub fn collect_atoms(&self, out: &mut Vec<String>) {
        match self {
            Self::True | Self::False => {}
            Self::Atom(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Self::Not(inner) => inner.collect_atoms(out),
            Self::And(a, b) | Self::Or(a, b) => {
                a.collect_atoms(out);
                b.collect_atoms(out);
            }
        }
    }

    /// Evaluates the expression under a valuation. Atoms absent from the
    /// valuation are false.
    pub fn evaluate(&self, valuation: &BTreeMap<String, bool>) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Atom(name) => valuation.get(name).copied().unwrap_or(false),
            Self::Not(inner) => !inner.evaluate(valuation),
            Self::And(a, b) => a.evaluate(valuation) && b.evaluate(valuation),
            Self::Or(a, b) => a.evaluate(valuation) || b.evaluate(valuation),
        }
    }

    /// Disjunctive normal form: a list of conjuncts, each a list of
    /// `(atom, negated)` literals in left-to-right appearance order.
    /// Conjuncts containing a literal and its negation are dropped; `true`
    /// yields one empty conjunct, `false` yields none.
    pub fn dnf(&self) -> Vec<Vec<(String, bool)>> {
        fn go(expr: &LabelExpr, negated: bool) -> Vec<Vec<(String, bool)>> {
            match expr {
                LabelExpr::True => {
                    if negated {
                        vec![]
                    } else {
                        vec![vec![]]
                    }
                }
                LabelExpr::False => {
                    if negated {
                        vec![vec![]]
                    } else {
                        vec![]
                    }
                }
                LabelExpr::Atom(name) => vec![vec![(name.clone(), negated)]],
                LabelExpr::Not(inner) => go(inner, !negated),
                LabelExpr::And(a, b) if !negated => distribute(go(a, false), go(b, false)),
                LabelExpr::And(a, b) => union(go(a, true), go(b, true)),
                LabelExpr::Or(a, b) if !negated => union(go(a, false), go(b, false)),
                LabelExpr::Or(a, b) => distribute(go(a, true), go(b, true)),
            }
        }

        fn union(
            mut a: Vec<Vec<(String, bool)>>,
            b: Vec<Vec<(String, bool)>>,
        ) -> Vec<Vec<(String, bool)>> {
            a.extend(b);
            a
        }

        fn distribute(
            a: Vec<Vec<(String, bool)>>,
            b: Vec<Vec<(String, bool)>>,
        ) -> Vec<Vec<(String, bool)>> {
            let mut out = Vec::new();
            for left in &a {
                'next: for right in &b {
                    let mut conjunct = left.clone();
                    for literal in right {
                        if conjunct
                            .iter()
                            .any(|(name, neg)| name == &literal.0 && *neg != literal.1)
                        {
                            continue 'next;
                        }
                        if !conjunct.contains(literal) {
                            conjunct.push(literal.clone());
                        }
                    }
                    out.push(conjunct);
                }
            }
            out
        }

        go(self, false)
    }
}

impl Display for LabelExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Atom(name) => write!(f, "{name}"),
            Self::Not(inner) => match **inner {
                Self::Atom(_) | Self::True | Self::False | Self::Not(_) => {
                    write!(f, "~{inner}")
                }
                _ => write!(f, "~({inner})"),
            },
            Self::And(a, b) => {
                for (i, side) in [a, b].into_iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    match **side {
                        Self::Or(_, _) => write!(f, "({side})")?,
                        _ => write!(f, "{side}")?,
                    }
                }
                Ok(())
            }
            Self::Or(a, b) => write!(f, "{a} | {b}"),
        }
    }
}

fn identifier(input: Span) -> ParseResult<Span> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn primary(input: Span) -> ParseResult<LabelExpr> {
    preceded(
        multispace0,
        alt((
            delimited(
                char('('),
                expr,
                preceded(multispace0, char(')')),
            ),
            map(
                verify(identifier, |name: &Span| *name.fragment() == "true"),
                |_| LabelExpr::True,
            ),
            map(
                verify(identifier, |name: &Span| *name.fragment() == "false"),
                |_| LabelExpr::False,
            ),
            map(identifier, |name: Span| {
                LabelExpr::Atom(name.fragment().to_string())
            }),
        )),
    )(input)
}

fn unary(input: Span) -> ParseResult<LabelExpr> {
    preceded(
        multispace0,
        alt((
            map(preceded(one_of("!~"), unary), LabelExpr::not),
            primary,
        )),
    )(input)
}

fn conjunction(input: Span) -> ParseResult<LabelExpr> {
    let (input, first) = unary(input)?;
    fold_many0(
        preceded(
            preceded(multispace0, pair(char('&'), opt(char('&')))),
            unary,
        ),
        move || first.clone(),
        LabelExpr::and,
    )(input)
}

fn expr(input: Span) -> ParseResult<LabelExpr> {
    let (input, first) = conjunction(input)?;
    fold_many0(
        preceded(
            preceded(multispace0, pair(char('|'), opt(char('|')))),
            conjunction,
        ),
        move || first.clone(),
        LabelExpr::or,
    )(input)
}

/// Parses a transition label into a [`LabelExpr`]. The whole input must be
/// consumed (up to trailing whitespace).
pub fn parse_label(label: &str) -> Result<LabelExpr> {
    all_consuming(delimited(multispace0, expr, multispace0))(Span::new(label))
        .map(|(_, parsed)| parsed)
        .map_err(|err| PlannerError::LabelParse {
            label: label.to_string(),
            reason: format!("{err:?}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> LabelExpr {
        LabelExpr::Atom(name.to_string())
    }

    #[test]
    fn precedence_is_not_over_and_over_or() {
        let parsed = parse_label("!a & b | c").unwrap();
        assert_eq!(
            parsed,
            LabelExpr::or(
                LabelExpr::and(LabelExpr::not(atom("a")), atom("b")),
                atom("c")
            )
        );
    }

    #[test]
    fn parentheses_and_synonyms() {
        assert_eq!(
            parse_label("(a || b) && ~c").unwrap(),
            LabelExpr::and(LabelExpr::or(atom("a"), atom("b")), LabelExpr::not(atom("c")))
        );
    }

    #[test]
    fn constants_parse() {
        assert_eq!(parse_label("true").unwrap(), LabelExpr::True);
        assert_eq!(parse_label(" false ").unwrap(), LabelExpr::False);
    }

    #[test]
    fn malformed_labels_are_rejected() {
        assert!(parse_label("a &").is_err());
        assert!(parse_label("(a | b").is_err());
        assert!(parse_label("").is_err());
    }

    #[test]
    fn dnf_distributes() {
        let parsed = parse_label("(a | b) & c").unwrap();
        assert_eq!(
            parsed.dnf(),
            vec![
                vec![("a".to_string(), false), ("c".to_string(), false)],
                vec![("b".to_string(), false), ("c".to_string(), false)],
            ]
        );
    }

    #[test]
    fn dnf_drops_contradictory_conjuncts() {
        let parsed = parse_label("a & !a").unwrap();
        assert!(parsed.dnf().is_empty());
    }

    #[test]
    fn evaluation_defaults_missing_atoms_to_false() {
        let parsed = parse_label("a & !b").unwrap();
        let mut valuation = BTreeMap::new();
        valuation.insert("a".to_string(), true);
        assert!(parsed.evaluate(&valuation));
        valuation.insert("b".to_string(), true);
        assert!(!parsed.evaluate(&valuation));
    }

    #[test]
    fn atoms_are_collected_in_first_sight_order() {
        let parsed = parse_label("b & (a | b) | c").unwrap();
        let mut atoms = Vec::new();
        parsed.collect_atoms(&mut atoms);
        assert_eq!(atoms, vec!["b", "a", "c"]);
    }
}
