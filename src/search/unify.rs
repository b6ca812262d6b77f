//! Variable bindings and atom matching.

use crate::parsed_types::Name;
use crate::search::{Atom, Term};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A substitution from variable names to terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution(BTreeMap<Name, Term>);

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &Name) -> Option<&Term> {
        self.0.get(variable)
    }

    pub fn bind(&mut self, variable: Name, term: Term) {
        self.0.insert(variable, term);
    }

    pub fn is_bound(&self, variable: &Name) -> bool {
        self.0.contains_key(variable)
    }

    /// Applies the substitution to a single term. Unbound variables and
    /// constants pass through unchanged.
    pub fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Variable(name) => self.0.get(name).cloned().unwrap_or_else(|| term.clone()),
            Term::Constant(_) => term.clone(),
        }
    }

    /// Applies the substitution to every argument of an atom.
    pub fn apply_to_atom(&self, atom: &Atom) -> Atom {
        let arguments = atom.arguments().iter().map(|t| self.apply(t)).collect();
        Atom::new(atom.predicate().clone(), arguments, atom.is_negated())
    }

    /// The terms this substitution maps to.
    pub fn range(&self) -> impl Iterator<Item = &Term> {
        self.0.values()
    }
}

impl Display for Substitution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "?{var} -> {term}")?;
        }
        write!(f, "}}")
    }
}

/// Matches `pattern` (an effect atom over schema variables) against `target`
/// (a subgoal atom), extending `binding`. Matching is one-sided: only pattern
/// variables are bound; a bound pattern variable must map to a syntactically
/// identical term on re-use, and pattern constants match only equal constants.
/// Negation flags are not consulted; callers match positive forms.
pub fn match_atoms(pattern: &Atom, target: &Atom, binding: &Substitution) -> Option<Substitution> {
    if pattern.predicate() != target.predicate() || pattern.arity() != target.arity() {
        return None;
    }

    let mut unified = binding.clone();
    for (pattern_arg, target_arg) in pattern.arguments().iter().zip(target.arguments()) {
        match pattern_arg {
            Term::Variable(var) => match unified.get(var) {
                Some(bound) => {
                    if bound != target_arg {
                        return None;
                    }
                }
                None => unified.bind(var.clone(), target_arg.clone()),
            },
            Term::Constant(_) => {
                if pattern_arg != target_arg {
                    return None;
                }
            }
        }
    }

    Some(unified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn pattern() -> Atom {
        Atom::positive("on", smallvec![Term::variable("x"), Term::variable("y")])
    }

    #[test]
    fn binds_variables_to_constants() {
        let target = Atom::positive("on", smallvec![Term::constant("a"), Term::constant("b")]);
        let binding = match_atoms(&pattern(), &target, &Substitution::new()).unwrap();
        assert_eq!(binding.get(&"x".into()), Some(&Term::constant("a")));
        assert_eq!(binding.get(&"y".into()), Some(&Term::constant("b")));
    }

    #[test]
    fn binds_variables_to_variables() {
        let target = Atom::positive("on", smallvec![Term::variable("v1"), Term::variable("v2")]);
        let binding = match_atoms(&pattern(), &target, &Substitution::new()).unwrap();
        assert_eq!(binding.get(&"x".into()), Some(&Term::variable("v1")));
    }

    #[test]
    fn repeated_variables_must_agree() {
        let twice = Atom::positive("on", smallvec![Term::variable("x"), Term::variable("x")]);
        let ab = Atom::positive("on", smallvec![Term::constant("a"), Term::constant("b")]);
        let aa = Atom::positive("on", smallvec![Term::constant("a"), Term::constant("a")]);
        assert!(match_atoms(&twice, &ab, &Substitution::new()).is_none());
        assert!(match_atoms(&twice, &aa, &Substitution::new()).is_some());
    }

    #[test]
    fn predicate_and_arity_must_match() {
        let clear = Atom::positive("clear", smallvec![Term::variable("x")]);
        let target = Atom::positive("on", smallvec![Term::constant("a"), Term::constant("b")]);
        assert!(match_atoms(&clear, &target, &Substitution::new()).is_none());
    }
}
