//! Reading DFAs from the DOT dialects produced by the LTLf-to-DFA
//! toolchain.
//!
//! Two dialects are recognized. The MONA-style dialect lists accepting and
//! plain states in separate `node [shape = …];` statements and marks the
//! initial state with `init -> 1;`. The per-node dialect attaches shapes to
//! each node (`s1 [shape=doublecircle];`) and uses a `__start` pseudo-node.
//! Edge attributes supply the Boolean transition label.

use crate::error::{PlannerError, Result};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One labeled transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaTransition {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// A deterministic finite automaton over propositional labels.
#[derive(Debug, Clone, Default)]
pub struct Dfa {
    states: Vec<String>,
    initial_state: Option<String>,
    accepting_states: Vec<String>,
    transitions: Vec<DfaTransition>,
}

impl Dfa {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| PlannerError::io(path, source))?;
        Self::from_dot(&text)
    }

    /// Parses a DOT document, line by line. Unknown statements are skipped;
    /// a line that looks like an edge but cannot be parsed is an error.
    pub fn from_dot(text: &str) -> Result<Self> {
        let mut dfa = Dfa::default();

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty()
                || line.starts_with("digraph")
                || line.starts_with('}')
                || line.starts_with("rankdir")
                || line.starts_with("//")
            {
                continue;
            }

            // MONA-style shape statements: node [shape = doublecircle]; 1; 4;
            if let Some(rest) = line.strip_prefix("node") {
                let rest = rest.trim_start();
                if let Some(attrs_end) = rest.find(']') {
                    let attrs = &rest[..attrs_end];
                    let ids = ids_after_attributes(&rest[attrs_end + 1..]);
                    if attrs.contains("doublecircle") {
                        for id in ids {
                            dfa.add_accepting_state(id);
                        }
                    } else if attrs.contains("circle") {
                        for id in ids {
                            dfa.add_state(id);
                        }
                    }
                }
                continue;
            }

            if let Some((source, rest)) = split_edge(line) {
                let (target, attributes) = split_target(rest);

                // Initial-state markers in both dialects.
                if source == "init" || source == "__start" {
                    dfa.add_state(target.clone());
                    dfa.initial_state = Some(target);
                    continue;
                }

                let label = match extract_label(attributes) {
                    Some(label) => label,
                    None => {
                        return Err(PlannerError::DfaParse(format!(
                            "edge `{line}` has no label attribute"
                        )))
                    }
                };

                dfa.add_state(source.clone());
                dfa.add_state(target.clone());
                dfa.transitions.push(DfaTransition {
                    source,
                    target,
                    label,
                });
                continue;
            }

            // Per-node dialect: s1 [shape=doublecircle, label="1"];
            if let Some(bracket) = line.find('[') {
                let id = line[..bracket].trim();
                if id.is_empty()
                    || matches!(id, "graph" | "edge" | "__start" | "init")
                    || !is_identifier(id)
                {
                    continue;
                }
                let attributes = &line[bracket..];
                if attributes.contains("doublecircle") {
                    dfa.add_accepting_state(id.to_string());
                } else {
                    dfa.add_state(id.to_string());
                }
            }
        }

        debug!(
            states = dfa.states.len(),
            transitions = dfa.transitions.len(),
            accepting = dfa.accepting_states.len(),
            "parsed DFA"
        );

        Ok(dfa)
    }

    fn add_state(&mut self, id: String) {
        if !self.states.contains(&id) {
            self.states.push(id);
        }
    }

    fn add_accepting_state(&mut self, id: String) {
        self.add_state(id.clone());
        if !self.accepting_states.contains(&id) {
            self.accepting_states.push(id);
        }
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn initial_state(&self) -> Option<&str> {
        self.initial_state.as_deref()
    }

    pub fn accepting_states(&self) -> &[String] {
        &self.accepting_states
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting_states.iter().any(|s| s == state)
    }

    pub fn transitions(&self) -> &[DfaTransition] {
        &self.transitions
    }

    pub(crate) fn with_transitions(&self, transitions: Vec<DfaTransition>) -> Self {
        Self {
            states: self.states.clone(),
            initial_state: self.initial_state.clone(),
            accepting_states: self.accepting_states.clone(),
            transitions,
        }
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "digraph DFA {{")?;
        if !self.accepting_states.is_empty() {
            writeln!(
                f,
                "    node [shape = doublecircle]; {};",
                self.accepting_states.join("; ")
            )?;
        }
        let plain: Vec<&String> = self
            .states
            .iter()
            .filter(|state| !self.is_accepting(state))
            .collect();
        if !plain.is_empty() {
            let ids: Vec<&str> = plain.iter().map(|s| s.as_str()).collect();
            writeln!(f, "    node [shape = circle]; {};", ids.join("; "))?;
        }
        if let Some(initial) = &self.initial_state {
            writeln!(f, "    init [shape = plaintext];")?;
            writeln!(f, "    init -> {initial};")?;
        }
        for transition in &self.transitions {
            writeln!(
                f,
                "    {} -> {} [label=\"{}\"];",
                transition.source, transition.target, transition.label
            )?;
        }
        write!(f, "}}")
    }
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits `a -> rest` into the source identifier and the remainder.
fn split_edge(line: &str) -> Option<(String, &str)> {
    let arrow = line.find("->")?;
    let source = line[..arrow].trim();
    if !is_identifier(source) {
        return None;
    }
    Some((source.to_string(), line[arrow + 2..].trim()))
}

/// Splits the edge remainder into the target identifier and its attribute
/// text (possibly empty).
fn split_target(rest: &str) -> (String, &str) {
    match rest.find('[') {
        Some(bracket) => (
            rest[..bracket].trim().trim_end_matches(';').to_string(),
            &rest[bracket..],
        ),
        None => (rest.trim_end_matches(';').trim().to_string(), ""),
    }
}

/// Pulls the quoted value of a `label="…"` attribute.
fn extract_label(attributes: &str) -> Option<String> {
    let start = attributes.find("label=\"")? + "label=\"".len();
    let end = attributes[start..].find('"')?;
    Some(attributes[start..start + end].to_string())
}

/// The state ids trailing a MONA shape statement, e.g. `; 1; 4;` or `; 1, 4;`.
fn ids_after_attributes(rest: &str) -> Vec<String> {
    rest.split(|c: char| c == ';' || c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|id| !id.is_empty() && is_identifier(id))
        .map(str::to_string)
        .collect()
}
