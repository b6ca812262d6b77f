//! The error taxonomy of the generator.
//!
//! Parse-time and loader failures abort the pipeline and surface here.
//! Search-time discards are local and silent, and budget exhaustion is a flag
//! on the search result rather than an error, so neither appears in this
//! enum.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// Unreadable PDDL, an action adding and deleting the same literal, or a
    /// schema referring to an undeclared predicate.
    #[error("domain syntax error: {0}")]
    DomainSyntax(String),

    /// A malformed Boolean expression on a DFA edge.
    #[error("cannot parse transition label `{label}`: {reason}")]
    LabelParse { label: String, reason: String },

    /// The enumerative refiner was asked to enumerate an alphabet beyond its
    /// cap.
    #[error("alphabet has {count} atoms, above the enumerative refiner cap of {cap}")]
    TooManyPredicates { count: usize, cap: usize },

    /// A propositional symbol on a DFA edge has no grounding-map entry.
    #[error("atom `{symbol}` has no entry in the grounding map")]
    GroundingMapMismatch { symbol: String },

    /// The DFA document does not follow either supported DOT dialect.
    #[error("cannot parse DFA: {0}")]
    DfaParse(String),

    /// The grounding map document is not valid JSON of the expected shape.
    #[error("cannot parse grounding map: {0}")]
    GroundingMapParse(#[from] serde_json::Error),

    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PlannerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
