#![warn(missing_debug_implementations)]
#![deny(dead_code)]
#![deny(non_ascii_idents)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unit_bindings)]
#![warn(unused_crate_dependencies)]
#![warn(unused_qualifications)]

// Crate dependencies used in the binary but not in the library. Unfortunately
// cargo does not yet allow specifying dependencies for binaries only.
use tracing_subscriber as _;

pub mod automata;
pub mod emit;
pub mod error;
pub mod goals;
pub mod grounding;
pub mod parsed_types;
pub mod parsers;
pub mod pipeline;
pub mod search;

pub use error::PlannerError;
pub use pipeline::{GeneratedLibrary, PipelineConfig, PlanGenerator};
