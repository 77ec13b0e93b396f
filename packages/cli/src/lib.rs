//! Shared pieces of the `itms` terminal front end
//!
//! The binary in `src/bin` wires these to clap commands; everything here is
//! plain library code so it can be tested without a terminal.

pub mod assignments;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod render;

pub use assignments::{parse_assignments, parse_form_assignments, parse_record, AssignmentError};
pub use render::Tabular;
