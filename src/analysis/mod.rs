//! Command Classification Analyses
//!
//! Pure recursions over the command tree that let the generator decide
//! where host-graph backtracking is provably unnecessary.

pub mod properties;

pub use properties::{never_fails, null_command, single_rule};
