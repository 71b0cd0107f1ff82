//! Core drill logic
//!
//! Label derivation from file names and answer checking.

pub mod evaluator;
pub mod label;

pub use evaluator::evaluate;
pub use label::{display_name, normalize, spell_out};
