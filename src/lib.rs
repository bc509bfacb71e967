//! Register machine library.
//!
//! Parses and runs programs of conditional increment/decrement instructions
//! over named integer registers.

pub mod machine;
pub mod test_utils;
pub mod utils;
