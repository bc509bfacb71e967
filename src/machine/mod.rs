//! Conditional register machine.
//!
//! Programs are lists of instructions that increment or decrement a named
//! register when a comparison on another (or the same) register holds.
//!
//! # Architecture
//!
//! - **Registers**: unbounded set of named `i64` registers, created on first write
//! - **Default value**: a register that was never written reads as 0
//! - **Execution model**: one linear pass, no jumps; each instruction runs once
//! - **Tracking**: the interpreter records the highest value any register held
//!
//! # Modules
//!
//! - [`errors`]: Parse and input error types
//! - [`interpreter`]: Condition evaluation, instruction execution and program runs
//! - [`isa`]: Instruction, mutation, condition and operator definitions
//! - [`parser`]: Source text parsing, parse policies and diagnostics
//! - [`program`]: Parsed program representation
//! - [`registers`]: Register set with default-zero reads

pub mod errors;
pub mod interpreter;
pub mod isa;
pub mod parser;
pub mod program;
pub mod registers;
