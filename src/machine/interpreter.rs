//! Program interpreter.
//!
//! Executes a [`Program`] in a single linear pass. There are no jumps: every
//! instruction is visited exactly once, in order. After each instruction the
//! interpreter folds the current register maximum into the running high-water
//! mark, so the run reports both the final largest register and the largest
//! value any register ever held.

use crate::machine::errors::MachineError;
use crate::machine::isa::{Condition, Instruction};
use crate::machine::parser::{ParsePolicy, parse_program};
use crate::machine::program::Program;
use crate::machine::registers::Registers;


impl Condition {
    /// Evaluates the comparison against the current register values.
    ///
    /// A register that was never written compares as 0.
    pub fn evaluate(&self, registers: &Registers) -> bool {
        self.op.compare(registers.get(&self.register), self.value)
    }
}

impl Instruction {
    /// Applies this instruction to `registers`.
    ///
    /// The condition is evaluated first; when it does not hold the registers
    /// are left untouched. Returns whether the mutation was applied.
    pub fn perform(&self, registers: &mut Registers) -> bool {
        if !self.condition.evaluate(registers) {
            return false;
        }
        let value = self.mutation.apply(registers.get(&self.register));
        registers.set(&self.register, value);
        true
    }
}

/// State threaded through a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionState {
    pub registers: Registers,
    /// Largest value held by any register after any instruction so far.
    /// Starts at 0 and never decreases.
    pub highest_running_value: i64,
}

/// Final result of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Register values after the last instruction.
    pub registers: Registers,
    /// Largest register value after the last instruction, 0 if no register was written.
    pub largest_final_value: i64,
    /// Largest value any register held during the run.
    pub highest_running_value: i64,
    /// Number of instructions executed.
    pub executed: usize,
    /// Number of instructions whose condition held.
    pub applied: usize,
}

/// Register machine interpreter.
#[derive(Debug, Default)]
pub struct Interpreter {
    state: ExecutionState,
    executed: usize,
    applied: usize,
}

impl Interpreter {
    /// Creates an interpreter with empty registers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn registers(&self) -> &Registers {
        &self.state.registers
    }

    pub fn highest_running_value(&self) -> i64 {
        self.state.highest_running_value
    }

    /// Executes one instruction and updates the running maximum.
    ///
    /// Returns whether the instruction's condition held.
    pub fn step(&mut self, instruction: &Instruction) -> bool {
        let applied = instruction.perform(&mut self.state.registers);
        self.executed += 1;
        if applied {
            self.applied += 1;
        }

        let current = self.state.registers.largest_value();
        if current > self.state.highest_running_value {
            self.state.highest_running_value = current;
        }
        applied
    }

    /// Executes every instruction of `program` in order.
    pub fn run(&mut self, program: &Program) {
        for instruction in program {
            self.step(instruction);
        }
    }

    /// Like [`run`](Self::run), but also returns the running maximum observed
    /// after each instruction.
    pub fn run_traced(&mut self, program: &Program) -> Vec<i64> {
        program
            .iter()
            .map(|instruction| {
                self.step(instruction);
                self.state.highest_running_value
            })
            .collect()
    }

    /// Consumes the interpreter and reports the terminal state.
    pub fn finish(self) -> Outcome {
        Outcome {
            largest_final_value: self.state.registers.largest_value(),
            highest_running_value: self.state.highest_running_value,
            registers: self.state.registers,
            executed: self.executed,
            applied: self.applied,
        }
    }
}

/// Runs `program` from empty registers.
pub fn run(program: &Program) -> Outcome {
    let mut interpreter = Interpreter::new();
    interpreter.run(program);
    interpreter.finish()
}

/// Parses `source` under `policy` and runs the resulting program.
///
/// Fails only when `policy` is [`ParsePolicy::Strict`] and a line is malformed.
pub fn interpret(source: &str, policy: ParsePolicy) -> Result<Outcome, MachineError> {
    let report = parse_program(source, policy)?;
    Ok(run(&report.program))
}
