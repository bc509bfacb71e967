//! Instruction set definitions.
//!
//! A program is a list of conditional mutations of the form
//!
//! ```text
//! REGISTER (inc|dec) AMOUNT if REGISTER OPERATOR VALUE
//! ```
//!
//! The comparison operators are declared once in `for_each_operator!` and
//! expanded into the [`Operator`] enum, its symbol table and its comparison
//! semantics.
//!
//! Every type here implements [`Display`] producing its canonical source form,
//! so that `instr.to_string().parse::<Instruction>()` yields `instr` again.

use crate::machine::errors::MachineError;
use crate::machine::parser;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Keyword that introduces the condition part of an instruction.
pub const CONDITION_KEYWORD: &str = "if";
/// Mnemonic for [`Mutation::Increment`].
pub const INCREMENT_MNEMONIC: &str = "inc";
/// Mnemonic for [`Mutation::Decrement`].
pub const DECREMENT_MNEMONIC: &str = "dec";

/// Invokes a callback macro with the complete comparison operator table.
macro_rules! for_each_operator {
    ($callback:ident) => {
        $callback! {
            /// `a < b`
            LessThan = "<" => lt,
            /// `a <= b`
            LessThanOrEqual = "<=" => le,
            /// `a == b`
            Equal = "==" => eq,
            /// `a != b`
            NotEqual = "!=" => ne,
            /// `a >= b`
            GreaterThanOrEqual = ">=" => ge,
            /// `a > b`
            GreaterThan = ">" => gt,
        }
    };
}

macro_rules! define_operators {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $symbol:literal => $cmp:ident
        ),* $(,)?
    ) => {
        /// Comparison operator used by a [`Condition`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operator {
            $(
                $(#[$doc])*
                $name,
            )*
        }

        impl Operator {
            /// All operators, in declaration order.
            pub const ALL: &'static [Operator] = &[$( Operator::$name ),*];

            /// Returns the source symbol of this operator.
            pub const fn symbol(&self) -> &'static str {
                match self {
                    $( Operator::$name => $symbol, )*
                }
            }

            /// Looks up an operator by its source symbol.
            pub fn from_symbol(symbol: &str) -> Result<Self, MachineError> {
                match symbol {
                    $( $symbol => Ok(Operator::$name), )*
                    _ => Err(MachineError::InvalidOperator {
                        symbol: symbol.to_string(),
                    }),
                }
            }

            /// Applies the comparison `lhs OP rhs`.
            pub fn compare(&self, lhs: i64, rhs: i64) -> bool {
                match self {
                    $( Operator::$name => lhs.$cmp(&rhs), )*
                }
            }
        }
    };
}

for_each_operator!(define_operators);

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_symbol(s)
    }
}

/// Change applied to the target register when the condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    Increment(i64),
    Decrement(i64),
}

impl Mutation {
    /// Builds a mutation from its mnemonic and amount.
    pub fn from_mnemonic(verb: &str, amount: i64) -> Result<Self, MachineError> {
        match verb {
            INCREMENT_MNEMONIC => Ok(Mutation::Increment(amount)),
            DECREMENT_MNEMONIC => Ok(Mutation::Decrement(amount)),
            _ => Err(MachineError::InvalidMutation {
                verb: verb.to_string(),
            }),
        }
    }

    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Mutation::Increment(_) => INCREMENT_MNEMONIC,
            Mutation::Decrement(_) => DECREMENT_MNEMONIC,
        }
    }

    pub const fn amount(&self) -> i64 {
        match self {
            Mutation::Increment(amount) | Mutation::Decrement(amount) => *amount,
        }
    }

    /// Returns `value` after applying this mutation.
    ///
    /// Arithmetic wraps on overflow.
    pub fn apply(&self, value: i64) -> i64 {
        match self {
            Mutation::Increment(amount) => value.wrapping_add(*amount),
            Mutation::Decrement(amount) => value.wrapping_sub(*amount),
        }
    }
}

impl Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mnemonic(), self.amount())
    }
}

/// Guard that decides whether an instruction's mutation runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Register read by the comparison.
    pub register: String,
    pub op: Operator,
    /// Right-hand side of the comparison.
    pub value: i64,
}

impl Condition {
    pub fn new(register: impl Into<String>, op: Operator, value: i64) -> Self {
        Self {
            register: register.into(),
            op,
            value,
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{CONDITION_KEYWORD} {} {} {}",
            self.register, self.op, self.value
        )
    }
}

/// A single conditional register mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Register written when the condition holds.
    pub register: String,
    pub mutation: Mutation,
    pub condition: Condition,
}

impl Instruction {
    pub fn new(register: impl Into<String>, mutation: Mutation, condition: Condition) -> Self {
        Self {
            register: register.into(),
            mutation,
            condition,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.register, self.mutation, self.condition)
    }
}

impl FromStr for Instruction {
    type Err = MachineError;

    /// Parses a single line. Errors report line 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_line(1, s)
    }
}
