use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// Named integer registers.
///
/// Registers are created on first write. Reading a register that was never
/// written yields 0. Iteration is ordered by register name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    regs: BTreeMap<String, i64>,
}

impl Registers {
    /// Creates an empty register set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `name`, or 0 if it has never been written.
    pub fn get(&self, name: &str) -> i64 {
        self.regs.get(name).copied().unwrap_or(0)
    }

    /// Returns the value of `name` only if it has been written.
    pub fn get_opt(&self, name: &str) -> Option<i64> {
        self.regs.get(name).copied()
    }

    /// Stores `value` into register `name`.
    pub fn set(&mut self, name: &str, value: i64) {
        match self.regs.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.regs.insert(name.to_string(), value);
            }
        }
    }

    /// Largest value held by any register, `None` when no register exists.
    pub fn max_value(&self) -> Option<i64> {
        self.regs.values().copied().max()
    }

    /// Largest value held by any register, 0 when no register exists.
    pub fn largest_value(&self) -> i64 {
        self.max_value().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.regs.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for Registers {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self {
            regs: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}
