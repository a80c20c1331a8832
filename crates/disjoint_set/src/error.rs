use std::fmt;

use thiserror::Error;

/// Which argument of a two-element query was not registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    First,
    Second,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::First => f.write_str("first"),
            Operand::Second => f.write_str("second"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DisjointSetError {
    #[error("{operand} operand is not registered")]
    NotFound { operand: Operand },
}
