use thiserror::Error;

use crate::Key;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("the index is empty")]
    Empty,
    #[error("key {0} is not in the index")]
    NotFound(Key),
    #[error("rank {rank} is out of range for an index of {len} keys")]
    RankOutOfRange { rank: usize, len: usize },
    #[error("index invariant violated: {0}")]
    InvariantViolation(String),
}
