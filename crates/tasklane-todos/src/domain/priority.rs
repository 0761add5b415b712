//! Todo item priority.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How urgent a todo item is. Stored as its integer value, serialized by
/// name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityLevel {
    #[default]
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

/// A stored priority value outside the known levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown priority level {0}")]
pub struct UnknownPriorityLevel(pub i16);

impl PriorityLevel {
    /// The stored integer value.
    #[must_use]
    pub const fn value(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for PriorityLevel {
    type Error = UnknownPriorityLevel;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(UnknownPriorityLevel(other)),
        }
    }
}
