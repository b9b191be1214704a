use crate::grid::Axis;
use thiserror::Error;

/// Errors raised while building a grid or strictly encoding a cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("invalid grid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("cell coordinate {value} on the {axis} axis is outside [{min}, {max}]")]
    CellOutOfRange {
        axis: Axis,
        value: i32,
        min: i64,
        max: i64,
    },
}

impl GridError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
