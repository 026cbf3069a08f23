//! Error type shared by every fallible table and column operation.

use crate::element::DataType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Inputs that must share a length do not.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// A row or type list does not match the number of columns.
    #[error("column count mismatch: expected {expected}, found {found}")]
    ColumnCountMismatch { expected: usize, found: usize },

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("index {index} out of range [0, {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("operator {operator} is not supported for {dtype} columns")]
    IllegalOperator { operator: String, dtype: DataType },

    /// The filter operand has the wrong shape or type for the operator/column.
    #[error("invalid operand: {0}")]
    OperandMismatch(String),

    #[error("arithmetic {operator} is not supported between {left} and {right}")]
    IllegalArithmetic {
        operator: String,
        left: DataType,
        right: DataType,
    },

    #[error("tables have different column names: {left:?} vs {right:?}")]
    ColumnSetMismatch { left: Vec<String>, right: Vec<String> },

    #[error("column '{column}' needs {missing} more values but no default was given")]
    MissingDefault { column: String, missing: usize },

    #[error("input is empty: {0}")]
    EmptyInput(String),

    #[error("{0} columns cannot be sorted")]
    UnsortableType(DataType),

    #[error("unknown data type '{0}'")]
    UnknownType(String),
}

pub type Result<T> = std::result::Result<T, TableError>;

/// Returns `Ok(len)` when every length in `lens` is equal, `Ok(0)` when empty.
pub(crate) fn equal_length<I>(lens: I) -> Result<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut iter = lens.into_iter();
    let Some(expected) = iter.next() else {
        return Ok(0);
    };
    for found in iter {
        if found != expected {
            return Err(TableError::LengthMismatch { expected, found });
        }
    }
    Ok(expected)
}
